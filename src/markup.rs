use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::MarkupError;

/// Return the raw inner content of the first `<pre>` element, nested markup
/// and entity references included. The whole document must be one
/// well-formed element; anything else is an error even after `<pre>` is found.
pub fn extract_pre(document: &str) -> Result<String, MarkupError> {
    let mut reader = Reader::from_str(document);
    let mut inner: Option<String> = None;
    let mut depth = 0usize;
    let mut seen_root = false;

    loop {
        let event = reader.read_event().map_err(|err| malformed(&reader, err))?;
        match &event {
            Event::Start(_) | Event::Empty(_) if depth == 0 && seen_root => {
                return Err(ill_formed(&reader, "more than one root element"));
            }
            Event::Text(t) if depth == 0 && !t.iter().all(u8::is_ascii_whitespace) => {
                return Err(ill_formed(&reader, "text outside the root element"));
            }
            Event::CData(_) if depth == 0 => {
                return Err(ill_formed(&reader, "text outside the root element"));
            }
            _ => {}
        }

        match event {
            Event::Start(e) if inner.is_none() && is_pre(e.local_name().as_ref()) => {
                seen_root = true;
                let span = reader
                    .read_to_end(e.name())
                    .map_err(|err| malformed(&reader, err))?;
                let start = usize::try_from(span.start).unwrap_or(document.len());
                let end = usize::try_from(span.end).unwrap_or(document.len());
                let content = document.get(start..end).unwrap_or_default();
                debug!(start, end, "found <pre> element");
                inner = Some(content.to_string());
            }
            Event::Start(_) => {
                seen_root = true;
                depth += 1;
            }
            Event::Empty(e) => {
                seen_root = true;
                if inner.is_none() && is_pre(e.local_name().as_ref()) {
                    inner = Some(String::new());
                }
            }
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof if depth > 0 => {
                return Err(ill_formed(&reader, "unclosed element at end of document"));
            }
            Event::Eof => break,
            _ => {}
        }
    }

    inner.ok_or(MarkupError::NoPre)
}

fn is_pre(name: &[u8]) -> bool {
    name.eq_ignore_ascii_case(b"pre")
}

fn malformed(reader: &Reader<&[u8]>, source: quick_xml::Error) -> MarkupError {
    MarkupError::Malformed {
        position: reader.error_position().try_into().unwrap_or(u64::MAX),
        source,
    }
}

fn ill_formed(reader: &Reader<&[u8]>, reason: &'static str) -> MarkupError {
    MarkupError::IllFormed {
        position: reader.buffer_position().try_into().unwrap_or(u64::MAX),
        reason,
    }
}

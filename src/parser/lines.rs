/// Coarse shape of a single line of table text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Divider,
    Content,
}

/// Blank wins over divider: a whitespace-only line is never a divider.
pub fn classify(line: &str) -> LineKind {
    if is_blank(line) {
        LineKind::Blank
    } else if is_divider(line) {
        LineKind::Divider
    } else {
        LineKind::Content
    }
}

pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// A visual rule such as `-----` or `=====`: one character repeated across
/// the trimmed line. A lone character (`"1"`) also counts as a divider.
pub fn is_divider(line: &str) -> bool {
    let trimmed = line.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => chars.all(|c| c == first),
        None => false,
    }
}

use std::sync::LazyLock;

use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::lines::{classify, LineKind};
use crate::error::TableError;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// First surviving line is a caption, not the header.
    pub has_title_line: bool,
    pub ignore_blank_lines: bool,
    pub ignore_divider_lines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            has_title_line: true,
            ignore_blank_lines: true,
            ignore_divider_lines: true,
        }
    }
}

impl ParseOptions {
    pub fn with_title_line(mut self, yes: bool) -> Self {
        self.has_title_line = yes;
        self
    }

    pub fn with_blank_lines_ignored(mut self, yes: bool) -> Self {
        self.ignore_blank_lines = yes;
        self
    }

    pub fn with_divider_lines_ignored(mut self, yes: bool) -> Self {
        self.ignore_divider_lines = yes;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Character offset of the name in the header line.
    pub start: usize,
}

/// Column layout read off the header line. `end` is the header's length in
/// characters and closes the last column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub columns: Vec<Column>,
    pub end: usize,
}

impl Header {
    pub fn from_line(line: &str) -> Self {
        let columns = TOKEN_RE
            .find_iter(line)
            .map(|m| Column {
                name: m.as_str().to_string(),
                start: line[..m.start()].chars().count(),
            })
            .collect();
        Header {
            columns,
            end: line.chars().count(),
        }
    }

    fn boundary_after(&self, idx: usize) -> usize {
        self.columns.get(idx + 1).map_or(self.end, |c| c.start)
    }

    /// Cut a data line at the column boundaries. Short lines give empty
    /// trailing fields; text past a boundary belongs to no column.
    pub fn slice(&self, line: &str) -> Record {
        let len = line.chars().count();
        let mut record = Record::default();
        for (i, col) in self.columns.iter().enumerate() {
            let end = len.min(self.boundary_after(i));
            record.insert(&col.name, char_slice(line, col.start, end).trim());
        }
        record
    }
}

fn char_slice(line: &str, start: usize, end: usize) -> &str {
    if start >= end {
        return "";
    }
    let byte_at = |n: usize| line.char_indices().nth(n).map_or(line.len(), |(b, _)| b);
    &line[byte_at(start)..byte_at(end)]
}

/// One data line keyed by header column, in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// A repeated column name keeps its first position and its latest value.
    fn insert(&mut self, name: &str, value: &str) {
        match self.fields.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.fields.push((name.to_string(), value.to_string())),
        }
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::default();
        for (k, v) in iter {
            record.insert(k.as_ref(), v.as_ref());
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

enum Stage {
    Title,
    Header,
    Rows(Header),
}

/// Parse a fixed-width table in one pass: skip noise, drop the optional
/// title, take column starts from the header, then slice every data line.
pub fn parse_fixed_width(text: &str, opts: &ParseOptions) -> Result<Vec<Record>, TableError> {
    let mut stage = if opts.has_title_line {
        Stage::Title
    } else {
        Stage::Header
    };
    let mut records = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        match classify(line) {
            LineKind::Blank if opts.ignore_blank_lines => continue,
            LineKind::Divider if opts.ignore_divider_lines => continue,
            _ => {}
        }

        stage = match stage {
            Stage::Title => Stage::Header,
            Stage::Header => {
                let header = Header::from_line(line);
                let columns: Vec<_> = header.columns.iter().map(|c| (&c.name, c.start)).collect();
                debug!(line = idx + 1, ?columns, end = header.end, "header");
                Stage::Rows(header)
            }
            Stage::Rows(header) => {
                if header.columns.is_empty() {
                    return Err(TableError::NoHeader { line: idx + 1 });
                }
                records.push(header.slice(line));
                Stage::Rows(header)
            }
        };
    }

    debug!(records = records.len(), "parsed fixed-width table");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(record: &Record) -> Vec<(&str, &str)> {
        record.iter().collect()
    }

    #[test]
    fn header_offsets_from_token_positions() {
        let header = Header::from_line("  Dy MxT   MnT");
        let starts: Vec<_> = header
            .columns
            .iter()
            .map(|c| (c.name.as_str(), c.start))
            .collect();
        assert_eq!(starts, vec![("Dy", 2), ("MxT", 5), ("MnT", 11)]);
        assert_eq!(header.end, 14);
    }

    #[test]
    fn repeated_substring_names_get_their_own_offsets() {
        // "T" also occurs inside "MxT"; offsets must come from the token itself.
        let header = Header::from_line("MxT  T  A");
        let starts: Vec<_> = header.columns.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 5, 8]);
    }

    #[test]
    fn weather_style_row() {
        let text = "June\n  Dy MxT   MnT\n   1  75*   52";
        let rows = parse_fixed_width(text, &ParseOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(fields(&rows[0]), vec![("Dy", "1"), ("MxT", "75*"), ("MnT", "52")]);
    }

    #[test]
    fn title_line_is_discarded() {
        let text = "Dy MxT MnT\nA  B   C\n1  2   3";
        let rows = parse_fixed_width(text, &ParseOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("A"), Some("1"));
        assert_eq!(rows[0].get("Dy"), None);
    }

    #[test]
    fn no_title_uses_first_line_as_header() {
        let text = "A  B\n1  2\n3  4";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("B"), Some("4"));
    }

    #[test]
    fn noise_lines_are_skipped() {
        let text = "\n  Title\n\n Name  Qty\n ---------\n apple   3\n\n =========\n pear   12\n";
        let rows = parse_fixed_width(text, &ParseOptions::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(fields(&rows[0]), vec![("Name", "apple"), ("Qty", "3")]);
        assert_eq!(fields(&rows[1]), vec![("Name", "pear"), ("Qty", "12")]);
    }

    #[test]
    fn record_count_matches_line_accounting() {
        let lines = ["", "Title", "A   B", "----", "1   2", "", "3   4", "5   6", "===="];
        let text = lines.join("\n");
        let blank = lines.iter().filter(|l| classify(l) == LineKind::Blank).count();
        let divider = lines.iter().filter(|l| classify(l) == LineKind::Divider).count();
        let rows = parse_fixed_width(&text, &ParseOptions::default()).unwrap();
        assert_eq!(rows.len(), lines.len() - blank - divider - 1 - 1);
    }

    #[test]
    fn only_noise_yields_nothing() {
        let text = "\n   \n-----\n=====\n";
        let rows = parse_fixed_width(text, &ParseOptions::default()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse_fixed_width("", &ParseOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn ragged_line_gives_empty_trailing_fields() {
        let text = "A    B    C\n1    2";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(fields(&rows[0]), vec![("A", "1"), ("B", "2"), ("C", "")]);

        let rows = parse_fixed_width("A    B    C\n10", &opts).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(fields(&rows[0]), vec![("A", "10"), ("B", ""), ("C", "")]);
    }

    #[test]
    fn long_line_is_cut_at_header_end() {
        let text = "A  B\n1  2345678";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(rows[0].get("B"), Some("2"));
    }

    #[test]
    fn dividers_kept_when_not_ignored() {
        let text = "A  B\n----\n1  2";
        let opts = ParseOptions::default()
            .with_title_line(false)
            .with_divider_lines_ignored(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(fields(&rows[0]), vec![("A", "---"), ("B", "-")]);
    }

    #[test]
    fn single_char_row_is_treated_as_divider() {
        let text = "A  B\n1\n2  3";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("A"), Some("2"));
    }

    #[test]
    fn blank_header_fails_on_first_data_line() {
        let text = "\nA  B\n1  2";
        let opts = ParseOptions::default()
            .with_title_line(false)
            .with_blank_lines_ignored(false);
        let err = parse_fixed_width(text, &opts).unwrap_err();
        assert_eq!(err, TableError::NoHeader { line: 2 });
    }

    #[test]
    fn blank_header_without_data_is_not_an_error() {
        let opts = ParseOptions::default()
            .with_title_line(false)
            .with_blank_lines_ignored(false);
        assert!(parse_fixed_width("   ", &opts).unwrap().is_empty());
    }

    #[test]
    fn non_ascii_lines_slice_by_character() {
        let text = "Navn    By\nJørgen  Åsa";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(fields(&rows[0]), vec![("Navn", "Jørgen"), ("By", "Ås")]);
    }

    #[test]
    fn crlf_input() {
        let text = "A  B\r\n1  2\r\n";
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(text, &opts).unwrap();
        assert_eq!(fields(&rows[0]), vec![("A", "1"), ("B", "2")]);
    }

    #[test]
    fn duplicate_column_keeps_last_value_in_first_slot() {
        let record: Record = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(fields(&record), vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn record_serializes_in_column_order() {
        let record: Record = [("Team", "Leeds"), ("F", "53"), ("A", "37")].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Team":"Leeds","F":"53","A":"37"}"#);
    }

    #[test]
    fn weather_fixture() {
        let doc = std::fs::read_to_string("tests/fixtures/w_data.dat").unwrap();
        let text = crate::markup::extract_pre(&doc).unwrap();
        let rows = parse_fixed_width(&text, &ParseOptions::default()).unwrap();
        assert_eq!(rows.len(), 31);
        assert_eq!(rows[8].get("MnT"), Some("32*"));
        assert_eq!(rows[8].get("HDDay"), Some("6"));
        assert_eq!(rows[0].get("HDDay"), Some(""));
        assert_eq!(rows[30].get("Dy"), Some("mo"));
        assert!(rows.iter().all(|r| r.len() == 6));
    }

    #[test]
    fn record_len_counts_distinct_columns() {
        let record: Record = [("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert!(!record.is_empty());
        assert!(Record::default().is_empty());
    }

    #[test]
    fn soccer_fixture() {
        let doc = std::fs::read_to_string("tests/fixtures/soccer.dat").unwrap();
        let text = crate::markup::extract_pre(&doc).unwrap();
        let opts = ParseOptions::default().with_title_line(false);
        let rows = parse_fixed_width(&text, &opts).unwrap();
        assert_eq!(rows.len(), 20);
        assert_eq!(
            fields(&rows[0]),
            vec![
                ("Team", "Arsenal"),
                ("P", "38"),
                ("W", "26"),
                ("L", "9"),
                ("D", "3"),
                ("F", "79  -"),
                ("A", "36"),
                ("Pts", "87"),
            ]
        );
    }
}

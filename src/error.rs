use thiserror::Error;

/// Structural failures while slicing a fixed-width table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A data line arrived but the header line carried no column names.
    #[error("no header found before data line {line}")]
    NoHeader { line: usize },
}

/// Failures while pulling the preformatted region out of a document.
#[derive(Debug, Error)]
pub enum MarkupError {
    #[error("document has no <pre> element")]
    NoPre,

    #[error("malformed markup near byte {position}: {source}")]
    Malformed {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// Tags balance but the document is not a single well-formed element.
    #[error("ill-formed document near byte {position}: {reason}")]
    IllFormed { position: u64, reason: &'static str },
}

/// Failures while computing a per-record metric and picking the minimum.
#[derive(Debug, Error, PartialEq)]
pub enum ReduceError {
    #[error("no records to compare")]
    Empty,

    #[error("record {row} has no `{field}` column")]
    MissingField { field: String, row: usize },

    #[error("`{field}` value {value:?} is not a number")]
    NotANumber { field: String, value: String },
}

pub mod soccer;
pub mod weather;

use std::fmt;

use crate::error::ReduceError;
use crate::parser::{ParseOptions, Record};

/// The questions the tool knows how to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Weather,
    Soccer,
}

impl Domain {
    pub fn parse_options(self) -> ParseOptions {
        match self {
            Domain::Weather => ParseOptions::default(),
            Domain::Soccer => ParseOptions::default().with_title_line(false),
        }
    }

    pub fn reduce(self, records: &[Record]) -> Result<String, ReduceError> {
        match self {
            Domain::Weather => weather::find_smallest_temp_spread(records),
            Domain::Soccer => soccer::find_smallest_goal_difference(records),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Domain::Weather => "weather",
            Domain::Soccer => "soccer",
        })
    }
}

/// Record with the smallest metric, with its index. Ties keep the earliest.
pub fn min_by_metric<'a, F>(
    records: &'a [Record],
    mut metric: F,
) -> Result<(usize, &'a Record), ReduceError>
where
    F: FnMut(usize, &Record) -> Result<f64, ReduceError>,
{
    let mut best: Option<(usize, &Record, f64)> = None;
    for (row, record) in records.iter().enumerate() {
        let value = metric(row, record)?;
        if best.map_or(true, |(_, _, current)| value < current) {
            best = Some((row, record, value));
        }
    }
    best.map(|(row, record, _)| (row, record)).ok_or(ReduceError::Empty)
}

pub fn field<'a>(record: &'a Record, row: usize, name: &str) -> Result<&'a str, ReduceError> {
    record.get(name).ok_or_else(|| ReduceError::MissingField {
        field: name.to_string(),
        row,
    })
}

pub fn number(name: &str, raw: &str) -> Result<f64, ReduceError> {
    raw.trim().parse().map_err(|_| ReduceError::NotANumber {
        field: name.to_string(),
        value: raw.to_string(),
    })
}

use super::{field, min_by_metric, number};
use crate::error::ReduceError;
use crate::parser::Record;

const DAY: &str = "Dy";
const MAX_TEMP: &str = "MxT";
const MIN_TEMP: &str = "MnT";
/// `Dy` value of the monthly summary row that closes the table.
const MONTH_SUMMARY: &str = "mo";

/// Day of the month with the smallest gap between max and min temperature.
/// Extremes are flagged with `*` in the source data; the flag is ignored.
pub fn find_smallest_temp_spread(records: &[Record]) -> Result<String, ReduceError> {
    let days = match records.split_last() {
        Some((last, rest)) if last.get(DAY) == Some(MONTH_SUMMARY) => rest,
        Some(_) => records,
        None => return Err(ReduceError::Empty),
    };

    let (row, best) = min_by_metric(days, |row, r| {
        let max = number(MAX_TEMP, &unflag(field(r, row, MAX_TEMP)?))?;
        let min = number(MIN_TEMP, &unflag(field(r, row, MIN_TEMP)?))?;
        Ok(max - min)
    })?;

    Ok(field(best, row, DAY)?.to_string())
}

fn unflag(raw: &str) -> String {
    raw.replace('*', "").trim().to_string()
}

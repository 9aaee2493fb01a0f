use super::{field, min_by_metric, number};
use crate::error::ReduceError;
use crate::parser::Record;

const TEAM: &str = "Team";
const GOALS_FOR: &str = "F";
const GOALS_AGAINST: &str = "A";

/// Team whose goals for and against are closest. The league table prints
/// `F  -  A`, so the dash lands in the `F` column and is dropped.
pub fn find_smallest_goal_difference(records: &[Record]) -> Result<String, ReduceError> {
    let (row, best) = min_by_metric(records, |row, r| {
        let scored = field(r, row, GOALS_FOR)?.replace('-', "");
        let scored = number(GOALS_FOR, scored.trim())?;
        let conceded = number(GOALS_AGAINST, field(r, row, GOALS_AGAINST)?)?;
        Ok((scored - conceded).abs())
    })?;

    Ok(field(best, row, TEAM)?.to_string())
}

// Rust guideline compliant 2026-03-07

//! Offer effective-window validity check.

use chrono::NaiveDate;
use domain::FieldError;

/// Wire format of every date in the pipeline: zero-padded month/day/year.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Return whether `date` lies within `[window_start, window_end]`,
/// inclusive on both ends.
///
/// # Errors
///
/// Returns [`FieldError::MalformedDate`] when any of the three inputs does
/// not parse as `MM/DD/YYYY`. Callers treat that as "not effective" for the
/// current transaction and continue the batch.
pub fn is_effective(date: &str, window_start: &str, window_end: &str) -> Result<bool, FieldError> {
    let date = parse(date)?;
    let start = parse(window_start)?;
    let end = parse(window_end)?;
    Ok(start <= date && date <= end)
}

fn parse(value: &str) -> Result<NaiveDate, FieldError> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Ok(date),
        Err(_) => Err(FieldError::MalformedDate { value: value.to_owned() }),
    }
}

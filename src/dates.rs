/// Date canonicalization.
///
/// Dates are stored as `YYYY-MM-DD` text. Lexicographic order on that format
/// happens to match chronological order, but range filters compare parsed
/// calendar dates instead of relying on it.

use chrono::NaiveDate;
use thiserror::Error;

/// Reasons a `YYYY-MM-DD` string could not be turned into a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateParseError {
    #[error("expected YYYY-MM-DD with 3 segments, got {segments} in '{input}'")]
    SegmentCount { input: String, segments: usize },

    #[error("segment '{segment}' of '{input}' is not an integer")]
    NotNumeric { input: String, segment: String },

    #[error("'{input}' is not a valid calendar date")]
    OutOfRange { input: String },
}

/// Calendar years a date may carry.
pub const MIN_YEAR: i64 = 1;
pub const MAX_YEAR: i64 = 9999;

/// Parses `YYYY-MM-DD` into a comparable calendar date.
///
/// Each `-` separated segment is parsed as an integer (an explicit `+` sign
/// is accepted, surrounding whitespace is not). Years must fall in
/// 1..=9999; beyond that, the only range check is the one the calendar
/// itself imposes (month 13 or Feb 30 fail).
pub fn canonicalize(input: &str) -> Result<NaiveDate, DateParseError> {
    let segments: Vec<&str> = input.split('-').collect();
    if segments.len() != 3 {
        return Err(DateParseError::SegmentCount {
            input: input.to_string(),
            segments: segments.len(),
        });
    }

    let parse = |segment: &str| {
        segment.parse::<i64>().map_err(|_| DateParseError::NotNumeric {
            input: input.to_string(),
            segment: segment.to_string(),
        })
    };
    let year = parse(segments[0])?;
    let month = parse(segments[1])?;
    let day = parse(segments[2])?;

    let out_of_range = || DateParseError::OutOfRange { input: input.to_string() };
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(out_of_range());
    }
    let year = i32::try_from(year).map_err(|_| out_of_range())?;
    let month = u32::try_from(month).map_err(|_| out_of_range())?;
    let day = u32::try_from(day).map_err(|_| out_of_range())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(out_of_range)
}

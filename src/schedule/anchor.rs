use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

use crate::clock::Clock;

#[derive(Debug, Error, Eq, PartialEq)]
pub enum AnchorError {
    #[error("invalid time '{input}', expected HH:MM")]
    Malformed { input: String },
}

/// Parses `HH:MM` (or `HH:MM:SS`) and drops everything below the minute.
pub fn parse_anchor_time(input: &str) -> Result<NaiveTime, AnchorError> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map(truncate_to_minute)
        .map_err(|_| AnchorError::Malformed {
            input: input.to_string(),
        })
}

pub fn anchor_on(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    date.and_time(truncate_to_minute(time))
}

/// Places the user's anchor on today's date according to `clock`, or uses
/// the current minute when no time was given.
pub fn resolve_anchor(input: Option<&str>, clock: &dyn Clock) -> Result<NaiveDateTime, AnchorError> {
    let now = clock.now();
    let time = match input {
        Some(text) => parse_anchor_time(text)?,
        None => now.time(),
    };
    Ok(anchor_on(now.date(), time))
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

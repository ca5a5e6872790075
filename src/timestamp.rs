//! Publication date normalization.

use chrono::{NaiveDateTime, Timelike};
use thiserror::Error;

/// Layout of the `published` column in the archive.
pub const INPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO 8601 extended date-time without offset or fractional seconds.
pub const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Error, Debug)]
#[error("'{value}' is not a YYYY-MM-DD HH:MM:SS timestamp: {reason}")]
pub struct TimestampError {
    pub value: String,
    pub reason: String,
    pub source: Option<chrono::ParseError>,
}

impl TimestampError {
    fn rejected(value: &str, reason: &str) -> Self {
        Self {
            value: value.to_string(),
            reason: reason.to_string(),
            source: None,
        }
    }
}

/// Convert `YYYY-MM-DD HH:MM:SS` into `YYYY-MM-DDTHH:MM:SS`.
///
/// The value is treated as a naive local time; no timezone is attached.
/// Month, day and time fields may have one or two digits, the year exactly
/// four. Signs, surrounding whitespace and leap seconds are rejected.
pub fn normalize_timestamp(raw: &str) -> Result<String, TimestampError> {
    if !has_expected_shape(raw) {
        return Err(TimestampError::rejected(raw, "unexpected layout"));
    }

    let parsed =
        NaiveDateTime::parse_from_str(raw, INPUT_FORMAT).map_err(|source| TimestampError {
            value: raw.to_string(),
            reason: source.to_string(),
            source: Some(source),
        })?;

    // chrono encodes second 60 as a nanosecond overflow
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(TimestampError::rejected(raw, "leap seconds are not supported"));
    }

    Ok(parsed.format(OUTPUT_FORMAT).to_string())
}

/// `dddd-d[d]-d[d]<whitespace>d[d]:d[d]:d[d]`, ASCII digits only.
fn has_expected_shape(raw: &str) -> bool {
    let Some((date, time)) = raw.split_once(|c: char| c.is_ascii_whitespace()) else {
        return false;
    };
    let time = time.trim_start_matches(|c: char| c.is_ascii_whitespace());

    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|b| b.is_ascii_digit())
    };

    let date_parts: Vec<&str> = date.split('-').collect();
    let time_parts: Vec<&str> = time.split(':').collect();

    let date_ok = matches!(
        date_parts.as_slice(),
        [y, m, d] if digits(y, 4, 4) && digits(m, 1, 2) && digits(d, 1, 2)
    );
    let time_ok = matches!(
        time_parts.as_slice(),
        [h, m, s] if digits(h, 1, 2) && digits(m, 1, 2) && digits(s, 1, 2)
    );
    date_ok && time_ok
}

//! Text encoding of send timestamps.
//!
//! Timestamps are written with a fixed-width nanosecond fraction so that
//! SQLite's lexicographic `ORDER BY sent_at` matches chronological order.
//! Reading accepts any fraction length (or none), which covers rows written
//! by tools that only stored whole seconds or microseconds.

use chrono::{Datelike, NaiveDateTime, ParseError};
use std::ops::RangeInclusive;

/// Format used when writing `sent_at`.
pub const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f";

/// Format accepted when reading `sent_at`. The fraction is optional.
pub const READ_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Years whose `%Y` rendering is four unsigned digits.
pub const STORABLE_YEARS: RangeInclusive<i32> = 0..=9999;

/// Encode a timestamp for storage.
///
/// Returns `None` outside [`STORABLE_YEARS`]: chrono writes those years with
/// a sign and extra digits, which breaks text ordering.
pub fn encode(ts: &NaiveDateTime) -> Option<String> {
    STORABLE_YEARS
        .contains(&ts.year())
        .then(|| ts.format(STORAGE_FORMAT).to_string())
}

/// Decode a stored timestamp.
pub fn decode(value: &str) -> Result<NaiveDateTime, ParseError> {
    NaiveDateTime::parse_from_str(value, READ_FORMAT)
}

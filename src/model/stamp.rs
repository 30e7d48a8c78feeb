//! # Stamp Handling
//!
//! `Stamp` is the last-modified timestamp on a stock record. It doubles as
//! the sync cursor and as the optimistic-concurrency token; no other
//! version field exists.
//!
//! Stored form is the fixed string `YYYY-MM-DD HH:MM:SS`, chosen so that
//! lexicographic order in SQL equals chronological order.

use chrono::NaiveDateTime;

/// Canonical stamp format, stored and exported.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO-8601 variant some clients send for the sync bound.
const STAMP_FORMAT_T: &str = "%Y-%m-%dT%H:%M:%S";

/// Beginning-of-time bound used by the full-export endpoint.
pub const EPOCH_SENTINEL: &str = "1970-01-01 00:00:00";

/// Beginning-of-time bound, as a parsed value. Equals [`EPOCH_SENTINEL`].
pub fn epoch() -> NaiveDateTime {
    chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.naive_utc()
}

/// Parse a stamp in the strict stored format.
pub fn parse_stamp(s: &str) -> Result<NaiveDateTime, chrono::format::ParseError> {
    NaiveDateTime::parse_from_str(s, STAMP_FORMAT)
}

/// Parse a client-supplied sync bound. Accepts a space or `T` separator.
pub fn parse_sync_bound(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, STAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, STAMP_FORMAT_T))
        .ok()
}

/// Format a stamp into the canonical stored form.
pub fn format_stamp(dt: &NaiveDateTime) -> String {
    dt.format(STAMP_FORMAT).to_string()
}

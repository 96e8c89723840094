//! Publication timestamps.
//!
//! Content files write dates the way static-site generators expect them:
//! `2020-02-12 16:45:04 -0500`. RFC 3339 (`2020-02-12T16:45:04-05:00`) is
//! accepted as well. A timestamp must always carry its offset.
//!
//! Sub-second precision is kept: `2020-02-12 16:45:04.500 -0500` parses and
//! is written back with its fraction.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike};
use folio_core::{Error, Result};

/// Canonical output format used when re-serializing metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// Output format for timestamps with a non-zero fraction of a second.
pub const FRACTIONAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

// `%.f` also matches when there is no fraction.
const ACCEPTED_FORMATS: &[&str] = &[FRACTIONAL_TIMESTAMP_FORMAT, "%Y-%m-%d %H:%M %z"];

/// Parse a metadata timestamp.
///
/// `field` names the metadata key being parsed and is only used for error
/// reporting.
///
/// # Errors
///
/// Returns [`Error::InvalidTimestamp`] when the value matches none of the
/// accepted forms, or when it has no timezone offset.
///
/// # Example
///
/// ```rust
/// use folio_content::timestamp::parse_timestamp;
///
/// let ts = parse_timestamp("date", "2020-02-12 16:45:04 -0500").unwrap();
/// assert_eq!(ts.offset().local_minus_utc(), -5 * 3600);
///
/// assert!(parse_timestamp("date", "2020-02-12 16:45:04").is_err());
/// ```
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_timestamp(field, value, "empty value"));
    }

    for format in ACCEPTED_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(trimmed, format) {
            return Ok(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts);
    }

    let reason = if has_local_form(trimmed) {
        "timezone offset is required"
    } else {
        "expected 'YYYY-MM-DD HH:MM:SS +HHMM' or RFC 3339"
    };
    Err(Error::invalid_timestamp(field, value, reason))
}

fn has_local_form(value: &str) -> bool {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .any(|format| NaiveDateTime::parse_from_str(value, format).is_ok())
        || chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Format a timestamp in the canonical metadata form.
///
/// The fraction of a second is written only when it is non-zero, so the
/// output always parses back to the same instant and offset.
pub fn format_timestamp(ts: &DateTime<FixedOffset>) -> String {
    if ts.nanosecond() == 0 {
        ts.format(TIMESTAMP_FORMAT).to_string()
    } else {
        ts.format(FRACTIONAL_TIMESTAMP_FORMAT).to_string()
    }
}

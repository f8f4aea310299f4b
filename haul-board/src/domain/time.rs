//! Timestamp handling for upstream records.
//!
//! The data store is not consistent about timestamp formats: journey
//! events carry full RFC 3339 instants, allocations often carry a
//! space-separated datetime, and scheduled dates are frequently a bare
//! calendar date. Everything is normalized to `DateTime<Utc>` here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp: {reason}")]
pub struct TimeError {
    reason: &'static str,
}

impl TimeError {
    fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

/// Datetime layouts accepted without an offset, interpreted as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp from any of the formats the data store emits.
///
/// # Examples
///
/// ```
/// use haul_board::domain::parse_timestamp;
///
/// let a = parse_timestamp("2026-03-15T08:30:00Z").unwrap();
/// let b = parse_timestamp("2026-03-15 08:30:00").unwrap();
/// assert_eq!(a, b);
///
/// // A bare date is midnight UTC
/// let d = parse_timestamp("2026-03-15").unwrap();
/// assert_eq!(d.to_rfc3339(), "2026-03-15T00:00:00+00:00");
///
/// assert!(parse_timestamp("15/03/2026").is_err());
/// assert!(parse_timestamp("").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, TimeError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(TimeError::new("empty string"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(TimeError::new("unrecognized format"))
}

/// Serde adapter for optional timestamps.
///
/// `null`, a missing field, an empty string and an unparseable string all
/// decode to `None`. A bad timestamp must never make a whole feed fail to
/// decode; the affected record simply has no time.
pub fn deserialize_opt_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match parse_timestamp(&s) {
        Ok(dt) => Some(dt),
        Err(e) => {
            if !s.trim().is_empty() {
                tracing::warn!(value = %s, error = %e, "dropping unparseable timestamp");
            }
            None
        }
    }))
}

/// Format a timestamp for a table cell, "N/A" when absent.
pub fn display_time(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn rfc3339_with_offset_is_converted() {
        let dt = parse_timestamp("2026-01-03T10:00:00+02:00").unwrap();
        assert_eq!(dt.hour(), 8);
    }

    #[test]
    fn fractional_seconds() {
        let dt = parse_timestamp("2026-01-03 10:00:00.250").unwrap();
        assert_eq!(dt.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn minutes_precision() {
        let dt = parse_timestamp("2026-01-03T10:15").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 3, 10, 15, 0).unwrap());
    }

    #[test]
    fn bare_date_is_midnight() {
        let dt = parse_timestamp("2026-01-03").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2026, 1, 3, 0, 0, 0).unwrap());
    }

    #[test]
    fn reject_garbage() {
        assert!(parse_timestamp("N/A").is_err());
        assert!(parse_timestamp("2026-13-01").is_err());
        assert!(parse_timestamp("   ").is_err());
    }

    #[derive(Deserialize)]
    struct Record {
        #[serde(default, deserialize_with = "deserialize_opt_timestamp")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn serde_tolerates_bad_values() {
        let r: Record = serde_json::from_str(r#"{"at": "2026-01-03"}"#).unwrap();
        assert!(r.at.is_some());

        let r: Record = serde_json::from_str(r#"{"at": "not a date"}"#).unwrap();
        assert!(r.at.is_none());

        let r: Record = serde_json::from_str(r#"{"at": null}"#).unwrap();
        assert!(r.at.is_none());

        let r: Record = serde_json::from_str("{}").unwrap();
        assert!(r.at.is_none());
    }

    #[test]
    fn display_time_cells() {
        let at = Utc.with_ymd_and_hms(2026, 1, 3, 7, 5, 0).unwrap();
        assert_eq!(display_time(Some(at)), "2026-01-03 07:05");
        assert_eq!(display_time(None), "N/A");
    }
}

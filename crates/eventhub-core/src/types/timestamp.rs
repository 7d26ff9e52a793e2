//! The fixed textual timestamp format used by hit ingestion and stats queries.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::AppError;

/// `yyyy-MM-dd HH:mm:ss`, interpreted as UTC.
pub const STATS_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stats timestamp, failing with a validation error on bad input.
pub fn parse_stats_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    NaiveDateTime::parse_from_str(value.trim(), STATS_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            AppError::validation(format!(
                "Invalid timestamp '{value}', expected yyyy-MM-dd HH:mm:ss: {e}"
            ))
        })
}

/// Render a timestamp in the stats format.
pub fn format_stats_timestamp(value: &DateTime<Utc>) -> String {
    value.format(STATS_TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_valid() {
        let ts = parse_stats_timestamp("2024-02-01 13:45:07").expect("valid");
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 2, 1));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (13, 45, 7));
        assert_eq!(format_stats_timestamp(&ts), "2024-02-01 13:45:07");
    }

    #[test]
    fn test_parse_rejects_iso_format() {
        let err = parse_stats_timestamp("2024-02-01T13:45:07Z").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}

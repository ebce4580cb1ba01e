//! Time parsing utilities.
//!
//! Timestamps are stored as RFC3339 text. Reads are lenient: rows written
//! by other tooling may carry the space-separated `SQLite` format instead.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Parse a stored timestamp, falling back to now on unparseable input.
#[must_use]
pub fn parse_db_timestamp(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_utc_datetime(&naive);
    }

    Utc::now()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let dt = parse_db_timestamp("2026-01-15T12:00:00Z");
        assert_eq!(dt.timestamp(), 1_768_478_400);
    }

    #[test]
    fn parses_sqlite_format() {
        let dt = parse_db_timestamp("2026-01-15 12:00:00");
        assert_eq!(dt.timestamp(), 1_768_478_400);
    }
}

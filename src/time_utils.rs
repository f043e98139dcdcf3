// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time in the stored string form.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Parse a client-supplied date (`YYYY-MM-DD` or RFC3339) into a UTC timestamp.
pub fn parse_client_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Normalize a client date to the stored form, so lexical order is chronological.
pub fn normalize_client_date(raw: &str) -> Option<String> {
    parse_client_date(raw).map(format_utc_rfc3339)
}

/// UTC calendar day of a stored timestamp.
pub fn calendar_day(stored: &str) -> Option<NaiveDate> {
    parse_client_date(stored).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_date() {
        assert_eq!(
            normalize_client_date("2024-03-05").as_deref(),
            Some("2024-03-05T00:00:00Z")
        );
    }

    #[test]
    fn test_normalize_offset_timestamp() {
        assert_eq!(
            normalize_client_date("2024-03-05T10:30:00+02:00").as_deref(),
            Some("2024-03-05T08:30:00Z")
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(normalize_client_date("yesterday").is_none());
    }
}

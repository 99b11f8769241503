//! Checkpoint tracking for incremental catalog integration

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output format for checkpoint timestamps (ISO-8601 local date-time)
///
/// Fractional seconds are only written when non-zero, so whole-second
/// timestamps render as `2024-01-01T00:00:00`.
const ISO_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Format a timestamp as an ISO-8601 local date-time string
pub fn format_iso_date_time(ts: &NaiveDateTime) -> String {
    ts.format(ISO_DATE_TIME).to_string()
}

/// Parse an ISO-8601 date-time as published by the catalog
///
/// Accepts local date-times with or without seconds and fractions. Values
/// carrying an offset are normalised to UTC.
pub fn parse_iso_date_time(s: &str) -> Option<NaiveDateTime> {
    s.parse::<NaiveDateTime>()
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// Cursor for the catalog event feed
///
/// Persisted as a single record. Holds the publication date of the last
/// event that was applied to the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Publication date of the last applied event
    pub last_publication: NaiveDateTime,
    /// When the checkpoint was last written
    pub committed_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(last_publication: NaiveDateTime) -> Self {
        Self {
            last_publication,
            committed_at: Utc::now(),
        }
    }

    /// Move the checkpoint to `publication`, never backwards
    ///
    /// An older publication keeps the current position but still refreshes
    /// `committed_at`.
    pub fn advanced(mut self, publication: NaiveDateTime) -> Self {
        if publication > self.last_publication {
            self.last_publication = publication;
        }
        self.committed_at = Utc::now();
        self
    }

    /// Advance an optional checkpoint, creating it on first use
    pub fn advance(current: Option<Checkpoint>, publication: NaiveDateTime) -> Checkpoint {
        match current {
            Some(checkpoint) => checkpoint.advanced(publication),
            None => Checkpoint::new(publication),
        }
    }

    /// The `since` value sent to the catalog
    pub fn since(&self) -> String {
        format_iso_date_time(&self.last_publication)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_format_whole_seconds() {
        assert_eq!(format_iso_date_time(&at(0, 0, 0)), "2024-01-01T00:00:00");
    }

    #[test]
    fn test_format_fractional_seconds() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_milli_opt(12, 30, 15, 250)
            .unwrap();
        assert_eq!(format_iso_date_time(&ts), "2024-03-05T12:30:15.250");
    }

    #[test]
    fn test_parse_variants() {
        let expected = at(10, 15, 0);
        assert_eq!(parse_iso_date_time("2024-01-01T10:15:00"), Some(expected));
        assert_eq!(parse_iso_date_time("2024-01-01T10:15"), Some(expected));
        assert_eq!(
            parse_iso_date_time("2024-01-01T11:15:00+01:00"),
            Some(expected)
        );
        assert_eq!(parse_iso_date_time("yesterday"), None);
    }

    #[test]
    fn test_advance_creates_checkpoint() {
        let checkpoint = Checkpoint::advance(None, at(1, 0, 0));
        assert_eq!(checkpoint.last_publication, at(1, 0, 0));
        assert_eq!(checkpoint.since(), "2024-01-01T01:00:00");
    }

    #[test]
    fn test_advance_moves_forward() {
        let checkpoint = Checkpoint::new(at(1, 0, 0)).advanced(at(2, 0, 0));
        assert_eq!(checkpoint.last_publication, at(2, 0, 0));
    }

    #[test]
    fn test_advance_never_moves_backwards() {
        let checkpoint = Checkpoint::new(at(2, 0, 0)).advanced(at(1, 0, 0));
        assert_eq!(checkpoint.last_publication, at(2, 0, 0));
    }

    #[test]
    fn test_serialization() {
        let checkpoint = Checkpoint::new(at(3, 4, 5));
        let json = serde_json::to_string(&checkpoint).unwrap();
        let deserialized: Checkpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(checkpoint, deserialized);
    }
}

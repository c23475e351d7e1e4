//! Lifecycle status derived from a project's milestone dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::models::EventType;

/// Naive date-time layouts accepted besides RFC 3339.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Parse a milestone date. Naive values are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// One milestone cell after parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateCell {
    Missing,
    Valid(DateTime<Utc>),
    /// Present but not a date. The empty string lands here.
    Invalid,
}

impl DateCell {
    pub fn from_cell(value: Option<&str>) -> Self {
        match value {
            None => Self::Missing,
            Some(s) => parse_date(s).map_or(Self::Invalid, Self::Valid),
        }
    }

    fn reached(&self, now: DateTime<Utc>) -> bool {
        matches!(self, Self::Valid(date) if now >= *date)
    }
}

/// Status of a project at `now`, checking the latest stage first.
///
/// Returns `None` when any date is present but unparseable, or when no
/// milestone has been reached yet.
pub fn calculate_status(
    approved: Option<&str>,
    start: Option<&str>,
    completed: Option<&str>,
    now: DateTime<Utc>,
) -> Option<EventType> {
    let approved = DateCell::from_cell(approved);
    let start = DateCell::from_cell(start);
    let completed = DateCell::from_cell(completed);

    if [approved, start, completed].contains(&DateCell::Invalid) {
        warn!("Row contains invalid date entries");
        return None;
    }

    if completed.reached(now) {
        Some(EventType::Completed)
    } else if start.reached(now) {
        Some(EventType::UnderImplementation)
    } else if approved.reached(now) {
        Some(EventType::Approved)
    } else {
        warn!("Row missing event date information to calculate status");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2023-01-01"), Some(at(2023, 1, 1)));
        assert_eq!(parse_date("2023-01-01T00:00:00"), Some(at(2023, 1, 1)));
        assert_eq!(parse_date("2023-01-01 00:00:00.000"), Some(at(2023, 1, 1)));
        assert_eq!(parse_date("2023-01-01T02:00:00+02:00"), Some(at(2023, 1, 1)));
        assert_eq!(parse_date(" 2023-01-01 "), Some(at(2023, 1, 1)));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2023-13-45"), None);
    }

    #[test]
    fn test_status_checks_latest_stage_first() {
        let now = at(2024, 6, 1);
        assert_eq!(
            calculate_status(Some("2020-01-01"), Some("2021-01-01"), Some("2023-01-01"), now),
            Some(EventType::Completed)
        );
        assert_eq!(
            calculate_status(Some("2020-01-01"), Some("2021-01-01"), Some("2030-01-01"), now),
            Some(EventType::UnderImplementation)
        );
        assert_eq!(
            calculate_status(Some("2020-01-01"), None, None, now),
            Some(EventType::Approved)
        );
    }

    #[test]
    fn test_status_none_for_invalid_dates() {
        let now = at(2024, 6, 1);
        assert_eq!(calculate_status(Some("2020-01-01"), Some(""), None, now), None);
        assert_eq!(calculate_status(Some("yesterday"), None, Some("2021-01-01"), now), None);
    }

    #[test]
    fn test_status_none_without_reached_dates() {
        let now = at(2024, 6, 1);
        assert_eq!(calculate_status(None, None, None, now), None);
        assert_eq!(calculate_status(Some("2030-01-01"), None, None, now), None);
    }

    #[test]
    fn test_status_is_monotonic() {
        let approved = Some("2020-01-01");
        let start = Some("2021-01-01");
        let completed = Some("2022-01-01");

        let timeline = [
            at(2019, 6, 1),
            at(2020, 1, 1),
            at(2020, 6, 1),
            at(2021, 1, 1),
            at(2021, 6, 1),
            at(2022, 1, 1),
            at(2025, 1, 1),
        ];
        let statuses: Vec<Option<EventType>> = timeline
            .iter()
            .map(|now| calculate_status(approved, start, completed, *now))
            .collect();

        assert_eq!(statuses[0], None);
        assert_eq!(statuses[1], Some(EventType::Approved));
        assert_eq!(statuses[3], Some(EventType::UnderImplementation));
        assert_eq!(statuses[5], Some(EventType::Completed));
        // Option<EventType> orders None below every stage.
        assert!(statuses.windows(2).all(|w| w[0] <= w[1]));
    }
}

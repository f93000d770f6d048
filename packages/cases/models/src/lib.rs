#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Clinical case types consumed by the spread analysis engine.
//!
//! [`CaseRecord`]s come from an external case source and are never
//! modified. [`DailyDistrictAggregate`]s are derived per analysis call.

use chrono::{Days, NaiveDate};
use outbreak_map_district_models::Coordinate;
use serde::{Deserialize, Serialize};

/// A single geolocated clinical case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseRecord {
    /// Diagnosed disease name, compared case-insensitively.
    pub disease: String,
    /// Consultation date.
    pub date: NaiveDate,
    /// District name exactly as recorded; never normalized.
    pub district: String,
    /// Whether the patient was flagged contagious.
    pub contagious: bool,
    /// Patient latitude.
    pub latitude: f64,
    /// Patient longitude.
    pub longitude: f64,
}

impl CaseRecord {
    /// Whether this record is for `disease`, ignoring case.
    #[must_use]
    pub fn is_disease(&self, disease: &str) -> bool {
        disease_eq(&self.disease, disease)
    }

    /// Patient location.
    #[must_use]
    pub const fn position(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Case-insensitive disease name comparison.
#[must_use]
pub fn disease_eq(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    /// First date in the window.
    pub start: NaiveDate,
    /// Last date in the window.
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a window from explicit bounds.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The `days` calendar dates ending at (and including) `end`.
    ///
    /// A `days` of zero is treated as one.
    #[must_use]
    pub fn ending(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// Whether `date` falls inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar dates covered.
    #[must_use]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Case counts for one district on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyDistrictAggregate {
    /// Calendar date.
    pub date: NaiveDate,
    /// District name as recorded.
    pub district: String,
    /// Number of records.
    pub total_cases: u64,
    /// Number of records flagged contagious.
    pub contagious_cases: u64,
    /// Mean latitude of the records.
    pub mean_latitude: f64,
    /// Mean longitude of the records.
    pub mean_longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn disease_comparison_ignores_case() {
        assert!(disease_eq("Dengue", "dengue"));
        assert!(disease_eq("ZIKA", "zika"));
        assert!(!disease_eq("Dengue", "Zika"));
    }

    #[test]
    fn window_ending_covers_exact_day_count() {
        let window = DateWindow::ending(date("2024-03-30"), 30);
        assert_eq!(window.start, date("2024-03-01"));
        assert_eq!(window.days(), 30);
        assert!(window.contains(date("2024-03-01")));
        assert!(window.contains(date("2024-03-30")));
        assert!(!window.contains(date("2024-02-29")));
        assert!(!window.contains(date("2024-03-31")));
    }

    #[test]
    fn zero_day_window_is_single_day() {
        let window = DateWindow::ending(date("2024-03-30"), 0);
        assert_eq!(window.start, window.end);
        assert_eq!(window.days(), 1);
    }

    #[test]
    fn case_record_round_trips_camel_case() {
        let json = r#"{"disease":"Dengue","date":"2024-03-01","district":"Norte","contagious":true,"latitude":-17.79,"longitude":-63.21}"#;
        let record: CaseRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.date, date("2024-03-01"));
        assert!(record.contagious);
        assert!(record.is_disease("DENGUE"));
    }
}

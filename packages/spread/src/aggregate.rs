//! Per-day, per-district case aggregation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use outbreak_map_case_models::{CaseRecord, DailyDistrictAggregate, DateWindow};
use outbreak_map_district_models::Coordinate;
use outbreak_map_spatial::mean_position;

#[derive(Default)]
struct Bucket {
    total: u64,
    contagious: u64,
    positions: Vec<Coordinate>,
}

/// Groups the records of `disease` dated inside `window` by (date, district).
///
/// Disease names match case-insensitively. District names are used exactly
/// as recorded, so spelling variants land in separate buckets. Output is
/// sorted by date, then district name. An empty result is not an error.
#[must_use]
pub fn aggregate(
    cases: &[CaseRecord],
    disease: &str,
    window: DateWindow,
) -> Vec<DailyDistrictAggregate> {
    let mut buckets: BTreeMap<(NaiveDate, &str), Bucket> = BTreeMap::new();

    for case in cases
        .iter()
        .filter(|c| c.is_disease(disease) && window.contains(c.date))
    {
        let bucket = buckets
            .entry((case.date, case.district.as_str()))
            .or_default();
        bucket.total += 1;
        if case.contagious {
            bucket.contagious += 1;
        }
        bucket.positions.push(case.position());
    }

    buckets
        .into_iter()
        .filter_map(|((date, district), bucket)| {
            let mean = mean_position(&bucket.positions)?;
            Some(DailyDistrictAggregate {
                date,
                district: district.to_string(),
                total_cases: bucket.total,
                contagious_cases: bucket.contagious,
                mean_latitude: mean.latitude,
                mean_longitude: mean.longitude,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn case(disease: &str, d: u32, district: &str, contagious: bool, lat: f64) -> CaseRecord {
        CaseRecord {
            disease: disease.to_string(),
            date: day(d),
            district: district.to_string(),
            contagious,
            latitude: lat,
            longitude: -63.2,
        }
    }

    fn march() -> DateWindow {
        DateWindow::new(day(1), day(30))
    }

    #[test]
    fn groups_by_date_and_district() {
        let cases = vec![
            case("Dengue", 2, "Sur", false, -17.7),
            case("Dengue", 1, "Norte", true, -17.8),
            case("Dengue", 1, "Norte", false, -17.6),
            case("Dengue", 1, "Centro", true, -17.78),
        ];

        let aggregates = aggregate(&cases, "dengue", march());
        let keys: Vec<(NaiveDate, &str)> = aggregates
            .iter()
            .map(|a| (a.date, a.district.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![(day(1), "Centro"), (day(1), "Norte"), (day(2), "Sur")]
        );

        let norte = &aggregates[1];
        assert_eq!(norte.total_cases, 2);
        assert_eq!(norte.contagious_cases, 1);
        assert!((norte.mean_latitude - -17.7).abs() < 1e-9);
        assert!((norte.mean_longitude - -63.2).abs() < 1e-9);
    }

    #[test]
    fn totals_match_filtered_record_count() {
        let cases = vec![
            case("Dengue", 1, "Norte", true, -17.8),
            case("DENGUE", 3, "Norte", true, -17.8),
            case("Dengue", 3, "Este", false, -17.8),
            case("Zika", 3, "Este", false, -17.8),
            case("Dengue", 31, "Este", false, -17.8),
        ];

        let aggregates = aggregate(&cases, "Dengue", march());
        let total: u64 = aggregates.iter().map(|a| a.total_cases).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn district_names_are_not_normalized() {
        let cases = vec![
            case("Dengue", 1, "Norte", false, -17.8),
            case("Dengue", 1, "norte", false, -17.8),
            case("Dengue", 1, "Norte ", false, -17.8),
        ];

        let aggregates = aggregate(&cases, "Dengue", march());
        assert_eq!(aggregates.len(), 3);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let cases = vec![
            case("Dengue", 1, "Norte", false, -17.8),
            case("Dengue", 30, "Norte", false, -17.8),
        ];

        let aggregates = aggregate(&cases, "Dengue", march());
        assert_eq!(aggregates.len(), 2);
    }

    #[test]
    fn no_matches_is_empty() {
        let cases = vec![case("Zika", 1, "Norte", false, -17.8)];
        assert!(aggregate(&cases, "Dengue", march()).is_empty());
        assert!(aggregate(&[], "Dengue", march()).is_empty());
    }
}

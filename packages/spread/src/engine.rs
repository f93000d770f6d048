use chrono::NaiveDate;
use outbreak_map_case_models::{CaseRecord, DateWindow};
use outbreak_map_district::DistrictRegistry;
use outbreak_map_spread_models::{AnalysisPeriod, SpreadAnalysis};

use crate::{
    SpreadError, affected::summarize, aggregate::aggregate, predict::predict,
    recommend::recommendations, routes::build_routes, validate_window, velocity,
};

/// Runs the full spread analysis for `disease` over the `window_days`
/// calendar dates ending at `today`.
///
/// `cases` may contain other diseases and dates; they are filtered out
/// here regardless of what the case source already did. The output
/// depends only on the arguments.
///
/// # Errors
///
/// * [`SpreadError::InvalidWindow`] if `window_days` is outside `7..=365`
/// * [`SpreadError::NoData`] if no record matches the disease and window
pub fn analyze_spread(
    registry: &DistrictRegistry,
    cases: &[CaseRecord],
    disease: &str,
    window_days: i64,
    today: NaiveDate,
) -> Result<SpreadAnalysis, SpreadError> {
    let days = validate_window(window_days)?;
    let window = DateWindow::ending(today, days);

    let aggregates = aggregate(cases, disease, window);
    if aggregates.is_empty() {
        return Err(SpreadError::NoData {
            disease: disease.to_string(),
            days,
        });
    }

    let affected = summarize(&aggregates, registry);
    let routes = build_routes(&affected, registry);
    let velocity = velocity::velocities(&aggregates, days);
    let density_factor = velocity::density_factor(&affected);
    let predictions = predict(
        &affected,
        registry,
        velocity.average_per_day,
        density_factor,
        today,
    );
    let recommendations =
        recommendations(&affected, velocity.average_per_day, density_factor, registry);

    log::debug!(
        "Analyzed {disease}: {} aggregates, {} affected districts, {} routes, {} predictions",
        aggregates.len(),
        affected.len(),
        routes.len(),
        predictions.len()
    );

    Ok(SpreadAnalysis {
        disease: disease.to_string(),
        period: AnalysisPeriod {
            start: window.start,
            end: window.end,
            total_days: days,
        },
        average_velocity: velocity.average_per_day,
        peak_velocity: velocity.peak_per_day,
        affected_districts: affected,
        routes,
        density_factor,
        predictions,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 30).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn case(disease: &str, d: u32, district: &str) -> CaseRecord {
        CaseRecord {
            disease: disease.to_string(),
            date: day(d),
            district: district.to_string(),
            contagious: true,
            latitude: -17.78,
            longitude: -63.19,
        }
    }

    fn registry() -> DistrictRegistry {
        DistrictRegistry::santa_cruz().unwrap()
    }

    fn outbreak() -> Vec<CaseRecord> {
        vec![
            case("Dengue", 1, "Norte"),
            case("Dengue", 1, "Norte"),
            case("Dengue", 1, "Norte"),
            case("Dengue", 4, "Equipetrol"),
            case("Dengue", 4, "Equipetrol"),
        ]
    }

    #[test]
    fn adjacent_outbreak_produces_single_route() {
        let analysis = analyze_spread(&registry(), &outbreak(), "Dengue", 30, today()).unwrap();

        let totals: Vec<(&str, u64)> = analysis
            .affected_districts
            .iter()
            .map(|a| (a.district.as_str(), a.total_cases))
            .collect();
        assert_eq!(totals, vec![("Norte", 3), ("Equipetrol", 2)]);

        assert_eq!(analysis.routes.len(), 1);
        let route = &analysis.routes[0];
        assert_eq!(route.from_district, "Norte");
        assert_eq!(route.to_district, "Equipetrol");
        assert_eq!(route.transition_days, 3);

        assert_eq!(analysis.period.start, day(1));
        assert_eq!(analysis.period.end, today());
        assert_eq!(analysis.period.total_days, 30);
        assert!((analysis.average_velocity - 5.0 / 30.0).abs() < 1e-12);
        assert!((analysis.peak_velocity - 3.0).abs() < f64::EPSILON);
        assert_eq!(analysis.predictions.len(), 8);
        assert!(!analysis.recommendations.is_empty());
    }

    #[test]
    fn empty_filter_is_no_data() {
        let err = analyze_spread(&registry(), &outbreak(), "Zika", 30, today()).unwrap_err();
        assert!(matches!(err, SpreadError::NoData { days: 30, .. }));

        let err = analyze_spread(&registry(), &[], "Dengue", 30, today()).unwrap_err();
        assert!(matches!(err, SpreadError::NoData { .. }));
    }

    #[test]
    fn cases_outside_window_are_no_data() {
        let err = analyze_spread(&registry(), &outbreak(), "Dengue", 7, today()).unwrap_err();
        assert!(matches!(err, SpreadError::NoData { days: 7, .. }));
    }

    #[test]
    fn misspelled_district_is_tolerated() {
        let cases = vec![case("Dengue", 10, "Zentro"), case("Dengue", 10, "Zentro")];
        let analysis = analyze_spread(&registry(), &cases, "dengue", 30, today()).unwrap();

        let zentro = &analysis.affected_districts[0];
        assert_eq!(zentro.district, "Zentro");
        assert_eq!(zentro.density_per_km2, 0);
        assert_eq!(zentro.risk_tier, crate::affected::risk_tier(0, 2.0));
        assert!(analysis.routes.is_empty());
        assert!(analysis.predictions.iter().all(|p| p.district != "Zentro"));
    }

    #[test]
    fn busy_district_is_not_predicted() {
        let cases: Vec<CaseRecord> = (0..6).map(|_| case("Dengue", 20, "Sur")).collect();
        let analysis = analyze_spread(&registry(), &cases, "Dengue", 30, today()).unwrap();

        assert!(analysis.predictions.iter().all(|p| p.district != "Sur"));
        assert_eq!(analysis.predictions.len(), 7);
    }

    #[test]
    fn same_day_onset_has_no_route() {
        let cases = vec![case("Dengue", 5, "Norte"), case("Dengue", 5, "Equipetrol")];
        let analysis = analyze_spread(&registry(), &cases, "Dengue", 30, today()).unwrap();
        assert!(analysis.routes.is_empty());
    }

    #[test]
    fn rejects_out_of_range_window() {
        let err = analyze_spread(&registry(), &outbreak(), "Dengue", 6, today()).unwrap_err();
        assert!(matches!(err, SpreadError::InvalidWindow { days: 6 }));

        let err = analyze_spread(&registry(), &outbreak(), "Dengue", 366, today()).unwrap_err();
        assert!(matches!(err, SpreadError::InvalidWindow { days: 366 }));
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let mut cases = outbreak();
        cases.extend([
            case("Dengue", 6, "Este"),
            case("Dengue", 9, "Plan Tres Mil"),
            case("Dengue", 9, "Zentro"),
            case("Zika", 9, "Sur"),
        ]);

        let first = analyze_spread(&registry(), &cases, "Dengue", 30, today()).unwrap();
        let second = analyze_spread(&registry(), &cases, "Dengue", 30, today()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn invariants_hold_on_mixed_outbreak() {
        let registry = registry();
        let mut cases = Vec::new();
        for (d, district, count) in [
            (2, "Centro", 4),
            (3, "Sur", 2),
            (3, "Equipetrol", 1),
            (8, "Plan Tres Mil", 7),
            (9, "Oeste", 1),
            (25, "Villa 1ro de Mayo", 3),
            (28, "Este", 2),
        ] {
            cases.extend((0..count).map(|_| case("Dengue", d, district)));
        }

        let analysis = analyze_spread(&registry, &cases, "Dengue", 30, today()).unwrap();

        let total: u64 = analysis.affected_districts.iter().map(|a| a.total_cases).sum();
        assert_eq!(total, 20);

        assert!(analysis.average_velocity >= 0.0);
        assert!(analysis.average_velocity <= analysis.peak_velocity);

        for route in &analysis.routes {
            assert!((1..=14).contains(&route.transition_days));
            let from = registry.get(&route.from_district).unwrap();
            assert!(from.adjacent_districts.contains(&route.to_district));
        }

        for prediction in &analysis.predictions {
            assert!((0.0..=100.0).contains(&prediction.probability_percent));
            let current = analysis
                .affected_districts
                .iter()
                .find(|a| a.district == prediction.district)
                .map_or(0, |a| a.total_cases);
            assert!(current < 5);
        }
        assert!(analysis.predictions.iter().all(|p| p.district != "Plan Tres Mil"));
    }
}

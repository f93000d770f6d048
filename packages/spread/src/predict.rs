//! Near-term risk forecasts for districts in early spread.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use outbreak_map_district::DistrictRegistry;
use outbreak_map_spread_models::{AffectedDistrict, Prediction, RiskLevel};

use crate::{PREDICTION_HORIZON_DAYS, round2};

/// Districts with at least this many current cases are not forecast.
pub const EARLY_SPREAD_CASE_LIMIT: u64 = 5;

/// Scores every registry district with fewer than
/// [`EARLY_SPREAD_CASE_LIMIT`] current cases.
///
/// Districts are visited in registry (name) order and the result is
/// stable-sorted by probability descending, so equal probabilities keep
/// name order.
#[must_use]
pub fn predict(
    affected: &[AffectedDistrict],
    registry: &DistrictRegistry,
    average_velocity: f64,
    density_factor: f64,
    today: NaiveDate,
) -> Vec<Prediction> {
    let current: BTreeMap<&str, u64> = affected
        .iter()
        .map(|a| (a.district.as_str(), a.total_cases))
        .collect();

    let target_date = today
        .checked_add_days(Days::new(PREDICTION_HORIZON_DAYS))
        .unwrap_or(NaiveDate::MAX);

    let mut predictions: Vec<Prediction> = registry
        .iter()
        .filter_map(|(_, profile)| {
            let current_cases = current.get(profile.name.as_str()).copied().unwrap_or(0);
            if current_cases >= EARLY_SPREAD_CASE_LIMIT {
                return None;
            }

            #[allow(clippy::cast_precision_loss)]
            let connectivity = profile.adjacent_districts.len() as f64 / 10.0;
            let base = profile.density_per_km2 / 10_000.0;
            let velocity = average_velocity / 10.0;

            let probability_percent =
                round2(((base + connectivity + velocity + density_factor / 10.0) * 100.0).min(100.0))
                    .max(0.0);

            Some(Prediction {
                district: profile.name.clone(),
                target_date,
                predicted_cases: expected_new_cases(average_velocity, probability_percent)
                    + current_cases,
                probability_percent,
                risk_level: risk_level(probability_percent),
            })
        })
        .collect();

    predictions.sort_by(|a, b| b.probability_percent.total_cmp(&a.probability_percent));

    predictions
}

/// Classifies a spread probability in percent.
#[must_use]
pub fn risk_level(probability_percent: f64) -> RiskLevel {
    if probability_percent >= 80.0 {
        RiskLevel::Critical
    } else if probability_percent >= 60.0 {
        RiskLevel::High
    } else if probability_percent >= 40.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn expected_new_cases(average_velocity: f64, probability_percent: f64) -> u64 {
    (average_velocity * probability_percent / 100.0).floor().max(0.0) as u64
}

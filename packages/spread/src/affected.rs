//! Per-district summaries of the aggregated cases.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use outbreak_map_case_models::DailyDistrictAggregate;
use outbreak_map_district::DistrictRegistry;
use outbreak_map_spread_models::{AffectedDistrict, RiskLevel};

/// Builds one [`AffectedDistrict`] per district present in `aggregates`.
///
/// Districts missing from `registry` are kept with a density of `0`, so
/// their tier comes from local velocity alone. Output is sorted by total
/// cases descending, then district name ascending.
#[must_use]
pub fn summarize(
    aggregates: &[DailyDistrictAggregate],
    registry: &DistrictRegistry,
) -> Vec<AffectedDistrict> {
    let mut spans: BTreeMap<&str, (NaiveDate, NaiveDate, u64)> = BTreeMap::new();

    for aggregate in aggregates {
        spans
            .entry(aggregate.district.as_str())
            .and_modify(|(first, last, total)| {
                *first = (*first).min(aggregate.date);
                *last = (*last).max(aggregate.date);
                *total += aggregate.total_cases;
            })
            .or_insert((aggregate.date, aggregate.date, aggregate.total_cases));
    }

    let mut affected: Vec<AffectedDistrict> = spans
        .into_iter()
        .map(|(district, (first, last, total))| {
            let density = registry.get(district).map_or_else(
                || {
                    log::warn!("District {district:?} is not in the registry, using density 0");
                    0
                },
                |profile| density_as_int(profile.density_per_km2),
            );

            #[allow(clippy::cast_precision_loss)]
            let local_velocity = total as f64 / day_span(first, last) as f64;

            AffectedDistrict {
                district: district.to_string(),
                first_case_date: first,
                last_case_date: last,
                total_cases: total,
                density_per_km2: density,
                local_velocity,
                risk_tier: risk_tier(density, local_velocity),
            }
        })
        .collect();

    affected.sort_by(|a, b| {
        b.total_cases
            .cmp(&a.total_cases)
            .then_with(|| a.district.cmp(&b.district))
    });

    affected
}

/// Classifies expansion risk from `density / 1000 + velocity * 2`.
#[must_use]
pub fn risk_tier(density_per_km2: u32, local_velocity: f64) -> RiskLevel {
    let score = f64::from(density_per_km2) / 1000.0 + local_velocity * 2.0;

    if score >= 15.0 {
        RiskLevel::Critical
    } else if score >= 10.0 {
        RiskLevel::High
    } else if score >= 5.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Inclusive number of days from `first` to `last`, never below one.
fn day_span(first: NaiveDate, last: NaiveDate) -> i64 {
    ((last - first).num_days() + 1).max(1)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn density_as_int(density: f64) -> u32 {
    density.max(0.0).trunc() as u32
}

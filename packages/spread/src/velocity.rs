//! Citywide spread velocity.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use outbreak_map_case_models::DailyDistrictAggregate;
use outbreak_map_spread_models::AffectedDistrict;

/// Citywide daily incidence over an analysis window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    /// Total cases divided by the window length.
    pub average_per_day: f64,
    /// Highest single-day citywide total.
    pub peak_per_day: f64,
}

/// Computes average and peak citywide cases per day.
///
/// The average divides by `window_days`, not by the span of observed data,
/// so cases clustered in part of the window deflate it. A `window_days` of
/// zero is treated as one.
#[must_use]
pub fn velocities(aggregates: &[DailyDistrictAggregate], window_days: u32) -> Velocity {
    let mut daily: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for aggregate in aggregates {
        *daily.entry(aggregate.date).or_default() += aggregate.total_cases;
    }

    let total: u64 = daily.values().sum();
    let peak = daily.values().copied().max().unwrap_or(0);

    #[allow(clippy::cast_precision_loss)]
    let (total, peak) = (total as f64, peak as f64);

    Velocity {
        average_per_day: total / f64::from(window_days.max(1)),
        peak_per_day: peak,
    }
}

/// Mean of `density * local_velocity / 1000` over the affected districts.
///
/// Zero when nothing is affected.
#[must_use]
pub fn density_factor(affected: &[AffectedDistrict]) -> f64 {
    if affected.is_empty() {
        return 0.0;
    }

    let sum: f64 = affected
        .iter()
        .map(|a| f64::from(a.density_per_km2) * a.local_velocity / 1000.0)
        .sum();

    #[allow(clippy::cast_precision_loss)]
    let count = affected.len() as f64;
    sum / count
}

//! Citywide density summary.

use outbreak_map_district_models::{DensityOverview, DistrictDensity, RiskLevel};

use crate::DistrictRegistry;

/// Density at or above which a district starts out as [`RiskLevel::High`].
const HIGH_BASELINE_DENSITY: f64 = 6900.0;

/// Density at or above which a district starts out as [`RiskLevel::Medium`].
const MEDIUM_BASELINE_DENSITY: f64 = 5000.0;

/// Risk implied by density alone.
#[must_use]
pub fn baseline_risk(density_per_km2: f64) -> RiskLevel {
    if density_per_km2 >= HIGH_BASELINE_DENSITY {
        RiskLevel::High
    } else if density_per_km2 >= MEDIUM_BASELINE_DENSITY {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

impl DistrictRegistry {
    /// Summarises population and density across every district.
    #[must_use]
    pub fn density_overview(&self) -> DensityOverview {
        let mut districts: Vec<DistrictDensity> = self
            .iter()
            .map(|(_, profile)| DistrictDensity {
                profile: profile.clone(),
                baseline_risk: baseline_risk(profile.density_per_km2),
            })
            .collect();
        districts.sort_by(|a, b| {
            b.profile
                .density_per_km2
                .total_cmp(&a.profile.density_per_km2)
        });

        let total_population: u64 = districts
            .iter()
            .map(|d| u64::from(d.profile.population))
            .sum();
        let total_area_km2: f64 = districts.iter().map(|d| d.profile.area_km2).sum();

        #[allow(clippy::cast_precision_loss)]
        let mean_density_per_km2 = if total_area_km2 > 0.0 {
            (total_population as f64 / total_area_km2).round()
        } else {
            0.0
        };

        DensityOverview {
            city: self.city().to_string(),
            densest_district: districts.first().map(|d| d.profile.name.clone()),
            sparsest_district: districts.last().map(|d| d.profile.name.clone()),
            district_count: districts.len(),
            districts,
            total_population,
            total_area_km2,
            mean_density_per_km2,
        }
    }
}

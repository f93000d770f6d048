//! Human-readable advisories derived from an analysis.

use outbreak_map_district::DistrictRegistry;
use outbreak_map_spread_models::{AffectedDistrict, PropagationEdge, RiskLevel};

/// Average velocity (cases per day) above which containment is urged.
pub const HIGH_VELOCITY_PER_DAY: f64 = 5.0;

/// Density factor above which dense districts are singled out.
pub const HIGH_DENSITY_FACTOR: f64 = 10.0;

/// Routes this fast or faster get their own alert.
pub const FAST_TRANSITION_DAYS: u32 = 3;

/// Advisories for a full spread analysis, most urgent first.
#[must_use]
pub fn recommendations(
    affected: &[AffectedDistrict],
    average_velocity: f64,
    density_factor: f64,
    registry: &DistrictRegistry,
) -> Vec<String> {
    let mut advice = Vec::new();

    if average_velocity > HIGH_VELOCITY_PER_DAY {
        advice.push(format!(
            "ALERT: high spread velocity (>{HIGH_VELOCITY_PER_DAY} cases/day). Apply containment measures immediately."
        ));
    }

    if density_factor > HIGH_DENSITY_FACTOR {
        let densest = registry.densest(2);
        if !densest.is_empty() {
            advice.push(format!(
                "Focus efforts on high population density districts such as {}.",
                densest.join(" and ")
            ));
        }
    }

    for district in affected
        .iter()
        .filter(|d| d.risk_tier == RiskLevel::Critical)
    {
        advice.push(format!(
            "{}: critical risk. Establish an epidemiological perimeter and increase surveillance.",
            district.district
        ));
    }

    advice.extend(
        [
            "Intensify epidemiological surveillance in districts connected to active outbreaks.",
            "Redistribute medical resources according to the identified spread patterns.",
            "Refresh this analysis every 48-72 hours to adjust containment strategies.",
        ]
        .map(str::to_string),
    );

    advice
}

/// Advisories for a set of propagation routes.
#[must_use]
pub fn route_recommendations(routes: &[PropagationEdge]) -> Vec<String> {
    if routes.is_empty() {
        return vec!["No active propagation routes detected.".to_string()];
    }

    let mut advice = vec![
        "Monitor high-mobility corridors between connected districts.".to_string(),
        "Set up epidemiological checkpoints along the identified routes.".to_string(),
    ];

    advice.extend(
        routes
            .iter()
            .filter(|r| r.transition_days <= FAST_TRANSITION_DAYS)
            .map(|r| {
                format!(
                    "Alert: fast propagation detected {} -> {} ({} days)",
                    r.from_district, r.to_district, r.transition_days
                )
            }),
    );

    advice
}

/// Overall alert level for a citywide average velocity.
#[must_use]
pub fn alert_level(average_velocity: f64) -> RiskLevel {
    if average_velocity >= 10.0 {
        RiskLevel::Critical
    } else if average_velocity >= 5.0 {
        RiskLevel::High
    } else if average_velocity >= 2.0 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn affected(district: &str, tier: RiskLevel) -> AffectedDistrict {
        AffectedDistrict {
            district: district.to_string(),
            first_case_date: day(1),
            last_case_date: day(1),
            total_cases: 1,
            density_per_km2: 0,
            local_velocity: 1.0,
            risk_tier: tier,
        }
    }

    fn edge(from: &str, to: &str, days: u32) -> PropagationEdge {
        PropagationEdge {
            from_district: from.to_string(),
            to_district: to.to_string(),
            propagation_date: day(1 + days),
            transition_days: days,
            distance_km: 3.0,
            speed_km_per_day: 3.0 / f64::from(days),
        }
    }

    #[test]
    fn quiet_analysis_gets_general_advice_only() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        let advice = recommendations(&[affected("Norte", RiskLevel::Low)], 0.5, 1.0, &registry);
        assert_eq!(advice.len(), 3);
        assert!(advice[2].contains("48-72 hours"));
    }

    #[test]
    fn escalations_come_first() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        let advice = recommendations(
            &[
                affected("Norte", RiskLevel::Critical),
                affected("Sur", RiskLevel::High),
                affected("Plan Tres Mil", RiskLevel::Critical),
            ],
            6.0,
            12.0,
            &registry,
        );

        assert_eq!(advice.len(), 7);
        assert!(advice[0].starts_with("ALERT"));
        assert!(advice[1].contains("Plan Tres Mil and Norte"));
        assert!(advice[2].starts_with("Norte:"));
        assert!(advice[3].starts_with("Plan Tres Mil:"));
    }

    #[test]
    fn thresholds_are_strict() {
        let registry = DistrictRegistry::santa_cruz().unwrap();
        let advice = recommendations(&[], 5.0, 10.0, &registry);
        assert_eq!(advice.len(), 3);
    }

    #[test]
    fn no_routes_message() {
        assert_eq!(
            route_recommendations(&[]),
            vec!["No active propagation routes detected.".to_string()]
        );
    }

    #[test]
    fn fast_routes_are_flagged() {
        let advice = route_recommendations(&[edge("Norte", "Equipetrol", 3), edge("Norte", "Este", 4)]);
        assert_eq!(advice.len(), 3);
        assert_eq!(advice[2], "Alert: fast propagation detected Norte -> Equipetrol (3 days)");
    }

    #[test]
    fn alert_thresholds() {
        assert_eq!(alert_level(10.0), RiskLevel::Critical);
        assert_eq!(alert_level(5.0), RiskLevel::High);
        assert_eq!(alert_level(2.0), RiskLevel::Medium);
        assert_eq!(alert_level(1.99), RiskLevel::Low);
    }
}

//! Propagation route inference over the adjacency graph.

use outbreak_map_district::{DistrictId, DistrictRegistry};
use outbreak_map_spatial::coordinate_distance_km;
use outbreak_map_spread_models::{AffectedDistrict, PropagationEdge};

/// Longest gap between two first-case dates still treated as propagation.
pub const MAX_TRANSITION_DAYS: i64 = 14;

/// Infers directed edges between affected districts.
///
/// Districts are ordered by first case date, ties by name. An edge runs
/// from an earlier district to a strictly later one when the later one is
/// listed as adjacent to the earlier one and the first-case dates are
/// `1..=MAX_TRANSITION_DAYS` apart. Districts missing from the registry
/// have no adjacency and never take part in an edge.
#[must_use]
pub fn build_routes(
    affected: &[AffectedDistrict],
    registry: &DistrictRegistry,
) -> Vec<PropagationEdge> {
    let mut ordered: Vec<&AffectedDistrict> = affected.iter().collect();
    ordered.sort_by(|a, b| {
        a.first_case_date
            .cmp(&b.first_case_date)
            .then_with(|| a.district.cmp(&b.district))
    });

    let ids: Vec<Option<DistrictId>> = ordered
        .iter()
        .map(|district| registry.id(&district.district))
        .collect();

    let mut edges = Vec::new();

    for (i, origin) in ordered.iter().enumerate() {
        let Some(from) = ids[i] else {
            continue;
        };

        for (j, destination) in ordered.iter().enumerate().skip(i + 1) {
            let Some(to) = ids[j] else {
                continue;
            };
            if !registry.is_adjacent(from, to) {
                continue;
            }

            let days = (destination.first_case_date - origin.first_case_date).num_days();
            if days <= 0 || days > MAX_TRANSITION_DAYS {
                continue;
            }
            let Ok(transition_days) = u32::try_from(days) else {
                continue;
            };

            let distance_km = coordinate_distance_km(
                registry.profile(from).centroid,
                registry.profile(to).centroid,
            );

            edges.push(PropagationEdge {
                from_district: origin.district.clone(),
                to_district: destination.district.clone(),
                propagation_date: destination.first_case_date,
                transition_days,
                distance_km,
                speed_km_per_day: distance_km / f64::from(transition_days),
            });
        }
    }

    log::debug!(
        "Inferred {} propagation routes across {} affected districts",
        edges.len(),
        affected.len()
    );

    edges
}

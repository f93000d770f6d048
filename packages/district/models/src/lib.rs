#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! District reference data types.
//!
//! A district is a named administrative subdivision of a city with fixed
//! population, area, density and adjacency data. These types are loaded
//! once from TOML at startup and never mutated afterwards.
//!
//! Field names deserialize from `snake_case` TOML and serialize to
//! `camelCase` JSON for the REST API.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A WGS84 coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct Coordinate {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate from a latitude/longitude pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Static reference data for a single district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct DistrictProfile {
    /// District name, used as the lookup key (e.g. `"Plan Tres Mil"`).
    pub name: String,
    /// Resident population.
    pub population: u32,
    /// Land area in square kilometres.
    pub area_km2: f64,
    /// Residents per square kilometre.
    ///
    /// Stored explicitly rather than derived from population and area; the
    /// published figures are truncated census values.
    pub density_per_km2: f64,
    /// Free-text zone classification (e.g. `"Residencial-Comercial"`).
    pub zone_type: String,
    /// Names of districts reachable from this one.
    ///
    /// Treated as directed: listing B here does not imply that B lists
    /// this district back.
    #[serde(default)]
    pub adjacent_districts: BTreeSet<String>,
    /// Representative centre point used for inter-district distances.
    pub centroid: Coordinate,
}

/// Top-level schema of a district reference data TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictTable {
    /// City the districts belong to.
    pub city: String,
    /// One entry per district.
    pub districts: Vec<DistrictProfile>,
}

/// Four-level ordinal risk classification shared by the affected-district
/// tiers, the predictions and the density baseline.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Lowest tier.
    Low,
    /// Elevated.
    Medium,
    /// Serious.
    High,
    /// Highest tier.
    Critical,
}

impl RiskLevel {
    /// All levels, lowest first.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];
}

/// A district profile annotated with its density-only baseline risk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDensity {
    /// The static reference data.
    #[serde(flatten)]
    pub profile: DistrictProfile,
    /// Risk implied by population density alone, before any case data.
    pub baseline_risk: RiskLevel,
}

/// Citywide population density summary derived from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityOverview {
    /// City name.
    pub city: String,
    /// Every district, densest first.
    pub districts: Vec<DistrictDensity>,
    /// Sum of district populations.
    pub total_population: u64,
    /// Sum of district areas in square kilometres.
    pub total_area_km2: f64,
    /// Total population divided by total area, rounded to whole residents.
    pub mean_density_per_km2: f64,
    /// Name of the densest district.
    pub densest_district: Option<String>,
    /// Name of the least dense district.
    pub sparsest_district: Option<String>,
    /// Number of districts in the registry.
    pub district_count: usize,
}

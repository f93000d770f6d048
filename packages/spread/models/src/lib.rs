#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spread analysis result types.
//!
//! Everything here is produced fresh by one analysis call and owned by its
//! caller; nothing is persisted. The types serialize to `camelCase` JSON
//! for direct use by the REST API.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use outbreak_map_district_models::RiskLevel;

/// Summary of one district with at least one case in the analysis window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedDistrict {
    /// District name as recorded in the case data.
    pub district: String,
    /// Earliest case date.
    pub first_case_date: NaiveDate,
    /// Latest case date.
    pub last_case_date: NaiveDate,
    /// Total cases across the window.
    pub total_cases: u64,
    /// Registry density, or `0` for districts missing from the registry.
    pub density_per_km2: u32,
    /// Cases per day between the first and last case, both included.
    pub local_velocity: f64,
    /// Expansion risk from density and local velocity.
    pub risk_tier: RiskLevel,
}

/// An inferred directed transmission link between two adjacent districts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropagationEdge {
    /// District where cases appeared first.
    pub from_district: String,
    /// District reached later.
    pub to_district: String,
    /// First case date of the destination district.
    pub propagation_date: NaiveDate,
    /// Whole days between the two first-case dates (1 to 14).
    pub transition_days: u32,
    /// Distance between the two district centroids.
    pub distance_km: f64,
    /// `distance_km / transition_days`.
    pub speed_km_per_day: f64,
}

/// Near-term risk forecast for a district still in early spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    /// District name from the registry.
    pub district: String,
    /// Date the forecast applies to (analysis date + 7 days).
    pub target_date: NaiveDate,
    /// Expected cases by the target date, including current ones.
    pub predicted_cases: u64,
    /// Probability of spread in percent, `0..=100`, two decimals.
    pub probability_percent: f64,
    /// Risk classification of the probability.
    pub risk_level: RiskLevel,
}

/// The dates an analysis covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPeriod {
    /// First date included.
    pub start: NaiveDate,
    /// Last date included (the analysis date).
    pub end: NaiveDate,
    /// Requested window length in days.
    pub total_days: u32,
}

/// Complete spread analysis for one disease.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadAnalysis {
    /// Disease name as requested.
    pub disease: String,
    /// Analysis window.
    pub period: AnalysisPeriod,
    /// Citywide cases per day over the whole window.
    pub average_velocity: f64,
    /// Highest single-day citywide case count.
    pub peak_velocity: f64,
    /// Affected districts, most cases first.
    pub affected_districts: Vec<AffectedDistrict>,
    /// Inferred propagation routes.
    pub routes: Vec<PropagationEdge>,
    /// Mean of `density * local_velocity / 1000` over affected districts.
    pub density_factor: f64,
    /// Predictions, most probable first.
    pub predictions: Vec<Prediction>,
    /// Human-readable advisories.
    pub recommendations: Vec<String>,
}

/// Result of analysing one disease inside a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseResult {
    /// Disease name as requested (trimmed).
    pub disease: String,
    /// The analysis, when it succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<SpreadAnalysis>,
    /// The failure message, when it did not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate view across the diseases that analysed successfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    /// Number of successful analyses.
    pub diseases_analyzed: usize,
    /// Mean of the average velocities, two decimals.
    pub mean_average_velocity: f64,
    /// Highest peak velocity seen in any disease.
    pub max_peak_velocity: f64,
    /// Disease with the highest average velocity.
    pub fastest_disease: Option<String>,
    /// Union of affected district names, first-seen order.
    pub affected_districts: Vec<String>,
    /// Overall alert level from the mean velocity.
    pub alert_level: RiskLevel,
}

/// Side-by-side spread analyses of several diseases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseComparison {
    /// Window length used for every disease.
    pub days: u32,
    /// One entry per requested disease, in request order.
    pub results: Vec<DiseaseResult>,
    /// Summary of the successful analyses, absent when none succeeded.
    pub summary: Option<ComparisonSummary>,
}

/// Propagation routes for one disease with their context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteReport {
    /// Disease name as requested.
    pub disease: String,
    /// Origin district filter, if one was given.
    pub origin_filter: Option<String>,
    /// Number of routes after filtering.
    pub total_routes: usize,
    /// Routes after filtering.
    pub routes: Vec<PropagationEdge>,
    /// District name to adjacent district names.
    pub adjacency: BTreeMap<String, Vec<String>>,
    /// Route-specific advisories.
    pub recommendations: Vec<String>,
}

//! Case fetching, clock and multi-disease orchestration around the engine.

use std::sync::Arc;

use futures::future::join_all;
use outbreak_map_case_models::DateWindow;
use outbreak_map_cases::{CaseSource, Clock};
use outbreak_map_district::DistrictRegistry;
use outbreak_map_district_models::DensityOverview;
use outbreak_map_spread_models::{
    ComparisonSummary, DiseaseComparison, DiseaseResult, Prediction, RouteReport, SpreadAnalysis,
};

use crate::{
    SpreadError, analyze_spread,
    recommend::{alert_level, route_recommendations},
    round2, validate_window,
};

/// Shared entry point for the server and the CLI.
///
/// Cheap to clone; every field is reference counted and read-only.
#[derive(Clone)]
pub struct SpreadService {
    registry: Arc<DistrictRegistry>,
    source: Arc<dyn CaseSource>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SpreadService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadService")
            .field("city", &self.registry.city())
            .field("districts", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl SpreadService {
    #[must_use]
    pub fn new(
        registry: Arc<DistrictRegistry>,
        source: Arc<dyn CaseSource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            source,
            clock,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DistrictRegistry {
        &self.registry
    }

    /// Fetches the cases of `disease` for the last `days` days and analyses them.
    ///
    /// # Errors
    ///
    /// * [`SpreadError::InvalidWindow`] if `days` is out of range
    /// * [`SpreadError::Source`] if the case source fails
    /// * [`SpreadError::NoData`] if no case matches
    pub async fn analyze(&self, disease: &str, days: i64) -> Result<SpreadAnalysis, SpreadError> {
        let window_days = validate_window(days)?;
        let today = self.clock.today();
        let window = DateWindow::ending(today, window_days);

        log::debug!(
            "Fetching {disease} cases from {} to {}",
            window.start,
            window.end
        );
        let cases = self.source.fetch_cases(disease, window).await?;

        analyze_spread(&self.registry, &cases, disease, days, today)
    }

    /// The prediction for one district, matched by exact name.
    ///
    /// # Errors
    ///
    /// Any [`Self::analyze`] error, or [`SpreadError::NoPrediction`] when
    /// the district is unknown or already has five or more cases.
    pub async fn district_prediction(
        &self,
        district: &str,
        disease: &str,
        days: i64,
    ) -> Result<Prediction, SpreadError> {
        let analysis = self.analyze(disease, days).await?;

        analysis
            .predictions
            .into_iter()
            .find(|p| p.district == district)
            .ok_or_else(|| SpreadError::NoPrediction {
                district: district.to_string(),
            })
    }

    /// Analyses several diseases concurrently and summarizes them.
    ///
    /// Blank names are dropped after trimming. A disease whose analysis
    /// fails is reported with its error message instead of failing the
    /// whole comparison.
    ///
    /// # Errors
    ///
    /// * [`SpreadError::InsufficientDiseases`] with fewer than two names
    /// * [`SpreadError::InvalidWindow`] if `days` is out of range
    pub async fn compare<S: AsRef<str>>(
        &self,
        diseases: &[S],
        days: i64,
    ) -> Result<DiseaseComparison, SpreadError> {
        let diseases: Vec<&str> = diseases
            .iter()
            .map(|d| d.as_ref().trim())
            .filter(|d| !d.is_empty())
            .collect();

        if diseases.len() < 2 {
            return Err(SpreadError::InsufficientDiseases {
                count: diseases.len(),
            });
        }
        let window_days = validate_window(days)?;

        log::info!("Comparing {} diseases over {window_days} days", diseases.len());

        let outcomes = join_all(diseases.iter().map(|disease| self.analyze(disease, days))).await;

        let results: Vec<DiseaseResult> = diseases
            .iter()
            .zip(outcomes)
            .map(|(disease, outcome)| match outcome {
                Ok(analysis) => DiseaseResult {
                    disease: (*disease).to_string(),
                    analysis: Some(analysis),
                    error: None,
                },
                Err(e) => {
                    log::warn!("Analysis of {disease} failed: {e}");
                    DiseaseResult {
                        disease: (*disease).to_string(),
                        analysis: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        let summary = summarize_comparison(&results);

        Ok(DiseaseComparison {
            days: window_days,
            results,
            summary,
        })
    }

    /// Propagation routes of `disease`, optionally limited to one origin.
    ///
    /// # Errors
    ///
    /// Any [`Self::analyze`] error.
    pub async fn route_report(
        &self,
        disease: &str,
        origin: Option<&str>,
        days: i64,
    ) -> Result<RouteReport, SpreadError> {
        let analysis = self.analyze(disease, days).await?;
        let origin = origin.map(str::trim).filter(|o| !o.is_empty());

        let routes: Vec<_> = analysis
            .routes
            .into_iter()
            .filter(|r| origin.is_none_or(|o| r.from_district.to_lowercase() == o.to_lowercase()))
            .collect();

        Ok(RouteReport {
            disease: analysis.disease,
            origin_filter: origin.map(str::to_string),
            total_routes: routes.len(),
            recommendations: route_recommendations(&routes),
            routes,
            adjacency: self.registry.adjacency_matrix(),
        })
    }

    #[must_use]
    pub fn density_overview(&self) -> DensityOverview {
        self.registry.density_overview()
    }
}

fn summarize_comparison(results: &[DiseaseResult]) -> Option<ComparisonSummary> {
    let analyses: Vec<&SpreadAnalysis> = results.iter().filter_map(|r| r.analysis.as_ref()).collect();
    if analyses.is_empty() {
        return None;
    }

    let mut fastest: Option<&SpreadAnalysis> = None;
    let mut affected_districts: Vec<String> = Vec::new();
    let mut velocity_sum = 0.0;
    let mut max_peak = 0.0_f64;

    for &analysis in &analyses {
        velocity_sum += analysis.average_velocity;
        max_peak = max_peak.max(analysis.peak_velocity);

        if fastest.is_none_or(|f| analysis.average_velocity > f.average_velocity) {
            fastest = Some(analysis);
        }

        for district in &analysis.affected_districts {
            if !affected_districts.contains(&district.district) {
                affected_districts.push(district.district.clone());
            }
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = velocity_sum / analyses.len() as f64;

    Some(ComparisonSummary {
        diseases_analyzed: analyses.len(),
        mean_average_velocity: round2(mean),
        max_peak_velocity: max_peak,
        fastest_disease: fastest.map(|f| f.disease.clone()),
        affected_districts,
        alert_level: alert_level(mean),
    })
}

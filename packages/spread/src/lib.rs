#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Epidemiological spread analysis engine.
//!
//! Given the geolocated clinical cases of one disease, reconstructs which
//! districts were affected and in what order, estimates local and citywide
//! spread velocity, infers district-to-district propagation routes over the
//! registry's adjacency graph, and ranks every district by near-term risk.
//!
//! The pipeline is deterministic and runs synchronously:
//!
//! 1. [`aggregate::aggregate`] groups case records per (date, district).
//! 2. [`affected::summarize`] builds one summary per affected district.
//! 3. [`routes::build_routes`] and [`velocity::velocities`] run on those.
//! 4. [`predict::predict`] scores every registry district.
//! 5. [`recommend::recommendations`] turns the result into advisories.
//!
//! [`analyze_spread`] runs the whole pipeline over an in-memory case list;
//! [`SpreadService`] adds case fetching, the clock and multi-disease
//! comparison on top.

pub mod affected;
pub mod aggregate;
pub mod predict;
pub mod recommend;
pub mod routes;
pub mod service;
pub mod velocity;

mod engine;

use outbreak_map_cases::CaseSourceError;
use thiserror::Error;

pub use engine::analyze_spread;
pub use service::SpreadService;

/// Shortest accepted analysis window, in days.
pub const MIN_WINDOW_DAYS: u32 = 7;

/// Longest accepted analysis window, in days.
pub const MAX_WINDOW_DAYS: u32 = 365;

/// Window used when a caller does not specify one.
pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// Days between the analysis date and the prediction target date.
pub const PREDICTION_HORIZON_DAYS: u64 = 7;

/// Errors that can occur during spread analysis.
#[derive(Debug, Error)]
pub enum SpreadError {
    /// No case records matched the disease inside the window.
    #[error("No cases found for disease {disease} in the last {days} days")]
    NoData {
        /// Disease that was requested.
        disease: String,
        /// Window length that was searched.
        days: u32,
    },

    /// The analysis window is outside `MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS`.
    #[error(
        "Analysis window must be between {} and {} days, got {days}",
        MIN_WINDOW_DAYS,
        MAX_WINDOW_DAYS
    )]
    InvalidWindow {
        /// The rejected window length.
        days: i64,
    },

    /// The analysis produced no prediction for the requested district.
    #[error("No prediction available for district {district}")]
    NoPrediction {
        /// The requested district.
        district: String,
    },

    /// A comparison needs at least two disease names.
    #[error("At least 2 diseases are required for a comparison, got {count}")]
    InsufficientDiseases {
        /// Number of non-blank disease names supplied.
        count: usize,
    },

    /// The case source failed.
    #[error(transparent)]
    Source(#[from] CaseSourceError),
}

/// Checks that `days` is an accepted analysis window length.
///
/// # Errors
///
/// Returns [`SpreadError::InvalidWindow`] when `days` is outside
/// `MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS`.
pub fn validate_window(days: i64) -> Result<u32, SpreadError> {
    u32::try_from(days)
        .ok()
        .filter(|d| (MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(d))
        .ok_or(SpreadError::InvalidWindow { days })
}

/// Rounds to two decimal places.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

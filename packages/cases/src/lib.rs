#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case record sources and the analysis clock.
//!
//! Persistence of clinical records lives outside this workspace. The spread
//! engine only sees the [`CaseSource`] trait, which returns the records for
//! one disease over a date window. Two implementations are provided: an
//! in-memory list and a CSV export loaded once at startup.

pub mod clock;
pub mod csv_source;
pub mod memory;

use async_trait::async_trait;
use outbreak_map_case_models::{CaseRecord, DateWindow};
use thiserror::Error;

pub use clock::{Clock, FixedClock, SystemClock};
pub use csv_source::CsvCaseSource;
pub use memory::InMemoryCaseSource;

/// Environment variable naming the CSV file of case records.
pub const CASES_PATH_ENV: &str = "CASES_PATH";

/// Errors that can occur while fetching case records.
#[derive(Debug, Error)]
pub enum CaseSourceError {
    /// Reading the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV row could not be decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Any other backend failure.
    #[error("Case source error: {message}")]
    Backend {
        /// Description of what went wrong.
        message: String,
    },
}

/// Supplies clinical case records for analysis.
///
/// Implementations must return records with a district, date and
/// coordinates. They may pre-filter by disease and window, but callers
/// filter again and must not rely on it.
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// Fetches the records for `disease` (case-insensitive) dated inside
    /// `window`.
    ///
    /// # Errors
    ///
    /// Returns [`CaseSourceError`] if the backing store cannot be read.
    async fn fetch_cases(
        &self,
        disease: &str,
        window: DateWindow,
    ) -> Result<Vec<CaseRecord>, CaseSourceError>;
}

//! CSV-backed case source.
//!
//! Expects a header row `disease,date,district,contagious,latitude,longitude`
//! with dates as `YYYY-MM-DD`. The whole file is read once at construction
//! and served from memory.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use outbreak_map_case_models::{CaseRecord, DateWindow};

use crate::{CASES_PATH_ENV, CaseSource, CaseSourceError, InMemoryCaseSource};

/// Case records loaded from a CSV export.
#[derive(Debug, Clone, Default)]
pub struct CsvCaseSource {
    inner: InMemoryCaseSource,
}

impl CsvCaseSource {
    /// Reads every record from the CSV file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CaseSourceError`] if the file cannot be opened or any row
    /// fails to decode.
    pub fn from_path(path: &Path) -> Result<Self, CaseSourceError> {
        let reader = csv::Reader::from_path(path)?;
        let source = Self::from_csv_reader(reader)?;
        log::info!(
            "Loaded {} case records from {}",
            source.len(),
            path.display()
        );
        Ok(source)
    }

    /// Reads every record from an in-memory or streamed CSV.
    ///
    /// # Errors
    ///
    /// Returns [`CaseSourceError::Csv`] if any row fails to decode.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CaseSourceError> {
        Self::from_csv_reader(csv::Reader::from_reader(reader))
    }

    /// Loads the file named by `CASES_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`CaseSourceError::Backend`] if the variable is unset, or any
    /// load error.
    pub fn from_env() -> Result<Self, CaseSourceError> {
        let path = std::env::var_os(CASES_PATH_ENV).ok_or_else(|| CaseSourceError::Backend {
            message: format!("{CASES_PATH_ENV} is not set"),
        })?;
        Self::from_path(Path::new(&path))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, CaseSourceError> {
        let records = reader
            .deserialize::<CaseRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            inner: InMemoryCaseSource::new(records),
        })
    }

    /// Number of records loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.records().len()
    }

    /// Whether the file had no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.records().is_empty()
    }
}

#[async_trait]
impl CaseSource for CsvCaseSource {
    async fn fetch_cases(
        &self,
        disease: &str,
        window: DateWindow,
    ) -> Result<Vec<CaseRecord>, CaseSourceError> {
        Ok(self.inner.matching(disease, window))
    }
}

//! In-memory case source.

use async_trait::async_trait;
use outbreak_map_case_models::{CaseRecord, DateWindow};

use crate::{CaseSource, CaseSourceError};

/// Serves a fixed list of case records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCaseSource {
    records: Vec<CaseRecord>,
}

impl InMemoryCaseSource {
    /// Wraps a list of records.
    #[must_use]
    pub const fn new(records: Vec<CaseRecord>) -> Self {
        Self { records }
    }

    /// All records, unfiltered.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        &self.records
    }

    /// Records for `disease` inside `window`, in stored order.
    #[must_use]
    pub fn matching(&self, disease: &str, window: DateWindow) -> Vec<CaseRecord> {
        self.records
            .iter()
            .filter(|r| r.is_disease(disease) && window.contains(r.date))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl CaseSource for InMemoryCaseSource {
    async fn fetch_cases(
        &self,
        disease: &str,
        window: DateWindow,
    ) -> Result<Vec<CaseRecord>, CaseSourceError> {
        Ok(self.matching(disease, window))
    }
}

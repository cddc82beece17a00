use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use super::dataset::{usable, Dataset};
use super::loader::DatasetSource;
use super::mock::MockCatalog;
use super::report::{dataset_report, mock_report, NeighbourhoodReport};
use super::resolver::{resolve, EntrySource};

/// Client-facing failures of name resolution and report assembly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("a neighbourhood name is required")]
    InvalidInput,
    #[error("neighbourhood '{requested}' not found")]
    NotFound { requested: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighbourhoodListing {
    pub neighbourhoods: Vec<String>,
    pub data_source: EntrySource,
}

/// Service composing the dataset source, the fallback catalog, and scoring.
pub struct NeighbourhoodReportService<S> {
    source: Arc<S>,
    catalog: Arc<MockCatalog>,
}

impl<S> Clone for NeighbourhoodReportService<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

impl<S> NeighbourhoodReportService<S>
where
    S: DatasetSource + 'static,
{
    pub fn new(source: Arc<S>, catalog: Arc<MockCatalog>) -> Self {
        Self { source, catalog }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn catalog(&self) -> &MockCatalog {
        &self.catalog
    }

    /// Sorted neighbourhood names from the dataset when it is usable,
    /// otherwise from the built-in catalog.
    pub fn list(&self) -> NeighbourhoodListing {
        let dataset = self.source.load();

        let (mut neighbourhoods, data_source): (Vec<String>, _) =
            match usable(dataset.as_ref()) {
                Some(dataset) => (
                    dataset
                        .neighbourhoods()
                        .iter()
                        .map(|record| record.name.clone())
                        .collect(),
                    EntrySource::Dataset,
                ),
                None => (
                    self.catalog
                        .neighbourhoods()
                        .iter()
                        .map(|neighbourhood| neighbourhood.name.clone())
                        .collect(),
                    EntrySource::Mock,
                ),
            };
        neighbourhoods.sort();

        NeighbourhoodListing {
            neighbourhoods,
            data_source,
        }
    }

    pub fn report(&self, requested: Option<&str>) -> Result<NeighbourhoodReport, ReportError> {
        self.report_at(requested, Utc::now())
    }

    /// Builds the report for `requested`, stamping it with `now`.
    pub fn report_at(
        &self,
        requested: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<NeighbourhoodReport, ReportError> {
        let requested = requested.ok_or(ReportError::InvalidInput)?;
        let dataset = self.source.load();
        let resolution = resolve(dataset.as_ref(), &self.catalog, requested)?;

        let report = match resolution.source {
            EntrySource::Dataset => dataset
                .as_ref()
                .and_then(|dataset| dataset_entry_report(dataset, &resolution.key, now)),
            EntrySource::Mock => self
                .catalog
                .entry(&resolution.key)
                .map(|entry| mock_report(&resolution.key, entry, now)),
        };

        let report = report.ok_or_else(|| ReportError::NotFound {
            requested: requested.trim().to_string(),
        })?;

        debug!(
            neighbourhood = %report.neighbourhood,
            data_source = ?report.data_source,
            score = report.score,
            "neighbourhood report assembled"
        );

        Ok(report)
    }
}

fn dataset_entry_report(
    dataset: &Dataset,
    key: &str,
    now: DateTime<Utc>,
) -> Option<NeighbourhoodReport> {
    dataset
        .entry(key)
        .map(|entry| dataset_report(dataset, key, entry, now))
}

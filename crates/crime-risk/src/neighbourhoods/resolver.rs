use serde::Serialize;

use super::dataset::{usable, Dataset};
use super::mock::MockCatalog;
use super::service::ReportError;

/// Which catalog a resolved name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    Dataset,
    Mock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Name exactly as stored in the matching catalog.
    pub key: String,
    pub source: EntrySource,
}

/// Resolves a requested neighbourhood name, case-insensitively, against the
/// dataset first (when usable) and the mock catalog second.
///
/// When several stored keys differ only by case, the first one in document
/// order is returned.
pub fn resolve(
    dataset: Option<&Dataset>,
    mock: &MockCatalog,
    requested: &str,
) -> Result<Resolution, ReportError> {
    let requested = requested.trim();
    if requested.is_empty() {
        return Err(ReportError::InvalidInput);
    }
    let folded = requested.to_lowercase();

    if let Some(dataset) = usable(dataset) {
        if let Some(key) = find_key(
            dataset.neighbourhoods().iter().map(|record| record.name.as_str()),
            &folded,
        ) {
            return Ok(Resolution {
                key,
                source: EntrySource::Dataset,
            });
        }
    }

    find_key(
        mock.neighbourhoods()
            .iter()
            .map(|neighbourhood| neighbourhood.name.as_str()),
        &folded,
    )
    .map(|key| Resolution {
        key,
        source: EntrySource::Mock,
    })
    .ok_or_else(|| ReportError::NotFound {
        requested: requested.to_string(),
    })
}

fn find_key<'a>(mut keys: impl Iterator<Item = &'a str>, folded: &str) -> Option<String> {
    keys.find(|key| key.to_lowercase() == folded)
        .map(str::to_string)
}

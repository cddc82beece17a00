use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::dataset::Dataset;

/// Supplies the current dataset snapshot. Implementations are consulted on
/// every request; `None` means no dataset is available right now.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Option<Dataset>;
}

/// Reasons a dataset file that exists could not be used.
#[derive(Debug, thiserror::Error)]
pub enum DatasetLoadError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("dataset {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("dataset {} must contain a JSON object at the top level", path.display())]
    NotAnObject { path: PathBuf },
}

/// Reads the dataset from a JSON file on every call.
#[derive(Debug, Clone)]
pub struct FileDatasetSource {
    path: PathBuf,
}

impl FileDatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Like [`DatasetSource::load`], but keeps the failure. A missing file
    /// is not a failure and yields `Ok(None)`.
    pub fn try_load(&self) -> Result<Option<Dataset>, DatasetLoadError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(DatasetLoadError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let document: Value =
            serde_json::from_str(&raw).map_err(|source| DatasetLoadError::Parse {
                path: self.path.clone(),
                source,
            })?;

        match document {
            Value::Object(document) => Ok(Some(Dataset::from_document(&document))),
            _ => Err(DatasetLoadError::NotAnObject {
                path: self.path.clone(),
            }),
        }
    }
}

impl DatasetSource for FileDatasetSource {
    fn load(&self) -> Option<Dataset> {
        match self.try_load() {
            Ok(Some(dataset)) => Some(dataset),
            Ok(None) => {
                debug!(path = %self.path.display(), "dataset not found, using built-in catalog");
                None
            }
            Err(err) => {
                warn!(error = %err, "dataset unavailable, using built-in catalog");
                None
            }
        }
    }
}

/// Fixed in-memory snapshot, handy for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticDatasetSource {
    dataset: Option<Dataset>,
}

impl StaticDatasetSource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Some(dataset),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

impl DatasetSource for StaticDatasetSource {
    fn load(&self) -> Option<Dataset> {
        self.dataset.clone()
    }
}

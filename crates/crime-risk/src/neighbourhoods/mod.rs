//! Neighbourhood crime-risk reporting.
//!
//! A report is assembled per request: the dataset is re-read through a
//! [`DatasetSource`], the requested name is resolved against it (or the
//! built-in [`MockCatalog`] when the dataset is missing, empty, or lacks the
//! name), and dataset counts are scored into a 0..=100 risk score.

pub mod dataset;
pub mod loader;
pub mod mock;
pub mod report;
pub mod resolver;
pub mod router;
pub mod scoring;
pub mod service;

pub use dataset::{
    usable, CategoryCount, CategoryCounts, Dataset, NeighbourhoodEntry, NeighbourhoodRecord,
    ReportedYear,
};
pub use loader::{DatasetLoadError, DatasetSource, FileDatasetSource, StaticDatasetSource};
pub use mock::{MockCatalog, MockEntry, MockNeighbourhood, RateFactor};
pub use report::{NeighbourhoodReport, ReportFactor};
pub use resolver::{resolve, EntrySource, Resolution};
pub use router::{neighbourhood_router, ReportQuery};
pub use scoring::{score_counts, CountFactor, RiskLevel, ScoreCard};
pub use service::{NeighbourhoodListing, NeighbourhoodReportService, ReportError};

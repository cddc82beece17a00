use crime_risk::config::AppConfig;
use crime_risk::neighbourhoods::{FileDatasetSource, MockCatalog, NeighbourhoodReportService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type ReportService = NeighbourhoodReportService<FileDatasetSource>;

/// CLI override first, then the configured path.
pub(crate) fn resolve_dataset_path(config: &AppConfig, flag: Option<PathBuf>) -> PathBuf {
    flag.unwrap_or_else(|| config.dataset.path.clone())
}

pub(crate) fn build_report_service(dataset_path: &Path) -> ReportService {
    NeighbourhoodReportService::new(
        Arc::new(FileDatasetSource::new(dataset_path)),
        Arc::new(MockCatalog::ottawa()),
    )
}

use crate::cli::ServeArgs;
use crate::infra::{build_report_service, resolve_dataset_path, AppState};
use crate::routes::with_report_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use crime_risk::config::AppConfig;
use crime_risk::error::AppError;
use crime_risk::neighbourhoods::{usable, DatasetSource};
use crime_risk::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    config.dataset.path = resolve_dataset_path(&config, args.dataset.take());

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let report_service = Arc::new(build_report_service(&config.dataset.path));

    if usable(report_service.source().load().as_ref()).is_some() {
        info!(path = %config.dataset.path.display(), "serving reports from dataset");
    } else {
        warn!(
            path = %config.dataset.path.display(),
            "no usable dataset yet, serving the built-in catalog until one appears"
        );
    }

    let app = with_report_routes(report_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "neighbourhood crime-risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

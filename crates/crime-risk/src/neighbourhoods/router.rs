use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::loader::DatasetSource;
use super::report::NeighbourhoodReport;
use super::service::{NeighbourhoodListing, NeighbourhoodReportService};
use crate::error::AppError;

const NEIGHBOURHOOD_PARAM: &str = "neighbourhood";
const NEIGHBORHOOD_PARAM: &str = "neighborhood";

/// Query string for the report endpoint. Both spellings are accepted and may
/// repeat; unrelated parameters are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportQuery {
    pub neighbourhood: Vec<String>,
    pub neighborhood: Vec<String>,
}

impl ReportQuery {
    /// First non-blank `neighbourhood` value, then the first non-blank
    /// `neighborhood` value.
    pub fn requested(&self) -> Option<&str> {
        self.neighbourhood
            .iter()
            .chain(&self.neighborhood)
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
    }
}

impl FromIterator<(String, String)> for ReportQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                NEIGHBOURHOOD_PARAM => query.neighbourhood.push(value),
                NEIGHBORHOOD_PARAM => query.neighborhood.push(value),
                _ => {}
            }
        }
        query
    }
}

/// Router builder exposing the listing and report endpoints.
pub fn neighbourhood_router<S>(service: Arc<NeighbourhoodReportService<S>>) -> Router
where
    S: DatasetSource + 'static,
{
    Router::new()
        .route("/neighbourhoods", get(list_handler::<S>))
        .route("/report", get(report_handler::<S>))
        .with_state(service)
}

// Dataset sources may hit the filesystem, so both handlers run the service
// on the blocking pool.
pub(crate) async fn list_handler<S>(
    State(service): State<Arc<NeighbourhoodReportService<S>>>,
) -> Result<Json<NeighbourhoodListing>, AppError>
where
    S: DatasetSource + 'static,
{
    let listing = tokio::task::spawn_blocking(move || service.list()).await?;
    Ok(Json(listing))
}

pub(crate) async fn report_handler<S>(
    State(service): State<Arc<NeighbourhoodReportService<S>>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<NeighbourhoodReport>, AppError>
where
    S: DatasetSource + 'static,
{
    let query: ReportQuery = pairs.into_iter().collect();
    let requested = query.requested().map(str::to_string);

    let report =
        tokio::task::spawn_blocking(move || service.report(requested.as_deref())).await??;
    Ok(Json(report))
}

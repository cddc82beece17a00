use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use chrono::TimeZone;
use chrono::Utc;
use crime_risk::neighbourhoods::{
    neighbourhood_router, EntrySource, FileDatasetSource, MockCatalog, NeighbourhoodReportService,
    ReportError, ReportFactor, RiskLevel,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

const CENTRETOWN_DATASET: &str = r#"{
    "neighbourhoods": {
        "Centretown": { "counts": { "Theft": 142, "Mischief": 94, "BreakEnter": 61 } },
        "Vanier": {
            "counts": { "Theft": 12, "Assault": 12, "Mischief": 30, "Fraud": 4 },
            "source_links": ["https://vanier.example/reports"]
        },
        "Rockcliffe Park": {}
    },
    "timeframe": { "reported_year": 2025 },
    "metadata": { "source_links": ["https://data.ottawa.ca/crime"] }
}"#;

fn dataset_dir(contents: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    if let Some(contents) = contents {
        std::fs::write(dataset_path(dir.path()), contents).expect("write dataset");
    }
    dir
}

fn dataset_path(dir: &Path) -> std::path::PathBuf {
    dir.join("crime-by-neighborhood.json")
}

fn service_for(dir: &TempDir) -> NeighbourhoodReportService<FileDatasetSource> {
    NeighbourhoodReportService::new(
        Arc::new(FileDatasetSource::new(dataset_path(dir.path()))),
        Arc::new(MockCatalog::ottawa()),
    )
}

#[test]
fn centretown_dataset_report_matches_published_scenario() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let service = service_for(&dir);
    let now = Utc
        .with_ymd_and_hms(2025, 11, 3, 8, 30, 0)
        .single()
        .expect("valid timestamp");

    let report = service
        .report_at(Some("centretown"), now)
        .expect("report builds");

    assert_eq!(report.neighbourhood, "Centretown");
    assert_eq!(report.data_source, EntrySource::Dataset);
    assert_eq!(report.score, 74);
    assert_eq!(report.risk_level, RiskLevel::High);
    assert_eq!(report.summary, "Total reported incidents: 297 (year 2025).");
    assert_eq!(report.sources, vec!["https://data.ottawa.ca/crime".to_string()]);
    assert_eq!(report.timestamp, now);

    let categories: Vec<&str> = report.top_factors.iter().map(ReportFactor::category).collect();
    assert_eq!(categories, vec!["Theft", "Mischief", "BreakEnter"]);
}

#[test]
fn ties_and_entry_sources_follow_document() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let report = service_for(&dir)
        .report(Some("VANIER"))
        .expect("report builds");

    let payload = serde_json::to_value(&report).expect("serializes");
    assert_eq!(
        payload["top_factors"],
        json!([
            { "category": "Mischief", "count": 30 },
            { "category": "Theft", "count": 12 },
            { "category": "Assault", "count": 12 }
        ])
    );
    assert_eq!(payload["sources"], json!(["https://vanier.example/reports"]));
    assert_eq!(report.score, 14);
    assert_eq!(report.risk_level, RiskLevel::Low);
}

#[test]
fn entry_without_counts_scores_zero() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let report = service_for(&dir)
        .report(Some("rockcliffe park"))
        .expect("report builds");

    assert_eq!(report.neighbourhood, "Rockcliffe Park");
    assert_eq!(report.score, 0);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert!(report.top_factors.is_empty());
    assert_eq!(report.summary, "Total reported incidents: 0 (year 2025).");
}

#[test]
fn missing_dataset_serves_catalog() {
    let dir = dataset_dir(None);
    let service = service_for(&dir);

    let listing = service.list();
    assert_eq!(listing.data_source, EntrySource::Mock);
    assert_eq!(listing.neighbourhoods, vec!["Centretown", "Kanata"]);

    let report = service.report(Some("Kanata")).expect("catalog report");
    assert_eq!(report.score, 86);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert!(matches!(report.top_factors[0], ReportFactor::Rate(_)));
    assert!(report.counts.is_none());
}

#[test]
fn corrupt_dataset_serves_catalog() {
    let dir = dataset_dir(Some("{ not json"));
    let service = service_for(&dir);

    assert_eq!(service.list().data_source, EntrySource::Mock);
    assert_eq!(
        service.report(Some("kanata")).expect("catalog report").neighbourhood,
        "Kanata"
    );
}

#[test]
fn empty_neighbourhood_table_serves_catalog() {
    let dir = dataset_dir(Some(r#"{"neighbourhoods": {}, "timeframe": {"reported_year": 2025}}"#));
    let service = service_for(&dir);

    assert_eq!(service.list().neighbourhoods, vec!["Centretown", "Kanata"]);
    let report = service.report(Some("Centretown")).expect("catalog report");
    assert_eq!(report.data_source, EntrySource::Mock);
    assert_eq!(report.score, 72);
}

#[test]
fn unknown_names_are_not_found_with_or_without_dataset() {
    for contents in [None, Some(CENTRETOWN_DATASET)] {
        let dir = dataset_dir(contents);
        assert_eq!(
            service_for(&dir).report(Some("Nowhereville")),
            Err(ReportError::NotFound {
                requested: "Nowhereville".to_string()
            })
        );
    }
}

#[test]
fn dataset_changes_are_picked_up_without_restart() {
    let dir = dataset_dir(None);
    let service = service_for(&dir);
    assert_eq!(service.list().data_source, EntrySource::Mock);

    std::fs::write(dataset_path(dir.path()), CENTRETOWN_DATASET).expect("write dataset");
    let listing = service.list();
    assert_eq!(listing.data_source, EntrySource::Dataset);
    assert_eq!(
        listing.neighbourhoods,
        vec!["Centretown", "Rockcliffe Park", "Vanier"]
    );
}

#[tokio::test]
async fn http_routes_distinguish_missing_and_unknown_names() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let router = neighbourhood_router(Arc::new(service_for(&dir)));

    for (uri, expected) in [
        ("/report", StatusCode::UNPROCESSABLE_ENTITY),
        ("/report?neighbourhood=", StatusCode::UNPROCESSABLE_ENTITY),
        ("/report?neighbourhood=Nowhereville", StatusCode::NOT_FOUND),
        ("/report?neighborhood=vanier", StatusCode::OK),
        ("/report?neighbourhood=Kanata&neighborhood=Vanier", StatusCode::OK),
    ] {
        let response = router
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), expected, "unexpected status for {uri}");
    }
}

#[tokio::test]
async fn http_report_prefers_first_alias() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let router = neighbourhood_router(Arc::new(service_for(&dir)));

    let response = router
        .oneshot(
            Request::get("/report?neighbourhood=kanata&neighborhood=vanier")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(payload["neighbourhood"], json!("Kanata"));
    assert_eq!(payload["data_source"], json!("mock"));
}

#[test]
fn whole_number_floats_count_toward_the_score() {
    let dir = dataset_dir(Some(
        r#"{
            "neighbourhoods": { "Hintonburg": { "counts": { "Theft": 300.0, "Mischief": 5 } } },
            "timeframe": { "reported_year": 2025.0 }
        }"#,
    ));

    let report = service_for(&dir)
        .report(Some("hintonburg"))
        .expect("report builds");

    assert_eq!(report.score, 76);
    assert_eq!(report.risk_level, RiskLevel::High);
    assert_eq!(report.summary, "Total reported incidents: 305 (year 2025).");
}

#[tokio::test]
async fn http_report_tolerates_repeated_parameters() {
    let dir = dataset_dir(Some(CENTRETOWN_DATASET));
    let router = neighbourhood_router(Arc::new(service_for(&dir)));

    let response = router
        .oneshot(
            Request::get("/report?neighbourhood=vanier&neighbourhood=centretown")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(payload["neighbourhood"], json!("Vanier"));
    assert_eq!(payload["data_source"], json!("dataset"));
}

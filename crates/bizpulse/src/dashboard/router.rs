use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::engine::{BusinessId, BusinessSnapshot, DashboardError};
use super::service::{DashboardService, DashboardServiceError};
use super::store::SnapshotStore;
use crate::scoring::{
    AvailableDataSet, DiagnosticQuestion, MetricCategory, PrecisionMode, PrecisionTracker,
};

/// Router builder exposing the scoring engine over HTTP.
pub fn dashboard_router<S>(service: Arc<DashboardService<S>>) -> Router
where
    S: SnapshotStore + 'static,
{
    Router::new()
        .route("/api/v1/catalog/metrics", get(catalog_handler::<S>))
        .route("/api/v1/coverage", post(coverage_handler::<S>))
        .route("/api/v1/precision", post(precision_handler::<S>))
        .route("/api/v1/trend", get(trend_handler::<S>))
        .route(
            "/api/v1/businesses/:business_id/dashboard",
            post(dashboard_handler::<S>),
        )
        .route(
            "/api/v1/businesses/:business_id/snapshot",
            get(snapshot_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CatalogQuery {
    #[serde(default)]
    pub(crate) category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoverageRequest {
    #[serde(default)]
    pub(crate) available: AvailableDataSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrecisionRequest {
    pub(crate) questions: Vec<DiagnosticQuestion>,
    #[serde(default)]
    pub(crate) mode: Option<PrecisionMode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TrendQuery {
    pub(crate) current: u8,
    #[serde(default)]
    pub(crate) previous: Option<u8>,
}

pub(crate) async fn catalog_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Query(query): Query<CatalogQuery>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let catalog = &service.engine().config().metrics;
    let metrics: Vec<_> = match query.category {
        Some(category) => catalog
            .get_by_category(&MetricCategory::new(category))
            .into_iter()
            .cloned()
            .collect(),
        None => catalog.get_all().to_vec(),
    };
    (StatusCode::OK, axum::Json(metrics)).into_response()
}

pub(crate) async fn coverage_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    axum::Json(request): axum::Json<CoverageRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let coverage = service.engine().coverage(&request.available);
    (StatusCode::OK, axum::Json(coverage)).into_response()
}

pub(crate) async fn precision_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    axum::Json(request): axum::Json<PrecisionRequest>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let score = match request.mode {
        Some(mode) => PrecisionTracker::new(mode).precision(&request.questions),
        None => service.engine().precision(&request.questions),
    };
    (StatusCode::OK, axum::Json(score)).into_response()
}

pub(crate) async fn trend_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Query(query): Query<TrendQuery>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let result = service.engine().trend(query.current, query.previous);
    (StatusCode::OK, axum::Json(result)).into_response()
}

pub(crate) async fn dashboard_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Path(business_id): Path<String>,
    axum::Json(snapshot): axum::Json<BusinessSnapshot>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    match service.refresh(BusinessId::new(business_id), &snapshot) {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(DashboardServiceError::Dashboard(error @ DashboardError::UnknownVertical(_))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

pub(crate) async fn snapshot_handler<S>(
    State(service): State<Arc<DashboardService<S>>>,
    Path(business_id): Path<String>,
) -> Response
where
    S: SnapshotStore + 'static,
{
    let id = BusinessId::new(business_id);
    match service.latest(&id) {
        Ok(Some(snapshot)) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Ok(None) => {
            let payload = json!({
                "business_id": id.as_str(),
                "error": "no score recorded yet",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

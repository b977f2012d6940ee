use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::dashboard::router::dashboard_handler;
use crate::dashboard::{BusinessId, DashboardService};

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serializable")))
        .expect("valid request")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("valid request")
}

#[tokio::test]
async fn catalog_route_filters_by_category() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/catalog/metrics?category=pricing"))
        .await
        .expect("route responds");
    assert_status(&response, StatusCode::OK);

    let body = json_body(response).await;
    let ids: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|metric| metric["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["ticket_average", "price_position"]);
}

#[tokio::test]
async fn coverage_route_lists_missing_fields() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/coverage",
            json!({ "available": ["rating"] }),
        ))
        .await
        .expect("route responds");
    assert_status(&response, StatusCode::OK);

    let body = json_body(response).await;
    let rating = body
        .as_array()
        .expect("array body")
        .iter()
        .find(|entry| entry["metric_id"] == "rating")
        .expect("rating present")
        .clone();
    assert_eq!(rating["state"], "estimated");
    assert_eq!(rating["missing_fields"], json!(["reviewCount"]));
}

#[tokio::test]
async fn precision_route_honors_explicit_mode() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let questions = json!([
        { "id": "a", "impact_weight": 3.0, "answered": true },
        { "id": "b", "impact_weight": 1.0, "answered": false }
    ]);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/precision",
            json!({ "questions": questions.clone() }),
        ))
        .await
        .expect("route responds");
    let body = json_body(response).await;
    assert_eq!(body["value"], 75);
    assert_eq!(body["level"], "media");

    let response = router
        .oneshot(post_json(
            "/api/v1/precision",
            json!({ "questions": questions, "mode": "unweighted" }),
        ))
        .await
        .expect("route responds");
    let body = json_body(response).await;
    assert_eq!(body["value"], 50);
}

#[tokio::test]
async fn trend_route_applies_dead_zone() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(get("/api/v1/trend?current=57&previous=60"))
        .await
        .expect("route responds");
    let body = json_body(response).await;
    assert_eq!(body["direction"], "down");
    assert_eq!(body["magnitude"], 3);

    let response = router
        .oneshot(get("/api/v1/trend?current=70"))
        .await
        .expect("route responds");
    let body = json_body(response).await;
    assert_eq!(body["direction"], "stable");
    assert_eq!(body["magnitude"], 0);
}

#[tokio::test]
async fn dashboard_route_records_and_exposes_snapshot() {
    let (service, store) = build_service();
    let router = router_with_service(service);

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/v1/businesses/bakery-9/dashboard",
            serde_json::to_value(retail_snapshot(80.0)).expect("serializable snapshot"),
        ))
        .await
        .expect("route responds");
    assert_status(&response, StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["composite"]["value"], 70);
    assert_eq!(body["score_label"], "good");
    assert_eq!(body["trend"]["direction"], "stable");

    let history = store.history(&BusinessId::new("bakery-9"));
    assert_eq!(history.len(), 1);

    let response = router
        .oneshot(get("/api/v1/businesses/bakery-9/snapshot"))
        .await
        .expect("route responds");
    assert_status(&response, StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["value"], 70);
}

#[tokio::test]
async fn snapshot_route_returns_not_found_without_history() {
    let (service, _) = build_service();
    let router = router_with_service(service);

    let response = router
        .oneshot(get("/api/v1/businesses/nobody/snapshot"))
        .await
        .expect("route responds");
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_handler_rejects_unknown_vertical() {
    let (service, _) = build_service();
    let mut snapshot = retail_snapshot(80.0);
    snapshot.vertical = Some("lunar-mining".to_string());

    let response =
        dashboard_handler(State(service), Path("x".to_string()), axum::Json(snapshot)).await;

    assert_status(&response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn dashboard_handler_reports_store_outage() {
    let service = Arc::new(DashboardService::new(engine(), Arc::new(UnavailableStore)));

    let response = dashboard_handler::<UnavailableStore>(
        State(service),
        Path("x".to_string()),
        axum::Json(retail_snapshot(80.0)),
    )
    .await;

    assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error message")
        .contains("unavailable"));
}

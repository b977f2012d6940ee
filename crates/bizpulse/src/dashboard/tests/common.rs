use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::dashboard::{
    dashboard_router, BusinessId, BusinessSnapshot, DashboardEngine, DashboardService,
    EngineConfig, ScoreSnapshot, SnapshotStore, SnapshotStoreError,
};
use crate::scoring::SubScore;

#[derive(Default)]
pub(super) struct MemoryStore {
    snapshots: Mutex<HashMap<BusinessId, Vec<ScoreSnapshot>>>,
}

impl MemoryStore {
    pub(super) fn history(&self, business_id: &BusinessId) -> Vec<ScoreSnapshot> {
        self.snapshots
            .lock()
            .expect("store mutex poisoned")
            .get(business_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl SnapshotStore for MemoryStore {
    fn latest(&self, business_id: &BusinessId) -> Result<Option<ScoreSnapshot>, SnapshotStoreError> {
        let guard = self.snapshots.lock().expect("store mutex poisoned");
        Ok(guard
            .get(business_id)
            .and_then(|history| history.last().cloned()))
    }

    fn record(&self, snapshot: ScoreSnapshot) -> Result<(), SnapshotStoreError> {
        let mut guard = self.snapshots.lock().expect("store mutex poisoned");
        guard
            .entry(snapshot.business_id.clone())
            .or_default()
            .push(snapshot);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl SnapshotStore for UnavailableStore {
    fn latest(&self, _business_id: &BusinessId) -> Result<Option<ScoreSnapshot>, SnapshotStoreError> {
        Err(SnapshotStoreError::Unavailable("maintenance".to_string()))
    }

    fn record(&self, _snapshot: ScoreSnapshot) -> Result<(), SnapshotStoreError> {
        Err(SnapshotStoreError::Unavailable("maintenance".to_string()))
    }
}

pub(super) fn engine() -> Arc<DashboardEngine> {
    Arc::new(DashboardEngine::new(EngineConfig::standard()))
}

pub(super) fn build_service() -> (Arc<DashboardService<MemoryStore>>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let service = Arc::new(DashboardService::new(engine(), store.clone()));
    (service, store)
}

pub(super) fn router_with_service(service: Arc<DashboardService<MemoryStore>>) -> axum::Router {
    dashboard_router(service)
}

pub(super) fn retail_snapshot(rating: f64) -> BusinessSnapshot {
    BusinessSnapshot {
        vertical: Some("retail".to_string()),
        available: ["rating", "reviewCount", "repeatCustomerRate"]
            .into_iter()
            .collect(),
        sub_scores: vec![
            SubScore::known("rating", rating),
            SubScore::known("repeat_customers", 50.0),
            SubScore::unknown("market_share"),
        ],
        answered_questions: ["monthly_revenue", "inventory_turnover"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected status");
}

use bizpulse::dashboard::{BusinessId, ScoreSnapshot, SnapshotStore, SnapshotStoreError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local score history. Keeps only the latest snapshot per business.
#[derive(Default, Clone)]
pub struct InMemorySnapshotStore {
    latest: Arc<Mutex<HashMap<BusinessId, ScoreSnapshot>>>,
}

impl SnapshotStore for InMemorySnapshotStore {
    fn latest(&self, business_id: &BusinessId) -> Result<Option<ScoreSnapshot>, SnapshotStoreError> {
        let guard = self
            .latest
            .lock()
            .map_err(|_| SnapshotStoreError::Unavailable("snapshot mutex poisoned".to_string()))?;
        Ok(guard.get(business_id).cloned())
    }

    fn record(&self, snapshot: ScoreSnapshot) -> Result<(), SnapshotStoreError> {
        let mut guard = self
            .latest
            .lock()
            .map_err(|_| SnapshotStoreError::Unavailable("snapshot mutex poisoned".to_string()))?;
        guard.insert(snapshot.business_id.clone(), snapshot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn snapshot(business: &str, value: u8) -> ScoreSnapshot {
        ScoreSnapshot {
            business_id: BusinessId::new(business),
            value,
            coverage_percent: 100,
            is_estimated: false,
            captured_at: Utc
                .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn record_replaces_previous_snapshot() {
        let store = InMemorySnapshotStore::default();
        let id = BusinessId::new("cafe");
        assert!(store.latest(&id).expect("readable").is_none());

        store.record(snapshot("cafe", 55)).expect("recorded");
        store.record(snapshot("cafe", 61)).expect("recorded");
        store.record(snapshot("bar", 12)).expect("recorded");

        let latest = store.latest(&id).expect("readable").expect("present");
        assert_eq!(latest.value, 61);
    }
}

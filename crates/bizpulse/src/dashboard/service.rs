use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::engine::{BusinessId, BusinessSnapshot, DashboardEngine, DashboardError, DashboardReport};
use super::store::{ScoreSnapshot, SnapshotStore, SnapshotStoreError};

/// Service pairing the pure engine with the caller-owned snapshot history.
pub struct DashboardService<S> {
    engine: Arc<DashboardEngine>,
    store: Arc<S>,
}

impl<S> DashboardService<S>
where
    S: SnapshotStore + 'static,
{
    pub fn new(engine: Arc<DashboardEngine>, store: Arc<S>) -> Self {
        Self { engine, store }
    }

    pub fn engine(&self) -> &DashboardEngine {
        &self.engine
    }

    /// Read the previous score, evaluate, then record the new score.
    pub fn refresh(
        &self,
        business_id: BusinessId,
        snapshot: &BusinessSnapshot,
    ) -> Result<DashboardReport, DashboardServiceError> {
        let previous = self
            .store
            .latest(&business_id)?
            .map(|snapshot| snapshot.value);

        let report = self.engine.evaluate(snapshot, previous)?;

        self.store.record(ScoreSnapshot::from_report(
            business_id.clone(),
            &report,
            Utc::now(),
        ))?;

        info!(
            business = %business_id,
            score = report.composite.value,
            previous = ?previous,
            trend = report.trend.direction.label(),
            "dashboard refreshed"
        );

        Ok(report)
    }

    pub fn latest(
        &self,
        business_id: &BusinessId,
    ) -> Result<Option<ScoreSnapshot>, DashboardServiceError> {
        Ok(self.store.latest(business_id)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardServiceError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
    #[error(transparent)]
    Store(#[from] SnapshotStoreError),
}

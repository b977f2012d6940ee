use super::engine::{BusinessId, DashboardReport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted composite score used as the baseline for the next trend comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSnapshot {
    pub business_id: BusinessId,
    pub value: u8,
    pub coverage_percent: u8,
    pub is_estimated: bool,
    pub captured_at: DateTime<Utc>,
}

impl ScoreSnapshot {
    pub fn from_report(
        business_id: BusinessId,
        report: &DashboardReport,
        captured_at: DateTime<Utc>,
    ) -> Self {
        Self {
            business_id,
            value: report.composite.value,
            coverage_percent: report.composite.coverage_percent,
            is_estimated: report.composite.is_estimated,
            captured_at,
        }
    }
}

/// Storage abstraction for score history; the engine itself never persists anything.
pub trait SnapshotStore: Send + Sync {
    fn latest(&self, business_id: &BusinessId) -> Result<Option<ScoreSnapshot>, SnapshotStoreError>;
    fn record(&self, snapshot: ScoreSnapshot) -> Result<(), SnapshotStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotStoreError {
    #[error("snapshot store unavailable: {0}")]
    Unavailable(String),
}

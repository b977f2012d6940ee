//! Dashboard facade: wires the scoring engine to snapshot history and HTTP.

mod engine;
pub mod router;
mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use engine::{
    BusinessId, BusinessSnapshot, DashboardEngine, DashboardError, DashboardReport, EngineConfig,
};
pub use router::dashboard_router;
pub use service::{DashboardService, DashboardServiceError};
pub use store::{ScoreSnapshot, SnapshotStore, SnapshotStoreError};

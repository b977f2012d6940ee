//! Metric coverage and health scoring for small-business dashboards.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod scoring;
pub mod telemetry;

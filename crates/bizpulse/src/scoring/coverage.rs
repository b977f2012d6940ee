use super::catalog::MetricCatalog;
use super::domain::{AvailableDataSet, MetricCategory, MetricDefinition, MetricId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trust level of a metric given the fields a business has supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricState {
    Active,
    Estimated,
    Blocked,
}

impl MetricState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Estimated => "estimated",
            Self::Blocked => "blocked",
        }
    }
}

/// Resolved coverage of one metric, listing exactly which fields are missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCoverage {
    pub metric_id: MetricId,
    pub category: MetricCategory,
    pub state: MetricState,
    pub missing_fields: Vec<String>,
    pub required_count: usize,
    pub source_labels: Vec<String>,
}

impl MetricCoverage {
    /// Share of required fields currently known; `1.0` when nothing is required.
    pub fn coverage_ratio(&self) -> f64 {
        if self.required_count == 0 {
            return 1.0;
        }
        let known = self.required_count - self.missing_fields.len();
        known as f64 / self.required_count as f64
    }
}

pub fn classify(metric: &MetricDefinition, available: &AvailableDataSet) -> MetricCoverage {
    let missing_fields: Vec<String> = metric
        .required_fields
        .iter()
        .filter(|field| !available.contains(field))
        .cloned()
        .collect();

    let state = if missing_fields.is_empty() {
        MetricState::Active
    } else if missing_fields.len() == metric.required_fields.len() {
        MetricState::Blocked
    } else {
        MetricState::Estimated
    };

    debug!(
        metric = %metric.id,
        state = state.label(),
        missing = missing_fields.len(),
        "classified metric coverage"
    );

    MetricCoverage {
        metric_id: metric.id.clone(),
        category: metric.category.clone(),
        state,
        missing_fields,
        required_count: metric.required_fields.len(),
        source_labels: metric.source_labels.clone(),
    }
}

/// Stateless classifier resolving every catalog entry against one data snapshot.
pub struct CoverageClassifier;

impl CoverageClassifier {
    pub fn classify(metric: &MetricDefinition, available: &AvailableDataSet) -> MetricCoverage {
        classify(metric, available)
    }

    pub fn classify_all(
        catalog: &MetricCatalog,
        available: &AvailableDataSet,
    ) -> Vec<MetricCoverage> {
        catalog
            .get_all()
            .iter()
            .map(|metric| classify(metric, available))
            .collect()
    }
}

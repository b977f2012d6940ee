use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Identifier wrapper for catalog metrics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricId(pub String);

impl MetricId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Caller-defined grouping label (market, pricing, operations, ...). Opaque to the engine.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricCategory(pub String);

impl MetricCategory {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Static description of one displayed metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefinition {
    pub id: MetricId,
    pub category: MetricCategory,
    /// Relative weight; normalized at aggregation time.
    pub weight: f64,
    #[serde(default)]
    pub required_fields: BTreeSet<String>,
    #[serde(default)]
    pub source_labels: Vec<String>,
}

impl MetricDefinition {
    pub fn new(id: &str, category: &str, weight: f64) -> Self {
        Self {
            id: MetricId::new(id),
            category: MetricCategory::new(category),
            weight,
            required_fields: BTreeSet::new(),
            source_labels: Vec::new(),
        }
    }

    pub fn requiring<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields
            .extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn sourced_from<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_labels.extend(labels.into_iter().map(Into::into));
        self
    }
}

/// Field identifiers currently known for one business at one point in time.
///
/// Unknown field names are simply absent; there is no schema validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailableDataSet(BTreeSet<String>);

impl AvailableDataSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

    pub fn with(mut self, field: impl Into<String>) -> Self {
        self.0.insert(field.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for AvailableDataSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Best-effort numeric value for one metric. `None` means nothing could be derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubScore {
    pub metric_id: MetricId,
    pub value: Option<f64>,
}

impl SubScore {
    pub fn known(metric_id: &str, value: f64) -> Self {
        Self {
            metric_id: MetricId::new(metric_id),
            value: Some(value),
        }
    }

    pub fn unknown(metric_id: &str) -> Self {
        Self {
            metric_id: MetricId::new(metric_id),
            value: None,
        }
    }

    /// Numeric value clamped into `[0, 100]`; non-finite values count as unknown.
    pub(crate) fn usable_value(&self) -> Option<f64> {
        self.value
            .filter(|value| value.is_finite())
            .map(|value| value.clamp(0.0, 100.0))
    }
}

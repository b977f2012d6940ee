use super::catalog::MetricCatalog;
use super::domain::{MetricCategory, MetricDefinition, MetricId, SubScore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Weighted summary of all sub-scores with its data coverage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeScore {
    pub value: u8,
    pub coverage_percent: u8,
    pub is_estimated: bool,
}

impl CompositeScore {
    pub fn label(&self) -> ScoreLabel {
        ScoreLabel::from_score(self.value)
    }
}

/// Presentation band for a 0-100 score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Mediocre,
    Critical,
}

impl ScoreLabel {
    pub const fn from_score(score: u8) -> Self {
        if score >= 75 {
            Self::Excellent
        } else if score >= 60 {
            Self::Good
        } else if score >= 40 {
            Self::Mediocre
        } else {
            Self::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Mediocre => "mediocre",
            Self::Critical => "critical",
        }
    }
}

/// Composite health for the metrics of a single category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryHealth {
    pub category: MetricCategory,
    pub score: CompositeScore,
    pub label: ScoreLabel,
}

/// Composite and per-category health computed from a single pass over the sub-scores.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthSummary {
    pub composite: CompositeScore,
    pub categories: Vec<CategoryHealth>,
}

/// Folds sub-scores into a composite, renormalizing over the metrics that carry a value.
///
/// Sub-scores whose metric is not in `definitions` are ignored. When the same metric
/// appears more than once the first entry with a usable value counts.
pub fn aggregate(sub_scores: &[SubScore], definitions: &[MetricDefinition]) -> CompositeScore {
    let index = index_definitions(definitions);
    fold(&join(sub_scores, &index))
}

type DefinitionIndex<'a> = HashMap<&'a MetricId, &'a MetricDefinition>;
type Joined<'a> = Vec<(&'a SubScore, &'a MetricDefinition)>;

fn index_definitions(definitions: &[MetricDefinition]) -> DefinitionIndex<'_> {
    definitions
        .iter()
        .map(|definition| (&definition.id, definition))
        .collect()
}

fn join<'a>(sub_scores: &'a [SubScore], index: &DefinitionIndex<'a>) -> Joined<'a> {
    let mut positions: HashMap<&MetricId, usize> = HashMap::new();
    let mut joined: Joined<'a> = Vec::with_capacity(sub_scores.len());

    for sub_score in sub_scores {
        let Some(&definition) = index.get(&sub_score.metric_id) else {
            warn!(metric = %sub_score.metric_id, "ignoring sub-score for unknown metric");
            continue;
        };
        match positions.get(&sub_score.metric_id).copied() {
            None => {
                positions.insert(&sub_score.metric_id, joined.len());
                joined.push((sub_score, definition));
            }
            Some(position) => {
                warn!(metric = %sub_score.metric_id, "ignoring duplicate sub-score");
                // A null entry never hides a later value for the same metric.
                if joined[position].0.usable_value().is_none()
                    && sub_score.usable_value().is_some()
                {
                    joined[position].0 = sub_score;
                }
            }
        }
    }

    joined
}

fn fold(joined: &[(&SubScore, &MetricDefinition)]) -> CompositeScore {
    let total = joined.len();
    let mut known = 0usize;
    let mut total_weight = 0.0_f64;
    let mut weighted_sum = 0.0_f64;

    for &(sub_score, definition) in joined {
        if let Some(value) = sub_score.usable_value() {
            known += 1;
            total_weight += definition.weight;
            weighted_sum += definition.weight * value;
        }
    }

    let coverage_percent = if total == 0 {
        0
    } else {
        round_percent(100.0 * known as f64 / total as f64)
    };

    if known == 0 || total_weight <= 0.0 {
        return CompositeScore {
            value: 0,
            coverage_percent,
            is_estimated: true,
        };
    }

    CompositeScore {
        value: round_percent(weighted_sum / total_weight),
        coverage_percent,
        is_estimated: coverage_percent < 100,
    }
}

fn fold_by_category(joined: &[(&SubScore, &MetricDefinition)]) -> Vec<CategoryHealth> {
    let mut grouped: BTreeMap<&MetricCategory, Vec<(&SubScore, &MetricDefinition)>> =
        BTreeMap::new();
    for &entry in joined {
        grouped.entry(&entry.1.category).or_default().push(entry);
    }

    grouped
        .into_iter()
        .map(|(category, entries)| {
            let score = fold(&entries);
            CategoryHealth {
                category: category.clone(),
                label: score.label(),
                score,
            }
        })
        .collect()
}

/// Rounds a 0-100 value to the nearest integer, halves rounding up.
///
/// Ratios of fractional weights land a few ulps below an exact half, so the
/// value is nudged by `ROUNDING_SLACK` before rounding.
pub(crate) fn round_percent(value: f64) -> u8 {
    (value + ROUNDING_SLACK).round().clamp(0.0, 100.0) as u8
}

const ROUNDING_SLACK: f64 = 1e-9;

/// Catalog-backed aggregator used by the dashboard.
pub struct HealthAggregator<'a> {
    index: DefinitionIndex<'a>,
}

impl<'a> HealthAggregator<'a> {
    pub fn new(catalog: &'a MetricCatalog) -> Self {
        Self {
            index: index_definitions(catalog.get_all()),
        }
    }

    pub fn aggregate(&self, sub_scores: &[SubScore]) -> CompositeScore {
        fold(&join(sub_scores, &self.index))
    }

    /// Runs the same aggregation independently for each catalog category, in sorted order.
    pub fn by_category(&self, sub_scores: &[SubScore]) -> Vec<CategoryHealth> {
        fold_by_category(&join(sub_scores, &self.index))
    }

    /// Composite and category breakdown sharing one join of the sub-scores.
    pub fn summarize(&self, sub_scores: &[SubScore]) -> HealthSummary {
        let joined = join(sub_scores, &self.index);
        HealthSummary {
            composite: fold(&joined),
            categories: fold_by_category(&joined),
        }
    }
}

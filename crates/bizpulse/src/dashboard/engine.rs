use crate::config::ScoringConfig;
use crate::scoring::{
    next_questions, AvailableDataSet, CatalogError, CategoryHealth, CompositeScore,
    CoverageClassifier, DiagnosticQuestion, HealthAggregator, HealthSummary, MetricCatalog,
    MetricCoverage, PrecisionMode, PrecisionScore, PrecisionTracker, QuestionCatalog, ScoreLabel,
    SubScore, TrendEvaluator, TrendPolicy, TrendResult,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

const DEFAULT_NEXT_QUESTION_LIMIT: usize = 3;

/// Identifier wrapper for the business a dashboard belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessId(pub String);

impl BusinessId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusinessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

/// Immutable engine configuration, constructed once at boot and injected.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub metrics: MetricCatalog,
    pub questions: QuestionCatalog,
    pub trend: TrendPolicy,
    pub precision_mode: PrecisionMode,
    pub next_question_limit: usize,
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            metrics: MetricCatalog::standard(),
            questions: QuestionCatalog::standard(),
            trend: TrendPolicy::default(),
            precision_mode: PrecisionMode::default(),
            next_question_limit: DEFAULT_NEXT_QUESTION_LIMIT,
        }
    }

    /// Loads the configured catalogs, falling back to the built-in tables.
    pub fn load(config: &ScoringConfig) -> Result<Self, CatalogError> {
        let metrics = match &config.metric_catalog {
            Some(path) => MetricCatalog::from_json_path(path)?,
            None => MetricCatalog::standard(),
        };
        let questions = match &config.question_catalog {
            Some(path) => QuestionCatalog::from_csv_path(path)?,
            None => QuestionCatalog::standard(),
        };

        Ok(Self {
            metrics,
            questions,
            trend: TrendPolicy {
                dead_zone: config.trend_dead_zone,
            },
            precision_mode: PrecisionMode::default(),
            next_question_limit: DEFAULT_NEXT_QUESTION_LIMIT,
        })
    }
}

/// Everything the host application knows about one business right now.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessSnapshot {
    #[serde(default)]
    pub vertical: Option<String>,
    #[serde(default)]
    pub available: AvailableDataSet,
    #[serde(default)]
    pub sub_scores: Vec<SubScore>,
    #[serde(default)]
    pub answered_questions: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub composite: CompositeScore,
    pub score_label: ScoreLabel,
    pub metrics: Vec<MetricCoverage>,
    pub categories: Vec<CategoryHealth>,
    pub precision: PrecisionScore,
    pub next_questions: Vec<DiagnosticQuestion>,
    pub trend: TrendResult,
}

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("no diagnostic questions are configured for vertical '{0}'")]
    UnknownVertical(String),
}

/// Stateless facade running the full scoring pipeline for one snapshot.
pub struct DashboardEngine {
    config: EngineConfig,
    precision: PrecisionTracker,
    trend: TrendEvaluator,
}

impl DashboardEngine {
    pub fn new(config: EngineConfig) -> Self {
        let precision = PrecisionTracker::new(config.precision_mode);
        let trend = TrendEvaluator::new(config.trend);
        Self {
            config,
            precision,
            trend,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn coverage(&self, available: &AvailableDataSet) -> Vec<MetricCoverage> {
        CoverageClassifier::classify_all(&self.config.metrics, available)
    }

    pub fn precision(&self, questions: &[DiagnosticQuestion]) -> PrecisionScore {
        self.precision.precision(questions)
    }

    pub fn trend(&self, current: u8, previous: Option<u8>) -> TrendResult {
        self.trend.trend(current, previous)
    }

    pub fn evaluate(
        &self,
        snapshot: &BusinessSnapshot,
        previous: Option<u8>,
    ) -> Result<DashboardReport, DashboardError> {
        let questions = match snapshot.vertical.as_deref() {
            Some(vertical) => self
                .config
                .questions
                .questions_for(vertical, &snapshot.answered_questions)
                .ok_or_else(|| DashboardError::UnknownVertical(vertical.to_string()))?,
            None => Vec::new(),
        };

        let metrics = self.coverage(&snapshot.available);
        let HealthSummary {
            composite,
            categories,
        } = HealthAggregator::new(&self.config.metrics).summarize(&snapshot.sub_scores);
        let precision = self.precision(&questions);
        let next_questions = next_questions(&questions, self.config.next_question_limit)
            .into_iter()
            .cloned()
            .collect();
        let trend = self.trend(composite.value, previous);

        debug!(
            composite = composite.value,
            coverage = composite.coverage_percent,
            precision = precision.value,
            trend = trend.direction.label(),
            "evaluated dashboard snapshot"
        );

        Ok(DashboardReport {
            composite,
            score_label: composite.label(),
            metrics,
            categories,
            precision,
            next_questions,
            trend,
        })
    }
}

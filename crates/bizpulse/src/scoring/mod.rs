//! Metric coverage and health scoring.
//!
//! Every computation here is a pure function over immutable inputs. Catalogs are
//! validated once when they are built; after that nothing in this module fails.

pub mod catalog;
pub mod coverage;
pub mod domain;
pub mod health;
pub mod precision;
pub mod trend;

pub use catalog::{CatalogError, MetricCatalog};
pub use coverage::{classify, CoverageClassifier, MetricCoverage, MetricState};
pub use domain::{AvailableDataSet, MetricCategory, MetricDefinition, MetricId, SubScore};
pub use health::{
    aggregate, CategoryHealth, CompositeScore, HealthAggregator, HealthSummary, ScoreLabel,
};
pub use precision::{
    next_questions, precision, DiagnosticQuestion, PrecisionLevel, PrecisionMode, PrecisionScore,
    PrecisionTracker, QuestionCatalog, QuestionTemplate,
};
pub use trend::{trend, TrendDirection, TrendEvaluator, TrendPolicy, TrendResult};

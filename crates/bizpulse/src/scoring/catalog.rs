use super::domain::{MetricCategory, MetricDefinition, MetricId};
use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::info;

/// Load-time failures for metric and question catalogs.
///
/// These are fatal at startup; nothing in the query path returns them.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("metric '{id}' has non-positive weight {weight}")]
    NonPositiveWeight { id: String, weight: f64 },
    #[error("metric '{0}' is defined more than once")]
    DuplicateMetric(String),
    #[error("metric definition with empty id")]
    EmptyMetricId,
    #[error("question '{id}' in vertical '{vertical}' has non-positive impact weight {weight}")]
    NonPositiveImpact {
        vertical: String,
        id: String,
        weight: f64,
    },
    #[error("question '{id}' is defined more than once for vertical '{vertical}'")]
    DuplicateQuestion { vertical: String, id: String },
    #[error("unable to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed metric catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed question catalog: {0}")]
    Csv(#[from] csv::Error),
}

/// Immutable registry of metric definitions, built once at boot.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    metrics: Vec<MetricDefinition>,
}

impl MetricCatalog {
    pub fn from_definitions(metrics: Vec<MetricDefinition>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for metric in &metrics {
            if metric.id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyMetricId);
            }
            if !(metric.weight.is_finite() && metric.weight > 0.0) {
                return Err(CatalogError::NonPositiveWeight {
                    id: metric.id.0.clone(),
                    weight: metric.weight,
                });
            }
            if !seen.insert(metric.id.clone()) {
                return Err(CatalogError::DuplicateMetric(metric.id.0.clone()));
            }
        }

        Ok(Self { metrics })
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let metrics: Vec<MetricDefinition> = serde_json::from_reader(reader)?;
        Self::from_definitions(metrics)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_json_reader(BufReader::new(file))?;
        info!(path = %path.display(), metrics = catalog.len(), "loaded metric catalog");
        Ok(catalog)
    }

    pub fn standard() -> Self {
        Self {
            metrics: standard_metrics(),
        }
    }

    pub fn get_all(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn get_by_category(&self, category: &MetricCategory) -> Vec<&MetricDefinition> {
        self.metrics
            .iter()
            .filter(|metric| &metric.category == category)
            .collect()
    }

    pub fn get(&self, id: &MetricId) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|metric| &metric.id == id)
    }

    pub fn categories(&self) -> Vec<MetricCategory> {
        self.metrics
            .iter()
            .map(|metric| metric.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

fn standard_metrics() -> Vec<MetricDefinition> {
    vec![
        MetricDefinition::new("market_share", "market", 2.0)
            .requiring(["competitorCount", "localDemand"])
            .sourced_from(["Google Maps", "Market survey"]),
        MetricDefinition::new("foot_traffic", "market", 1.0)
            .requiring(["dailyVisitors"])
            .sourced_from(["POS check-in"]),
        MetricDefinition::new("ticket_average", "pricing", 2.0)
            .requiring(["monthlyRevenue", "monthlyTransactions"])
            .sourced_from(["POS", "Manual check-in"]),
        MetricDefinition::new("price_position", "pricing", 1.5)
            .requiring(["ticketAverage", "competitorPrices"])
            .sourced_from(["Menu upload", "Competitor scan"]),
        MetricDefinition::new("capacity_utilization", "operations", 1.5)
            .requiring(["capacity", "dailyVisitors"])
            .sourced_from(["Business profile", "POS check-in"]),
        MetricDefinition::new("staff_productivity", "operations", 1.0)
            .requiring(["staffCount", "monthlyRevenue"])
            .sourced_from(["Payroll", "POS"]),
        MetricDefinition::new("rating", "reputation", 3.0)
            .requiring(["rating", "reviewCount"])
            .sourced_from(["Google Business Profile", "TripAdvisor"]),
        MetricDefinition::new("review_response_rate", "reputation", 1.0)
            .requiring(["reviewCount", "respondedReviews"])
            .sourced_from(["Google Business Profile"]),
        MetricDefinition::new("revenue_growth", "sales", 2.5)
            .requiring(["monthlyRevenue", "previousMonthlyRevenue"])
            .sourced_from(["POS", "Accounting export"]),
        MetricDefinition::new("repeat_customers", "sales", 1.5)
            .requiring(["repeatCustomerRate"])
            .sourced_from(["Loyalty program"]),
    ]
}

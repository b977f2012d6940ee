use super::DiagnosticQuestion;
use crate::scoring::catalog::CatalogError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Static question metadata for one business vertical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionTemplate {
    pub vertical: String,
    pub id: String,
    pub impact_weight: f64,
    #[serde(default)]
    pub prompt: String,
}

impl QuestionTemplate {
    fn new(vertical: &str, id: &str, impact_weight: f64, prompt: &str) -> Self {
        Self {
            vertical: vertical.to_string(),
            id: id.to_string(),
            impact_weight,
            prompt: prompt.to_string(),
        }
    }
}

/// Per-vertical question tables, keyed by vertical name.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    by_vertical: BTreeMap<String, Vec<QuestionTemplate>>,
}

impl QuestionCatalog {
    pub fn from_templates(templates: Vec<QuestionTemplate>) -> Result<Self, CatalogError> {
        let mut by_vertical: BTreeMap<String, Vec<QuestionTemplate>> = BTreeMap::new();

        for template in templates {
            if !(template.impact_weight.is_finite() && template.impact_weight > 0.0) {
                return Err(CatalogError::NonPositiveImpact {
                    vertical: template.vertical,
                    id: template.id,
                    weight: template.impact_weight,
                });
            }

            let entries = by_vertical.entry(template.vertical.clone()).or_default();
            if entries.iter().any(|existing| existing.id == template.id) {
                return Err(CatalogError::DuplicateQuestion {
                    vertical: template.vertical,
                    id: template.id,
                });
            }
            entries.push(template);
        }

        Ok(Self { by_vertical })
    }

    /// Reads `vertical,id,impact_weight,prompt` rows.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut templates = Vec::new();
        for record in csv_reader.deserialize::<QuestionTemplate>() {
            templates.push(record?);
        }

        Self::from_templates(templates)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path)?;
        let catalog = Self::from_csv_reader(file)?;
        info!(
            path = %path.display(),
            verticals = catalog.by_vertical.len(),
            "loaded diagnostic question catalog"
        );
        Ok(catalog)
    }

    pub fn standard() -> Self {
        let mut by_vertical: BTreeMap<String, Vec<QuestionTemplate>> = BTreeMap::new();
        for template in standard_templates() {
            by_vertical
                .entry(template.vertical.clone())
                .or_default()
                .push(template);
        }
        Self { by_vertical }
    }

    pub fn verticals(&self) -> Vec<&str> {
        self.by_vertical.keys().map(String::as_str).collect()
    }

    pub fn templates_for(&self, vertical: &str) -> Option<&[QuestionTemplate]> {
        self.by_vertical.get(vertical).map(Vec::as_slice)
    }

    /// Resolves the vertical's questions against the ids a business has answered.
    pub fn questions_for(
        &self,
        vertical: &str,
        answered: &BTreeSet<String>,
    ) -> Option<Vec<DiagnosticQuestion>> {
        self.templates_for(vertical).map(|templates| {
            templates
                .iter()
                .map(|template| DiagnosticQuestion {
                    id: template.id.clone(),
                    impact_weight: template.impact_weight,
                    answered: answered.contains(&template.id),
                })
                .collect()
        })
    }
}

fn standard_templates() -> Vec<QuestionTemplate> {
    vec![
        QuestionTemplate::new("restaurant", "seating_capacity", 2.0, "How many covers can you seat at once?"),
        QuestionTemplate::new("restaurant", "average_ticket", 3.0, "What is the average spend per table?"),
        QuestionTemplate::new("restaurant", "peak_hours", 1.0, "Which service hours are busiest?"),
        QuestionTemplate::new("restaurant", "delivery_share", 1.5, "What share of orders comes through delivery apps?"),
        QuestionTemplate::new("restaurant", "menu_price_review", 1.0, "When did you last review menu prices?"),
        QuestionTemplate::new("retail", "monthly_revenue", 3.0, "What was last month's revenue?"),
        QuestionTemplate::new("retail", "inventory_turnover", 2.0, "How often does your inventory turn over?"),
        QuestionTemplate::new("retail", "loyalty_program", 1.0, "Do you run a loyalty program?"),
        QuestionTemplate::new("retail", "online_channel", 1.5, "Do you sell through an online store?"),
        QuestionTemplate::new("services", "booking_channel", 2.0, "How do clients book appointments?"),
        QuestionTemplate::new("services", "no_show_rate", 2.0, "What share of appointments are no-shows?"),
        QuestionTemplate::new("services", "staff_count", 1.0, "How many professionals attend clients?"),
        QuestionTemplate::new("services", "repeat_clients", 3.0, "What share of clients return within 90 days?"),
    ]
}

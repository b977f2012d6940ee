mod questions;

pub use questions::{QuestionCatalog, QuestionTemplate};

use super::health::round_percent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One onboarding/diagnostic question with its answered flag for a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticQuestion {
    pub id: String,
    pub impact_weight: f64,
    pub answered: bool,
}

impl DiagnosticQuestion {
    pub fn new(id: &str, impact_weight: f64, answered: bool) -> Self {
        Self {
            id: id.to_string(),
            impact_weight,
            answered,
        }
    }

    // Catalog loading rejects bad weights; ad-hoc input falls back to a neutral weight.
    fn effective_weight(&self) -> f64 {
        if self.impact_weight.is_finite() && self.impact_weight > 0.0 {
            self.impact_weight
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionLevel {
    Basica,
    Media,
    Alta,
}

impl PrecisionLevel {
    pub const fn from_value(value: u8) -> Self {
        if value >= 80 {
            Self::Alta
        } else if value >= 50 {
            Self::Media
        } else {
            Self::Basica
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Basica => "Básica",
            Self::Media => "Media",
            Self::Alta => "Alta",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecisionScore {
    pub value: u8,
    pub level: PrecisionLevel,
}

impl PrecisionScore {
    fn from_value(value: u8) -> Self {
        Self {
            value,
            level: PrecisionLevel::from_value(value),
        }
    }
}

/// How answered questions are counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionMode {
    /// Weighted when impact weights differ, plain count when they are all equal.
    #[default]
    Auto,
    Unweighted,
    Weighted,
}

#[derive(Debug, Clone, Default)]
pub struct PrecisionTracker {
    mode: PrecisionMode,
}

impl PrecisionTracker {
    pub fn new(mode: PrecisionMode) -> Self {
        Self { mode }
    }

    pub fn precision(&self, questions: &[DiagnosticQuestion]) -> PrecisionScore {
        if questions.is_empty() {
            return PrecisionScore::from_value(100);
        }

        let weighted = match self.mode {
            PrecisionMode::Unweighted => false,
            PrecisionMode::Weighted => true,
            PrecisionMode::Auto => weights_vary(questions),
        };

        let value = if weighted {
            let total: f64 = questions.iter().map(DiagnosticQuestion::effective_weight).sum();
            let answered: f64 = questions
                .iter()
                .filter(|question| question.answered)
                .map(DiagnosticQuestion::effective_weight)
                .sum();
            round_percent(100.0 * answered / total)
        } else {
            let answered = questions.iter().filter(|question| question.answered).count();
            round_percent(100.0 * answered as f64 / questions.len() as f64)
        };

        PrecisionScore::from_value(value)
    }
}

pub fn precision(questions: &[DiagnosticQuestion]) -> PrecisionScore {
    PrecisionTracker::default().precision(questions)
}

fn weights_vary(questions: &[DiagnosticQuestion]) -> bool {
    let mut weights = questions.iter().map(DiagnosticQuestion::effective_weight);
    let Some(first) = weights.next() else {
        return false;
    };
    weights.any(|weight| (weight - first).abs() > 1e-9)
}

/// Unanswered questions with the highest impact first; equal impact falls back to id order.
pub fn next_questions(questions: &[DiagnosticQuestion], limit: usize) -> Vec<&DiagnosticQuestion> {
    let mut pending: Vec<&DiagnosticQuestion> = questions
        .iter()
        .filter(|question| !question.answered)
        .collect();

    pending.sort_by(|left, right| {
        match right.effective_weight().total_cmp(&left.effective_weight()) {
            Ordering::Equal => left.id.cmp(&right.id),
            other => other,
        }
    });
    pending.truncate(limit);
    pending
}

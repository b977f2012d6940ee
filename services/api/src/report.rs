use bizpulse::config::AppConfig;
use bizpulse::dashboard::{BusinessSnapshot, DashboardEngine, DashboardReport, EngineConfig};
use bizpulse::error::AppError;
use bizpulse::scoring::{MetricCategory, MetricState};
use chrono::Local;
use clap::Args;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// JSON file describing the business snapshot to score
    #[arg(long)]
    pub(crate) snapshot: PathBuf,
    /// Previously recorded composite score, for the trend line
    #[arg(long)]
    pub(crate) previous: Option<u8>,
    /// Emit the full report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// Only list metrics in this category
    #[arg(long)]
    pub(crate) category: Option<String>,
}

fn load_engine() -> Result<DashboardEngine, AppError> {
    let config = AppConfig::load()?;
    let engine_config = EngineConfig::load(&config.scoring)?;
    Ok(DashboardEngine::new(engine_config))
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let ReportArgs {
        snapshot,
        previous,
        json,
    } = args;

    let engine = load_engine()?;
    let reader = BufReader::new(File::open(&snapshot)?);
    let snapshot: BusinessSnapshot = serde_json::from_reader(reader)?;
    let report = engine.evaluate(&snapshot, previous)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Business health report ({})", Local::now().format("%Y-%m-%d %H:%M"));
        print!("{}", render_report(&report));
    }

    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let engine = load_engine()?;
    let catalog = &engine.config().metrics;

    let metrics = match args.category {
        Some(category) => catalog.get_by_category(&MetricCategory::new(category)),
        None => catalog.get_all().iter().collect(),
    };

    for metric in metrics {
        let fields: Vec<&str> = metric.required_fields.iter().map(String::as_str).collect();
        println!(
            "{:<22} {:<12} weight {:>4.1}  requires [{}]",
            metric.id,
            metric.category,
            metric.weight,
            fields.join(", ")
        );
    }

    Ok(())
}

/// Plain-text dashboard used by the `report` command.
pub fn render_report(report: &DashboardReport) -> String {
    let mut lines = Vec::new();

    let estimated = if report.composite.is_estimated {
        " (estimated)"
    } else {
        ""
    };
    lines.push(format!(
        "Health score: {}/100 [{}]{} | data coverage {}%",
        report.composite.value,
        report.score_label.label(),
        estimated,
        report.composite.coverage_percent
    ));
    lines.push(format!(
        "Trend: {} ({})",
        report.trend.direction.label(),
        report.trend.magnitude
    ));
    lines.push(format!(
        "Precision: {}% ({})",
        report.precision.value,
        report.precision.level.label()
    ));

    if !report.categories.is_empty() {
        lines.push("Categories:".to_string());
        for category in &report.categories {
            lines.push(format!(
                "  - {}: {} [{}] coverage {}%",
                category.category,
                category.score.value,
                category.label.label(),
                category.score.coverage_percent
            ));
        }
    }

    let gaps: Vec<_> = report
        .metrics
        .iter()
        .filter(|coverage| coverage.state != MetricState::Active)
        .collect();
    if !gaps.is_empty() {
        lines.push("Data gaps:".to_string());
        for coverage in gaps {
            lines.push(format!(
                "  - {} [{}] missing {}",
                coverage.metric_id,
                coverage.state.label(),
                coverage.missing_fields.join(", ")
            ));
        }
    }

    if !report.next_questions.is_empty() {
        let ids: Vec<&str> = report
            .next_questions
            .iter()
            .map(|question| question.id.as_str())
            .collect();
        lines.push(format!("Answer next: {}", ids.join(", ")));
    }

    let mut rendered = lines.join("\n");
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizpulse::scoring::SubScore;

    #[test]
    fn render_lists_gaps_and_next_questions() {
        let engine = DashboardEngine::new(EngineConfig::standard());
        let snapshot = BusinessSnapshot {
            vertical: Some("services".to_string()),
            available: ["rating", "reviewCount"].into_iter().collect(),
            sub_scores: vec![SubScore::known("rating", 50.0), SubScore::unknown("foot_traffic")],
            answered_questions: Default::default(),
        };
        let report = engine.evaluate(&snapshot, Some(40)).expect("services vertical");

        let rendered = render_report(&report);
        assert!(rendered.contains("Health score: 50/100 [mediocre] (estimated) | data coverage 50%"));
        assert!(rendered.contains("Trend: up (10)"));
        assert!(rendered.contains("Precision: 0% (Básica)"));
        assert!(rendered.contains("  - foot_traffic [blocked] missing dailyVisitors"));
        assert!(!rendered.contains("  - rating ["));
        assert!(rendered.contains("Answer next: repeat_clients, booking_channel, no_show_rate"));
    }
}

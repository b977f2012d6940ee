use bizpulse::scoring::{
    aggregate, classify, precision, trend, AvailableDataSet, DiagnosticQuestion,
    MetricDefinition, MetricState, PrecisionLevel, ScoreLabel, SubScore, TrendDirection,
};
use proptest::prelude::*;

fn questions(total: usize, answered: usize) -> Vec<DiagnosticQuestion> {
    (0..total)
        .map(|index| DiagnosticQuestion::new(&format!("q{index}"), 1.0, index < answered))
        .collect()
}

#[test]
fn blocked_when_no_required_field_is_known() {
    let metric = MetricDefinition::new("rating", "reputation", 1.0).requiring(["rating"]);

    let coverage = classify(&metric, &AvailableDataSet::new());

    assert_eq!(coverage.state, MetricState::Blocked);
    assert_eq!(coverage.missing_fields, vec!["rating".to_string()]);
}

#[test]
fn estimated_when_some_required_fields_are_known() {
    let metric =
        MetricDefinition::new("rating", "reputation", 1.0).requiring(["rating", "reviewCount"]);
    let available = AvailableDataSet::new().with("rating");

    let coverage = classify(&metric, &available);

    assert_eq!(coverage.state, MetricState::Estimated);
    assert_eq!(coverage.missing_fields, vec!["reviewCount".to_string()]);
}

#[test]
fn metric_without_requirements_is_always_active() {
    let metric = MetricDefinition::new("brand_awareness", "market", 1.0);

    let coverage = classify(&metric, &AvailableDataSet::new());

    assert_eq!(coverage.state, MetricState::Active);
    assert!(coverage.missing_fields.is_empty());
}

#[test]
fn null_sub_score_is_renormalized_away() {
    let definitions = vec![
        MetricDefinition::new("a", "market", 1.0),
        MetricDefinition::new("b", "market", 1.0),
    ];
    let sub_scores = vec![SubScore::known("a", 80.0), SubScore::unknown("b")];

    let composite = aggregate(&sub_scores, &definitions);

    assert_eq!(composite.value, 80);
    assert_eq!(composite.coverage_percent, 50);
    assert!(composite.is_estimated);
    assert_eq!(composite.label(), ScoreLabel::Excellent);
}

#[test]
fn eight_of_ten_answered_is_alta() {
    let score = precision(&questions(10, 8));

    assert_eq!(score.value, 80);
    assert_eq!(score.level, PrecisionLevel::Alta);
}

#[test]
fn trend_dead_zone_boundaries() {
    assert_eq!(trend(61, Some(60)).direction, TrendDirection::Stable);

    let up = trend(64, Some(60));
    assert_eq!(up.direction, TrendDirection::Up);
    assert_eq!(up.magnitude, 4);

    let down = trend(57, Some(60));
    assert_eq!(down.direction, TrendDirection::Down);
    assert_eq!(down.magnitude, 3);

    let first = trend(70, None);
    assert_eq!(first.direction, TrendDirection::Stable);
    assert_eq!(first.magnitude, 0);
}

proptest! {
    #[test]
    fn composite_stays_within_known_sub_score_range(
        values in prop::collection::vec(prop::option::of(0.0f64..=100.0), 1..8),
        weights in prop::collection::vec(0.1f64..10.0, 8),
    ) {
        let definitions: Vec<MetricDefinition> = values
            .iter()
            .enumerate()
            .map(|(index, _)| MetricDefinition::new(&format!("m{index}"), "market", weights[index]))
            .collect();
        let sub_scores: Vec<SubScore> = values
            .iter()
            .enumerate()
            .map(|(index, value)| SubScore {
                metric_id: definitions[index].id.clone(),
                value: *value,
            })
            .collect();

        let composite = aggregate(&sub_scores, &definitions);
        let known: Vec<f64> = values.iter().flatten().copied().collect();

        if known.is_empty() {
            prop_assert_eq!(composite.value, 0);
            prop_assert_eq!(composite.coverage_percent, 0);
        } else {
            let low = known.iter().copied().fold(f64::INFINITY, f64::min).floor() as u8;
            let high = known.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil() as u8;
            prop_assert!(composite.value >= low && composite.value <= high);
        }
        prop_assert!(composite.coverage_percent <= 100);
    }

    #[test]
    fn precision_level_tracks_value(total in 1usize..40, answered_share in 0.0f64..=1.0) {
        let answered = ((total as f64) * answered_share).floor() as usize;
        let score = precision(&questions(total, answered));

        let expected = if score.value >= 80 {
            PrecisionLevel::Alta
        } else if score.value >= 50 {
            PrecisionLevel::Media
        } else {
            PrecisionLevel::Basica
        };
        prop_assert_eq!(score.level, expected);
    }
}

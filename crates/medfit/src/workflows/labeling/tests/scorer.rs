use super::common::*;
use crate::workflows::labeling::{parse_relevance, FitScorer, IndustryLabel, RuleSet};

#[test]
fn risk_level_stays_within_bounds_for_every_input() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    for industry in all_industries() {
        for relevance in 0..=100u8 {
            let risk = scorer.score(relevance, industry).risk_level;
            assert!(
                (10..=90).contains(&risk),
                "risk {risk} out of range for {industry} at {relevance}"
            );
        }
    }
}

#[test]
fn hybrid_is_floor_of_mean() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    for relevance in 0..=100u8 {
        let scores = scorer.score(relevance, IndustryLabel::Unclassified);
        let expected = (u16::from(scores.side_job_fit) + u16::from(scores.career_shift_fit)) / 2;
        assert_eq!(u16::from(scores.hybrid_fit), expected);
    }
}

#[test]
fn side_job_and_career_shift_trend_in_opposite_directions() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    for low in 0..100u8 {
        let high = low + 1;
        let a = scorer.score(low, IndustryLabel::HealthIt);
        let b = scorer.score(high, IndustryLabel::HealthIt);
        assert!(a.side_job_fit <= b.side_job_fit);
        assert!(a.career_shift_fit >= b.career_shift_fit);
    }
}

#[test]
fn boundary_scores_select_the_higher_bucket() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    let at_85 = scorer.score(85, IndustryLabel::Unclassified);
    assert_eq!((at_85.side_job_fit, at_85.career_shift_fit), (90, 30));

    let at_84 = scorer.score(84, IndustryLabel::Unclassified);
    assert_eq!((at_84.side_job_fit, at_84.career_shift_fit), (75, 40));

    let at_15 = scorer.score(15, IndustryLabel::Unclassified);
    assert_eq!((at_15.side_job_fit, at_15.career_shift_fit), (45, 75));
    assert_eq!(at_15.hybrid_fit, 60);

    assert_eq!(scorer.score(80, IndustryLabel::Unclassified).learning_growth, 80);
    assert_eq!(scorer.score(79, IndustryLabel::Unclassified).learning_growth, 65);
    assert_eq!(scorer.score(19, IndustryLabel::Unclassified).learning_growth, 30);
}

#[test]
fn risk_applies_industry_base_and_relevance_shifts() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    assert_eq!(scorer.score(80, IndustryLabel::Unclassified).risk_level, 35);
    assert_eq!(scorer.score(79, IndustryLabel::Unclassified).risk_level, 45);
    assert_eq!(scorer.score(10, IndustryLabel::Unclassified).risk_level, 55);
    assert_eq!(scorer.score(50, IndustryLabel::MedicalDeviceMaker).risk_level, 40);
    assert_eq!(scorer.score(5, IndustryLabel::PharmaBio).risk_level, 60);
    assert_eq!(scorer.score(95, IndustryLabel::HealthIt).risk_level, 20);
}

#[test]
fn out_of_range_relevance_is_clamped() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);

    assert_eq!(
        scorer.score(250, IndustryLabel::PharmaBio),
        scorer.score(100, IndustryLabel::PharmaBio)
    );
}

#[test]
fn score_record_writes_fit_in_place() {
    let rules = RuleSet::standard();
    let scorer = FitScorer::new(&rules);
    let mut company = record(4, "Acme", "");
    company.relevance_score = 70;
    company.industry = IndustryLabel::HealthIt;

    let scores = scorer.score_record(&mut company);

    assert_eq!(company.fit, Some(scores));
    assert_eq!(scores.side_job_fit, 75);
    assert_eq!(scores.risk_level, 30);
}

#[test]
fn malformed_relevance_defaults_to_zero() {
    assert_eq!(parse_relevance(None), 0);
    assert_eq!(parse_relevance(Some("")), 0);
    assert_eq!(parse_relevance(Some("n/a")), 0);
    assert_eq!(parse_relevance(Some(" 42 ")), 42);
    assert_eq!(parse_relevance(Some("67.9")), 67);
    assert_eq!(parse_relevance(Some("-5")), 0);
    assert_eq!(parse_relevance(Some("180")), 100);
}

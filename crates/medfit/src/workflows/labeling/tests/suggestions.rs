use super::common::*;
use crate::workflows::labeling::{
    keyword_hints, promote_high_confidence, suggest_industries, token_frequency, CompanyId,
    IndustryLabel, ManualOverrides, RuleSet, DEFAULT_PROMOTION_THRESHOLD,
};

#[test]
fn suggestions_use_plurality_and_leave_unmatched_blank() {
    let rules = RuleSet::standard();
    let records = vec![
        record_with_keywords(1, "メディカル", &["介護", "在宅", "看護"], &[]),
        record(2, "Acme", "general trading"),
    ];

    let suggestions = suggest_industries(&records, &rules);

    assert_eq!(suggestions.len(), 2);
    assert_eq!(
        suggestions[0].suggested_industry,
        Some(IndustryLabel::CaregivingWelfare)
    );
    assert!((suggestions[0].confidence - 0.85).abs() < 1e-6);
    assert_eq!(suggestions[1].suggested_industry, None);
    assert_eq!(suggestions[1].confidence, 0.0);
}

#[test]
fn promotion_keeps_manual_entries_below_threshold() {
    let rules = RuleSet::standard();
    let records = vec![
        record_with_keywords(1, "Care", &["介護", "在宅", "看護"], &[]),
        record_with_keywords(2, "Lab", &["検査"], &[]),
        record(3, "Plain", "nothing here"),
    ];
    let suggestions = suggest_industries(&records, &rules);

    let mut existing = ManualOverrides::new();
    existing.insert(CompanyId(1), "Care", IndustryLabel::Nutrition);
    existing.insert(CompanyId(2), "Lab", IndustryLabel::PharmaBio);

    let promoted = promote_high_confidence(&suggestions, &existing, DEFAULT_PROMOTION_THRESHOLD);

    assert_eq!(promoted.get(CompanyId(1)), Some(IndustryLabel::CaregivingWelfare));
    assert_eq!(promoted.get(CompanyId(2)), Some(IndustryLabel::PharmaBio));
    assert_eq!(promoted.get(CompanyId(3)), None);
    assert_eq!(promoted.len(), 2);
}

#[test]
fn token_frequency_orders_by_count_then_first_seen() {
    let records = vec![
        record_with_keywords(1, "A", &["DX", " 介護 "], &["dx"]),
        record_with_keywords(2, "B", &["介護", "", "物流"], &[]),
    ];

    let frequency = token_frequency(&records);
    let tokens: Vec<(&str, usize)> = frequency
        .iter()
        .map(|entry| (entry.token.as_str(), entry.count))
        .collect();

    assert_eq!(tokens, vec![("dx", 2), ("介護", 2), ("物流", 1)]);
}

#[test]
fn hints_map_tokens_to_first_containing_rule() {
    let rules = RuleSet::standard();
    let records = vec![record_with_keywords(
        1,
        "A",
        &["医療データ基盤", "訪問介護", "unknown"],
        &[],
    )];

    let hints = keyword_hints(&token_frequency(&records), &rules);

    assert_eq!(hints.len(), 2);
    assert_eq!(hints[0].token, "医療データ基盤");
    assert_eq!(hints[0].suggested_industry, IndustryLabel::HealthIt);
    assert_eq!(hints[1].suggested_industry, IndustryLabel::CaregivingWelfare);
    assert_eq!(hints[1].to_rule().token, "訪問介護");
}

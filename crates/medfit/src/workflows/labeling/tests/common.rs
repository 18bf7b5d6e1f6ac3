use crate::workflows::labeling::domain::{CompanyRecord, IndustryLabel};
use crate::workflows::labeling::rules::{KeywordRule, RuleSet};

pub(super) fn record(id: u64, name: &str, description: &str) -> CompanyRecord {
    CompanyRecord::new(id, name, description)
}

pub(super) fn record_with_keywords(
    id: u64,
    name: &str,
    keywords: &[&str],
    domains: &[&str],
) -> CompanyRecord {
    let mut record = CompanyRecord::new(id, name, "");
    record.raw_keywords = keywords.iter().map(|value| value.to_string()).collect();
    record.raw_domains = domains.iter().map(|value| value.to_string()).collect();
    record
}

/// Small table where each label owns two tokens, for plurality scenarios.
pub(super) fn paired_rules() -> RuleSet {
    RuleSet::with_keyword_rules(
        "test-paired",
        vec![
            KeywordRule::new("alpha", IndustryLabel::HealthIt),
            KeywordRule::new("beta", IndustryLabel::PharmaBio),
            KeywordRule::new("gamma", IndustryLabel::PharmaBio),
            KeywordRule::new("delta", IndustryLabel::HealthIt),
        ],
    )
}

pub(super) fn all_industries() -> [IndustryLabel; 13] {
    IndustryLabel::ordered()
}

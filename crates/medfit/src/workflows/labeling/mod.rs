//! Keyword classification and threshold scoring of company records.
//!
//! Everything here is pure: the [`RuleSet`] is passed in explicitly, records
//! are plain values, and no function performs I/O or fails on bad data.

mod classifier;
pub mod domain;
pub mod profile;
pub mod rules;
mod scorer;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use classifier::{
    match_confidence, Classification, ClassificationSource, IndustryClassifier, MatchMode,
    UnknownMatchMode,
};
pub use domain::{CompanyId, CompanyRecord, FitScores, IndustryLabel, ManualOverrides, OverrideEntry};
pub use rules::{
    BucketTable, FitPair, IndustryRiskBase, KeywordRule, RiskPolicy, RuleSet, RuleSetError,
    ScoreBucket,
};
pub use scorer::{parse_relevance, FitScorer, MAX_RELEVANCE};
pub use suggestions::{
    keyword_hints, promote_high_confidence, suggest_industries, token_frequency, KeywordHint,
    Suggestion, TokenCount, DEFAULT_PROMOTION_THRESHOLD,
};

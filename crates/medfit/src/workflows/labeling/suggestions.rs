use super::classifier::{IndustryClassifier, MatchMode};
use super::domain::{CompanyId, CompanyRecord, IndustryLabel, ManualOverrides};
use super::rules::{KeywordRule, RuleSet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Suggestions at or above this confidence are promoted into the override table.
pub const DEFAULT_PROMOTION_THRESHOLD: f32 = 0.8;

/// Reviewable label proposal for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub company_id: CompanyId,
    pub company_name: String,
    pub suggested_industry: Option<IndustryLabel>,
    pub confidence: f32,
    #[serde(default)]
    pub note: String,
}

/// Runs the plurality classifier over every record, ignoring overrides.
pub fn suggest_industries(records: &[CompanyRecord], rule_set: &RuleSet) -> Vec<Suggestion> {
    let classifier = IndustryClassifier::new(rule_set, MatchMode::MostFrequent);
    records
        .iter()
        .map(|record| {
            let classification = classifier.classify_text(&record.classification_text());
            Suggestion {
                company_id: record.id,
                company_name: record.name.clone(),
                suggested_industry: (!classification.needs_review())
                    .then_some(classification.industry),
                confidence: classification.confidence,
                note: String::new(),
            }
        })
        .collect()
}

/// Builds the next override table: confident suggestions are forced, and
/// existing manual entries survive for companies without one.
pub fn promote_high_confidence(
    suggestions: &[Suggestion],
    existing: &ManualOverrides,
    threshold: f32,
) -> ManualOverrides {
    let mut promoted = ManualOverrides::new();

    for suggestion in suggestions {
        match suggestion.suggested_industry {
            Some(industry) if suggestion.confidence >= threshold => {
                promoted.insert(suggestion.company_id, suggestion.company_name.clone(), industry);
            }
            _ => {
                if let Some(entry) = existing.entry(suggestion.company_id) {
                    promoted.insert(
                        suggestion.company_id,
                        suggestion.company_name.clone(),
                        entry.industry,
                    );
                }
            }
        }
    }

    promoted
}

/// Occurrence count of one raw keyword or domain token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCount {
    pub token: String,
    pub count: usize,
}

/// Frequent token that contains a known rule token, proposed as a new rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHint {
    pub token: String,
    pub count: usize,
    pub suggested_industry: IndustryLabel,
}

impl KeywordHint {
    pub fn to_rule(&self) -> KeywordRule {
        KeywordRule::new(&self.token, self.suggested_industry)
    }
}

/// Counts trimmed, lowercased keyword and domain tokens. Sorted by count
/// descending, then by first appearance.
pub fn token_frequency(records: &[CompanyRecord]) -> Vec<TokenCount> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    let tokens = records.iter().flat_map(|record| {
        record
            .raw_keywords
            .iter()
            .chain(record.raw_domains.iter())
    });
    for raw in tokens {
        let token = raw.trim().to_lowercase();
        if token.is_empty() {
            continue;
        }
        let entry = counts.entry(token.clone()).or_insert(0);
        if *entry == 0 {
            order.push(token);
        }
        *entry += 1;
    }

    let mut frequency: Vec<TokenCount> = order
        .into_iter()
        .map(|token| {
            let count = counts.get(&token).copied().unwrap_or_default();
            TokenCount { token, count }
        })
        .collect();
    frequency.sort_by(|a, b| b.count.cmp(&a.count));
    frequency
}

/// Maps each frequent token to the first rule whose token it contains.
pub fn keyword_hints(frequency: &[TokenCount], rule_set: &RuleSet) -> Vec<KeywordHint> {
    frequency
        .iter()
        .filter_map(|entry| {
            rule_set
                .keyword_rules
                .iter()
                .find(|rule| rule.matches(&entry.token))
                .map(|rule| KeywordHint {
                    token: entry.token.clone(),
                    count: entry.count,
                    suggested_industry: rule.industry,
                })
        })
        .collect()
}

use super::domain::{CompanyRecord, IndustryLabel, ManualOverrides};
use super::rules::{KeywordRule, RuleSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How competing keyword hits are resolved into one label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// First matching rule in table order wins.
    #[default]
    FirstMatch,
    /// Plurality label across all matching rules; ties go to table order.
    MostFrequent,
}

impl MatchMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstMatch => "first-match",
            Self::MostFrequent => "most-frequent",
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMatchMode(pub String);

impl fmt::Display for UnknownMatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown match mode '{}' (expected 'first' or 'frequent')",
            self.0
        )
    }
}

impl std::error::Error for UnknownMatchMode {}

impl FromStr for MatchMode {
    type Err = UnknownMatchMode;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "first" | "first-match" => Ok(Self::FirstMatch),
            "frequent" | "most-frequent" | "plurality" => Ok(Self::MostFrequent),
            _ => Err(UnknownMatchMode(value.to_string())),
        }
    }
}

/// Where a label came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    ManualOverride,
    Keywords,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub industry: IndustryLabel,
    pub confidence: f32,
    pub matched_rules: usize,
    pub source: ClassificationSource,
}

impl Classification {
    pub const fn unmatched() -> Self {
        Self {
            industry: IndustryLabel::Unclassified,
            confidence: 0.0,
            matched_rules: 0,
            source: ClassificationSource::NoMatch,
        }
    }

    pub const fn forced(industry: IndustryLabel) -> Self {
        Self {
            industry,
            confidence: 1.0,
            matched_rules: 0,
            source: ClassificationSource::ManualOverride,
        }
    }

    /// Unmatched results are the signal for manual review.
    pub fn needs_review(&self) -> bool {
        self.source == ClassificationSource::NoMatch
    }
}

const CONFIDENCE_BASE: f32 = 0.4;
const CONFIDENCE_PER_MATCH: f32 = 0.15;
const CONFIDENCE_CAP: f32 = 0.95;

/// min(0.95, 0.4 + 0.15 × matches), rounded to two decimals.
pub fn match_confidence(matches: usize) -> f32 {
    if matches == 0 {
        return 0.0;
    }
    let raw = (CONFIDENCE_BASE + CONFIDENCE_PER_MATCH * matches as f32).min(CONFIDENCE_CAP);
    (raw * 100.0).round() / 100.0
}

/// Stateless keyword classifier over a borrowed rule table.
#[derive(Debug, Clone, Copy)]
pub struct IndustryClassifier<'a> {
    rules: &'a [KeywordRule],
    mode: MatchMode,
}

impl<'a> IndustryClassifier<'a> {
    pub fn new(rule_set: &'a RuleSet, mode: MatchMode) -> Self {
        Self::from_rules(&rule_set.keyword_rules, mode)
    }

    pub fn from_rules(rules: &'a [KeywordRule], mode: MatchMode) -> Self {
        Self { rules, mode }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    pub fn classify_text(&self, text: &str) -> Classification {
        let normalized = text.to_lowercase();
        let matched: Vec<IndustryLabel> = self
            .rules
            .iter()
            .filter(|rule| rule.matches(&normalized))
            .map(|rule| rule.industry)
            .collect();

        let Some(first) = matched.first().copied() else {
            return Classification::unmatched();
        };

        let industry = match self.mode {
            MatchMode::FirstMatch => first,
            MatchMode::MostFrequent => plurality(&matched),
        };

        Classification {
            industry,
            confidence: match_confidence(matched.len()),
            matched_rules: matched.len(),
            source: ClassificationSource::Keywords,
        }
    }

    /// Override first, then keyword matching over the record text.
    pub fn classify(&self, record: &CompanyRecord, overrides: &ManualOverrides) -> Classification {
        match overrides.get(record.id) {
            Some(industry) => Classification::forced(industry),
            None => self.classify_text(&record.classification_text()),
        }
    }
}

fn plurality(matched: &[IndustryLabel]) -> IndustryLabel {
    let mut tallies: Vec<(IndustryLabel, usize)> = Vec::new();
    for label in matched {
        match tallies.iter_mut().find(|(seen, _)| seen == label) {
            Some((_, count)) => *count += 1,
            None => tallies.push((*label, 1)),
        }
    }

    let mut best = tallies[0];
    for tally in &tallies[1..] {
        if tally.1 > best.1 {
            best = *tally;
        }
    }
    best.0
}

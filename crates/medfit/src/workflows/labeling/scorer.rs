use super::domain::{CompanyRecord, FitScores, IndustryLabel};
use super::rules::RuleSet;

/// Highest relevance score the bucket tables are defined over.
pub const MAX_RELEVANCE: u8 = 100;

/// Stateless evaluator that applies the rule set's score tables.
#[derive(Debug, Clone, Copy)]
pub struct FitScorer<'a> {
    rule_set: &'a RuleSet,
}

impl<'a> FitScorer<'a> {
    pub fn new(rule_set: &'a RuleSet) -> Self {
        Self { rule_set }
    }

    pub fn score(&self, relevance: u8, industry: IndustryLabel) -> FitScores {
        let relevance = relevance.min(MAX_RELEVANCE);
        let pair = self
            .rule_set
            .fit_table
            .lookup(relevance)
            .unwrap_or_default();
        let hybrid = (u16::from(pair.side_job) + u16::from(pair.career_shift)) / 2;

        FitScores {
            side_job_fit: pair.side_job,
            career_shift_fit: pair.career_shift,
            hybrid_fit: hybrid as u8,
            learning_growth: self
                .rule_set
                .learning_table
                .lookup(relevance)
                .unwrap_or_default(),
            risk_level: self.rule_set.risk.risk_level(relevance, industry),
        }
    }

    pub fn score_record(&self, record: &mut CompanyRecord) -> FitScores {
        let scores = self.score(record.relevance_score, record.industry);
        record.fit = Some(scores);
        scores
    }
}

/// Lenient relevance parsing: integers, decimals (truncated) and blanks.
/// Anything unparseable is 0; the result is clamped to 0..=100.
pub fn parse_relevance(raw: Option<&str>) -> u8 {
    let Some(value) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return 0;
    };

    let parsed = value
        .parse::<i64>()
        .ok()
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(|number| number.trunc() as i64)
        })
        .unwrap_or(0);

    parsed.clamp(0, i64::from(MAX_RELEVANCE)) as u8
}

use super::domain::IndustryLabel;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Lowercased substring token mapped to the industry it votes for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub token: String,
    pub industry: IndustryLabel,
}

impl KeywordRule {
    pub fn new(token: &str, industry: IndustryLabel) -> Self {
        Self {
            token: token.trim().to_lowercase(),
            industry,
        }
    }

    pub fn matches(&self, normalized_text: &str) -> bool {
        !self.token.is_empty() && normalized_text.contains(self.token.as_str())
    }
}

/// Threshold bucket: any score `>= lower_bound` selects `output` unless a
/// bucket with a higher bound also matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBucket<T> {
    pub lower_bound: u8,
    pub output: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketTable<T> {
    buckets: Vec<ScoreBucket<T>>,
}

impl<T: Copy> BucketTable<T> {
    pub fn new(buckets: Vec<ScoreBucket<T>>) -> Self {
        let mut buckets = buckets;
        buckets.sort_by(|a, b| b.lower_bound.cmp(&a.lower_bound));
        Self { buckets }
    }

    /// Highest bucket whose lower bound the score reaches.
    pub fn lookup(&self, score: u8) -> Option<T> {
        self.buckets
            .iter()
            .filter(|bucket| score >= bucket.lower_bound)
            .max_by_key(|bucket| bucket.lower_bound)
            .map(|bucket| bucket.output)
    }

    /// True when every score in 0..=100 resolves to a bucket.
    pub fn covers_full_range(&self) -> bool {
        self.buckets.iter().any(|bucket| bucket.lower_bound == 0)
    }

    pub fn buckets(&self) -> &[ScoreBucket<T>] {
        &self.buckets
    }
}

/// Paired side-job / career-shift output of the fit table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitPair {
    pub side_job: u8,
    pub career_shift: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryRiskBase {
    pub industry: IndustryLabel,
    pub base: i16,
}

/// Industry-adjusted risk derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPolicy {
    pub default_base: i16,
    pub industry_bases: Vec<IndustryRiskBase>,
    pub high_relevance_threshold: u8,
    pub high_relevance_shift: i16,
    pub low_relevance_threshold: u8,
    pub low_relevance_shift: i16,
    pub floor: i16,
    pub ceiling: i16,
}

impl RiskPolicy {
    pub fn standard() -> Self {
        Self {
            default_base: 45,
            industry_bases: vec![
                IndustryRiskBase {
                    industry: IndustryLabel::MedicalDeviceMaker,
                    base: 40,
                },
                IndustryRiskBase {
                    industry: IndustryLabel::PharmaBio,
                    base: 50,
                },
                IndustryRiskBase {
                    industry: IndustryLabel::HealthIt,
                    base: 30,
                },
            ],
            high_relevance_threshold: 80,
            high_relevance_shift: -10,
            low_relevance_threshold: 10,
            low_relevance_shift: 10,
            floor: 10,
            ceiling: 90,
        }
    }

    pub fn base_for(&self, industry: IndustryLabel) -> i16 {
        self.industry_bases
            .iter()
            .find(|entry| entry.industry == industry)
            .map(|entry| entry.base)
            .unwrap_or(self.default_base)
    }

    pub fn risk_level(&self, relevance: u8, industry: IndustryLabel) -> u8 {
        let mut risk = self.base_for(industry);
        if relevance >= self.high_relevance_threshold {
            risk += self.high_relevance_shift;
        }
        if relevance <= self.low_relevance_threshold {
            risk += self.low_relevance_shift;
        }
        risk.clamp(self.floor, self.ceiling).clamp(0, u8::MAX as i16) as u8
    }
}

/// Versioned, explicitly passed configuration for the classifier and scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    pub version: String,
    pub keyword_rules: Vec<KeywordRule>,
    pub fit_table: BucketTable<FitPair>,
    pub learning_table: BucketTable<u8>,
    pub risk: RiskPolicy,
}

const STANDARD_KEYWORDS: &[(&str, IndustryLabel)] = &[
    ("医療it", IndustryLabel::HealthIt),
    ("システム", IndustryLabel::HealthIt),
    ("データ", IndustryLabel::HealthIt),
    ("dx", IndustryLabel::HealthIt),
    ("オンライン", IndustryLabel::HealthIt),
    ("機器", IndustryLabel::MedicalDeviceMaker),
    ("検査", IndustryLabel::MedicalDeviceMaker),
    ("装置", IndustryLabel::MedicalDeviceMaker),
    ("画像", IndustryLabel::MedicalDeviceMaker),
    ("製薬", IndustryLabel::PharmaBio),
    ("医薬", IndustryLabel::PharmaBio),
    ("バイオ", IndustryLabel::PharmaBio),
    ("薬", IndustryLabel::PharmaBio),
    ("介護", IndustryLabel::CaregivingWelfare),
    ("在宅", IndustryLabel::CaregivingWelfare),
    ("福祉", IndustryLabel::CaregivingWelfare),
    ("看護", IndustryLabel::CaregivingWelfare),
    ("流通", IndustryLabel::Distribution),
    ("卸", IndustryLabel::Distribution),
    ("物流", IndustryLabel::Logistics),
    ("配送", IndustryLabel::Logistics),
    ("倉庫", IndustryLabel::Logistics),
    ("栄養", IndustryLabel::Nutrition),
    ("サプリ", IndustryLabel::Nutrition),
    ("健康食品", IndustryLabel::Nutrition),
    ("出版", IndustryLabel::MediaPublishing),
    ("メディア", IndustryLabel::MediaPublishing),
    ("情報発信", IndustryLabel::MediaPublishing),
    ("教育", IndustryLabel::EducationTraining),
    ("研修", IndustryLabel::EducationTraining),
    ("スクール", IndustryLabel::EducationTraining),
    ("フィットネス", IndustryLabel::FitnessWellness),
    ("スポーツ", IndustryLabel::FitnessWellness),
];

impl RuleSet {
    pub const STANDARD_VERSION: &'static str = "standard-v4";

    pub fn standard() -> Self {
        Self {
            version: Self::STANDARD_VERSION.to_string(),
            keyword_rules: STANDARD_KEYWORDS
                .iter()
                .map(|(token, industry)| KeywordRule::new(token, *industry))
                .collect(),
            fit_table: BucketTable::new(vec![
                fit_bucket(85, 90, 30),
                fit_bucket(65, 75, 40),
                fit_bucket(40, 60, 60),
                fit_bucket(15, 45, 75),
                fit_bucket(0, 25, 85),
            ]),
            learning_table: BucketTable::new(vec![
                ScoreBucket {
                    lower_bound: 80,
                    output: 80,
                },
                ScoreBucket {
                    lower_bound: 50,
                    output: 65,
                },
                ScoreBucket {
                    lower_bound: 20,
                    output: 50,
                },
                ScoreBucket {
                    lower_bound: 0,
                    output: 30,
                },
            ]),
            risk: RiskPolicy::standard(),
        }
    }

    /// Standard tables with the keyword rules replaced.
    pub fn with_keyword_rules(version: impl Into<String>, keyword_rules: Vec<KeywordRule>) -> Self {
        Self {
            version: version.into(),
            keyword_rules,
            ..Self::standard()
        }
    }

    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RuleSetError> {
        let mut rule_set: RuleSet = serde_json::from_reader(reader)?;
        for rule in &mut rule_set.keyword_rules {
            rule.token = rule.token.trim().to_lowercase();
        }
        Ok(rule_set)
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, RuleSetError> {
        let file = std::fs::File::open(path)?;
        Self::from_json_reader(file)
    }

    /// Reads an ordered `token,industry` table. Row order becomes rule order.
    pub fn keyword_rules_from_csv<R: Read>(reader: R) -> Result<Vec<KeywordRule>, RuleSetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rules = Vec::new();

        for row in csv_reader.deserialize::<KeywordRuleRow>() {
            let row = row?;
            if row.token.is_empty() {
                continue;
            }
            let industry = IndustryLabel::parse(&row.industry).ok_or_else(|| {
                RuleSetError::UnknownIndustry {
                    token: row.token.clone(),
                    value: row.industry.clone(),
                }
            })?;
            rules.push(KeywordRule::new(&row.token, industry));
        }

        Ok(rules)
    }

    /// Appends rules whose token is not already present, keeping existing order.
    pub fn append_rules<I>(&mut self, rules: I) -> usize
    where
        I: IntoIterator<Item = KeywordRule>,
    {
        let mut added = 0;
        for rule in rules {
            if rule.token.is_empty()
                || self
                    .keyword_rules
                    .iter()
                    .any(|existing| existing.token == rule.token)
            {
                continue;
            }
            self.keyword_rules.push(rule);
            added += 1;
        }
        added
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

fn fit_bucket(lower_bound: u8, side_job: u8, career_shift: u8) -> ScoreBucket<FitPair> {
    ScoreBucket {
        lower_bound,
        output: FitPair {
            side_job,
            career_shift,
        },
    }
}

#[derive(Debug, Deserialize)]
struct KeywordRuleRow {
    #[serde(alias = "keyword")]
    token: String,
    #[serde(alias = "suggested_industry")]
    industry: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("failed to read rule set: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid keyword rule table: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid rule set document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("keyword '{token}' maps to unknown industry '{value}'")]
    UnknownIndustry { token: String, value: String },
}

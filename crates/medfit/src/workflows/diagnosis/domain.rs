use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const QUESTION_COUNT: u8 = 20;

/// The four five-question blocks of the survey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyCategory {
    /// A: sense that the current job has hit its limit.
    CurrentLimits,
    /// B: signs of having stopped thinking about the future.
    ThinkingStop,
    /// C: interest in side work.
    SideJobInterest,
    /// D: interest in changing careers.
    CareerShiftInterest,
}

impl SurveyCategory {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::CurrentLimits,
            Self::ThinkingStop,
            Self::SideJobInterest,
            Self::CareerShiftInterest,
        ]
    }

    pub const fn questions(self) -> RangeInclusive<u8> {
        match self {
            Self::CurrentLimits => 1..=5,
            Self::ThinkingStop => 6..=10,
            Self::SideJobInterest => 11..=15,
            Self::CareerShiftInterest => 16..=20,
        }
    }

    pub fn for_question(question: u8) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|category| category.questions().contains(&question))
    }
}

/// Question number → raw answer. Only the value 1 counts as "yes"; any
/// other value, and any missing question, counts as "no".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SurveyAnswerSet {
    answers: BTreeMap<u8, i64>,
}

impl SurveyAnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers for questions 1, 2, ... in order.
    pub fn from_sequence<I>(values: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        values
            .into_iter()
            .zip(1..=QUESTION_COUNT)
            .map(|(value, question)| (question, value))
            .collect()
    }

    pub fn record(&mut self, question: u8, value: i64) {
        self.answers.insert(question, value);
    }

    pub fn record_bool(&mut self, question: u8, yes: bool) {
        self.record(question, i64::from(yes));
    }

    pub fn is_yes(&self, question: u8) -> bool {
        self.answers.get(&question) == Some(&1)
    }

    pub fn yes_count(&self, questions: RangeInclusive<u8>) -> u8 {
        questions.filter(|question| self.is_yes(*question)).count() as u8
    }

    /// Number of recorded answers, including out-of-range question numbers.
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

/// Non-integer answers decode as 0 and keys that are not a question number
/// are dropped, so malformed form payloads still produce a diagnosis.
impl<'de> Deserialize<'de> for SurveyAnswerSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .filter_map(|(key, value)| {
                let question = key.trim().parse::<u8>().ok()?;
                Some((question, value.as_i64().unwrap_or(0)))
            })
            .collect())
    }
}

impl FromIterator<(u8, i64)> for SurveyAnswerSet {
    fn from_iter<T: IntoIterator<Item = (u8, i64)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

/// Yes-counts per category, each 0..=5.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub a_score: u8,
    pub b_score: u8,
    pub c_score: u8,
    pub d_score: u8,
}

impl CategoryScores {
    pub fn from_answers(answers: &SurveyAnswerSet) -> Self {
        Self {
            a_score: answers.yes_count(SurveyCategory::CurrentLimits.questions()),
            b_score: answers.yes_count(SurveyCategory::ThinkingStop.questions()),
            c_score: answers.yes_count(SurveyCategory::SideJobInterest.questions()),
            d_score: answers.yes_count(SurveyCategory::CareerShiftInterest.questions()),
        }
    }

    pub const fn score(&self, category: SurveyCategory) -> u8 {
        match category {
            SurveyCategory::CurrentLimits => self.a_score,
            SurveyCategory::ThinkingStop => self.b_score,
            SurveyCategory::SideJobInterest => self.c_score,
            SurveyCategory::CareerShiftInterest => self.d_score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingType {
    SideJob,
    CareerShift,
    Hybrid,
    Undifferentiated,
}

impl ThinkingType {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::SideJob,
            Self::CareerShift,
            Self::Hybrid,
            Self::Undifferentiated,
        ]
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::SideJob => "side_job",
            Self::CareerShift => "career_shift",
            Self::Hybrid => "hybrid",
            Self::Undifferentiated => "undifferentiated",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SideJob => "副業思考",
            Self::CareerShift => "転職思考",
            Self::Hybrid => "ハイブリッド思考",
            Self::Undifferentiated => "未分化思考",
        }
    }
}

impl fmt::Display for ThinkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownThinkingType(pub String);

impl fmt::Display for UnknownThinkingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown thinking type '{}' (expected side_job, career_shift, hybrid or undifferentiated)",
            self.0
        )
    }
}

impl std::error::Error for UnknownThinkingType {}

impl FromStr for ThinkingType {
    type Err = UnknownThinkingType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == normalized || kind.label() == value.trim())
            .ok_or_else(|| UnknownThinkingType(value.to_string()))
    }
}

/// Distinguishes the cascade's fallback hybrid from a clear hybrid result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingVariant {
    #[default]
    Clear,
    Fluctuating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopLevel {
    Low,
    Medium,
    High,
}

impl StopLevel {
    /// ≤1 low, 2–3 medium, ≥4 high.
    pub const fn from_score(b_score: u8) -> Self {
        match b_score {
            0..=1 => Self::Low,
            2..=3 => Self::Medium,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "思考停止レベル：低",
            Self::Medium => "思考停止レベル：中",
            Self::High => "思考停止レベル：高",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    #[serde(flatten)]
    pub scores: CategoryScores,
    pub thinking_type: ThinkingType,
    pub variant: ThinkingVariant,
    pub stop_level: StopLevel,
    pub thinking_type_label: String,
    pub stop_level_label: String,
    pub summary_label: String,
}

use super::domain::{
    CategoryScores, DiagnosisResult, StopLevel, SurveyAnswerSet, ThinkingType, ThinkingVariant,
};
use serde::Serialize;
use std::fmt;

const FLUCTUATING_HYBRID_LABEL: &str = "ハイブリッド思考（揺れあり）";

/// Thinking type plus whether it came from a clear rule or the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThinkingOutcome {
    pub thinking_type: ThinkingType,
    pub variant: ThinkingVariant,
}

impl ThinkingOutcome {
    pub const fn clear(thinking_type: ThinkingType) -> Self {
        Self {
            thinking_type,
            variant: ThinkingVariant::Clear,
        }
    }

    pub const fn label(&self) -> &'static str {
        match (self.thinking_type, self.variant) {
            (ThinkingType::Hybrid, ThinkingVariant::Fluctuating) => FLUCTUATING_HYBRID_LABEL,
            (thinking_type, _) => thinking_type.label(),
        }
    }
}

/// One `(predicate, outcome)` entry of the cascade.
#[derive(Clone, Copy)]
pub struct ThinkingRule {
    pub name: &'static str,
    pub predicate: fn(&CategoryScores) -> bool,
    pub outcome: ThinkingOutcome,
}

impl fmt::Debug for ThinkingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThinkingRule")
            .field("name", &self.name)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}

/// Ordered rules; the first matching predicate decides, otherwise the fallback.
#[derive(Debug, Clone)]
pub struct ThinkingCascade {
    rules: Vec<ThinkingRule>,
    fallback: ThinkingOutcome,
}

impl Default for ThinkingCascade {
    fn default() -> Self {
        Self::standard()
    }
}

impl ThinkingCascade {
    pub fn standard() -> Self {
        Self {
            rules: vec![
                ThinkingRule {
                    name: "both_interests",
                    predicate: |s| s.c_score >= 3 && s.d_score >= 3,
                    outcome: ThinkingOutcome::clear(ThinkingType::Hybrid),
                },
                ThinkingRule {
                    name: "side_job_only",
                    predicate: |s| s.c_score >= 3 && s.d_score <= 2,
                    outcome: ThinkingOutcome::clear(ThinkingType::SideJob),
                },
                ThinkingRule {
                    name: "career_shift_only",
                    predicate: |s| s.d_score >= 3 && s.c_score <= 2,
                    outcome: ThinkingOutcome::clear(ThinkingType::CareerShift),
                },
                ThinkingRule {
                    name: "limits_without_direction",
                    predicate: |s| s.c_score <= 2 && s.d_score <= 2 && s.a_score >= 3,
                    outcome: ThinkingOutcome::clear(ThinkingType::Undifferentiated),
                },
            ],
            fallback: ThinkingOutcome {
                thinking_type: ThinkingType::Hybrid,
                variant: ThinkingVariant::Fluctuating,
            },
        }
    }

    pub fn rules(&self) -> &[ThinkingRule] {
        &self.rules
    }

    pub fn classify(&self, scores: &CategoryScores) -> ThinkingOutcome {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(scores))
            .map(|rule| rule.outcome)
            .unwrap_or(self.fallback)
    }

    pub fn diagnose(&self, answers: &SurveyAnswerSet) -> DiagnosisResult {
        let scores = CategoryScores::from_answers(answers);
        let outcome = self.classify(&scores);
        let stop_level = StopLevel::from_score(scores.b_score);
        let thinking_type_label = outcome.label();
        let stop_level_label = stop_level.label();

        DiagnosisResult {
            scores,
            thinking_type: outcome.thinking_type,
            variant: outcome.variant,
            stop_level,
            thinking_type_label: thinking_type_label.to_string(),
            stop_level_label: stop_level_label.to_string(),
            summary_label: format!("{thinking_type_label} × {stop_level_label}"),
        }
    }
}

/// Diagnoses with the standard cascade.
pub fn diagnose(answers: &SurveyAnswerSet) -> DiagnosisResult {
    ThinkingCascade::standard().diagnose(answers)
}

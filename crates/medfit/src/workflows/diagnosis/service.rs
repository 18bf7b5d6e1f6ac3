use std::sync::Arc;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::cascade::ThinkingCascade;
use super::domain::{DiagnosisResult, SurveyAnswerSet};
use super::questions;
use super::session::{ChatInput, DiagnosisSession, SessionChange, SessionError, SessionStore};
use crate::workflows::labeling::{CompanyId, CompanyRecord};
use crate::workflows::pipeline::{render_recommendations, render_survey_reply, CompanyDirectory};

const REPROMPT_TEXT: &str = "「はい」か「いいえ」で答えてください。";

/// Company entry as shown to survey respondents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedCompany {
    pub company_id: CompanyId,
    pub company_name: String,
    pub industry: String,
    pub overview: String,
    pub medical_relevance_score: u8,
    pub hybrid_fit_score: u8,
}

impl From<&CompanyRecord> for RecommendedCompany {
    fn from(record: &CompanyRecord) -> Self {
        Self {
            company_id: record.id,
            company_name: record.name.clone(),
            industry: record.industry.label().to_string(),
            overview: record.description.clone(),
            medical_relevance_score: record.relevance_score,
            hybrid_fit_score: record.fit_or_default().hybrid_fit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosisOutcome {
    pub diagnosis: DiagnosisResult,
    pub recommendations: Vec<RecommendedCompany>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SurveyCallback {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub answers: Option<SurveyAnswerSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurveyReply {
    pub reply_text: String,
    pub recommendations: Vec<RecommendedCompany>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<DiagnosisResult>,
}

/// Reply to one chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConversationReply {
    Question {
        number: u8,
        text: String,
    },
    Reprompt {
        number: u8,
        text: String,
    },
    Completed {
        diagnosis: DiagnosisResult,
        recommendations: Vec<RecommendedCompany>,
        text: String,
    },
    /// No session is active and the message did not start one.
    Ignored,
}

impl ConversationReply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Question { text, .. }
            | Self::Reprompt { text, .. }
            | Self::Completed { text, .. } => Some(text),
            Self::Ignored => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnosisServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Service composing the cascade, the company directory and the session store.
pub struct DiagnosisService<S> {
    store: Arc<S>,
    directory: Arc<CompanyDirectory>,
    cascade: ThinkingCascade,
}

impl<S> DiagnosisService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, directory: Arc<CompanyDirectory>) -> Self {
        Self::with_cascade(store, directory, ThinkingCascade::standard())
    }

    pub fn with_cascade(
        store: Arc<S>,
        directory: Arc<CompanyDirectory>,
        cascade: ThinkingCascade,
    ) -> Self {
        Self {
            store,
            directory,
            cascade,
        }
    }

    pub fn directory(&self) -> &CompanyDirectory {
        &self.directory
    }

    /// Diagnosis plus the three companies ranked by the matching fit score.
    pub fn diagnose(&self, answers: &SurveyAnswerSet) -> DiagnosisOutcome {
        let diagnosis = self.cascade.diagnose(answers);
        let recommendations = self
            .directory
            .pick_for_thinking_type(diagnosis.thinking_type)
            .into_iter()
            .map(RecommendedCompany::from)
            .collect();

        DiagnosisOutcome {
            diagnosis,
            recommendations,
        }
    }

    /// Output order equals input order.
    pub fn diagnose_batch(&self, answer_sets: &[SurveyAnswerSet]) -> Vec<DiagnosisResult> {
        answer_sets
            .par_iter()
            .map(|answers| self.cascade.diagnose(answers))
            .collect()
    }

    /// Composite-ranked reply for the external survey form.
    pub fn survey_reply(&self, callback: &SurveyCallback) -> SurveyReply {
        let ranked = self.directory.rank_by_composite();
        let diagnosis = callback
            .answers
            .as_ref()
            .filter(|answers| !answers.is_empty())
            .map(|answers| self.cascade.diagnose(answers));

        tracing::info!(
            user_id = callback.user_id.as_deref().unwrap_or("anonymous"),
            recommendations = ranked.len(),
            "survey callback handled"
        );

        SurveyReply {
            reply_text: render_survey_reply(&ranked),
            recommendations: ranked.into_iter().map(RecommendedCompany::from).collect(),
            diagnosis,
        }
    }

    pub fn handle_message(
        &self,
        user_id: &str,
        text: &str,
    ) -> Result<ConversationReply, DiagnosisServiceError> {
        self.handle_message_at(user_id, text, Utc::now())
    }

    /// One chat turn. The session read and write happen inside a single store
    /// update, so concurrent messages from one user are applied in sequence.
    pub fn handle_message_at(
        &self,
        user_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversationReply, DiagnosisServiceError> {
        let input = ChatInput::parse(text);
        let mut reply = ConversationReply::Ignored;

        self.store.update(user_id, &mut |current| {
            let (change, next) = self.turn(user_id, input, current, now);
            reply = next;
            change
        })?;

        Ok(reply)
    }

    fn turn(
        &self,
        user_id: &str,
        input: ChatInput,
        current: Option<DiagnosisSession>,
        now: DateTime<Utc>,
    ) -> (SessionChange, ConversationReply) {
        if input == ChatInput::Start {
            tracing::debug!(user_id, "diagnosis session started");
            return (
                SessionChange::Save(DiagnosisSession::start(user_id, now)),
                question_reply(1),
            );
        }

        let Some(mut session) = current else {
            return (SessionChange::Keep, ConversationReply::Ignored);
        };

        let ChatInput::Answer(yes) = input else {
            let reply = ConversationReply::Reprompt {
                number: session.current_question(),
                text: REPROMPT_TEXT.to_string(),
            };
            return (SessionChange::Keep, reply);
        };

        if let Some(next) = session.answer(yes, now) {
            return (SessionChange::Save(session), question_reply(next));
        }

        let diagnosis = self.cascade.diagnose(&session.answers);
        let picked = self.directory.pick_for_thinking_type(diagnosis.thinking_type);
        let text = format!(
            "診断結果：{}\n\n{}",
            diagnosis.summary_label,
            render_recommendations(&picked)
        );
        let recommendations = picked.into_iter().map(RecommendedCompany::from).collect();

        tracing::info!(
            user_id,
            thinking_type = %diagnosis.thinking_type,
            elapsed_secs = (now - session.started_at).num_seconds(),
            "diagnosis session completed"
        );

        (
            SessionChange::Remove,
            ConversationReply::Completed {
                diagnosis,
                recommendations,
                text,
            },
        )
    }
}

fn question_reply(number: u8) -> ConversationReply {
    ConversationReply::Question {
        number,
        text: questions::prompt(number).unwrap_or_default(),
    }
}

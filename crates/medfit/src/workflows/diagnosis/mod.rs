//! Twenty-question thinking-pattern diagnosis, its chat session flow and
//! the HTTP surface used by the survey form and the chat webhook.

mod cascade;
pub mod domain;
pub mod questions;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use cascade::{diagnose, ThinkingCascade, ThinkingOutcome, ThinkingRule};
pub use domain::{
    CategoryScores, DiagnosisResult, StopLevel, SurveyAnswerSet, SurveyCategory, ThinkingType,
    ThinkingVariant, UnknownThinkingType, QUESTION_COUNT,
};
pub use router::{diagnosis_router, SURVEY_TOKEN_HEADER};
pub use service::{
    ConversationReply, DiagnosisOutcome, DiagnosisService, DiagnosisServiceError,
    RecommendedCompany, SurveyCallback, SurveyReply,
};
pub use session::{
    ChatInput, DiagnosisSession, InMemorySessionStore, SessionChange, SessionError, SessionStore,
};

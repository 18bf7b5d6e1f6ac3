use super::domain::{SurveyAnswerSet, QUESTION_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

const START_KEYWORDS: [&str; 2] = ["診断", "start"];
const YES_ANSWERS: [&str; 2] = ["はい", "yes"];
const NO_ANSWERS: [&str; 2] = ["いいえ", "no"];

/// How an incoming chat message is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatInput {
    Start,
    Answer(bool),
    Other,
}

impl ChatInput {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();
        let is_any = |candidates: &[&str]| {
            candidates
                .iter()
                .any(|candidate| *candidate == trimmed || *candidate == lowered)
        };

        if is_any(&START_KEYWORDS) {
            Self::Start
        } else if is_any(&YES_ANSWERS) {
            Self::Answer(true)
        } else if is_any(&NO_ANSWERS) {
            Self::Answer(false)
        } else {
            Self::Other
        }
    }
}

/// Per-user progress through the 20 questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSession {
    pub user_id: String,
    pub answers: SurveyAnswerSet,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DiagnosisSession {
    pub fn start(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            answers: SurveyAnswerSet::new(),
            started_at: now,
            updated_at: now,
        }
    }

    /// The question the next answer belongs to.
    pub fn current_question(&self) -> u8 {
        (self.answers.len() as u8).saturating_add(1)
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() >= usize::from(QUESTION_COUNT)
    }

    /// Records an answer for the current question. Returns the next question
    /// number, or `None` once all questions are answered.
    pub fn answer(&mut self, yes: bool, now: DateTime<Utc>) -> Option<u8> {
        if self.is_complete() {
            return None;
        }
        let question = self.current_question();
        self.answers.record_bool(question, yes);
        self.updated_at = now;
        (!self.is_complete()).then(|| self.current_question())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// What a conversation turn does to the stored session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Keep,
    Save(DiagnosisSession),
    Remove,
}

/// Storage abstraction for in-flight conversations.
pub trait SessionStore: Send + Sync {
    fn load(&self, user_id: &str) -> Result<Option<DiagnosisSession>, SessionError>;
    fn save(&self, session: DiagnosisSession) -> Result<(), SessionError>;
    fn remove(&self, user_id: &str) -> Result<Option<DiagnosisSession>, SessionError>;

    /// Reads the user's session and applies the returned change as one step.
    /// No other update for the same user may interleave.
    fn update(
        &self,
        user_id: &str,
        turn: &mut dyn FnMut(Option<DiagnosisSession>) -> SessionChange,
    ) -> Result<(), SessionError>;
}

/// Process-local store guarded by a mutex.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, DiagnosisSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_sessions(&self) -> Result<usize, SessionError> {
        Ok(self.lock()?.len())
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, DiagnosisSession>>, SessionError> {
        self.sessions
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, user_id: &str) -> Result<Option<DiagnosisSession>, SessionError> {
        Ok(self.lock()?.get(user_id).cloned())
    }

    fn save(&self, session: DiagnosisSession) -> Result<(), SessionError> {
        self.lock()?.insert(session.user_id.clone(), session);
        Ok(())
    }

    fn remove(&self, user_id: &str) -> Result<Option<DiagnosisSession>, SessionError> {
        Ok(self.lock()?.remove(user_id))
    }

    fn update(
        &self,
        user_id: &str,
        turn: &mut dyn FnMut(Option<DiagnosisSession>) -> SessionChange,
    ) -> Result<(), SessionError> {
        let mut sessions = self.lock()?;
        match turn(sessions.get(user_id).cloned()) {
            SessionChange::Keep => {}
            SessionChange::Save(session) => {
                sessions.insert(session.user_id.clone(), session);
            }
            SessionChange::Remove => {
                sessions.remove(user_id);
            }
        }
        Ok(())
    }
}

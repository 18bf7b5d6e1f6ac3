use std::sync::Arc;

use axum::body::Body;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::diagnosis::session::{
    DiagnosisSession, SessionChange, SessionError, SessionStore,
};
use crate::workflows::diagnosis::{DiagnosisService, InMemorySessionStore, SurveyAnswerSet};
use crate::workflows::labeling::{CompanyRecord, FitScores, IndustryLabel};
use crate::workflows::pipeline::CompanyDirectory;

/// Answers for questions 1..=20 given as four five-answer blocks.
pub(super) fn answers(a: [i64; 5], b: [i64; 5], c: [i64; 5], d: [i64; 5]) -> SurveyAnswerSet {
    SurveyAnswerSet::from_sequence(a.into_iter().chain(b).chain(c).chain(d))
}

pub(super) fn session_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn company(
    id: u64,
    name: &str,
    industry: IndustryLabel,
    relevance: u8,
    fit: FitScores,
) -> CompanyRecord {
    let mut record = CompanyRecord::new(id, name, format!("{name}の概要"));
    record.industry = industry;
    record.relevance_score = relevance;
    record.fit = Some(fit);
    record
}

pub(super) fn directory() -> CompanyDirectory {
    CompanyDirectory::new(vec![
        company(
            1,
            "ヘルスデータ",
            IndustryLabel::HealthIt,
            90,
            FitScores {
                side_job_fit: 90,
                career_shift_fit: 30,
                hybrid_fit: 60,
                learning_growth: 80,
                risk_level: 20,
            },
        ),
        company(
            2,
            "ケアサポート",
            IndustryLabel::CaregivingWelfare,
            30,
            FitScores {
                side_job_fit: 45,
                career_shift_fit: 75,
                hybrid_fit: 60,
                learning_growth: 50,
                risk_level: 45,
            },
        ),
        company(
            3,
            "ファーマラボ",
            IndustryLabel::PharmaBio,
            70,
            FitScores {
                side_job_fit: 75,
                career_shift_fit: 40,
                hybrid_fit: 57,
                learning_growth: 65,
                risk_level: 50,
            },
        ),
        company(
            4,
            "ロジメド",
            IndustryLabel::Logistics,
            5,
            FitScores {
                side_job_fit: 25,
                career_shift_fit: 85,
                hybrid_fit: 55,
                learning_growth: 30,
                risk_level: 55,
            },
        ),
    ])
}

pub(super) fn build_service() -> (
    Arc<DiagnosisService<InMemorySessionStore>>,
    Arc<InMemorySessionStore>,
) {
    let store = Arc::new(InMemorySessionStore::new());
    let service = Arc::new(DiagnosisService::new(
        Arc::clone(&store),
        Arc::new(directory()),
    ));
    (service, store)
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn load(&self, _user_id: &str) -> Result<Option<DiagnosisSession>, SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }

    fn save(&self, _session: DiagnosisSession) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }

    fn remove(&self, _user_id: &str) -> Result<Option<DiagnosisSession>, SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }

    fn update(
        &self,
        _user_id: &str,
        _turn: &mut dyn FnMut(Option<DiagnosisSession>) -> SessionChange,
    ) -> Result<(), SessionError> {
        Err(SessionError::Unavailable("offline".to_string()))
    }
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}

pub(super) fn json_request(uri: &str, payload: &Value) -> axum::http::Request<Body> {
    axum::http::Request::post(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request")
}

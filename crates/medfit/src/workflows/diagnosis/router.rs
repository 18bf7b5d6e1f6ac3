use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::SurveyAnswerSet;
use super::service::{DiagnosisService, SurveyCallback};
use super::session::SessionStore;

pub const SURVEY_TOKEN_HEADER: &str = "x-survey-token";

pub(crate) struct DiagnosisRouterState<S> {
    pub(crate) service: Arc<DiagnosisService<S>>,
    pub(crate) survey_token: Option<String>,
}

impl<S> Clone for DiagnosisRouterState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            survey_token: self.survey_token.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DiagnosisRequest {
    #[serde(default)]
    answers: SurveyAnswerSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatMessage {
    text: String,
}

/// Router exposing the batch diagnosis, survey callback and chat endpoints.
/// When `survey_token` is set, the callback requires a matching
/// `X-Survey-Token` header.
pub fn diagnosis_router<S>(
    service: Arc<DiagnosisService<S>>,
    survey_token: Option<String>,
) -> Router
where
    S: SessionStore + 'static,
{
    let state = DiagnosisRouterState {
        service,
        survey_token: survey_token.filter(|token| !token.is_empty()),
    };

    Router::new()
        .route("/api/v1/diagnosis", post(diagnosis_handler::<S>))
        .route("/api/v1/survey/callback", post(survey_callback_handler::<S>))
        .route(
            "/api/v1/conversations/:user_id/messages",
            post(message_handler::<S>),
        )
        .with_state(state)
}

pub(crate) async fn diagnosis_handler<S>(
    State(state): State<DiagnosisRouterState<S>>,
    axum::Json(request): axum::Json<DiagnosisRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let outcome = state.service.diagnose(&request.answers);
    (StatusCode::OK, axum::Json(outcome)).into_response()
}

pub(crate) async fn survey_callback_handler<S>(
    State(state): State<DiagnosisRouterState<S>>,
    headers: HeaderMap,
    axum::Json(callback): axum::Json<SurveyCallback>,
) -> Response
where
    S: SessionStore + 'static,
{
    if let Some(expected) = state.survey_token.as_deref() {
        let provided = headers
            .get(SURVEY_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        if provided != expected {
            tracing::warn!("rejected survey callback with invalid token");
            let payload = json!({ "status": "unauthorized" });
            return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
        }
    }

    let reply = state.service.survey_reply(&callback);
    (StatusCode::OK, axum::Json(reply)).into_response()
}

pub(crate) async fn message_handler<S>(
    State(state): State<DiagnosisRouterState<S>>,
    Path(user_id): Path<String>,
    axum::Json(message): axum::Json<ChatMessage>,
) -> Response
where
    S: SessionStore + 'static,
{
    match state.service.handle_message(&user_id, &message.text) {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(error) => {
            tracing::error!(%error, user_id = %user_id, "conversation turn failed");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}

//! Free-text medical questions.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AskRequest, AskResponse};
use crate::explain;
use crate::session_store::SessionRecord;

/// `POST /api/ask` (also `POST /medical_bot`)
///
/// Answers need a text generator. Without one, or when it fails, the
/// caller gets the "analysis unavailable" body. Answered questions are
/// stored like reports.
pub async fn ask(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let question = request.question.as_deref().unwrap_or_default().trim().to_string();
    if question.is_empty() {
        return Err(ApiError::NoQuestion);
    }

    let Some(generator) = ctx.explainer.clone() else {
        return Err(ApiError::AnalysisUnavailable("No text generator configured".into()));
    };

    tracing::info!(chars = question.len(), "Question received");

    let prompt = question.clone();
    let response_text = tokio::task::spawn_blocking(move || {
        explain::answer_question(generator.as_ref(), &prompt)
    })
    .await
    .map_err(|e| ApiError::AnalysisUnavailable(e.to_string()))?
    .map_err(|e| ApiError::AnalysisUnavailable(e.to_string()))?;

    let session_id = ctx
        .sessions
        .put(SessionRecord::consultation(question.clone(), response_text.clone()));
    tracing::info!(session = %session_id, "Question answered");

    Ok(Json(AskResponse {
        session_id,
        question,
        response_text,
    }))
}

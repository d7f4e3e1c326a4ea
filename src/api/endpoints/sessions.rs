//! Stored session lookup.

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::session_store::SessionRecord;

/// `GET /api/sessions/:id`
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<SessionRecord>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| ApiError::BadRequest("Invalid session ID format".into()))?;

    ctx.sessions
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Session not found or expired".into()))
}

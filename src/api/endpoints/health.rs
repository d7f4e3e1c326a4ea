//! Health check endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::types::{ApiContext, HealthResponse};

/// `GET /api/health`
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: crate::report::ANALYSIS_VERSION,
        timestamp: chrono::Local::now().to_rfc3339(),
        database_conditions: ctx.engine.knowledge().len(),
        ai_enabled: ctx.explainer.is_some(),
        active_sessions: ctx.sessions.len(),
    })
}

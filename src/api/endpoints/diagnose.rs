//! Differential diagnosis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, DiagnoseRequest};
use crate::explain;
use crate::report::{DiagnosisReport, NoMatchReport};
use crate::session_store::SessionRecord;

/// `POST /api/diagnose` (also `POST /diagnose`)
///
/// 200 with a `DiagnosisReport` (stored under a session id) or a
/// `NoMatchReport`; 400 for an empty or malformed request.
pub async fn diagnose(
    State(ctx): State<ApiContext>,
    payload: Result<Json<DiagnoseRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if request.symptoms.iter().all(|s| s.trim().is_empty()) {
        return Err(ApiError::NoSymptoms);
    }

    let DiagnoseRequest { symptoms, profile } = request;
    tracing::info!(symptoms = symptoms.len(), age = ?profile.age, "Diagnosis requested");

    // Scoring and the optional explanation call are both blocking.
    let engine = ctx.engine.clone();
    let explainer = ctx.explainer.clone();
    let input = symptoms.clone();
    let input_profile = profile.clone();
    let (results, ai_analysis) = tokio::task::spawn_blocking(move || {
        let results = engine.diagnose(&input, &input_profile);
        let ai_analysis = explainer
            .as_deref()
            .and_then(|g| explain::explain(g, &input, &input_profile, &results));
        (results, ai_analysis)
    })
    .await
    .map_err(|e| ApiError::AnalysisUnavailable(e.to_string()))?;

    let Some(mut report) = DiagnosisReport::build(&symptoms, &results) else {
        tracing::info!("No condition matched");
        return Ok(Json(NoMatchReport::new(&symptoms)).into_response());
    };
    report.ai_analysis = ai_analysis;

    let id = ctx
        .sessions
        .put(SessionRecord::diagnosis(symptoms, profile, report.clone()));
    report.session_id = Some(id);

    tracing::info!(
        session = %id,
        top = %results[0].condition,
        matches = results.len(),
        urgency = report.urgency_level.as_str(),
        "Diagnosis delivered"
    );

    Ok(Json(report).into_response())
}

//! Knowledge-base listing.

use axum::extract::State;
use axum::Json;

use crate::api::types::{ApiContext, ConditionSummary, ConditionsResponse};

/// Key symptoms listed per condition.
const LISTED_KEY_SYMPTOMS: usize = 3;

/// `GET /api/conditions`: every known condition, in knowledge-base order.
pub async fn list(State(ctx): State<ApiContext>) -> Json<ConditionsResponse> {
    let conditions: Vec<ConditionSummary> = ctx
        .engine
        .knowledge()
        .conditions()
        .iter()
        .map(|c| ConditionSummary {
            name: c.name.clone(),
            severity: c.severity.as_str().to_string(),
            symptom_count: c.symptoms.len(),
            key_symptoms: c.key_symptoms.iter().take(LISTED_KEY_SYMPTOMS).cloned().collect(),
        })
        .collect();

    Json(ConditionsResponse {
        total: conditions.len(),
        conditions,
    })
}

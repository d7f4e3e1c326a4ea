//! API error types with structured JSON responses.
//!
//! Every body tells the caller what to do next and carries the same care
//! guidance as a report.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::report::{AnalysisUnavailable, EMERGENCY_NOTE, SEE_PROVIDER};

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
    pub recommendation: &'static str,
    pub emergency_note: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
    pub suggestion: &'static str,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No symptoms provided")]
    NoSymptoms,
    #[error("No question provided")]
    NoQuestion,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Endpoint not found: {0}")]
    UnknownEndpoint(String),
    #[error("Analysis failed: {0}")]
    AnalysisUnavailable(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, suggestion) = match self {
            ApiError::NoSymptoms => (
                StatusCode::BAD_REQUEST,
                "NO_SYMPTOMS",
                "No symptoms provided".to_string(),
                "Please provide at least one symptom for analysis",
            ),
            ApiError::NoQuestion => (
                StatusCode::BAD_REQUEST,
                "NO_QUESTION",
                "Please provide a medical question".to_string(),
                "Send a JSON body such as {\"question\": \"What can help a tension headache?\"}",
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail,
                "Send a JSON body such as {\"symptoms\": [\"fever\", \"cough\"], \"age\": 40} to /api/diagnose or {\"question\": \"...\"} to /api/ask",
            ),
            ApiError::NotFound(detail) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                detail,
                "Sessions expire after a while; submit your symptoms again",
            ),
            ApiError::UnknownEndpoint(path) => {
                tracing::debug!(path, "Unknown endpoint");
                (
                    StatusCode::NOT_FOUND,
                    "ENDPOINT_NOT_FOUND",
                    "Endpoint not found".to_string(),
                    "Available: GET /, GET /api/health, GET /api/conditions, POST /api/diagnose, POST /api/ask, GET /api/sessions/{id}",
                )
            }
            ApiError::AnalysisUnavailable(detail) => {
                tracing::error!(detail, "Analysis unavailable");
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(AnalysisUnavailable::default()),
                )
                    .into_response();
            }
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code,
                message,
                suggestion,
            },
            recommendation: SEE_PROVIDER,
            emergency_note: EMERGENCY_NOTE,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn no_symptoms_returns_400_with_suggestion() {
        let response = ApiError::NoSymptoms.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json(response).await;
        assert_eq!(json["error"]["code"], "NO_SYMPTOMS");
        assert_eq!(json["error"]["message"], "No symptoms provided");
        assert_eq!(
            json["error"]["suggestion"],
            "Please provide at least one symptom for analysis"
        );
    }

    #[tokio::test]
    async fn bad_request_carries_care_guidance() {
        let response = ApiError::BadRequest("missing field".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json(response).await;
        assert_eq!(json["error"]["message"], "missing field");
        assert!(json["error"]["suggestion"].as_str().unwrap().contains("symptoms"));
        assert_eq!(json["recommendation"], "Please consult a healthcare provider");
        assert_eq!(
            json["emergency_note"],
            "For severe symptoms, seek immediate medical attention"
        );
    }

    #[tokio::test]
    async fn no_question_returns_400() {
        let response = ApiError::NoQuestion.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json(response).await;
        assert_eq!(json["error"]["message"], "Please provide a medical question");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Session not found or expired".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_endpoint_lists_routes() {
        let response = ApiError::UnknownEndpoint("/nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = json(response).await;
        assert_eq!(json["error"]["message"], "Endpoint not found");
        assert!(json["error"]["suggestion"].as_str().unwrap().contains("/api/diagnose"));
        assert!(json["recommendation"].is_string());
    }

    #[tokio::test]
    async fn analysis_unavailable_hides_detail() {
        let response = ApiError::AnalysisUnavailable("worker panicked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json(response).await;
        assert_eq!(json["error"], "Analysis temporarily unavailable");
        assert_eq!(json["recommendation"], "Please consult a healthcare provider");
        assert_eq!(
            json["emergency_note"],
            "For severe symptoms, seek immediate medical attention"
        );
        assert!(!json.to_string().contains("panicked"));
    }
}

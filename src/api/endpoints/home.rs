//! Service banner and the catch-all for unknown paths.

use axum::http::Uri;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::HomeResponse;
use crate::config::{APP_NAME, APP_VERSION};

const FEATURES: &[&str] = &[
    "Flexible symptom matching",
    "Balanced confidence scoring",
    "Top 5 differential diagnosis",
    "Patient-specific analysis",
    "Reduced false negatives",
    "Medical question answering",
];

/// `GET /`: what this service is and whether it is up.
pub async fn banner() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: format!("{APP_NAME} API v{APP_VERSION}"),
        features: FEATURES.to_vec(),
        status: "active",
    })
}

/// Router fallback.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::UnknownEndpoint(uri.path().to_string())
}

//! HTTP router.
//!
//! Returns a composable `Router`. The banner lives at `/` and the API is
//! nested under `/api/`. The paths used by the existing web frontend
//! (`/diagnose`, `/health-check`, `/conditions`, `/medical_bot`) are
//! mounted at the root as well. Anything else gets a JSON 404.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the triage API router.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn triage_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/conditions", get(endpoints::conditions::list))
        .route("/diagnose", post(endpoints::diagnose::diagnose))
        .route("/ask", post(endpoints::ask::ask))
        .route("/sessions/:id", get(endpoints::sessions::get));

    Router::new()
        .route("/", get(endpoints::home::banner))
        .route("/health-check", get(endpoints::health::check))
        .route("/conditions", get(endpoints::conditions::list))
        .route("/diagnose", post(endpoints::diagnose::diagnose))
        .route("/medical_bot", post(endpoints::ask::ask))
        .nest("/api", api)
        .fallback(endpoints::home::not_found)
        .with_state(ctx)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

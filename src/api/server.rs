//! Server lifecycle: bind, serve the triage router, stop on Ctrl-C.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::router::triage_router;
use crate::api::types::ApiContext;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind ({0}): {1}")]
    Bind(SocketAddr, std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, ctx: ApiContext) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(addr, e))?;
    serve_listener(listener, ctx, shutdown_signal()).await
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_listener<F>(
    listener: TcpListener,
    ctx: ApiContext,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(%addr, "Triage API server started");

    axum::serve(listener, triage_router(ctx))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Triage API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::error!("Cannot listen for shutdown signal: {e}"),
    }
}

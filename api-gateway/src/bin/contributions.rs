//! Contributions Lambda - Serves GitHub contribution calendars as JSON and SVG.
//!
//! Endpoints:
//! - GET /api/contributions/{username} - Contributions as JSON
//! - GET /api/contributions/{username}/svg - Contribution heatmap
//! - GET /health - Health check
//! - GET / - Documentation page

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::AppState;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    shared::route(&state, &event).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::from_env()?);
    info!(upstream = %state.config.upstream_url, "Contributions Lambda starting");

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}

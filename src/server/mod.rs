pub mod handlers;
pub mod types;

pub use handlers::AppState;

use crate::{Result, classifier, config::Config};
use axum::{Router, routing::post};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Builds the application router: the detection route plus an open CORS policy.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/detect-emotion", post(handlers::detect_emotion))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    // The classifier is loaded once and shared by every request
    let classifier = classifier::from_config(&config.classifier)?;
    let app = router(AppState::new(classifier));

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

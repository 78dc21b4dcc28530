pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod upstream;

use std::sync::Arc;

use axum::{http::Method, routing::get, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::Config;
use crate::state::AppState;
use crate::upstream::PictureClient;

pub const USER_AGENT: &str = concat!("stellar-viewer/", env!("CARGO_PKG_VERSION"));

/// Build the shared state for `config`: one pooled HTTP client for the
/// active profile.
pub fn build_state(config: &Config) -> reqwest::Result<AppState> {
    let http = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(USER_AGENT)
        .build()?;
    let pictures = PictureClient::new(http, Arc::new(config.profile.clone()));
    Ok(AppState::new(pictures))
}

/// CORS for the viewer page: anything goes in dev, only `ALLOWED_ORIGINS`
/// (GET requests) in production.
pub fn cors_layer(config: &Config) -> CorsLayer {
    if config.is_dev {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(config.allowed_origins.iter().cloned()))
            .allow_methods([Method::GET])
    }
}

/// Application routes without the metrics and CORS layers added by the binary.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/picture", get(handlers::pictures::get_picture))
        .route(
            "/api/picture/current",
            get(handlers::pictures::get_current_picture),
        )
        .route(
            "/api/picture/sample",
            get(handlers::pictures::get_sample_picture),
        )
        .route("/api/profile", get(handlers::pictures::get_profile))
        .with_state(state)
}

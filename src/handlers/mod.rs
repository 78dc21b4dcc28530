pub mod pictures;

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "stellar-viewer",
            "version": env!("CARGO_PKG_VERSION"),
            "profile": state.pictures.profile().name.as_str(),
        })),
    )
}

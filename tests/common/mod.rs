// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::Query,
    http::{Method, Request, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stellar_viewer::{
    create_router,
    state::AppState,
    upstream::{ApiProfile, LogicalField, PictureClient, ResponseMapping},
};

pub const TEST_API_KEY: &str = "test-key";

// Dates the fake upstream answers in a particular way.
pub const OK_DATE: &str = "2020-01-01";
pub const RATE_LIMITED_DATE: &str = "2020-01-02";
pub const FORBIDDEN_DATE: &str = "2020-01-03";
pub const MISSING_DATE: &str = "2020-01-04";
pub const BROKEN_DATE: &str = "2020-01-05";
pub const UNAVAILABLE_DATE: &str = "2020-01-06";
pub const NO_URL_DATE: &str = "2020-01-07";
pub const ARRAY_BODY_DATE: &str = "2020-01-08";
pub const VIDEO_DATE: &str = "2020-01-09";

// ── Fake upstream ────────────────────────────────────────────────────────────

/// Mimics the NASA APOD endpoint: `?date=..&api_key=..`.
async fn fake_apod(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("api_key").map(String::as_str) != Some(TEST_API_KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({ "error": "bad key" })));
    }
    let date = params.get("date").cloned().unwrap_or_default();
    match date.as_str() {
        RATE_LIMITED_DATE => (StatusCode::TOO_MANY_REQUESTS, Json(json!({}))),
        FORBIDDEN_DATE => (StatusCode::FORBIDDEN, Json(json!({}))),
        MISSING_DATE => (StatusCode::NOT_FOUND, Json(json!({ "msg": "No data" }))),
        BROKEN_DATE => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))),
        UNAVAILABLE_DATE => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))),
        NO_URL_DATE => (
            StatusCode::OK,
            Json(json!({ "title": "Untitled void", "date": date, "media_type": "image" })),
        ),
        ARRAY_BODY_DATE => (StatusCode::OK, Json(json!([1, 2, 3]))),
        VIDEO_DATE => (
            StatusCode::OK,
            Json(json!({
                "title": "Solar Eclipse Timelapse",
                "date": date,
                "explanation": "A total eclipse in motion.",
                "url": "https://www.youtube.com/embed/abc123",
                "media_type": "video",
            })),
        ),
        _ => (
            StatusCode::OK,
            Json(json!({
                "title": "Andromeda Galaxy",
                "date": date,
                "explanation": "Our nearest large galactic neighbour.",
                "url": "https://apod.example.org/image/m31.jpg",
                "hdurl": "https://apod.example.org/image/m31_big.jpg",
                "media_type": "image",
                "copyright": "\nA. Observer\n",
                "service_version": "v1",
            })),
        ),
    }
}

/// An API with its own field names and auth parameter: `?day=..&token=..`.
async fn fake_gallery(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("token").map(String::as_str) != Some(TEST_API_KEY) {
        return (StatusCode::FORBIDDEN, Json(json!({})));
    }
    let day = params.get("day").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!({
            "headline": "Orion Nebula",
            "published": day,
            "caption": "A stellar nursery.",
            "image_url": "https://gallery.example.org/orion.png",
            "kind": "image",
            "copyright": "Gallery Staff",
        })),
    )
}

/// Start the fake upstream on an ephemeral port and return its address.
pub async fn spawn_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/apod", get(fake_apod))
        .route("/gallery", get(fake_gallery));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

// ── Profiles and apps ────────────────────────────────────────────────────────

pub fn nasa_profile(addr: SocketAddr) -> ApiProfile {
    let mut profile = ApiProfile::nasa();
    profile.base_url = format!("http://{addr}/apod");
    profile.api_key = Some(TEST_API_KEY.into());
    profile
}

pub fn gallery_profile(addr: SocketAddr) -> ApiProfile {
    let mut profile = ApiProfile::custom(format!("http://{addr}/gallery"));
    profile.api_key = Some(TEST_API_KEY.into());
    profile.date_param = "day".into();
    profile.api_key_param = "token".into();
    profile.mapping = ResponseMapping::new()
        .with(LogicalField::Title, "headline")
        .with(LogicalField::Date, "published")
        .with(LogicalField::Explanation, "caption")
        .with(LogicalField::Url, "image_url")
        .with(LogicalField::MediaType, "kind");
    profile
}

pub fn picture_client(profile: ApiProfile) -> PictureClient {
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    PictureClient::new(http, Arc::new(profile))
}

pub fn create_test_state(profile: ApiProfile) -> AppState {
    AppState::new(picture_client(profile))
}

pub fn create_test_app(state: AppState) -> Router {
    create_router(state)
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{PictureRecord, DATE_FORMAT},
    state::AppState,
    upstream::ProfileSummary,
};

// ── Query params ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PictureQuery {
    pub date: Option<String>,
}

/// Parse and bound-check a requested date. `None` means today (UTC).
pub fn resolve_date(raw: Option<&str>, today: NaiveDate) -> AppResult<NaiveDate> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(today);
    };
    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| AppError::Validation("Date must be in YYYY-MM-DD format".into()))?;
    if date > today {
        return Err(AppError::Validation("Date cannot be in the future".into()));
    }
    Ok(date)
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /api/picture?date=YYYY-MM-DD
///
/// Fetches the picture for `date` (today when omitted) from the active
/// profile's API and remembers it as the current picture.
pub async fn get_picture(
    State(state): State<AppState>,
    Query(params): Query<PictureQuery>,
) -> AppResult<Json<PictureRecord>> {
    let date = resolve_date(params.date.as_deref(), Utc::now().date_naive())?;
    let date = date.format(DATE_FORMAT).to_string();

    let record = state.pictures.fetch_picture(&date).await?;
    state.set_current_picture(record.clone());

    Ok(Json(record))
}

/// GET /api/picture/current
pub async fn get_current_picture(State(state): State<AppState>) -> AppResult<Json<PictureRecord>> {
    state
        .current_picture()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No picture has been loaded yet".into()))
}

/// GET /api/picture/sample
///
/// Static fallback for when the upstream is down or rate limited.
pub async fn get_sample_picture() -> Json<PictureRecord> {
    Json(PictureRecord::sample())
}

/// GET /api/profile
pub async fn get_profile(State(state): State<AppState>) -> Json<ProfileSummary> {
    Json(state.pictures.profile().summary())
}

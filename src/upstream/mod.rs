pub mod profile;

use std::sync::Arc;

use reqwest::{Client as ReqwestClient, StatusCode};
use serde_json::Value;
use url::Url;

use crate::models::{NormalizedFields, PictureRecord, RecordRejection};

pub use profile::{ApiProfile, LogicalField, MappingParseError, ProfileSummary, ResponseMapping};

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const FORBIDDEN_MESSAGE: &str = "Access forbidden. Check that your API key is valid.";
pub const NOT_FOUND_MESSAGE: &str = "No picture found for the selected date.";
pub const SERVER_ERROR_MESSAGE: &str =
    "The picture service is having problems. Please try again later.";
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the picture service.";
pub const INVALID_BODY_MESSAGE: &str = "The picture service returned an unexpected response.";

// ── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("{}", status_message(.0.to_owned()))]
    Status(StatusCode),

    #[error("{}", UNREACHABLE_MESSAGE)]
    Transport(#[source] reqwest::Error),

    #[error("{}", INVALID_BODY_MESSAGE)]
    InvalidBody,

    #[error("The picture service returned an incomplete picture: {0}")]
    Rejected(#[from] RecordRejection),

    #[error("Invalid picture service URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Human-readable message for a non-success upstream status.
pub fn status_message(status: StatusCode) -> String {
    match status {
        StatusCode::TOO_MANY_REQUESTS => RATE_LIMITED_MESSAGE.to_string(),
        StatusCode::FORBIDDEN => FORBIDDEN_MESSAGE.to_string(),
        StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE.to_string(),
        StatusCode::INTERNAL_SERVER_ERROR => SERVER_ERROR_MESSAGE.to_string(),
        other => format!("Failed to fetch picture (HTTP {}).", other.as_u16()),
    }
}

// ── Pure helpers ───────────────────────────────────────────────────────────

/// Build the upstream URL for `date`, keeping any query pairs already on the
/// base URL. The key parameter is left out when the profile has no key.
pub fn build_request_url(profile: &ApiProfile, date: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(&profile.base_url)?;
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair(&profile.date_param, date);
        if let Some(key) = profile.api_key.as_deref() {
            pairs.append_pair(&profile.api_key_param, key);
        }
    }
    Ok(url)
}

fn read_field(
    raw: &serde_json::Map<String, Value>,
    mapping: &ResponseMapping,
    field: LogicalField,
) -> Option<String> {
    let logical_name: &str = field.as_ref();
    let present = |key: &str| raw.get(key).filter(|v| !v.is_null());
    let value = mapping
        .get(field)
        .and_then(present)
        .or_else(|| present(logical_name))?;
    value.as_str().map(str::to_string)
}

/// Map a raw upstream response through `mapping`.
///
/// For each logical field the mapped key is read first, then the logical
/// name itself. A JSON `null` counts as absent. Returns `None` when `raw` is
/// not a JSON object.
pub fn normalize(raw: &Value, mapping: &ResponseMapping) -> Option<NormalizedFields> {
    let obj = raw.as_object()?;
    let read = |field: LogicalField| read_field(obj, mapping, field);
    Some(NormalizedFields {
        title: read(LogicalField::Title),
        date: read(LogicalField::Date),
        explanation: read(LogicalField::Explanation),
        url: read(LogicalField::Url),
        hdurl: read(LogicalField::HdUrl),
        media_type: read(LogicalField::MediaType),
        copyright: read(LogicalField::Copyright),
    })
}

// ── Client ─────────────────────────────────────────────────────────────────

/// Fetches pictures from the upstream API described by one profile.
#[derive(Clone)]
pub struct PictureClient {
    http: ReqwestClient,
    profile: Arc<ApiProfile>,
}

impl PictureClient {
    pub fn new(http: ReqwestClient, profile: Arc<ApiProfile>) -> Self {
        Self { http, profile }
    }

    pub fn profile(&self) -> &ApiProfile {
        &self.profile
    }

    /// One GET against the upstream, normalized into a `PictureRecord`.
    pub async fn fetch_picture(&self, date: &str) -> Result<PictureRecord, UpstreamError> {
        let url = build_request_url(&self.profile, date)?;

        let resp = self.http.get(url).send().await.map_err(|e| {
            // The request URL carries the API key.
            let e = e.without_url();
            tracing::error!(error = ?e, profile = %self.profile.name, "Failed to contact picture API");
            UpstreamError::Transport(e)
        })?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, profile = %self.profile.name, date, "Picture API returned error status");
            return Err(UpstreamError::Status(status));
        }

        let body: Value = resp.json().await.map_err(|e| {
            tracing::error!(error = ?e.without_url(), "Failed to parse picture API response");
            UpstreamError::InvalidBody
        })?;

        let fields = normalize(&body, &self.profile.mapping).ok_or_else(|| {
            tracing::error!("Picture API response is not a JSON object");
            UpstreamError::InvalidBody
        })?;

        let record = PictureRecord::from_normalized(fields, date).map_err(|e| {
            tracing::warn!(reason = %e, date, "Rejected picture from upstream");
            UpstreamError::from(e)
        })?;

        tracing::info!(date = %record.date, title = %record.title, "Fetched picture");
        Ok(record)
    }
}

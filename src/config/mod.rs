use std::env;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::upstream::{ApiProfile, MappingParseError, ResponseMapping};

pub const DEFAULT_PROFILE: &str = "nasa";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown picture profile '{0}' (expected 'nasa' or 'custom')")]
    UnknownProfile(String),

    #[error("PICTURE_BASE_URL is required for the custom profile")]
    MissingBaseUrl,

    #[error("invalid PICTURE_BASE_URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid PICTURE_FIELD_MAP: {0}")]
    FieldMap(#[from] MappingParseError),

    #[error("invalid {name}: '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid origin in ALLOWED_ORIGINS: '{0}'")]
    InvalidOrigin(String),
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub is_dev: bool,
    /// Browser origins allowed to call the API in production.
    pub allowed_origins: Vec<HeaderValue>,
    pub request_timeout: Duration,
    pub profile: ApiProfile,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "SERVER_PORT",
                value: raw,
            })?,
            None => 8080,
        };

        let timeout_secs = match var("PICTURE_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "PICTURE_TIMEOUT_SECS",
                value: raw,
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port,
            is_dev: var("APP_ENV").as_deref() != Some("production"),
            allowed_origins: parse_origins(var("ALLOWED_ORIGINS").as_deref().unwrap_or(""))?,
            request_timeout: Duration::from_secs(timeout_secs),
            profile: resolve_profile(&var)?,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Parse a comma-separated origin list such as
/// `https://viewer.example,http://localhost:3000`.
fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|origin| {
            let parsed = url::Url::parse(origin)
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
                return Err(ConfigError::InvalidOrigin(origin.to_string()));
            }
            HeaderValue::from_str(origin.trim_end_matches('/'))
                .map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}

/// Pick the profile named by `PICTURE_PROFILE` and apply per-variable overrides.
fn resolve_profile<F>(var: &F) -> Result<ApiProfile, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let name = var("PICTURE_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string());
    let mut profile = match name.trim().to_ascii_lowercase().as_str() {
        "nasa" => ApiProfile::nasa(),
        "custom" => ApiProfile::custom(var("PICTURE_BASE_URL").ok_or(ConfigError::MissingBaseUrl)?),
        _ => return Err(ConfigError::UnknownProfile(name)),
    };

    if let Some(base_url) = var("PICTURE_BASE_URL") {
        profile.base_url = base_url;
    }
    url::Url::parse(&profile.base_url).map_err(|source| ConfigError::InvalidBaseUrl {
        url: profile.base_url.clone(),
        source,
    })?;

    if let Some(key) = var("PICTURE_API_KEY") {
        profile.api_key = Some(key);
    }
    if let Some(param) = var("PICTURE_DATE_PARAM") {
        profile.date_param = param;
    }
    if let Some(param) = var("PICTURE_API_KEY_PARAM") {
        profile.api_key_param = param;
    }
    if let Some(field_map) = var("PICTURE_FIELD_MAP") {
        profile.mapping.merge(ResponseMapping::parse(&field_map)?);
    }

    Ok(profile)
}

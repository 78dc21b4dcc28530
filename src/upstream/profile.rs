use std::collections::HashMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

// ============================================================================
// Logical fields
// ============================================================================

/// A field of the internal picture schema. The string form is the name the
/// rest of the application uses and the fallback key looked up in upstream
/// responses when a profile has no mapping for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumString, EnumIter)]
pub enum LogicalField {
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "date")]
    Date,
    #[strum(serialize = "explanation")]
    Explanation,
    #[strum(serialize = "url")]
    Url,
    #[strum(serialize = "hdurl")]
    HdUrl,
    #[strum(serialize = "mediaType")]
    MediaType,
    #[strum(serialize = "copyright")]
    Copyright,
}

// ============================================================================
// Response mapping
// ============================================================================

/// Translates logical field names to the upstream API's JSON keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseMapping {
    entries: HashMap<LogicalField, String>,
}

impl ResponseMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: LogicalField, upstream_key: impl Into<String>) -> Self {
        self.insert(field, upstream_key);
        self
    }

    pub fn insert(&mut self, field: LogicalField, upstream_key: impl Into<String>) {
        self.entries.insert(field, upstream_key.into());
    }

    /// The upstream key configured for `field`, if any.
    pub fn get(&self, field: LogicalField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    /// Overlay `other` on top of this mapping; entries in `other` win.
    pub fn merge(&mut self, other: ResponseMapping) {
        self.entries.extend(other.entries);
    }

    /// Parse `title=headline,url=image_url` into a mapping.
    ///
    /// Whitespace around names is ignored and empty segments are skipped.
    pub fn parse(entries: &str) -> Result<Self, MappingParseError> {
        let mut mapping = ResponseMapping::new();
        for segment in entries.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (field, key) = segment
                .split_once('=')
                .ok_or_else(|| MappingParseError::MissingEquals(segment.to_string()))?;
            let field: LogicalField = field
                .trim()
                .parse()
                .map_err(|_| MappingParseError::UnknownField(field.trim().to_string()))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(MappingParseError::EmptyKey(field.to_string()));
            }
            mapping.insert(field, key);
        }
        Ok(mapping)
    }

    /// Mapping in logical-field order, for display.
    pub fn to_ordered_pairs(&self) -> Vec<(String, String)> {
        LogicalField::iter()
            .filter_map(|f| self.get(f).map(|k| (f.to_string(), k.to_string())))
            .collect()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MappingParseError {
    #[error("mapping entry '{0}' is not of the form field=key")]
    MissingEquals(String),
    #[error("unknown picture field '{0}'")]
    UnknownField(String),
    #[error("mapping for '{0}' has an empty upstream key")]
    EmptyKey(String),
}

// ============================================================================
// Profiles
// ============================================================================

pub const NASA_APOD_URL: &str = "https://api.nasa.gov/planetary/apod";
pub const NASA_DEMO_KEY: &str = "DEMO_KEY";

/// Connection parameters plus response mapping for one upstream API.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiProfile {
    pub name: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub date_param: String,
    pub api_key_param: String,
    pub mapping: ResponseMapping,
}

// Hand-written so the API key never ends up in logs.
impl std::fmt::Debug for ApiProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiProfile")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("date_param", &self.date_param)
            .field("api_key_param", &self.api_key_param)
            .field("mapping", &self.mapping)
            .finish()
    }
}

impl ApiProfile {
    /// NASA's Astronomy Picture of the Day API.
    pub fn nasa() -> Self {
        ApiProfile {
            name: "nasa".into(),
            base_url: NASA_APOD_URL.into(),
            api_key: Some(NASA_DEMO_KEY.into()),
            date_param: "date".into(),
            api_key_param: "api_key".into(),
            mapping: ResponseMapping::new()
                .with(LogicalField::Title, "title")
                .with(LogicalField::Date, "date")
                .with(LogicalField::Explanation, "explanation")
                .with(LogicalField::Url, "url")
                .with(LogicalField::HdUrl, "hdurl")
                .with(LogicalField::MediaType, "media_type")
                .with(LogicalField::Copyright, "copyright"),
        }
    }

    /// A blank profile whose parameters all come from the environment.
    /// Without a mapping every field is read under its logical name.
    pub fn custom(base_url: impl Into<String>) -> Self {
        ApiProfile {
            name: "custom".into(),
            base_url: base_url.into(),
            api_key: None,
            date_param: "date".into(),
            api_key_param: "api_key".into(),
            mapping: ResponseMapping::new(),
        }
    }

    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.name.clone(),
            base_url: self.base_url.clone(),
            date_param: self.date_param.clone(),
            api_key_param: self.api_key_param.clone(),
            has_api_key: self.api_key.is_some(),
            mapping: self.mapping.to_ordered_pairs().into_iter().collect(),
        }
    }
}

/// Public view of the active profile returned by `GET /api/profile`.
#[derive(Debug, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub base_url: String,
    pub date_param: String,
    pub api_key_param: String,
    pub has_api_key: bool,
    pub mapping: std::collections::BTreeMap<String, String>,
}

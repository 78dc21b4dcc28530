use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

/// One day's picture in the internal schema, as returned by `GET /api/picture`.
///
/// `title` and `url` are always non-empty; see `PictureRecord::from_normalized`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PictureRecord {
    pub title: String,
    pub date: String,
    pub explanation: String,
    pub url: String,
    pub hdurl: Option<String>,
    pub media_type: MediaType,
    pub copyright: Option<String>,
}

/// Every logical field read from an upstream response, before validation.
/// `None` means neither the mapped key nor the logical name was present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFields {
    pub title: Option<String>,
    pub date: Option<String>,
    pub explanation: Option<String>,
    pub url: Option<String>,
    pub hdurl: Option<String>,
    pub media_type: Option<String>,
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordRejection {
    #[error("picture has no title")]
    MissingTitle,
    #[error("picture has no url")]
    MissingUrl,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl PictureRecord {
    /// Validate normalized fields into a record.
    ///
    /// `requested_date` fills in `date` when the upstream omitted it.
    pub fn from_normalized(
        fields: NormalizedFields,
        requested_date: &str,
    ) -> Result<Self, RecordRejection> {
        let title = non_blank(fields.title).ok_or(RecordRejection::MissingTitle)?;
        let url = non_blank(fields.url).ok_or(RecordRejection::MissingUrl)?;

        let media_type = match fields.media_type.as_deref().map(str::trim) {
            None => MediaType::Image,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(media_type = %raw, "Unrecognised media type, treating as image");
                MediaType::Image
            }),
        };

        Ok(PictureRecord {
            title,
            date: non_blank(fields.date).unwrap_or_else(|| requested_date.to_string()),
            explanation: fields.explanation.unwrap_or_default(),
            url,
            hdurl: non_blank(fields.hdurl),
            media_type,
            copyright: non_blank(fields.copyright),
        })
    }

    /// Static record offered when the upstream API is unavailable.
    pub fn sample() -> Self {
        PictureRecord {
            title: "The Horsehead Nebula".into(),
            date: "2024-01-15".into(),
            explanation: "One of the most recognizable nebulae in the sky, the Horsehead \
                          is a dark cloud of cold gas and dust silhouetted against the \
                          glowing emission nebula IC 434 in the constellation Orion. It \
                          lies roughly 1,500 light-years away."
                .into(),
            url: "https://apod.nasa.gov/apod/image/2401/Horsehead_Hubble_1225.jpg".into(),
            hdurl: Some("https://apod.nasa.gov/apod/image/2401/Horsehead_Hubble_3000.jpg".into()),
            media_type: MediaType::Image,
            copyright: None,
        }
    }
}

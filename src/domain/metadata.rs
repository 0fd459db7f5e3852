//! APOD metadata as returned by the remote API.
//!
//! Every field is optional: the API is treated as unreliable and a missing
//! field only becomes an error once something actually needs it.

use serde::Deserialize;
use thiserror::Error;

/// Title used when the API response carries none
pub const DEFAULT_TITLE: &str = "Unknown Title";

/// Explanation used when the API response carries none
pub const DEFAULT_EXPLANATION: &str = "No Explanation Available";

/// Why no image URL could be chosen for an APOD
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnsupportedMedia {
    #[error("media_type missing from APOD response")]
    MissingMediaType,

    #[error("unsupported media type: {0}")]
    UnknownMediaType(String),

    #[error("image APOD has neither hdurl nor url")]
    MissingImageUrl,

    #[error("video APOD has no thumbnail_url")]
    MissingThumbnail,
}

/// Kind of media published for a day
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// Still image
    Image,

    /// Video (only its thumbnail can be cached)
    Video,

    /// Anything else the API may return
    Other(String),
}

impl MediaType {
    /// Classify the raw `media_type` string
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "image" => MediaType::Image,
            "video" => MediaType::Video,
            _ => MediaType::Other(raw.to_string()),
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Image => write!(f, "image"),
            MediaType::Video => write!(f, "video"),
            MediaType::Other(raw) => write!(f, "{}", raw),
        }
    }
}

/// Response body of the APOD endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApodMetadata {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub explanation: Option<String>,

    #[serde(default)]
    pub media_type: Option<String>,

    /// Standard resolution URL (or the video URL for videos)
    #[serde(default)]
    pub url: Option<String>,

    /// High definition image URL
    #[serde(default)]
    pub hdurl: Option<String>,

    /// Present for videos when the request asked for thumbnails
    #[serde(default)]
    pub thumbnail_url: Option<String>,

    #[serde(default)]
    pub copyright: Option<String>,
}

impl ApodMetadata {
    /// Title, or [`DEFAULT_TITLE`]
    pub fn title(&self) -> &str {
        non_empty(self.title.as_deref()).unwrap_or(DEFAULT_TITLE)
    }

    /// Explanation, or [`DEFAULT_EXPLANATION`]
    pub fn explanation(&self) -> &str {
        non_empty(self.explanation.as_deref()).unwrap_or(DEFAULT_EXPLANATION)
    }

    pub fn media_type(&self) -> Option<MediaType> {
        self.media_type.as_deref().map(MediaType::parse)
    }

    /// Pick the URL of the image to cache.
    ///
    /// Images prefer `hdurl` over `url`; videos use `thumbnail_url`.
    pub fn image_url(&self) -> Result<&str, UnsupportedMedia> {
        match self.media_type() {
            Some(MediaType::Image) => non_empty(self.hdurl.as_deref())
                .or_else(|| non_empty(self.url.as_deref()))
                .ok_or(UnsupportedMedia::MissingImageUrl),
            Some(MediaType::Video) => non_empty(self.thumbnail_url.as_deref())
                .ok_or(UnsupportedMedia::MissingThumbnail),
            Some(MediaType::Other(raw)) => Err(UnsupportedMedia::UnknownMediaType(raw)),
            None => Err(UnsupportedMedia::MissingMediaType),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: Option<&str>, hdurl: Option<&str>) -> ApodMetadata {
        ApodMetadata {
            media_type: Some("image".to_string()),
            url: url.map(String::from),
            hdurl: hdurl.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_image_prefers_hdurl() {
        let meta = image(Some("https://a/small.jpg"), Some("https://a/big.jpg"));
        assert_eq!(meta.image_url().unwrap(), "https://a/big.jpg");

        let meta = image(Some("https://a/small.jpg"), None);
        assert_eq!(meta.image_url().unwrap(), "https://a/small.jpg");

        let meta = image(None, None);
        assert_eq!(meta.image_url(), Err(UnsupportedMedia::MissingImageUrl));
    }

    #[test]
    fn test_video_uses_thumbnail() {
        let meta = ApodMetadata {
            media_type: Some("video".to_string()),
            url: Some("https://youtube.com/embed/xyz".to_string()),
            thumbnail_url: Some("https://img.youtube.com/vi/xyz/0.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(meta.image_url().unwrap(), "https://img.youtube.com/vi/xyz/0.jpg");

        let meta = ApodMetadata {
            thumbnail_url: None,
            ..meta
        };
        assert_eq!(meta.image_url(), Err(UnsupportedMedia::MissingThumbnail));
    }

    #[test]
    fn test_other_media_is_unsupported() {
        let meta = ApodMetadata {
            media_type: Some("other".to_string()),
            url: Some("https://a/b.jpg".to_string()),
            ..Default::default()
        };
        assert_eq!(
            meta.image_url(),
            Err(UnsupportedMedia::UnknownMediaType("other".to_string()))
        );
        assert_eq!(
            ApodMetadata::default().image_url(),
            Err(UnsupportedMedia::MissingMediaType)
        );
    }

    #[test]
    fn test_defaults_for_missing_text() {
        let meta = ApodMetadata::default();
        assert_eq!(meta.title(), DEFAULT_TITLE);
        assert_eq!(meta.explanation(), DEFAULT_EXPLANATION);
    }

    #[test]
    fn test_deserialize_api_response() {
        let json = r#"{
            "copyright": "Someone",
            "date": "2024-04-16",
            "explanation": "A galaxy.",
            "hdurl": "https://apod.nasa.gov/apod/image/2404/big.jpg",
            "media_type": "image",
            "service_version": "v1",
            "title": "NGC 3521",
            "url": "https://apod.nasa.gov/apod/image/2404/small.jpg"
        }"#;

        let meta: ApodMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title(), "NGC 3521");
        assert_eq!(meta.media_type(), Some(MediaType::Image));
        assert!(meta.thumbnail_url.is_none());
        assert_eq!(
            meta.image_url().unwrap(),
            "https://apod.nasa.gov/apod/image/2404/big.jpg"
        );
    }
}

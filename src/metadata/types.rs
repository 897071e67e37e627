//! Metadata types for preview cards

use serde::{Deserialize, Serialize};

pub const NO_TITLE: &str = "No Title Available";
pub const NO_DESCRIPTION: &str = "No Description Available";
pub const FAILED_TITLE: &str = "Failed to load preview";
pub const FAILED_DESCRIPTION: &str = "Could not fetch page metadata";

/// Title/description/image triple shown on a preview card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    /// `og:title`, else the document title
    pub title: String,

    /// `og:description`, else the `description` meta tag
    pub description: String,

    /// `og:image`, else the page icon (as written in the page, not resolved)
    pub image: Option<String>,
}

impl PageMetadata {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        image: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image,
        }
    }

    /// Card shown when the page could not be fetched
    pub fn failed() -> Self {
        Self::new(FAILED_TITLE, FAILED_DESCRIPTION, None)
    }

    /// Card for a page that declared nothing usable
    pub fn empty() -> Self {
        Self::new(NO_TITLE, NO_DESCRIPTION, None)
    }

    pub fn is_failure_placeholder(&self) -> bool {
        *self == Self::failed()
    }
}

/// Envelope returned by the proxy endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyEnvelope {
    /// Raw page body; `null` when the proxy itself could not reach the page
    #[serde(default)]
    pub contents: Option<String>,

    #[serde(default)]
    pub status: Option<ProxyStatus>,
}

/// Upstream details reported by the proxy; other fields are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyStatus {
    #[serde(default)]
    pub http_code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_placeholder() {
        let failed = PageMetadata::failed();

        assert_eq!(failed.title, "Failed to load preview");
        assert_eq!(failed.description, "Could not fetch page metadata");
        assert_eq!(failed.image, None);
        assert!(failed.is_failure_placeholder());
        assert!(!PageMetadata::empty().is_failure_placeholder());
    }

    #[test]
    fn test_envelope_parses_allorigins_shape() {
        let body = r#"{
            "contents": "<html><title>Hi</title></html>",
            "status": {"url": "https://example.com", "content_type": "text/html", "http_code": 200, "response_time": 42}
        }"#;
        let envelope: ProxyEnvelope = serde_json::from_str(body).unwrap();

        assert_eq!(
            envelope.contents.as_deref(),
            Some("<html><title>Hi</title></html>")
        );
        assert_eq!(envelope.status.unwrap().http_code, Some(200));
    }

    #[test]
    fn test_envelope_with_null_contents() {
        let envelope: ProxyEnvelope = serde_json::from_str(r#"{"contents": null}"#).unwrap();
        assert!(envelope.contents.is_none());
        assert!(envelope.status.is_none());
    }

    #[test]
    fn test_metadata_serializes() {
        let meta = PageMetadata::new("A", "B", Some("C.png".to_string()));
        let json = serde_json::to_value(&meta).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"title": "A", "description": "B", "image": "C.png"})
        );
    }
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LinkPreviewError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Proxy returned status {0}")]
    Status(u16),

    #[error("Proxy response has no contents")]
    MissingContents,

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Preview instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinkPreviewError {
    /// Whether this error came from fetching a page (degrades to the placeholder card)
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::Status(_) | Self::MissingContents | Self::Serde(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LinkPreviewError>;

//! Page fetching through a CORS proxy

use crate::config::ProxyConfig;
use crate::error::{LinkPreviewError, Result};
use crate::logging::{Timer, log_error};
use crate::metadata::extract::extract_metadata;
use crate::metadata::types::{PageMetadata, ProxyEnvelope};
use std::future::Future;

/// Anything that can hand back the raw HTML of a page
pub trait PageSource: Send + Sync + 'static {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Fetches pages via `<base>?url=<encoded>` and unwraps the JSON envelope
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: reqwest::Client,
    base_url: String,
}

/// Install the rustls crypto provider (no-op when one is already installed)
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

impl ProxyClient {
    pub fn new(config: &ProxyConfig) -> Result<Self> {
        install_crypto_provider();

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        tracing::debug!(
            proxy = %config.base_url,
            timeout_secs = config.request_timeout.as_secs(),
            "Proxy client created"
        );

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Proxy request url for a target page
    pub fn proxy_url(&self, target: &str) -> String {
        let separator = if self.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}url={}",
            self.base_url,
            separator,
            urlencoding::encode(target)
        )
    }
}

impl PageSource for ProxyClient {
    async fn fetch_page(&self, url: &str) -> Result<String> {
        let _timer = Timer::new("fetch_page", url);
        let request_url = self.proxy_url(url);

        let response = self.http.get(&request_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LinkPreviewError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let envelope: ProxyEnvelope = serde_json::from_str(&body)?;

        if let Some(upstream) = envelope.status.as_ref().and_then(|s| s.http_code) {
            tracing::trace!(url = %url, upstream_status = upstream, "Proxy reported upstream status");
        }

        envelope.contents.ok_or(LinkPreviewError::MissingContents)
    }
}

/// Fetch a page and extract its metadata
pub async fn fetch_metadata<S: PageSource>(source: &S, url: &str) -> Result<PageMetadata> {
    let html = source.fetch_page(url).await?;
    let metadata = extract_metadata(&html);

    tracing::debug!(
        url = %url,
        title = %metadata.title,
        has_image = metadata.image.is_some(),
        "Extracted page metadata"
    );

    Ok(metadata)
}

/// Like [`fetch_metadata`], but any failure becomes the placeholder card
///
/// Fetch failures are expected and logged as warnings; anything else is an
/// error in this crate or in the page source.
pub async fn fetch_metadata_or_placeholder<S: PageSource>(source: &S, url: &str) -> PageMetadata {
    match fetch_metadata(source, url).await {
        Ok(metadata) => metadata,
        Err(e) if e.is_fetch_failure() => {
            log_error("fetch_metadata", url, &e);
            PageMetadata::failed()
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Unexpected error while fetching metadata");
            PageMetadata::failed()
        }
    }
}

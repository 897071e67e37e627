//! Page metadata for preview cards
//!
//! Pages are fetched through a CORS-style proxy that wraps the raw HTML in a
//! JSON envelope. Extraction looks at Open Graph tags first and falls back to
//! plain head elements, field by field.
//!
//! Key features:
//! - Single request per page, no retries
//! - Per-field fallbacks: `og:*` -> `<title>` / `description` / `icon`
//! - Graceful degradation: any fetch failure yields a placeholder card

mod extract;
mod proxy;
mod types;

pub use extract::{HeadDocument, extract_metadata};
pub use proxy::{
    PageSource, ProxyClient, fetch_metadata, fetch_metadata_or_placeholder,
    install_crypto_provider,
};
pub use types::{
    FAILED_DESCRIPTION, FAILED_TITLE, NO_DESCRIPTION, NO_TITLE, PageMetadata, ProxyEnvelope,
    ProxyStatus,
};

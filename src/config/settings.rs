use crate::error::{LinkPreviewError, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PROXY_BASE: &str = "https://api.allorigins.win/get";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub proxy: ProxyConfig,
    pub preview: PreviewConfig,
}

#[derive(Debug, Clone)]
pub struct ProxyConfig {
    /// Endpoint that takes the target as `?url=` and answers `{"contents": "..."}`
    pub base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// How long the panel stays mounted after the pointer leaves
    pub unmount_delay: Duration,
    pub fetch_trigger: FetchTrigger,
}

/// When an instance issues its single metadata fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchTrigger {
    /// As soon as the instance is mounted with its url
    #[default]
    OnMount,
    /// On the first pointer-enter
    OnHover,
}

impl FromStr for FetchTrigger {
    type Err = LinkPreviewError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mount" | "on_mount" | "eager" => Ok(Self::OnMount),
            "hover" | "on_hover" | "lazy" => Ok(Self::OnHover),
            other => Err(LinkPreviewError::Config(format!(
                "Invalid LINK_PREVIEW_FETCH_TRIGGER: {}",
                other
            ))),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PROXY_BASE.to_string(),
            request_timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            unmount_delay: Duration::from_millis(300),
            fetch_trigger: FetchTrigger::OnMount,
        }
    }
}

fn default_user_agent() -> String {
    format!("link-preview/{}", env!("CARGO_PKG_VERSION"))
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    load_settings_from(|key| std::env::var(key).ok())
}

/// Build settings from an arbitrary key lookup
pub fn load_settings_from(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
    let proxy = ProxyConfig {
        base_url: lookup("LINK_PREVIEW_PROXY_BASE")
            .unwrap_or_else(|| DEFAULT_PROXY_BASE.to_string()),
        request_timeout: Duration::from_secs(
            lookup("LINK_PREVIEW_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "10".to_string())
                .parse()
                .map_err(|_| {
                    LinkPreviewError::Config("Invalid LINK_PREVIEW_REQUEST_TIMEOUT_SECS".to_string())
                })?,
        ),
        user_agent: lookup("LINK_PREVIEW_USER_AGENT").unwrap_or_else(default_user_agent),
    };

    if !proxy.base_url.starts_with("http://") && !proxy.base_url.starts_with("https://") {
        return Err(LinkPreviewError::Config(format!(
            "LINK_PREVIEW_PROXY_BASE must be an http(s) url, got {}",
            proxy.base_url
        )));
    }

    let preview = PreviewConfig {
        unmount_delay: Duration::from_millis(
            lookup("LINK_PREVIEW_UNMOUNT_DELAY_MS")
                .unwrap_or_else(|| "300".to_string())
                .parse()
                .map_err(|_| {
                    LinkPreviewError::Config("Invalid LINK_PREVIEW_UNMOUNT_DELAY_MS".to_string())
                })?,
        ),
        fetch_trigger: match lookup("LINK_PREVIEW_FETCH_TRIGGER") {
            Some(value) => value.parse()?,
            None => FetchTrigger::default(),
        },
    };

    Ok(Settings { proxy, preview })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio_test::{assert_err, assert_ok};

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = load_settings_from(|_| None).unwrap();

        assert_eq!(settings.proxy.base_url, DEFAULT_PROXY_BASE);
        assert_eq!(settings.proxy.request_timeout, Duration::from_secs(10));
        assert!(settings.proxy.user_agent.starts_with("link-preview/"));
        assert_eq!(settings.preview.unmount_delay, Duration::from_millis(300));
        assert_eq!(settings.preview.fetch_trigger, FetchTrigger::OnMount);
    }

    #[test]
    fn test_overrides() {
        let settings = load_settings_from(lookup_from(&[
            ("LINK_PREVIEW_PROXY_BASE", "http://localhost:8080/get"),
            ("LINK_PREVIEW_UNMOUNT_DELAY_MS", "150"),
            ("LINK_PREVIEW_REQUEST_TIMEOUT_SECS", "3"),
            ("LINK_PREVIEW_FETCH_TRIGGER", "hover"),
        ]))
        .unwrap();

        assert_eq!(settings.proxy.base_url, "http://localhost:8080/get");
        assert_eq!(settings.proxy.request_timeout, Duration::from_secs(3));
        assert_eq!(settings.preview.unmount_delay, Duration::from_millis(150));
        assert_eq!(settings.preview.fetch_trigger, FetchTrigger::OnHover);
    }

    #[test]
    fn test_invalid_delay_is_config_error() {
        let err = load_settings_from(lookup_from(&[("LINK_PREVIEW_UNMOUNT_DELAY_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, LinkPreviewError::Config(_)));
    }

    #[test]
    fn test_invalid_trigger_and_proxy() {
        assert_err!(load_settings_from(lookup_from(&[(
            "LINK_PREVIEW_FETCH_TRIGGER",
            "click"
        )])));
        assert_err!(load_settings_from(lookup_from(&[(
            "LINK_PREVIEW_PROXY_BASE",
            "ftp://x"
        )])));
        assert_ok!(load_settings_from(lookup_from(&[(
            "LINK_PREVIEW_FETCH_TRIGGER",
            "Eager"
        )])));
    }
}

mod settings;

pub use settings::{
    DEFAULT_PROXY_BASE, FetchTrigger, PreviewConfig, ProxyConfig, Settings, load_settings,
    load_settings_from,
};

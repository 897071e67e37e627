use anyhow::{Context, bail};
use link_preview::config::load_settings;
use link_preview::metadata::{ProxyClient, install_crypto_provider};
use link_preview::preview::{InstanceId, PreviewBoard};
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: link-preview [--json] <url>...";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize rustls crypto provider
    install_crypto_provider();

    init_tracing();

    let mut json = false;
    let mut urls = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                println!("{}", USAGE);
                return Ok(());
            }
            _ => urls.push(arg),
        }
    }
    if urls.is_empty() {
        bail!(USAGE);
    }

    let settings = load_settings().context("loading configuration")?;
    tracing::debug!(
        "Config: proxy={}, unmount_delay={:?}, trigger={:?}",
        settings.proxy.base_url,
        settings.preview.unmount_delay,
        settings.preview.fetch_trigger
    );

    let client = Arc::new(ProxyClient::new(&settings.proxy)?);
    let board = PreviewBoard::new(client, settings.preview.clone());

    let ids = urls
        .iter()
        .map(|url| board.mount(url.as_str()))
        .collect::<link_preview::Result<Vec<InstanceId>>>()?;
    for id in &ids {
        board.pointer_enter(*id)?;
    }

    tokio::select! {
        resolved = board.resolve_all() => {
            tracing::info!(resolved = resolved.len(), total = ids.len(), "Previews resolved");
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Interrupted, tearing down previews");
            for id in ids {
                board.unmount(id)?;
            }
            return Ok(());
        }
    }

    for id in ids {
        if json {
            let metadata = board.metadata(id).await?;
            let line = serde_json::json!({
                "url": board.snapshot(id)?.url(),
                "title": metadata.title,
                "description": metadata.description,
                "image": metadata.image,
            });
            println!("{}", line);
        } else {
            println!("{}", board.render(id)?);
        }

        board.pointer_leave(id)?;
        board.unmount(id)?;
    }

    Ok(())
}

/// Logs go to stderr so stdout carries only the rendered previews
fn init_tracing() {
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("link_preview=info"))
    };

    if std::env::var("LINK_PREVIEW_LOG_FORMAT").is_ok_and(|format| format == "json") {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

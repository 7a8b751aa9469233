//! The syncwatch binary: logging + settings bootstrap around the
//! coordination server.

#![deny(unsafe_code)]

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use syncwatch_settings::{init_settings, load_settings, load_settings_from_path};

#[derive(Debug, Parser)]
#[command(
    name = "syncwatch",
    about = "Real-time watch-together session coordination server"
)]
struct Args {
    /// Interface to bind (overrides settings).
    #[arg(long)]
    bind: Option<String>,

    /// Port serving both the WebSocket transport and the lookup API
    /// (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Settings file to load instead of `~/.syncwatch/settings.json`.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    syncwatch_core::logging::init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => load_settings().context("loading settings")?,
    };
    if let Some(bind) = args.bind {
        settings.server.bind = bind;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    init_settings(settings.clone());

    info!(
        bind = %settings.server.bind,
        port = settings.server.port,
        "starting syncwatch"
    );
    syncwatch_server::serve(&settings.server)
        .await
        .context("server exited")?;
    Ok(())
}

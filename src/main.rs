//! tinyircd - a small multi-client IRC chat server.
//!
//! One tokio task per connection, one actor task per channel, and a shared
//! [`Matrix`] holding the user and channel registries.

mod config;
mod error;
mod handlers;
mod network;
mod state;

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};
use crate::network::Gateway;
use crate::state::Matrix;

/// Pending disconnect requests from channel actors.
const DISCONNECT_CHANNEL_SIZE: usize = 1024;

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    match config.logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => Config::load(path).map_err(|e| {
            eprintln!("failed to load config {path}: {e}");
            e
        })?,
        None => Config::default(),
    };

    init_tracing(&config);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(
        server = %config.server.name,
        network = %config.server.network,
        sid = %config.server.sid,
        config = config_path.as_deref().unwrap_or("<defaults>"),
        "Starting tinyircd"
    );

    let (disconnect_tx, mut disconnect_rx) =
        tokio::sync::mpsc::channel::<(String, String)>(DISCONNECT_CHANNEL_SIZE);
    let matrix = Arc::new(Matrix::new(&config, disconnect_tx));

    // Disconnects requested by channel actors run here, never inside an actor.
    {
        let matrix = Arc::clone(&matrix);
        tokio::spawn(async move {
            while let Some((uid, reason)) = disconnect_rx.recv().await {
                matrix.disconnect_user(&uid, &reason).await;
            }
        });
    }

    let gateway = Gateway::bind(config.listen.address, Arc::clone(&matrix)).await?;

    {
        let shutdown = matrix.lifecycle_manager.shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Interrupt received, shutting down"),
                Err(e) => warn!(error = %e, "Failed to listen for ctrl-c"),
            }
            shutdown.cancel();
        });
    }

    gateway.run().await?;
    info!("Server stopped");
    Ok(())
}

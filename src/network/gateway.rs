//! Gateway - TCP listener that accepts incoming connections.
//!
//! The Gateway binds the listening socket and spawns a [`Connection`] task
//! for each incoming client.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use tokio::net::TcpListener;
use tracing::{error, info, instrument, warn};

use crate::handlers::Registry;
use crate::network::Connection;
use crate::state::Matrix;

/// The Gateway accepts incoming TCP connections and spawns handlers.
pub struct Gateway {
    listener: TcpListener,
    matrix: Arc<Matrix>,
    registry: Arc<Registry>,
}

impl Gateway {
    /// Bind the gateway to `addr`. Failure here is fatal to start-up.
    pub async fn bind(addr: SocketAddr, matrix: Arc<Matrix>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let registry = Arc::new(Registry::new());
        info!(%addr, "Listener bound");

        Ok(Self {
            listener,
            matrix,
            registry,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until the server shuts down. A failed accept is
    /// logged and the loop continues.
    #[instrument(skip(self), name = "gateway")]
    pub async fn run(self) -> anyhow::Result<()> {
        let shutdown = self.matrix.lifecycle_manager.shutdown.clone();

        loop {
            let accepted = tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Gateway stopping");
                    return Ok(());
                }
                accepted = self.listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, addr)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!(%addr, error = %e, "Failed to set TCP_NODELAY");
                    }

                    let uid = self.matrix.user_manager.uid_gen.next();
                    info!(%uid, %addr, "Connection accepted");

                    let connection = Connection::new(
                        uid.clone(),
                        stream,
                        addr,
                        Arc::clone(&self.matrix),
                        Arc::clone(&self.registry),
                    );
                    tokio::spawn(async move {
                        if let Err(e) = connection.run().await {
                            warn!(%uid, %addr, error = %e, "Connection error");
                        }
                        info!(%uid, %addr, "Connection closed");
                    });
                }
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                }
            }
        }
    }
}

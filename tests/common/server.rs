//! Test server management.
//!
//! Spawns the compiled `tinyircd` binary on a free port with a config file
//! written to a temporary directory.

use std::process::{Child, Command, Stdio};
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::sleep;

/// A running server process, killed on drop.
pub struct TestServer {
    child: Child,
    port: u16,
    _data_dir: TempDir,
}

impl TestServer {
    /// Spawn a server with the default test configuration.
    pub async fn spawn() -> anyhow::Result<Self> {
        Self::spawn_with("").await
    }

    /// Spawn a server, appending `extra` sections to the generated config.
    pub async fn spawn_with(extra: &str) -> anyhow::Result<Self> {
        Self::spawn_configured("", extra).await
    }

    /// Spawn a server with extra `[server]` keys and extra sections.
    pub async fn spawn_configured(server_options: &str, extra: &str) -> anyhow::Result<Self> {
        let port = free_port()?;
        let data_dir = tempfile::tempdir()?;

        let config_path = data_dir.path().join("config.toml");
        let config_content = format!(
            r#"
[server]
name = "test.server"
network = "TestNet"
sid = "00T"
description = "Test IRC Server"
{server_options}

[listen]
address = "127.0.0.1:{port}"

[logging]
level = "warn"
{extra}
"#
        );
        std::fs::write(&config_path, config_content)?;

        let child = Command::new(env!("CARGO_BIN_EXE_tinyircd"))
            .arg(&config_path)
            .stdout(Stdio::null())
            .spawn()?;

        let server = Self {
            child,
            port,
            _data_dir: data_dir,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Wait until the server is accepting connections.
    async fn wait_until_ready(&self) -> anyhow::Result<()> {
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                return Ok(());
            }
            sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("Server failed to start within 5 seconds")
    }

    /// Get the server address.
    pub fn address(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }

    /// Connect a client without registering it.
    pub async fn connect(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        super::client::TestClient::connect(&self.address(), nick).await
    }

    /// Connect and register a client, discarding the welcome burst.
    #[allow(dead_code)]
    pub async fn client(&self, nick: &str) -> anyhow::Result<super::client::TestClient> {
        let mut client = self.connect(nick).await?;
        client.register().await?;
        client.drain().await;
        Ok(client)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Ask the OS for a port that is free right now.
fn free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

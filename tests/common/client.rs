//! Test IRC client.
//!
//! Provides an IRC client for integration testing that can send commands
//! and assert on received responses.

use std::time::Duration;

use tinyirc_proto::Message;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// A test IRC client.
pub struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: BufWriter<OwnedWriteHalf>,
    nick: String,
}

#[allow(dead_code)]
impl TestClient {
    /// Connect to a test server.
    pub async fn connect(address: &str, nick: &str) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(address).await?;
        let (read_half, write_half) = stream.into_split();

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: BufWriter::new(write_half),
            nick: nick.to_string(),
        })
    }

    pub fn nick(&self) -> &str {
        &self.nick
    }

    /// Send a raw IRC line; the terminator is added if missing.
    pub async fn send_raw(&mut self, line: &str) -> anyhow::Result<()> {
        self.writer.write_all(line.as_bytes()).await?;
        if !line.ends_with("\r\n") {
            self.writer.write_all(b"\r\n").await?;
        }
        self.writer.flush().await?;
        Ok(())
    }

    /// Receive a single message from the server.
    pub async fn recv(&mut self) -> anyhow::Result<Message> {
        self.recv_timeout(Duration::from_secs(5)).await
    }

    /// Receive a message with a timeout. A closed stream is an error.
    pub async fn recv_timeout(&mut self, dur: Duration) -> anyhow::Result<Message> {
        let mut line = String::new();
        let read = timeout(dur, self.reader.read_line(&mut line)).await??;
        if read == 0 {
            anyhow::bail!("connection closed");
        }
        line.parse::<Message>()
            .map_err(|e| anyhow::anyhow!("Parse error on {line:?}: {e}"))
    }

    /// Receive messages until `predicate` matches; the match is the last
    /// element.
    pub async fn recv_until<F>(&mut self, mut predicate: F) -> anyhow::Result<Vec<Message>>
    where
        F: FnMut(&Message) -> bool,
    {
        let mut messages = Vec::new();
        loop {
            let msg = self.recv().await?;
            let done = predicate(&msg);
            messages.push(msg);
            if done {
                return Ok(messages);
            }
        }
    }

    /// Receive until a message with `verb` arrives and return it.
    pub async fn expect_verb(&mut self, verb: &str) -> anyhow::Result<Message> {
        let mut messages = self.recv_until(|m| m.verb == verb).await?;
        messages
            .pop()
            .ok_or_else(|| anyhow::anyhow!("no {verb} received"))
    }

    /// Discard everything already sent to us.
    pub async fn drain(&mut self) {
        while self
            .recv_timeout(Duration::from_millis(200))
            .await
            .is_ok()
        {}
    }

    /// Collect whatever arrives within `dur`.
    pub async fn collect_for(&mut self, dur: Duration) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.recv_timeout(dur).await {
            messages.push(msg);
        }
        messages
    }

    /// Register with the server (NICK + USER) and wait for RPL_WELCOME.
    pub async fn register(&mut self) -> anyhow::Result<()> {
        let nick = self.nick.clone();
        self.send_raw(&format!("NICK {nick}")).await?;
        self.send_raw(&format!("USER {nick} 0 * :Test User {nick}"))
            .await?;

        let messages = self
            .recv_until(|m| m.verb == "001" || m.verb == "433" || m.verb == "432")
            .await?;
        match messages.last() {
            Some(m) if m.verb == "001" => Ok(()),
            other => anyhow::bail!("Registration failed: {other:?}"),
        }
    }

    pub async fn join(&mut self, channel: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("JOIN {channel}")).await
    }

    /// Join and wait for the end of the NAMES burst.
    pub async fn join_and_wait(&mut self, channel: &str) -> anyhow::Result<Vec<Message>> {
        self.join(channel).await?;
        self.recv_until(|m| m.verb == "366").await
    }

    pub async fn privmsg(&mut self, target: &str, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG {target} :{text}")).await
    }

    pub async fn quit(&mut self, reason: Option<&str>) -> anyhow::Result<()> {
        match reason {
            Some(reason) => self.send_raw(&format!("QUIT :{reason}")).await,
            None => self.send_raw("QUIT").await,
        }
    }
}

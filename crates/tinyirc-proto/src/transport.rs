//! Framed line transport over any async byte stream.

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_util::codec::Framed;

use crate::error::ProtocolError;
use crate::line::{LineCodec, LineFrame};
use crate::message::Message;

/// Errors surfaced by [`Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The peer is gone or the socket failed.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line exceeded the configured limit and was dropped.
    #[error("line exceeds {limit} bytes")]
    LineTooLong {
        /// Configured limit.
        limit: usize,
    },

    /// The peer sent a forbidden control character.
    #[error("illegal control character: {0:?}")]
    IllegalControlChar(char),
}

impl TransportError {
    /// Whether the session must end.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TransportError::LineTooLong { .. })
    }
}

impl From<ProtocolError> for TransportError {
    fn from(err: ProtocolError) -> Self {
        match err {
            ProtocolError::Io(e) => TransportError::Io(e),
            ProtocolError::IllegalControlChar(c) => TransportError::IllegalControlChar(c),
        }
    }
}

/// One connection's line-oriented view of its byte stream.
pub struct Transport<S = TcpStream> {
    framed: Framed<S, LineCodec>,
}

impl<S> Transport<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wrap `stream`, limiting incoming lines to `max_line_len` bytes.
    pub fn new(stream: S, max_line_len: usize) -> Self {
        Self {
            framed: Framed::new(stream, LineCodec::with_max_len(max_line_len)),
        }
    }

    /// Wait for the next complete line.
    ///
    /// Returns `Ok(None)` once the peer has closed the stream. Cancel-safe:
    /// dropping the future loses no data.
    pub async fn read_line(&mut self) -> Result<Option<String>, TransportError> {
        match self.framed.next().await {
            Some(Ok(LineFrame::Line(line))) => Ok(Some(line)),
            Some(Ok(LineFrame::Overflow)) => Err(TransportError::LineTooLong {
                limit: self.framed.codec().max_len(),
            }),
            Some(Err(e)) => Err(e.into()),
            None => Ok(None),
        }
    }

    /// Send one line and flush it.
    pub async fn write_line(&mut self, line: &str) -> Result<(), TransportError> {
        self.framed.send(line).await.map_err(Into::into)
    }

    /// Serialize and send a message.
    pub async fn write_message(&mut self, message: &Message) -> Result<(), TransportError> {
        let line = message.to_string();
        tracing::trace!(line = %line, "-> wire");
        self.write_line(&line).await
    }

    /// Queue a line without flushing; pair with [`Transport::flush`].
    pub async fn feed_message(&mut self, message: &Message) -> Result<(), TransportError> {
        let line = message.to_string();
        self.framed.feed(line.as_str()).await.map_err(Into::into)
    }

    /// Flush queued lines.
    pub async fn flush(&mut self) -> Result<(), TransportError> {
        SinkExt::<&str>::flush(&mut self.framed).await.map_err(Into::into)
    }

    /// Access the underlying stream.
    pub fn get_ref(&self) -> &S {
        self.framed.get_ref()
    }
}

//! Newline-delimited framing for tokio.
//!
//! Lines end in `\n` (an optional preceding `\r` is stripped). The codec
//! never exposes a partial line: bytes without a terminator stay buffered,
//! and whatever is left when the peer closes is discarded.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::error::{self, ProtocolError};

/// Default maximum line length, terminator included.
pub const DEFAULT_MAX_LINE_LEN: usize = 512;

/// A decoded frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineFrame {
    /// A complete line without its terminator.
    Line(String),
    /// A line exceeded the length limit. Its bytes are dropped up to the next
    /// newline and decoding then resumes normally.
    Overflow,
}

/// Line codec with a length limit.
#[derive(Debug)]
pub struct LineCodec {
    /// Index of next byte to check for newline
    next_index: usize,
    max_len: usize,
    /// Dropping the remainder of an over-long line.
    discarding: bool,
}

impl LineCodec {
    /// Codec with the default 512 byte limit.
    pub fn new() -> Self {
        Self::with_max_len(DEFAULT_MAX_LINE_LEN)
    }

    /// Codec with a custom limit.
    pub fn with_max_len(max_len: usize) -> Self {
        Self {
            next_index: 0,
            max_len,
            discarding: false,
        }
    }

    /// Configured limit.
    pub fn max_len(&self) -> usize {
        self.max_len
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn check_control_chars(line: &str) -> error::Result<()> {
    match line.chars().find(|&c| c == '\0') {
        Some(c) => Err(ProtocolError::IllegalControlChar(c)),
        None => Ok(()),
    }
}

impl Decoder for LineCodec {
    type Item = LineFrame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> error::Result<Option<LineFrame>> {
        loop {
            let newline = src[self.next_index..].iter().position(|b| *b == b'\n');

            if self.discarding {
                match newline {
                    Some(offset) => {
                        src.advance(self.next_index + offset + 1);
                        self.next_index = 0;
                        self.discarding = false;
                        continue;
                    }
                    None => {
                        src.clear();
                        self.next_index = 0;
                        return Ok(None);
                    }
                }
            }

            return match newline {
                Some(offset) => {
                    let end = self.next_index + offset + 1;
                    self.next_index = 0;

                    if end > self.max_len {
                        src.advance(end);
                        return Ok(Some(LineFrame::Overflow));
                    }

                    let raw = src.split_to(end);
                    let text = String::from_utf8_lossy(&raw);
                    let text = text.trim_end_matches(['\r', '\n']);
                    check_control_chars(text)?;
                    Ok(Some(LineFrame::Line(text.to_string())))
                }
                None if src.len() > self.max_len => {
                    src.clear();
                    self.next_index = 0;
                    self.discarding = true;
                    Ok(Some(LineFrame::Overflow))
                }
                None => {
                    self.next_index = src.len();
                    Ok(None)
                }
            };
        }
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> error::Result<Option<LineFrame>> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None => {
                // Unterminated trailing bytes are never delivered.
                src.clear();
                self.next_index = 0;
                Ok(None)
            }
        }
    }
}

impl<'a> Encoder<&'a str> for LineCodec {
    type Error = ProtocolError;

    fn encode(&mut self, line: &'a str, dst: &mut BytesMut) -> error::Result<()> {
        // A line never smuggles a second command.
        let line = match line.find(['\r', '\n']) {
            Some(idx) => &line[..idx],
            None => line,
        };
        dst.reserve(line.len() + 2);
        dst.extend_from_slice(line.as_bytes());
        dst.extend_from_slice(b"\r\n");
        Ok(())
    }
}

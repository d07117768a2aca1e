/*
 * parser.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Packetfetch, a packetized HTTPS fetcher.
 *
 * Packetfetch is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Packetfetch is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Packetfetch.  If not, see <http://www.gnu.org/licenses/>.
 */

//! HTTP/1.1 response header parser fed one packet at a time.
//!
//! Packets may split the status line, any header line, or the `CRLF CRLF` terminator
//! anywhere. Complete lines are consumed as they appear; the partial tail waits in the
//! buffer for the next packet. Bytes after the terminator are kept as the leftover body.

use std::collections::HashMap;

use bytes::BytesMut;

use crate::config::DEFAULT_MAX_HEADER_BYTES;
use crate::error::Error;
use crate::protocol::http::h1::status_line::StatusLine;
use crate::protocol::http::packet::Packet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// Nothing fed since construction or reset.
    Empty,
    StatusLine,
    Headers,
    /// Terminator seen; `leftover()` holds the body bytes that came with it.
    HeadersComplete,
    /// Leftover taken by the caller.
    Terminal,
}

/// One response's header block. Create per response, or `reset()` to reuse.
pub struct ResponseParser {
    state: ParseState,
    buf: BytesMut,
    status: StatusLine,
    headers: HashMap<String, String>,
    leftover: Packet,
    /// Stream offset of the first body byte.
    body_offset: Option<usize>,
    /// Total bytes fed.
    consumed: usize,
    max_header_bytes: usize,
}

/// Position of the first CRLF in buf.
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

fn trim_header_token(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_control() || matches!(c, ' ' | '#' | ':'))
}

/// Split a header line on its first colon.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let name = trim_header_token(&line[..colon]);
    if name.is_empty() {
        return None;
    }
    Some((name, trim_header_token(&line[colon + 1..])))
}

impl ResponseParser {
    pub fn new() -> Self {
        Self::with_max_header_bytes(DEFAULT_MAX_HEADER_BYTES)
    }

    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self {
            state: ParseState::Empty,
            buf: BytesMut::with_capacity(1024),
            status: StatusLine::default(),
            headers: HashMap::new(),
            leftover: Packet::empty(),
            body_offset: None,
            consumed: 0,
            max_header_bytes,
        }
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = ParseState::Empty;
        self.buf.clear();
        self.status = StatusLine::default();
        self.headers.clear();
        self.leftover = Packet::empty();
        self.body_offset = None;
        self.consumed = 0;
    }

    /// Consume one packet. Packets must be fed in the order they were received.
    /// Returns `MalformedHeader` once more than `max_header_bytes` arrive without a terminator.
    pub fn feed(&mut self, packet: &Packet) -> Result<(), Error> {
        match self.state {
            ParseState::HeadersComplete | ParseState::Terminal => {
                tracing::debug!(bytes = packet.size(), "header already parsed, packet ignored");
                return Ok(());
            }
            ParseState::Empty => self.state = ParseState::StatusLine,
            ParseState::StatusLine | ParseState::Headers => {}
        }
        self.consumed += packet.size();
        self.buf.extend_from_slice(packet.payload());

        while let Some(line_end) = find_crlf(&self.buf) {
            let line = self.buf.split_to(line_end + 2);
            let text = String::from_utf8_lossy(&line[..line_end]);
            match self.state {
                ParseState::StatusLine => {
                    self.status = StatusLine::parse(&text);
                    self.state = ParseState::Headers;
                }
                ParseState::Headers if line_end == 0 => {
                    return self.complete();
                }
                ParseState::Headers => match split_header(&text) {
                    Some((name, value)) => {
                        self.headers.insert(name.to_string(), value.to_string());
                    }
                    None => tracing::debug!(line = %text, "header line without name ignored"),
                },
                _ => break,
            }
        }

        if self.consumed > self.max_header_bytes {
            return Err(Error::MalformedHeader(format!(
                "no header terminator within {} bytes",
                self.max_header_bytes
            )));
        }
        Ok(())
    }

    fn complete(&mut self) -> Result<(), Error> {
        // Whatever remains came after the terminator, all from the packet just fed.
        let rest = self.buf.split();
        self.body_offset = Some(self.consumed - rest.len());
        self.leftover = Packet::new(&rest)?;
        self.state = ParseState::HeadersComplete;
        tracing::debug!(
            headers = self.headers.len(),
            leftover = self.leftover.size(),
            "response header complete"
        );
        Ok(())
    }

    /// True once the header terminator has been seen.
    pub fn parsed(&self) -> bool {
        matches!(self.state, ParseState::HeadersComplete | ParseState::Terminal)
    }

    /// Value stored under exactly `key`, as received.
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }

    pub fn header_ignore_case(&self, key: &str) -> Option<&str> {
        self.header(key).or_else(|| {
            self.headers
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v.as_str())
        })
    }

    /// Only trustworthy once `parsed()` is true.
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn version(&self) -> &str {
        &self.status.version
    }

    pub fn status_code(&self) -> u16 {
        self.status.code
    }

    pub fn status_text(&self) -> &str {
        &self.status.text
    }

    /// Tokens before the version, set when the first line was a request line.
    pub fn command(&self) -> &str {
        &self.status.command
    }

    pub fn status_line(&self) -> &StatusLine {
        &self.status
    }

    /// Body bytes that arrived with the end of the header. Only meaningful after `parsed()`;
    /// empty before that.
    pub fn leftover(&self) -> &Packet {
        &self.leftover
    }

    /// Hand the leftover body to the caller; the parser is then done with this response.
    pub fn take_leftover(&mut self) -> Packet {
        if self.state == ParseState::HeadersComplete {
            self.state = ParseState::Terminal;
        }
        std::mem::take(&mut self.leftover)
    }

    pub fn body_offset(&self) -> Option<usize> {
        self.body_offset
    }

    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::new()
    }
}

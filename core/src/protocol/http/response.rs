/*
 * response.rs
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

//! Assembled response: status line, headers and the body collected so far.

use std::collections::HashMap;

use bytes::Bytes;

#[derive(Debug, Clone)]
pub struct Response {
    pub version: String,
    pub code: u16,
    pub reason: String,
    pub headers: HashMap<String, String>,
    /// Declared `Content-Length` (0 when absent or not a number).
    pub content_length: usize,
    pub body: Bytes,
}

impl Response {
    /// Exact-key lookup, as received.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// False when the peer closed before `content_length` body bytes arrived.
    pub fn is_complete(&self) -> bool {
        self.body.len() == self.content_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(code: u16, content_length: usize, body: &'static [u8]) -> Response {
        Response {
            version: "HTTP/1.1".into(),
            code,
            reason: String::new(),
            headers: HashMap::from([("Age".to_string(), "5".to_string())]),
            content_length,
            body: Bytes::from_static(body),
        }
    }

    #[test]
    fn completeness_follows_content_length() {
        assert!(response(200, 4, b"ABCD").is_complete());
        assert!(!response(200, 10, b"ABCD").is_complete());
    }

    #[test]
    fn success_range() {
        assert!(response(204, 0, b"").is_success());
        assert!(!response(404, 0, b"").is_success());
        assert_eq!(response(200, 0, b"").header("Age"), Some("5"));
        assert_eq!(response(200, 0, b"").header("age"), None);
    }
}

/*
 * request.rs
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

//! The only request this client sends: `GET <path> HTTP/1.1` with a `HOST` header.

use crate::protocol::http::h1::HTTP_VERSION;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub path: String,
    pub host: String,
}

impl Request {
    /// Empty `path` is sent as `/`.
    pub fn get(path: impl Into<String>, host: impl Into<String>) -> Self {
        let mut path = path.into();
        if path.is_empty() {
            path.push('/');
        }
        Self {
            path,
            host: host.into(),
        }
    }

    /// Wire form. No headers other than HOST, no body.
    pub fn encode(&self) -> Vec<u8> {
        format!(
            "GET {} {}\r\nHOST: {}\r\n\r\n",
            self.path, HTTP_VERSION, self.host
        )
        .into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_exact_wire_format() {
        let req = Request::get("/media/EsD2hGHWMAAq8D9?format=jpg", "pbs.twimg.com");
        assert_eq!(
            req.encode(),
            b"GET /media/EsD2hGHWMAAq8D9?format=jpg HTTP/1.1\r\nHOST: pbs.twimg.com\r\n\r\n"
        );
    }

    #[test]
    fn empty_path_becomes_root() {
        assert_eq!(Request::get("", "example.com").path, "/");
    }
}

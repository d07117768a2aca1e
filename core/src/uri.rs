/*
 * uri.rs
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

//! Fetch targets: split a URL into the host to connect to, the port, and the request path
//! (`location`). Authority parsing is done by the `url` crate, so any host works; there is
//! no domain-suffix matching. Input without a scheme is taken as `https://`.

use url::Url;

use crate::error::Error;
use crate::protocol::http::connection::DEFAULT_PORT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    /// Path plus `?query`; never empty.
    pub location: String,
}

impl Target {
    pub fn parse(input: &str) -> Result<Self, Error> {
        let input = input.trim();
        let url = if input.contains("://") {
            Url::parse(input)
        } else {
            Url::parse(&format!("https://{}", input))
        }
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", input, e)))?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Error::InvalidUrl(format!("{}: no host", input)))?;
        // IPv6 literals come back bracketed
        let host = host.trim_start_matches('[').trim_end_matches(']').to_string();

        let port = url.port_or_known_default().unwrap_or(DEFAULT_PORT);
        let mut location = url.path().to_string();
        if location.is_empty() {
            location.push('/');
        }
        if let Some(query) = url.query() {
            location.push('?');
            location.push_str(query);
        }

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port,
            location,
        })
    }

    pub fn is_secure(&self) -> bool {
        self.scheme == "https"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_url_with_query() {
        let t = Target::parse("https://pbs.twimg.com/media/EsD2hGHWMAAq8D9?format=jpg&name=360x360")
            .unwrap();
        assert_eq!(t.host, "pbs.twimg.com");
        assert_eq!(t.port, 443);
        assert_eq!(t.location, "/media/EsD2hGHWMAAq8D9?format=jpg&name=360x360");
        assert!(t.is_secure());
    }

    #[test]
    fn any_top_level_domain() {
        let t = Target::parse("https://images.example.org/a/b.png").unwrap();
        assert_eq!(t.host, "images.example.org");
        assert_eq!(t.location, "/a/b.png");
    }

    #[test]
    fn missing_scheme_assumes_https() {
        let t = Target::parse("example.net/img.jpg").unwrap();
        assert_eq!(t.scheme, "https");
        assert_eq!(t.host, "example.net");
        assert_eq!(t.port, 443);
        assert_eq!(t.location, "/img.jpg");
    }

    #[test]
    fn explicit_port_and_plain_http() {
        let t = Target::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(t.host, "127.0.0.1");
        assert_eq!(t.port, 8080);
        assert_eq!(t.location, "/");
        assert!(!t.is_secure());
    }

    #[test]
    fn unknown_scheme_uses_default_port() {
        let t = Target::parse("gopher2://host.test/x").unwrap();
        assert_eq!(t.port, DEFAULT_PORT);
    }

    #[test]
    fn fragment_is_dropped() {
        let t = Target::parse("https://example.com/page#top").unwrap();
        assert_eq!(t.location, "/page");
    }

    #[test]
    fn no_host_is_invalid() {
        assert!(matches!(Target::parse("https://"), Err(Error::InvalidUrl(_))));
        assert!(matches!(Target::parse("file:///tmp/x"), Err(Error::InvalidUrl(_))));
    }
}

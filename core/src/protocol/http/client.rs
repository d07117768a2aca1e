/*
 * client.rs
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

//! Fetcher: one URL in, one body out.
//!
//! Connect, send the GET, feed packets to the parser until the header is complete, then keep
//! receiving `min(remaining, packet size)` until `Content-Length` bytes are in hand or the peer
//! closes. A close before the end yields a truncated response (reported as `ShortBody`), not
//! a retry.

use std::sync::Arc;

use bytes::BytesMut;

use crate::config::FetchConfig;
use crate::error::Error;
use crate::net::{Connector, RustlsConnector};
use crate::protocol::http::connection::Connection;
use crate::protocol::http::decoder::{BodyDecoder, DecodedImage};
use crate::protocol::http::h1::ResponseParser;
use crate::protocol::http::packet::PACKET_SIZE;
use crate::protocol::http::request::Request;
use crate::protocol::http::response::Response;
use crate::report::{ErrorReporter, LogReporter};
use crate::uri::Target;

const CONTENT_LENGTH: &str = "Content-Length";

/// Drives one Connection and one ResponseParser per fetch. Fetches run one after another.
pub struct Fetcher<C: Connector = RustlsConnector> {
    connection: Connection<C>,
    parser: ResponseParser,
    config: FetchConfig,
    reporter: Arc<dyn ErrorReporter>,
}

impl Fetcher<RustlsConnector> {
    /// TLS fetcher that logs errors through `tracing`. Only `https` URLs are accepted; use
    /// `with_connector(PlainConnector, ..)` for `http`.
    pub fn new(config: FetchConfig) -> Self {
        Self::with_connector(RustlsConnector::new(), config, Arc::new(LogReporter))
    }
}

impl<C: Connector> Fetcher<C> {
    pub fn with_connector(connector: C, config: FetchConfig, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            connection: Connection::new(connector, reporter.clone()),
            parser: ResponseParser::with_max_header_bytes(config.max_header_bytes),
            config,
            reporter,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn fail(&self, error: Error) -> Error {
        self.reporter.report(&error);
        error
    }

    /// GET `url` and collect its body. The connection is closed afterwards, whatever the outcome.
    pub async fn fetch(&mut self, url: &str) -> Result<Response, Error> {
        let target = Target::parse(url).map_err(|e| self.fail(e))?;
        if !self.connection.connector().supports(&target) {
            return Err(self.fail(Error::InvalidUrl(format!(
                "{}: scheme {} not handled by this connector",
                url, target.scheme
            ))));
        }
        let port = self.config.port.unwrap_or(target.port);
        let result = self.exchange(&target, port).await;
        self.connection.close().await;
        result
    }

    async fn exchange(&mut self, target: &Target, port: u16) -> Result<Response, Error> {
        // connection errors are already reported by the connection
        self.connection
            .connect(&target.host, self.config.role, port)
            .await?;

        let request = Request::get(target.location.clone(), target.host.clone());
        self.connection.send(&request.encode()).await?;
        tracing::debug!(host = %target.host, port, location = %target.location, "request sent");

        let packet_size = self.config.packet_size();
        self.parser.reset();
        while !self.parser.parsed() {
            let packet = self.connection.receive(packet_size).await?;
            if packet.is_empty() {
                return Err(self.fail(Error::MalformedHeader(
                    "connection closed before end of header".into(),
                )));
            }
            if let Err(e) = self.parser.feed(&packet) {
                return Err(self.fail(e));
            }
        }

        let content_length = self.content_length();
        // declared length is untrusted; grow as bytes actually arrive
        let mut body = BytesMut::with_capacity(content_length.min(PACKET_SIZE));
        let leftover = self.parser.take_leftover();
        let seed = leftover.size().min(content_length);
        if leftover.size() > content_length {
            tracing::debug!(
                extra = leftover.size() - content_length,
                "bytes past Content-Length dropped"
            );
        }
        body.extend_from_slice(&leftover.payload()[..seed]);

        while body.len() < content_length {
            let remaining = content_length - body.len();
            let packet = self.connection.receive(remaining.min(packet_size)).await?;
            if packet.is_empty() {
                break;
            }
            let take = packet.size().min(remaining);
            body.extend_from_slice(&packet.payload()[..take]);
        }

        if body.len() < content_length {
            // truncated body is still returned; the reporter hears about it
            self.reporter.report(&Error::ShortBody {
                expected: content_length,
                received: body.len(),
            });
        } else {
            tracing::debug!(bytes = body.len(), "body complete");
        }

        Ok(Response {
            version: self.parser.version().to_string(),
            code: self.parser.status_code(),
            reason: self.parser.status_text().to_string(),
            headers: self.parser.headers().clone(),
            content_length,
            body: body.freeze(),
        })
    }

    /// `Content-Length` from the parsed header; absent or not a number means 0.
    fn content_length(&self) -> usize {
        match self.parser.header_ignore_case(CONTENT_LENGTH) {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                tracing::debug!(value, "non-numeric Content-Length, treating as 0");
                0
            }),
            None => 0,
        }
    }

    /// Fetch, then hand the body to `decoder` only if all `Content-Length` bytes arrived.
    pub async fn fetch_decoded<D: BodyDecoder>(
        &mut self,
        url: &str,
        decoder: &D,
    ) -> Result<DecodedImage, Error> {
        let response = self.fetch(url).await?;
        if !response.is_complete() {
            return Err(Error::ShortBody {
                expected: response.content_length,
                received: response.body.len(),
            });
        }
        decoder.decode(&response.body).map_err(|e| self.fail(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::http::testing::{RecordingReporter, ScriptedConnector};
    use std::sync::atomic::Ordering;

    const HEADER: &[u8] = b"HTTP/1.1 200 OK\r\nAge: 23917\r\nContent-Length: 4\r\n\r\n";
    const URL: &str = "https://127.0.0.1/image.png";

    fn fetcher(connector: ScriptedConnector) -> (Fetcher<ScriptedConnector>, RecordingReporter) {
        let reporter = RecordingReporter::default();
        let fetcher =
            Fetcher::with_connector(connector, FetchConfig::default(), Arc::new(reporter.clone()));
        (fetcher, reporter)
    }

    fn with_body(header: &[u8], body: &[u8]) -> Vec<u8> {
        let mut data = header.to_vec();
        data.extend_from_slice(body);
        data
    }

    #[tokio::test]
    async fn body_in_header_packet_needs_no_more_receives() {
        let connector = ScriptedConnector::new(vec![with_body(HEADER, b"ABCD")]);
        let receives = connector.receives();
        let sent = connector.sent();
        let (mut fetcher, reporter) = fetcher(connector);

        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(response.header("Age"), Some("23917"));
        assert_eq!(&response.body[..], b"ABCD");
        assert!(response.is_complete());
        assert_eq!(response.code, 200);
        assert_eq!(receives.load(Ordering::SeqCst), 1);
        assert_eq!(
            &*sent.lock().unwrap(),
            b"GET /image.png HTTP/1.1\r\nHOST: 127.0.0.1\r\n\r\n"
        );
        assert!(reporter.kinds().is_empty());
    }

    #[tokio::test]
    async fn body_converges_across_uneven_chunks() {
        let body: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
        let header = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
        let mut chunks = vec![
            header.as_bytes()[..10].to_vec(),
            with_body(&header.as_bytes()[10..], &body[..7]),
        ];
        let mut at = 7;
        for size in [1usize, 13, 999, 2, 1500].iter().cycle() {
            if at >= body.len() {
                break;
            }
            let end = (at + size).min(body.len());
            chunks.push(body[at..end].to_vec());
            at = end;
        }
        let (mut fetcher, reporter) = fetcher(ScriptedConnector::new(chunks));

        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(response.content_length, body.len());
        assert_eq!(&response.body[..], &body[..]);
        assert!(reporter.kinds().is_empty());
    }

    #[tokio::test]
    async fn body_larger_than_a_packet() {
        let body = vec![b'z'; PACKET_SIZE * 2 + 17];
        let header = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
        let connector = ScriptedConnector::new(vec![header.into_bytes(), body.clone()]);
        let (mut fetcher, _) = fetcher(connector);
        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(response.body.len(), body.len());
        assert!(response.is_complete());
    }

    #[tokio::test]
    async fn early_close_returns_truncated_body() {
        let header = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n";
        let connector = ScriptedConnector::new(vec![with_body(header, b"abc"), b"de".to_vec()]);
        let (mut fetcher, reporter) = fetcher(connector);

        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(&response.body[..], b"abcde");
        assert!(!response.is_complete());
        assert_eq!(reporter.kinds(), vec![ErrorKind::ShortBody]);
    }

    #[tokio::test]
    async fn missing_or_bad_content_length_means_empty_body() {
        for header in [
            &b"HTTP/1.1 200 OK\r\nAge: 1\r\n\r\n"[..],
            &b"HTTP/1.1 200 OK\r\nContent-Length: lots\r\n\r\n"[..],
        ] {
            let connector = ScriptedConnector::new(vec![with_body(header, b"ignored")]);
            let receives = connector.receives();
            let (mut fetcher, _) = fetcher(connector);
            let response = fetcher.fetch(URL).await.unwrap();
            assert!(response.body.is_empty());
            assert!(response.is_complete());
            assert_eq!(receives.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn lowercase_content_length_is_honoured() {
        let header = b"HTTP/1.1 200 OK\r\ncontent-length: 3\r\n\r\n";
        let connector = ScriptedConnector::new(vec![header.to_vec(), b"xyz".to_vec()]);
        let (mut fetcher, _) = fetcher(connector);
        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(&response.body[..], b"xyz");
    }

    #[tokio::test]
    async fn leftover_past_content_length_is_dropped() {
        let connector = ScriptedConnector::new(vec![with_body(HEADER, b"ABCDEFG")]);
        let (mut fetcher, _) = fetcher(connector);
        let response = fetcher.fetch(URL).await.unwrap();
        assert_eq!(&response.body[..], b"ABCD");
    }

    #[tokio::test]
    async fn close_before_header_end_is_malformed() {
        let connector = ScriptedConnector::new(vec![b"HTTP/1.1 200 OK\r\nAge: 1\r\n".to_vec()]);
        let (mut fetcher, reporter) = fetcher(connector);
        let err = fetcher.fetch(URL).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedHeader);
        assert_eq!(reporter.kinds(), vec![ErrorKind::MalformedHeader]);
    }

    #[tokio::test]
    async fn connect_failure_aborts_fetch() {
        let (mut fetcher, reporter) = fetcher(ScriptedConnector::refusing());
        let err = fetcher.fetch(URL).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConnectionFailure);
        assert_eq!(reporter.kinds(), vec![ErrorKind::ConnectionFailure]);
    }

    #[tokio::test]
    async fn receive_failure_mid_body_is_fatal_error() {
        let header = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n";
        let connector = ScriptedConnector::new(vec![header.to_vec()]).fail_after_script();
        let (mut fetcher, reporter) = fetcher(connector);
        let err = fetcher.fetch(URL).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReceiveFailure);
        assert_eq!(err.severity(), crate::error::Severity::Fatal);
        assert_eq!(reporter.kinds(), vec![ErrorKind::ReceiveFailure]);
    }

    #[tokio::test]
    async fn invalid_url_is_reported() {
        let (mut fetcher, reporter) = fetcher(ScriptedConnector::new(Vec::new()));
        let err = fetcher.fetch("https://").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert_eq!(reporter.kinds(), vec![ErrorKind::InvalidUrl]);
    }

    #[tokio::test]
    async fn huge_content_length_does_not_preallocate() {
        for declared in ["18446744073709551615", "99999999999"] {
            let header = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", declared);
            let connector = ScriptedConnector::new(vec![with_body(header.as_bytes(), b"abc")]);
            let (mut fetcher, reporter) = fetcher(connector);

            let response = fetcher.fetch(URL).await.unwrap();
            assert_eq!(response.content_length, declared.parse::<usize>().unwrap());
            assert_eq!(&response.body[..], b"abc");
            assert!(!response.is_complete());
            assert_eq!(reporter.kinds(), vec![ErrorKind::ShortBody]);
        }
    }

    #[tokio::test]
    async fn tls_fetcher_rejects_plain_http() {
        let reporter = RecordingReporter::default();
        let mut fetcher = Fetcher::with_connector(
            RustlsConnector::new(),
            FetchConfig::default(),
            Arc::new(reporter.clone()),
        );
        let err = fetcher.fetch("http://127.0.0.1/x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert_eq!(reporter.kinds(), vec![ErrorKind::InvalidUrl]);
    }

    #[tokio::test]
    async fn plain_fetcher_rejects_https() {
        let mut fetcher = Fetcher::with_connector(
            crate::net::PlainConnector,
            FetchConfig::default(),
            Arc::new(crate::report::NoopReporter),
        );
        let err = fetcher.fetch("https://127.0.0.1/x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
    }

    #[tokio::test]
    async fn fetcher_is_reusable() {
        let connector = ScriptedConnector::new(vec![with_body(HEADER, b"ABCD")]);
        let (mut fetcher, _) = fetcher(connector);
        let first = fetcher.fetch(URL).await.unwrap();
        let second = fetcher.fetch(URL).await.unwrap();
        assert_eq!(first.body, second.body);
    }

    #[tokio::test]
    async fn decoder_runs_on_complete_body() {
        let connector = ScriptedConnector::new(vec![with_body(HEADER, b"ABCD")]);
        let (mut fetcher, _) = fetcher(connector);
        let decoder = |body: &[u8]| -> Result<DecodedImage, Error> {
            Ok(DecodedImage {
                width: 1,
                height: 1,
                channels: 4,
                pixels: body.to_vec(),
            })
        };
        let image = fetcher.fetch_decoded(URL, &decoder).await.unwrap();
        assert_eq!(image.pixels, b"ABCD");
    }

    #[tokio::test]
    async fn decoder_skipped_on_short_body() {
        let header = b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n";
        let connector = ScriptedConnector::new(vec![with_body(header, b"abc")]);
        let (mut fetcher, _) = fetcher(connector);
        let decoder = |_: &[u8]| -> Result<DecodedImage, Error> {
            panic!("decoder must not see a truncated body")
        };
        let err = fetcher.fetch_decoded(URL, &decoder).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ShortBody {
                expected: 10,
                received: 3
            }
        ));
    }
}

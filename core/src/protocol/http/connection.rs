/*
 * connection.rs
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

//! One TLS-wrapped socket: resolve, connect, send, receive packets.
//!
//! Every failure flips `valid` to false and goes to the reporter before being returned.
//! Once invalid, send/receive do no I/O until the next successful `connect`.

use std::net::SocketAddr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::net::{Connector, SecureChannel};
use crate::protocol::http::packet::{Packet, PACKET_SIZE};
use crate::report::ErrorReporter;

/// Port used when nothing else names one.
pub const DEFAULT_PORT: u16 = 80;

/// TLS role taken on the connected socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Server,
}

pub struct Connection<C: Connector> {
    connector: C,
    channel: Option<C::Channel>,
    reporter: Arc<dyn ErrorReporter>,
    host: String,
    peer: Option<SocketAddr>,
    valid: bool,
    scratch: Box<[u8]>,
}

impl<C: Connector> Connection<C> {
    pub fn new(connector: C, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            connector,
            channel: None,
            reporter,
            host: String::new(),
            peer: None,
            valid: false,
            scratch: vec![0u8; PACKET_SIZE].into_boxed_slice(),
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        self.valid = false;
        self.reporter.report(&error);
        error
    }

    /// Resolve `host` to an IPv4 address, connect, and run the TLS handshake in `role`.
    /// Any previous channel is dropped first.
    pub async fn connect(&mut self, host: &str, role: Role, port: u16) -> Result<(), Error> {
        self.channel = None;
        self.valid = false;
        self.host = host.to_string();
        self.peer = None;

        let peer = match resolve_ipv4(host, port).await {
            Some(peer) => peer,
            None => return Err(self.fail(Error::InvalidIp(host.to_string()))),
        };
        self.peer = Some(peer);
        tracing::debug!(host, %peer, ?role, "connecting");

        match self.connector.open(host, peer, role).await {
            Ok(channel) => {
                self.channel = Some(channel);
                self.valid = true;
                tracing::info!(host, %peer, "connected");
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Write all of `data`. A failed or short write invalidates the connection.
    pub async fn send(&mut self, data: &[u8]) -> Result<(), Error> {
        let channel = match self.channel.as_mut() {
            Some(channel) if self.valid => channel,
            _ => return Err(Error::NotConnected),
        };
        match channel.send(data).await {
            Ok(()) => {
                tracing::trace!(bytes = data.len(), "sent");
                Ok(())
            }
            Err(e) => Err(self.fail(Error::SendFailure(e))),
        }
    }

    /// Read at most `max_bytes` (clamped into `1..=PACKET_SIZE`). An empty packet means the
    /// peer closed; the connection stays valid in that case.
    pub async fn receive(&mut self, max_bytes: usize) -> Result<Packet, Error> {
        let max = max_bytes.clamp(1, PACKET_SIZE);
        let channel = match self.channel.as_mut() {
            Some(channel) if self.valid => channel,
            _ => return Err(Error::NotConnected),
        };
        self.scratch.fill(0);
        match channel.receive(&mut self.scratch[..max]).await {
            Ok(n) => {
                tracing::trace!(bytes = n, requested = max, "received");
                Packet::new(&self.scratch[..n])
            }
            Err(e) => Err(self.fail(Error::ReceiveFailure(e))),
        }
    }

    /// True only after a successful `connect` with no failed send/receive since.
    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Shut the channel down and release it. The connection is invalid afterwards.
    pub async fn close(&mut self) {
        self.valid = false;
        if let Some(mut channel) = self.channel.take() {
            if let Err(e) = channel.shutdown().await {
                tracing::debug!(host = %self.host, error = %e, "shutdown failed");
            }
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }
}

/// First IPv4 address `host` resolves to.
async fn resolve_ipv4(host: &str, port: u16) -> Option<SocketAddr> {
    match tokio::net::lookup_host((host, port)).await {
        Ok(mut addrs) => addrs.find(SocketAddr::is_ipv4),
        Err(e) => {
            tracing::debug!(host, error = %e, "lookup failed");
            None
        }
    }
}

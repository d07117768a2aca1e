/*
 * error.rs
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

//! Connection, parser and fetch errors.
//!
//! `Error` carries the cause; `ErrorKind` is the copyable classification used for
//! severity and reporting.

use std::io;

/// Errors from Connection, ResponseParser, Fetcher and configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("socket creation failure: {0}")]
    SocketCreationFailure(#[source] io::Error),

    #[error("TLS context failure: {0}")]
    SslContextFailure(String),

    #[error("TLS handshake failure: {0}")]
    SslConnectionFailure(#[source] io::Error),

    /// Socket descriptor could not be prepared for the TLS session.
    #[error("TLS socket setup failure: {0}")]
    SslFdFailure(#[source] io::Error),

    #[error("private key check failure: {0}")]
    SslPrivateKeyCheckFailure(String),

    /// TCP connect failed or was refused.
    #[error("error establishing connection: {0}")]
    ConnectionFailure(#[source] io::Error),

    #[error("connection send failure: {0}")]
    SendFailure(#[source] io::Error),

    #[error("connection receive failure: {0}")]
    ReceiveFailure(#[source] io::Error),

    /// Name resolution produced no IPv4 address.
    #[error("could not find an IPv4 address for {0}")]
    InvalidIp(String),

    #[error("bad read: {0}")]
    InvalidRead(String),

    #[error("{len} bytes exceed packet capacity of {capacity}")]
    CapacityExceeded { len: usize, capacity: usize },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// Peer closed before `Content-Length` bytes arrived.
    #[error("short body: received {received} of {expected} bytes")]
    ShortBody { expected: usize, received: usize },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Send or receive on a connection that is not (or no longer) valid.
    #[error("connection is not valid")]
    NotConnected,

    #[error("decode failure: {0}")]
    DecodeFailure(String),

    #[error("config file: {0}")]
    ConfigIo(#[source] io::Error),

    #[error("config parse: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// How seriously the surrounding application should take an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    None,
    Warning,
    Fatal,
}

/// Classification of an [`Error`]. `None` is the "no error" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorKind {
    #[default]
    None,
    SocketCreationFailure,
    SslContextFailure,
    SslConnectionFailure,
    SslFdFailure,
    SslPrivateKeyCheckFailure,
    ConnectionFailure,
    SendFailure,
    ReceiveFailure,
    InvalidIp,
    InvalidRead,
    CapacityExceeded,
    MalformedHeader,
    ShortBody,
    InvalidUrl,
    NotConnected,
    DecodeFailure,
    Config,
}

impl ErrorKind {
    pub fn severity(self) -> Severity {
        match self {
            ErrorKind::ReceiveFailure => Severity::Fatal,
            ErrorKind::ShortBody | ErrorKind::MalformedHeader => Severity::Warning,
            _ => Severity::None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ErrorKind::None => "None",
            ErrorKind::SocketCreationFailure => "Socket Creation Failure",
            ErrorKind::SslContextFailure => "SSL Context Failure",
            ErrorKind::SslConnectionFailure => "SSL Connection Failure",
            ErrorKind::SslFdFailure => "SSL File Descriptor Failure",
            ErrorKind::SslPrivateKeyCheckFailure => "SSL Private Key Failure",
            ErrorKind::ConnectionFailure => "Error Establishing Connection",
            ErrorKind::SendFailure => "Connection Send Failure",
            ErrorKind::ReceiveFailure => "Connection Receive Failure",
            ErrorKind::InvalidIp => "Could not find the IP of the hostname",
            ErrorKind::InvalidRead => "Bad Read",
            ErrorKind::CapacityExceeded => "Packet Capacity Exceeded",
            ErrorKind::MalformedHeader => "Malformed Header",
            ErrorKind::ShortBody => "Short Body",
            ErrorKind::InvalidUrl => "Invalid URL",
            ErrorKind::NotConnected => "Connection Not Valid",
            ErrorKind::DecodeFailure => "Decode Failure",
            ErrorKind::Config => "Configuration Failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SocketCreationFailure(_) => ErrorKind::SocketCreationFailure,
            Error::SslContextFailure(_) => ErrorKind::SslContextFailure,
            Error::SslConnectionFailure(_) => ErrorKind::SslConnectionFailure,
            Error::SslFdFailure(_) => ErrorKind::SslFdFailure,
            Error::SslPrivateKeyCheckFailure(_) => ErrorKind::SslPrivateKeyCheckFailure,
            Error::ConnectionFailure(_) => ErrorKind::ConnectionFailure,
            Error::SendFailure(_) => ErrorKind::SendFailure,
            Error::ReceiveFailure(_) => ErrorKind::ReceiveFailure,
            Error::InvalidIp(_) => ErrorKind::InvalidIp,
            Error::InvalidRead(_) => ErrorKind::InvalidRead,
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::MalformedHeader(_) => ErrorKind::MalformedHeader,
            Error::ShortBody { .. } => ErrorKind::ShortBody,
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::NotConnected => ErrorKind::NotConnected,
            Error::DecodeFailure(_) => ErrorKind::DecodeFailure,
            Error::ConfigIo(_) | Error::ConfigParse(_) => ErrorKind::Config,
        }
    }

    pub fn severity(&self) -> Severity {
        self.kind().severity()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

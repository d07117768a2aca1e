/*
 * net.rs
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

//! Socket and TLS plumbing under the Connection.
//!
//! A `Connector` turns a resolved peer address into a `SecureChannel`: TCP socket, connect,
//! then (for `RustlsConnector`) a rustls handshake in the requested role. `NetStream` is the
//! channel both connectors hand out.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::{TcpSocket, TcpStream};
use tokio_rustls::client::TlsStream as ClientTlsStream;
use tokio_rustls::rustls::client::ClientConfig;
use tokio_rustls::rustls::pki_types::{CertificateDer, PrivateKeyDer, ServerName};
use tokio_rustls::rustls::server::ServerConfig;
use tokio_rustls::rustls::RootCertStore;
use tokio_rustls::server::TlsStream as ServerTlsStream;
use tokio_rustls::{TlsAcceptor, TlsConnector};

use crate::error::Error;
use crate::protocol::http::connection::Role;
use crate::uri::Target;

/// Byte pipe for one exchange. `receive` returning 0 means the peer closed.
pub trait SecureChannel: Send {
    fn send(&mut self, data: &[u8]) -> impl Future<Output = io::Result<()>> + Send;

    fn receive(&mut self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;

    fn shutdown(&mut self) -> impl Future<Output = io::Result<()>> + Send;
}

/// Opens a channel to an already-resolved peer. `host` is the name used for SNI.
pub trait Connector: Send + Sync {
    type Channel: SecureChannel;

    /// Whether this connector can serve `target`'s scheme.
    fn supports(&self, _target: &Target) -> bool {
        true
    }

    fn open(
        &self,
        host: &str,
        peer: SocketAddr,
        role: Role,
    ) -> impl Future<Output = Result<Self::Channel, Error>> + Send;
}

/// Build a root certificate store: platform native certs first, then webpki-roots as fallback.
fn build_root_store() -> RootCertStore {
    let mut root_store = RootCertStore::empty();
    match rustls_native_certs::load_native_certs() {
        Ok(certs) => {
            for cert in certs {
                let _ = root_store.add(cert);
            }
        }
        Err(e) => tracing::debug!(error = %e, "native certificates unavailable"),
    }
    if root_store.is_empty() {
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }
    root_store
}

/// TLS client config for HTTP/1.1 (ALPN `http/1.1`, no client auth).
pub fn http_client_config() -> Arc<ClientConfig> {
    let mut config = ClientConfig::builder()
        .with_root_certificates(build_root_store())
        .with_no_client_auth();
    config.alpn_protocols = vec![b"http/1.1".to_vec()];
    Arc::new(config)
}

/// Plain TCP or TLS in either role.
pub enum NetStream {
    Plain(TcpStream),
    Client(Box<ClientTlsStream<TcpStream>>),
    Server(Box<ServerTlsStream<TcpStream>>),
}

impl AsyncRead for NetStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match &mut *self {
            NetStream::Plain(s) => Pin::new(s).poll_read(cx, buf),
            NetStream::Client(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
            NetStream::Server(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for NetStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match &mut *self {
            NetStream::Plain(s) => Pin::new(s).poll_write(cx, buf),
            NetStream::Client(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
            NetStream::Server(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            NetStream::Plain(s) => Pin::new(s).poll_flush(cx),
            NetStream::Client(s) => Pin::new(s.as_mut()).poll_flush(cx),
            NetStream::Server(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match &mut *self {
            NetStream::Plain(s) => Pin::new(s).poll_shutdown(cx),
            NetStream::Client(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
            NetStream::Server(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}

impl SecureChannel for NetStream {
    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.write_all(data).await?;
        self.flush().await
    }

    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read(buf).await
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        AsyncWriteExt::shutdown(self).await
    }
}

/// Create a socket for the peer's address family and connect it.
async fn open_tcp(peer: SocketAddr) -> Result<TcpStream, Error> {
    let socket = match peer {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .map_err(Error::SocketCreationFailure)?;
    socket.connect(peer).await.map_err(Error::ConnectionFailure)
}

/// TCP without TLS (http:// targets).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainConnector;

impl Connector for PlainConnector {
    type Channel = NetStream;

    fn supports(&self, target: &Target) -> bool {
        !target.is_secure()
    }

    async fn open(&self, host: &str, peer: SocketAddr, _role: Role) -> Result<NetStream, Error> {
        let tcp = open_tcp(peer).await?;
        tracing::debug!(host, %peer, "tcp connected");
        Ok(NetStream::Plain(tcp))
    }
}

/// TCP + rustls. Client role verifies the server against native/webpki roots;
/// server role needs an identity set with `with_server_identity`.
#[derive(Clone)]
pub struct RustlsConnector {
    connector: TlsConnector,
    acceptor: Option<TlsAcceptor>,
}

impl RustlsConnector {
    pub fn new() -> Self {
        Self::with_client_config(http_client_config())
    }

    pub fn with_client_config(config: Arc<ClientConfig>) -> Self {
        Self {
            connector: TlsConnector::from(config),
            acceptor: None,
        }
    }

    /// Enable `Role::Server` with the given certificate chain and private key.
    /// Fails with `SslPrivateKeyCheckFailure` if rustls rejects the pair.
    pub fn with_server_identity(
        mut self,
        certs: Vec<CertificateDer<'static>>,
        key: PrivateKeyDer<'static>,
    ) -> Result<Self, Error> {
        let config = ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| Error::SslPrivateKeyCheckFailure(e.to_string()))?;
        self.acceptor = Some(TlsAcceptor::from(Arc::new(config)));
        Ok(self)
    }
}

impl Default for RustlsConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for RustlsConnector {
    type Channel = NetStream;

    fn supports(&self, target: &Target) -> bool {
        target.is_secure()
    }

    async fn open(&self, host: &str, peer: SocketAddr, role: Role) -> Result<NetStream, Error> {
        let tcp = open_tcp(peer).await?;
        tcp.set_nodelay(true).map_err(Error::SslFdFailure)?;

        match role {
            Role::Client => {
                let server_name = ServerName::try_from(host)
                    .map(|name| name.to_owned())
                    .map_err(|_| Error::SslContextFailure(format!("invalid host name {}", host)))?;
                let tls = self
                    .connector
                    .connect(server_name, tcp)
                    .await
                    .map_err(Error::SslConnectionFailure)?;
                tracing::debug!(host, %peer, "tls client handshake complete");
                Ok(NetStream::Client(Box::new(tls)))
            }
            Role::Server => {
                let acceptor = self.acceptor.as_ref().ok_or_else(|| {
                    Error::SslContextFailure("server role requires a server identity".into())
                })?;
                let tls = acceptor
                    .accept(tcp)
                    .await
                    .map_err(Error::SslConnectionFailure)?;
                tracing::debug!(host, %peer, "tls server handshake complete");
                Ok(NetStream::Server(Box::new(tls)))
            }
        }
    }
}

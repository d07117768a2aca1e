/*
 * mod.rs
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

//! HTTP/1.1 GET over a TLS socket, one bounded packet at a time.
//!
//! - `Connection` owns the socket and reports every failure before returning it.
//! - `h1::ResponseParser` is fed packets until the header block ends; bytes past it are
//!   kept as the first body fragment.
//! - `Fetcher` ties both together and reads exactly `Content-Length` body bytes.

pub mod client;
pub mod connection;
pub mod decoder;
pub mod h1;
pub mod packet;
pub mod request;
pub mod response;

#[cfg(test)]
mod testing;

pub use client::Fetcher;
pub use connection::{Connection, Role, DEFAULT_PORT};
pub use decoder::{BodyDecoder, DecodedImage};
pub use packet::{Packet, PACKET_SIZE};
pub use request::Request;
pub use response::Response;

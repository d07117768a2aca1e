/*
 * packet.rs
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

//! Fixed-capacity byte buffer exchanged with the connection layer.

use crate::error::Error;

/// Capacity of every packet, and the largest amount a single receive may return.
pub const PACKET_SIZE: usize = 20_000;

/// Owned buffer of `PACKET_SIZE` bytes plus a logical length.
///
/// Bytes past `size()` are always zero. A zero-length packet means the peer closed.
/// Cloning copies the whole buffer; the buffer is zeroed again on drop since it
/// holds decrypted TLS plaintext.
#[derive(Clone)]
pub struct Packet {
    payload: Box<[u8]>,
    len: usize,
}

impl Packet {
    /// End-of-stream packet.
    pub fn empty() -> Self {
        Self {
            payload: vec![0u8; PACKET_SIZE].into_boxed_slice(),
            len: 0,
        }
    }

    /// Copy `data` into a new packet.
    pub fn new(data: &[u8]) -> Result<Self, Error> {
        if data.len() > PACKET_SIZE {
            return Err(Error::CapacityExceeded {
                len: data.len(),
                capacity: PACKET_SIZE,
            });
        }
        let mut packet = Self::empty();
        packet.payload[..data.len()].copy_from_slice(data);
        packet.len = data.len();
        Ok(packet)
    }

    pub fn size(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The first `size()` bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.len]
    }

    pub const fn capacity() -> usize {
        PACKET_SIZE
    }
}

impl Default for Packet {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for Packet {
    fn drop(&mut self) {
        self.payload.fill(0);
        self.len = 0;
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        self.payload()
    }
}

impl PartialEq for Packet {
    fn eq(&self, other: &Self) -> bool {
        self.payload() == other.payload()
    }
}

impl Eq for Packet {}

impl std::fmt::Debug for Packet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packet").field("len", &self.len).finish()
    }
}

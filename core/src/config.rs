/*
 * config.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Packetfetch.
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

//! Fetch configuration: packet sizing, header limit, TLS role and port override.
//! Loaded from JSON (file or string); every field is optional and falls back to its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::protocol::http::connection::Role;
use crate::protocol::http::packet::PACKET_SIZE;

/// Default cap on bytes fed to the parser before the header terminator.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Largest single receive request. Clamped into `1..=PACKET_SIZE`.
    pub max_packet_size: usize,
    pub max_header_bytes: usize,
    pub role: Role,
    /// Overrides the port derived from the URL.
    pub port: Option<u16>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_packet_size: PACKET_SIZE,
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
            role: Role::Client,
            port: None,
        }
    }
}

impl FetchConfig {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: FetchConfig = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let json = fs::read_to_string(path).map_err(Error::ConfigIo)?;
        Self::from_json(&json)
    }

    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(Error::ConfigIo)
    }

    /// Receive size actually used by the fetcher.
    pub fn packet_size(&self) -> usize {
        self.max_packet_size.clamp(1, PACKET_SIZE)
    }

    fn normalized(mut self) -> Self {
        self.max_packet_size = self.packet_size();
        self
    }
}

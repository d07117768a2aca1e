/*
 * decoder.rs
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

//! Hook for whatever turns a downloaded body into pixels. No codec lives here.

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

/// Called by `Fetcher::fetch_decoded` only with a body of exactly `Content-Length` bytes.
pub trait BodyDecoder {
    fn decode(&self, body: &[u8]) -> Result<DecodedImage, Error>;
}

impl<F> BodyDecoder for F
where
    F: Fn(&[u8]) -> Result<DecodedImage, Error>,
{
    fn decode(&self, body: &[u8]) -> Result<DecodedImage, Error> {
        self(body)
    }
}

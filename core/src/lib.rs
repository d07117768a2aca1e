/*
 * lib.rs
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

//! Packetfetch core: fetch a resource over HTTPS in fixed-size packets.

pub mod config;
pub mod error;
pub mod net;
pub mod protocol;
pub mod report;
pub mod uri;

pub use config::FetchConfig;
pub use error::{Error, ErrorKind, Result, Severity};
pub use net::{Connector, PlainConnector, RustlsConnector, SecureChannel};
pub use protocol::http::{Fetcher, Response, Role};
pub use report::{ErrorReporter, ErrorSink, LogReporter, NoopReporter};

/*
 * testing.rs
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

//! In-memory connector for tests: replays scripted chunks, records what was sent.

use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::{Error, ErrorKind};
use crate::net::{Connector, SecureChannel};
use crate::protocol::http::connection::Role;
use crate::report::ErrorReporter;

/// Each chunk is delivered by one or more receives; a receive never spans two chunks.
pub struct ScriptedConnector {
    chunks: Vec<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
    receives: Arc<AtomicUsize>,
    fail_after_script: bool,
    fail_sends: bool,
    refuse: bool,
}

impl ScriptedConnector {
    pub fn new(chunks: Vec<Vec<u8>>) -> Self {
        Self {
            chunks,
            sent: Arc::new(Mutex::new(Vec::new())),
            receives: Arc::new(AtomicUsize::new(0)),
            fail_after_script: false,
            fail_sends: false,
            refuse: false,
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new(Vec::new())
        }
    }

    /// Receive errors instead of returning 0 once the script runs out.
    pub fn fail_after_script(mut self) -> Self {
        self.fail_after_script = true;
        self
    }

    pub fn fail_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn sent(&self) -> Arc<Mutex<Vec<u8>>> {
        self.sent.clone()
    }

    /// Number of receive calls made on any channel from this connector.
    pub fn receives(&self) -> Arc<AtomicUsize> {
        self.receives.clone()
    }
}

pub struct ScriptedChannel {
    chunks: VecDeque<Vec<u8>>,
    sent: Arc<Mutex<Vec<u8>>>,
    receives: Arc<AtomicUsize>,
    fail_after_script: bool,
    fail_sends: bool,
}

impl SecureChannel for ScriptedChannel {
    async fn send(&mut self, data: &[u8]) -> io::Result<()> {
        if self.fail_sends {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "scripted send failure"));
        }
        self.sent.lock().unwrap().extend_from_slice(data);
        Ok(())
    }

    async fn receive(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.receives.fetch_add(1, Ordering::SeqCst);
        let Some(front) = self.chunks.front_mut() else {
            if self.fail_after_script {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "scripted reset"));
            }
            return Ok(0);
        };
        let n = buf.len().min(front.len());
        buf[..n].copy_from_slice(&front[..n]);
        front.drain(..n);
        if front.is_empty() {
            self.chunks.pop_front();
        }
        Ok(n)
    }

    async fn shutdown(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Connector for ScriptedConnector {
    type Channel = ScriptedChannel;

    async fn open(&self, _host: &str, _peer: SocketAddr, _role: Role) -> Result<ScriptedChannel, Error> {
        if self.refuse {
            return Err(Error::ConnectionFailure(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "scripted refusal",
            )));
        }
        Ok(ScriptedChannel {
            chunks: self.chunks.iter().filter(|c| !c.is_empty()).cloned().collect(),
            sent: self.sent.clone(),
            receives: self.receives.clone(),
            fail_after_script: self.fail_after_script,
            fail_sends: self.fail_sends,
        })
    }
}

/// Keeps the kind of every reported error.
#[derive(Clone, Default)]
pub struct RecordingReporter {
    kinds: Arc<Mutex<Vec<ErrorKind>>>,
}

impl RecordingReporter {
    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.kinds.lock().unwrap().clone()
    }
}

impl ErrorReporter for RecordingReporter {
    fn report(&self, error: &Error) {
        self.kinds.lock().unwrap().push(error.kind());
    }
}

/*
 * report.rs
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

//! Error reporting capability handed to Connection and Fetcher.
//!
//! Reporting is a side channel: the same error is still returned to the caller.
//! Nothing here is process-global; each Connection holds the reporter it was built with.

use std::sync::Arc;

use crate::error::{Error, Severity};

/// Receives every error a Connection or Fetcher runs into.
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &Error);
}

impl<F> ErrorReporter for F
where
    F: Fn(&Error) + Send + Sync,
{
    fn report(&self, error: &Error) {
        self(error)
    }
}

/// Default reporter: logs through `tracing`. Fatal errors log at error level but do not exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReporter;

impl ErrorReporter for LogReporter {
    fn report(&self, error: &Error) {
        let kind = error.kind();
        match kind.severity() {
            Severity::Fatal => tracing::error!(kind = %kind, "{}", error),
            Severity::Warning | Severity::None => tracing::warn!(kind = %kind, "{}", error),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _error: &Error) {}
}

/// A callback slot plus a handler slot. `report` runs the callback, then the handler.
/// Setting either slot replaces what was there.
#[derive(Default, Clone)]
pub struct ErrorSink {
    callback: Option<fn(&Error)>,
    handler: Option<Arc<dyn ErrorReporter>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_callback(&mut self, callback: fn(&Error)) -> &mut Self {
        self.callback = Some(callback);
        self
    }

    pub fn set_handler(&mut self, handler: Arc<dyn ErrorReporter>) -> &mut Self {
        self.handler = Some(handler);
        self
    }

    pub fn clear(&mut self) {
        self.callback = None;
        self.handler = None;
    }
}

impl ErrorReporter for ErrorSink {
    fn report(&self, error: &Error) {
        if let Some(callback) = self.callback {
            callback(error);
        }
        if let Some(handler) = &self.handler {
            handler.report(error);
        }
    }
}

impl std::fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorSink")
            .field("callback", &self.callback.is_some())
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

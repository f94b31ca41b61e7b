/*
 * Created on Mon Jan 12 2026
 *
 * This file is a part of ddbd
 * ddbd is the secure client-server messaging core of an industrial
 * drawing-database application: connection handshake, wire framing,
 * request dispatch and the typed component catalog.
 *
 * Copyright (c) 2026, the ddbd authors
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with this program. If not, see <https://www.gnu.org/licenses/>.
 *
*/

//! # Durable domain logging
//!
//! Three append-only sinks: `log`, `changelog` and `error`. These are distinct
//! from the operator-facing `log::info!`/`env_logger` diagnostics emitted
//! elsewhere in the crate — they are the audit trail described in the
//! specification (auth events, inserts, backups), named by `serverMeta.json`.
//! Each sink is guarded independently so that a slow write to one never blocks
//! the others.

use crate::util::error::DdbResult;
use crate::util::time::log_timestamp;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// A single append-only, lock-guarded text sink.
pub struct Sink {
    file: Option<Mutex<File>>,
}

impl Sink {
    /// A sink with no backing file silently discards writes. This lets the
    /// three `serverMeta.json` log paths stay optional per the spec.
    pub fn disabled() -> Self {
        Self { file: None }
    }

    pub fn open(path: impl AsRef<Path>) -> DdbResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Some(Mutex::new(file)),
        })
    }

    /// Write one line, prefixed with the standard timestamp. Writes through a
    /// single lock acquisition so multi-part messages built with
    /// [`line`](Sink::line) appear atomically.
    pub fn write_line(&self, message: &str) {
        self.line(|l| l.push_str(message));
    }

    /// Build a line under the sink's lock via the supplied closure, so that
    /// several `push_str`-style calls compose into a single atomic write.
    pub fn line(&self, build: impl FnOnce(&mut String)) {
        let Some(file) = &self.file else { return };
        let mut line = log_timestamp();
        line.push(' ');
        build(&mut line);
        line.push('\n');
        let mut guard = file.lock();
        let _ = guard.write_all(line.as_bytes());
        let _ = guard.flush();
    }
}

/// The three domain sinks, held for the lifetime of the server.
pub struct Logger {
    pub log: Sink,
    pub changelog: Sink,
    pub error: Sink,
}

impl Logger {
    pub fn new(log: Sink, changelog: Sink, error: Sink) -> Self {
        Self {
            log,
            changelog,
            error,
        }
    }

    /// Write to the error sink. When `safe` is false, the write is flushed and
    /// the process terminates immediately afterwards — this is the only place
    /// in the crate allowed to call `std::process::exit` outside of `main`'s
    /// fatal-error policy layer, matching the spec's "Fatal errors" bucket.
    pub fn error(&self, message: &str, safe: bool) {
        self.error.write_line(message);
        log::error!("{message}");
        if !safe {
            std::process::exit(1);
        }
    }
}

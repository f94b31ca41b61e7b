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

//! Non-blocking console input (§4.4 step 6), grounded directly on the
//! original's `std::async`-future-polled-each-tick pattern
//! (`getNonBlockingInput`/`nonBlockingInput.wait_for(0ms)` in
//! `original_source/src/networking/Server.cpp`): a background thread blocks
//! on one `stdin` line at a time, and the tick polls a channel instead of
//! `std::future::wait_for`.

use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};

pub struct ConsoleInput {
    rx: Receiver<String>,
}

impl ConsoleInput {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
        Self { rx }
    }

    /// Returns the next complete line, if one has arrived since the last
    /// poll; never blocks.
    pub fn poll(&self) -> Option<String> {
        match self.rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Quit,
    ListUsers,
    Unrecognized,
}

impl From<&str> for ConsoleCommand {
    fn from(line: &str) -> Self {
        match line.trim() {
            "quit" | "exit" => Self::Quit,
            "list users" => Self::ListUsers,
            _ => Self::Unrecognized,
        }
    }
}

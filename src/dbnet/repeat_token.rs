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

//! The repeat-token table (§4.3 step 5, §5's "main thread only" resources).
//!
//! The spec calls this main-thread-only, but the handshake it's consulted
//! from runs on a detached per-socket worker (§5), so lookups are genuinely
//! concurrent with the main tick's occasional writes (`RepeatTokenRequest`,
//! §4.4). `original_source/src/networking/Server.cpp` reads/writes
//! `repeatTokenMap` from exactly this pair of threads with no lock at all —
//! an actual data race in the source we don't reproduce. A `parking_lot::RwLock`
//! gives cheap concurrent reads without changing the single-writer shape the
//! spec describes.

use crate::crypto::rand::{self, RepeatTokenBytes};
use crate::util::error::DdbResult;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct RepeatTokenTable {
    tokens: RwLock<HashMap<RepeatTokenBytes, String>>,
}

impl RepeatTokenTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh token for `email` and records the mapping.
    pub fn issue(&self, email: &str) -> DdbResult<RepeatTokenBytes> {
        let token = rand::repeat_token()?;
        self.tokens.write().insert(token, email.to_string());
        Ok(token)
    }

    /// Looks up the email bound to a presented repeat token, per handshake
    /// step 5's `AuthMode::RepeatToken` branch.
    pub fn lookup(&self, token: &RepeatTokenBytes) -> Option<String> {
        self.tokens.read().get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_resolves_to_the_issuing_email() {
        let table = RepeatTokenTable::new();
        let token = table.issue("person@example.com").unwrap();
        assert_eq!(table.lookup(&token).as_deref(), Some("person@example.com"));
    }

    #[test]
    fn unknown_token_does_not_resolve() {
        let table = RepeatTokenTable::new();
        assert_eq!(table.lookup(&[0u8; 32]), None);
    }
}

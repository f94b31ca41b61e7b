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

//! Accept loop and handshake worker dispatch (§4.3, §4.4 step 1, §5).
//!
//! Each accepted socket's five-step handshake runs to completion on its own
//! worker (`tokio::task::spawn_blocking`, since the handshake is synchronous
//! blocking I/O on a `std::net` socket); the dispatcher tick polls each
//! worker's `JoinHandle` without blocking.

use crate::crypto::jwt::JwksKeySet;
use crate::crypto::rsa::KeyPair;
use crate::crypto::SignatureKeyPair;
use crate::dbnet::handshake::{self, AuthenticatedPeer, HandshakeContext};
use crate::dbnet::repeat_token::RepeatTokenTable;
use crate::dbnet::socket::{ListeningSocket, Socket, SocketResult};
use crate::util::error::{DdbResult, Error};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Immutable identity/config material a handshake worker needs; shared
/// across every spawned worker via `Arc`.
pub struct HandshakeMaterial {
    pub server_identity: KeyPair,
    pub signature_keys: SignatureKeyPair,
    pub app_id: String,
    pub jwks: JwksKeySet,
}

pub struct PendingHandshake {
    handle: JoinHandle<DdbResult<AuthenticatedPeer>>,
    started_at: Instant,
}

pub struct Listener {
    socket: ListeningSocket,
    material: Arc<HandshakeMaterial>,
    pending: Vec<PendingHandshake>,
}

const HANDSHAKE_WALL_CLOCK: Duration = Duration::from_secs(60);

impl Listener {
    pub fn bind(port: u16, ip: Option<&str>, material: Arc<HandshakeMaterial>) -> Result<Self, SocketResult> {
        Ok(Self {
            socket: ListeningSocket::bind(port, ip)?,
            material,
            pending: Vec::new(),
        })
    }

    /// §4.4 step 1: attempt `try_accept` once per tick, spawning a worker for
    /// whatever was accepted.
    pub fn accept_once(&mut self, repeat_tokens: Arc<RepeatTokenTable>) -> DdbResult<()> {
        match self.socket.try_accept() {
            Ok(Some(socket)) => {
                self.spawn_handshake(socket, repeat_tokens);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(_) => Err(Error::transport("accept failed")),
        }
    }

    fn spawn_handshake(&mut self, socket: Socket, repeat_tokens: Arc<RepeatTokenTable>) {
        let material = Arc::clone(&self.material);
        let handle = tokio::task::spawn_blocking(move || {
            let ctx = HandshakeContext {
                server_identity: &material.server_identity,
                signature_keys: &material.signature_keys,
                app_id: &material.app_id,
                jwks: &material.jwks,
                repeat_tokens: &repeat_tokens,
            };
            handshake::run(socket, &ctx)
        });
        self.pending.push(PendingHandshake {
            handle,
            started_at: Instant::now(),
        });
    }

    /// §4.4 step 2: poll every in-flight handshake once. Finished workers are
    /// removed and their outcome reported; workers that overran the 60-second
    /// wall clock are aborted best-effort (the worker itself also enforces
    /// this budget internally via `wait_for` deadlines — see `handshake::run`).
    pub async fn poll_pending(&mut self) -> Vec<DdbResult<AuthenticatedPeer>> {
        let mut finished = Vec::new();
        let mut still_pending = Vec::new();
        for pending in std::mem::take(&mut self.pending) {
            if pending.handle.is_finished() {
                match pending.handle.await {
                    Ok(result) => finished.push(result),
                    Err(_) => finished.push(Err(Error::transport("handshake worker panicked"))),
                }
            } else if pending.started_at.elapsed() > HANDSHAKE_WALL_CLOCK {
                pending.handle.abort();
                log::warn!("handshake exceeded 60s wall clock; aborted");
            } else {
                still_pending.push(pending);
            }
        }
        self.pending = still_pending;
        finished
    }
}

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

//! The server tick: accept, authenticate, receive, drain the send queue,
//! heartbeat, console input, sleep (§4.4).

use crate::config::definitions::ServerMeta;
use crate::crypto::aes::AesKey;
use crate::dbnet::connection::{Connection, ConnectionHandle, HandleAllocator};
use crate::dbnet::console::{ConsoleCommand, ConsoleInput};
use crate::dbnet::listener::{HandshakeMaterial, Listener};
use crate::dbnet::repeat_token::RepeatTokenTable;
use crate::dbnet::send_queue::{SendQueue, Target};
use crate::dbnet::socket::SocketResult;
use crate::protocol::envelope::Envelope;
use crate::protocol::message::{EncryptedMessage, ProtocolTag};
use crate::protocol::request_kind::RequestKind;
use crate::util::error::DdbResult;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Receives dispatched application requests once the session token has been
/// checked. Implemented by `request::Router` — kept as a trait here so the
/// dispatcher never depends on the catalog/request modules directly.
pub trait RequestHandler {
    fn handle(&mut self, from: ConnectionHandle, email: &str, kind: RequestKind, body: &[u8], send_queue: &SendQueue);
}

pub struct Dispatcher<H: RequestHandler> {
    listener: Listener,
    connections: HashMap<ConnectionHandle, Connection>,
    handles: HandleAllocator,
    send_queue: Arc<SendQueue>,
    repeat_tokens: Arc<RepeatTokenTable>,
    console: ConsoleInput,
    handler: H,
    refresh_rate_hz: f64,
    heartbeat_cycles: u32,
    connection_timeout: Duration,
    cycle: u64,
    running: bool,
}

impl<H: RequestHandler> Dispatcher<H> {
    /// `repeat_tokens` is shared with `handler`: the handshake's
    /// `AuthMode::RepeatToken` lookup (§4.3 step 5) and the
    /// `RepeatTokenRequest` handler (§4.4) that mints tokens must consult the
    /// same table, so the caller builds it once and hands a clone to each.
    pub fn new(
        meta: &ServerMeta,
        material: HandshakeMaterial,
        handler: H,
        repeat_tokens: Arc<RepeatTokenTable>,
    ) -> Result<Self, SocketResult> {
        let listener = Listener::bind(meta.server_port, None, Arc::new(material))?;
        Ok(Self {
            listener,
            connections: HashMap::new(),
            handles: HandleAllocator::new(),
            send_queue: Arc::new(SendQueue::new()),
            repeat_tokens,
            console: ConsoleInput::spawn(),
            handler,
            refresh_rate_hz: ServerMeta::DEFAULT_REFRESH_RATE_HZ,
            heartbeat_cycles: ServerMeta::DEFAULT_HEARTBEAT_CYCLES,
            connection_timeout: Duration::from_secs_f64(ServerMeta::DEFAULT_CONNECTION_TIMEOUT_SECS),
            cycle: 0,
            running: true,
        })
    }

    pub fn send_queue(&self) -> Arc<SendQueue> {
        Arc::clone(&self.send_queue)
    }

    pub fn repeat_tokens(&self) -> Arc<RepeatTokenTable> {
        Arc::clone(&self.repeat_tokens)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Runs one full tick (§4.4 steps 1-7), sleeping for the remainder of the
    /// frame before returning.
    pub async fn tick(&mut self) -> DdbResult<()> {
        let tick_start = Instant::now();

        // Step 1.
        self.listener.accept_once(Arc::clone(&self.repeat_tokens))?;

        // Step 2.
        for outcome in self.listener.poll_pending().await {
            match outcome {
                Ok(peer) => self.admit(peer),
                Err(e) => log::warn!("handshake failed: {e}"),
            }
        }

        // Step 3.
        self.receive_all();

        // Step 4.
        self.drain_send_queue();

        // Step 5.
        self.cycle += 1;
        if self.cycle % self.heartbeat_cycles as u64 == 0 {
            self.heartbeat_all();
        }

        // Step 6.
        self.handle_console_input();

        // Step 7.
        let frame = Duration::from_secs_f64(1.0 / self.refresh_rate_hz);
        let elapsed = tick_start.elapsed();
        if elapsed < frame {
            tokio::time::sleep(frame - elapsed).await;
        }
        Ok(())
    }

    fn admit(&mut self, peer: crate::dbnet::handshake::AuthenticatedPeer) {
        let handle = self.handles.allocate();
        log::info!("connection {handle} ({}) admitted", peer.email);
        self.connections.insert(
            handle,
            Connection {
                handle,
                socket: peer.socket,
                aes_key: peer.aes_key,
                session_token: peer.session_token,
                server_nonce: peer.server_nonce,
                email: peer.email,
            },
        );
    }

    fn remove(&mut self, handle: ConnectionHandle, reason: &str) {
        if let Some(mut conn) = self.connections.remove(&handle) {
            conn.socket.close();
            self.handles.release(handle);
            log::info!("connection {handle} removed: {reason}");
        }
    }

    fn receive_all(&mut self) {
        let handles: Vec<ConnectionHandle> = self.connections.keys().copied().collect();
        for handle in handles {
            let Some(conn) = self.connections.get_mut(&handle) else { continue };
            match conn.socket.receive(ProtocolTag::Aes) {
                SocketResult::Success => self.deliver(handle),
                SocketResult::ErrSocketDead => self.remove(handle, "timed out"),
                SocketResult::Disconnected => self.remove(handle, "disconnected"),
                SocketResult::NoData => {}
                _ => self.remove(handle, "receive error"),
            }
        }
        for handle in handles_over_connection_timeout(&mut self.connections, self.connection_timeout) {
            self.remove(handle, "heartbeat timeout");
        }
    }

    fn deliver(&mut self, handle: ConnectionHandle) {
        let Some(conn) = self.connections.get_mut(&handle) else { return };
        let Some(frame) = conn.socket.take_encrypted() else { return };
        let Ok(plaintext) = frame.decrypt(&conn.aes_key) else {
            log::warn!("connection {handle}: decrypt failed");
            return;
        };
        let Ok(envelope) = Envelope::decode(&plaintext) else {
            log::warn!("connection {handle}: malformed envelope");
            return;
        };
        if envelope.session_token != conn.session_token {
            // Wrong token: dropped silently per §4.4 step 3.
            return;
        }
        let email = conn.email.clone();
        self.handler.handle(handle, &email, envelope.kind, &envelope.body, &self.send_queue);
    }

    fn drain_send_queue(&mut self) {
        for message in self.send_queue.drain() {
            let targets: Vec<ConnectionHandle> = match message.target {
                Target::One(h) => vec![h],
                Target::Broadcast => self.connections.keys().copied().collect(),
            };
            for handle in targets {
                let Some(conn) = self.connections.get_mut(&handle) else { continue };
                let Ok(encrypted) = EncryptedMessage::encrypt(message.tag, &message.plaintext, &conn.aes_key) else {
                    continue;
                };
                if conn.socket.send_encrypted(&encrypted) == SocketResult::ErrSocketDead {
                    self.remove(handle, "send failed");
                }
            }
        }
    }

    fn heartbeat_all(&mut self) {
        let handles: Vec<(ConnectionHandle, AesKey)> =
            self.connections.iter().map(|(h, c)| (*h, c.aes_key)).collect();
        for (handle, key) in handles {
            if let Some(conn) = self.connections.get_mut(&handle) {
                let _ = conn.socket.heartbeat(&key);
            }
        }
    }

    fn handle_console_input(&mut self) {
        let Some(line) = self.console.poll() else { return };
        match ConsoleCommand::from(line.as_str()) {
            ConsoleCommand::Quit => {
                log::info!("server closed");
                self.running = false;
            }
            ConsoleCommand::ListUsers => {
                for conn in self.connections.values() {
                    log::info!("client: {}", conn.email);
                }
            }
            ConsoleCommand::Unrecognized => {}
        }
    }
}

fn handles_over_connection_timeout(
    connections: &mut HashMap<ConnectionHandle, Connection>,
    timeout: Duration,
) -> Vec<ConnectionHandle> {
    let mut dead = Vec::new();
    for (handle, conn) in connections.iter_mut() {
        conn.socket.check_timeout(timeout);
        if conn.socket.is_dead() {
            dead.push(*handle);
        }
    }
    dead
}

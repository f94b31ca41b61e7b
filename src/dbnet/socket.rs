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

//! Non-blocking socket abstraction (§4.1).
//!
//! Deliberately built on `std::net` rather than `tokio::net`: the spec fixes
//! an explicit non-blocking poll contract (`try_accept`/`receive` return
//! `NoData` on `EWOULDBLOCK`, a single-threaded tick drives everything) that
//! maps onto `original_source/src/networking/TCPSocket.cpp`'s BSD-socket
//! design far more directly than onto `tokio`'s implicit-polling async
//! model. `tokio` remains the runtime for the process (handshake workers,
//! the tick's frame-time sleep) — only the peer sockets themselves are
//! plain, explicitly non-blocking `std::net::TcpStream`s.

use crate::crypto::aes::AesKey;
use crate::protocol::frame::CHUNK_SIZE;
use crate::protocol::message::{AnyDecoder, DecodeState, EncryptedMessage, Frame, PlainMessage, ProtocolTag};
use std::io::{self, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocketResult {
    Success,
    NoData,
    ErrSocketDead,
    ErrSendFailed,
    ErrReceiveFailed,
    ErrAccept,
    ErrConnect,
    ErrParseIp,
    ErrBind,
    ErrListen,
    ErrCreate,
    ErrSetOptions,
    ErrNonBlocking,
    Disconnected,
}

/// A single connected peer socket, tracking the handful of state flags the
/// spec calls out (§4.1, §5): whether it's alive, whether a heartbeat is
/// outstanding, and when the last one was sent.
///
/// The wire tag determines framing (`AnyDecoder` picks plain vs. encrypted
/// per-frame), so the same socket carries handshake's plaintext `Key`/`Rsa`
/// exchange and a connected peer's all-encrypted post-auth traffic alike.
pub struct Socket {
    stream: TcpStream,
    peer: SocketAddr,
    dead: bool,
    waiting_for_heartbeat: bool,
    heartbeat_sent_at: Option<Instant>,
    last_inbound_at: Instant,
    decoder: AnyDecoder,
    pending: Option<Frame>,
}

impl Socket {
    /// Wraps an already-accepted/connected stream, putting it into
    /// non-blocking mode (accepted sockets inherit this from the listener in
    /// spirit, but we set it explicitly per peer to keep the invariant
    /// local).
    fn wrap(stream: TcpStream) -> Result<Self, SocketResult> {
        let peer = stream.peer_addr().map_err(|_| SocketResult::ErrAccept)?;
        stream
            .set_nonblocking(true)
            .map_err(|_| SocketResult::ErrNonBlocking)?;
        let _ = stream.set_nodelay(true);
        Ok(Self {
            stream,
            peer,
            dead: false,
            waiting_for_heartbeat: false,
            heartbeat_sent_at: None,
            last_inbound_at: Instant::now(),
            decoder: AnyDecoder::new(),
            pending: None,
        })
    }

    pub fn connect(ip: &str, port: u16) -> Result<Self, SocketResult> {
        let addr = IpAddr::from_str(ip).map_err(|_| SocketResult::ErrParseIp)?;
        let stream =
            TcpStream::connect(SocketAddr::new(addr, port)).map_err(|_| SocketResult::ErrConnect)?;
        Self::wrap(stream)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    fn mark_dead(&mut self) {
        self.dead = true;
    }

    /// Pulls the decoded plaintext message out after a `receive`/`wait_for`
    /// call returned `Success` for a plain-framed tag.
    pub fn take_plain(&mut self) -> Option<PlainMessage> {
        match self.pending.take() {
            Some(Frame::Plain(m)) => Some(m),
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Pulls the decoded (still-encrypted) frame out after a `receive` call
    /// returned `Success` for an encrypted-framed tag; the caller decrypts
    /// with the connection's session key.
    pub fn take_encrypted(&mut self) -> Option<EncryptedMessage> {
        match self.pending.take() {
            Some(Frame::Encrypted(m)) => Some(m),
            other => {
                self.pending = other;
                None
            }
        }
    }

    fn write_frame(&mut self, frame: Vec<u8>) -> SocketResult {
        if self.dead {
            return SocketResult::ErrSocketDead;
        }
        match self.stream.write_all(&frame) {
            Ok(()) => SocketResult::Success,
            Err(e) if is_broken_pipe(&e) => {
                self.mark_dead();
                SocketResult::ErrSocketDead
            }
            Err(_) => SocketResult::ErrSendFailed,
        }
    }

    pub fn send(&mut self, message: &PlainMessage) -> SocketResult {
        self.write_frame(message.encode())
    }

    pub fn send_encrypted(&mut self, message: &EncryptedMessage) -> SocketResult {
        self.write_frame(message.encode())
    }

    /// Pulls one [`CHUNK_SIZE`]-byte chunk and feeds it to the in-flight
    /// decoder. A decode error quarantines the partial buffer (a fresh
    /// decoder replaces it) and is reported as `ErrReceiveFailed`; a
    /// protocol-tag mismatch against `expected` is also a receive error.
    pub fn receive(&mut self, expected: ProtocolTag) -> SocketResult {
        if self.dead {
            return SocketResult::ErrSocketDead;
        }
        let mut chunk = [0u8; CHUNK_SIZE];
        match self.stream.read(&mut chunk) {
            Ok(0) => {
                self.mark_dead();
                SocketResult::Disconnected
            }
            Ok(n) => {
                self.last_inbound_at = Instant::now();
                self.waiting_for_heartbeat = false;
                match self.decoder.feed(&chunk[..n]) {
                    DecodeState::Decoding => SocketResult::NoData,
                    DecodeState::Error => {
                        self.decoder = AnyDecoder::new();
                        SocketResult::ErrReceiveFailed
                    }
                    DecodeState::Decoded => {
                        let decoder = std::mem::replace(&mut self.decoder, AnyDecoder::new());
                        match decoder.finish() {
                            Ok(frame) if frame.tag() == expected => {
                                self.pending = Some(frame);
                                SocketResult::Success
                            }
                            Ok(_) => SocketResult::ErrReceiveFailed,
                            Err(_) => SocketResult::ErrReceiveFailed,
                        }
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => SocketResult::NoData,
            Err(e) if is_broken_pipe(&e) => {
                self.mark_dead();
                SocketResult::ErrSocketDead
            }
            Err(_) => SocketResult::ErrReceiveFailed,
        }
    }

    /// Blocking variant of `receive` used only during the handshake, where a
    /// single connection is driven to completion on its own worker (§4.3)
    /// rather than polled from the shared tick.
    pub fn wait_for(&mut self, expected: ProtocolTag, timeout: Duration) -> SocketResult {
        let deadline = Instant::now() + timeout;
        loop {
            match self.receive(expected) {
                SocketResult::NoData => {
                    if Instant::now() >= deadline {
                        return SocketResult::ErrReceiveFailed;
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
                other => return other,
            }
        }
    }

    /// Sends a `Heartbeat` message (always encrypted post-auth) and arms the
    /// waiting flag. If `receive` doesn't clear it within `connection_timeout`,
    /// `check_timeout` kills the connection.
    pub fn heartbeat(&mut self, key: &AesKey) -> SocketResult {
        let Ok(message) = EncryptedMessage::encrypt(ProtocolTag::Heartbeat, &[0u8], key) else {
            return SocketResult::ErrSendFailed;
        };
        let result = self.send_encrypted(&message);
        if result == SocketResult::Success {
            self.waiting_for_heartbeat = true;
            self.heartbeat_sent_at = Some(Instant::now());
        }
        result
    }

    /// Called once per tick: transitions the socket to dead if a heartbeat
    /// went unanswered for longer than `connection_timeout`.
    pub fn check_timeout(&mut self, connection_timeout: Duration) {
        if self.waiting_for_heartbeat {
            if let Some(sent_at) = self.heartbeat_sent_at {
                if sent_at.elapsed() > connection_timeout {
                    self.mark_dead();
                }
            }
        } else if self.last_inbound_at.elapsed() > connection_timeout {
            self.mark_dead();
        }
    }

    pub fn close(&mut self) {
        let _ = self.stream.shutdown(std::net::Shutdown::Both);
        self.mark_dead();
    }
}

fn is_broken_pipe(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::ConnectionReset | io::ErrorKind::ConnectionAborted
    )
}

/// The server-side listening socket: `create`/`bind`/`listen`/`try_accept`.
pub struct ListeningSocket {
    listener: TcpListener,
}

impl ListeningSocket {
    pub fn bind(port: u16, ip: Option<&str>) -> Result<Self, SocketResult> {
        let addr = match ip {
            Some(ip) => IpAddr::from_str(ip).map_err(|_| SocketResult::ErrParseIp)?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let listener =
            TcpListener::bind(SocketAddr::new(addr, port)).map_err(|_| SocketResult::ErrBind)?;
        listener
            .set_nonblocking(true)
            .map_err(|_| SocketResult::ErrNonBlocking)?;
        Ok(Self { listener })
    }

    pub fn local_port(&self) -> DdbIoResult<u16> {
        self.listener.local_addr().map(|a| a.port())
    }

    /// Non-blocking accept: `NoData` on `EWOULDBLOCK`, otherwise a freshly
    /// wrapped, non-blocking [`Socket`] for the caller to hand off (the spec's
    /// "detached worker" dispatch happens one layer up, in `dbnet::listener`).
    pub fn try_accept(&self) -> Result<Option<Socket>, SocketResult> {
        match self.listener.accept() {
            Ok((stream, _addr)) => Socket::wrap(stream).map(Some),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(_) => Err(SocketResult::ErrAccept),
        }
    }
}

type DdbIoResult<T> = io::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rand::aes_key;

    #[test]
    fn bind_rejects_bad_ip() {
        assert_eq!(
            ListeningSocket::bind(0, Some("not-an-ip")).err(),
            Some(SocketResult::ErrParseIp)
        );
    }

    #[test]
    fn connect_rejects_bad_ip() {
        assert_eq!(Socket::connect("not-an-ip", 1).err(), Some(SocketResult::ErrParseIp));
    }

    #[test]
    fn accept_loop_round_trips_a_plain_message() {
        let listener = ListeningSocket::bind(0, Some("127.0.0.1")).unwrap();
        let port = listener.local_port().unwrap();
        let client_thread = std::thread::spawn(move || {
            let mut client = Socket::connect("127.0.0.1", port).unwrap();
            let msg = PlainMessage::new(ProtocolTag::Raw, b"ping").unwrap();
            loop {
                if client.send(&msg) == SocketResult::Success {
                    break;
                }
            }
        });
        let mut server_socket = loop {
            if let Some(s) = listener.try_accept().unwrap() {
                break s;
            }
        };
        let mut result = server_socket.receive(ProtocolTag::Raw);
        while result == SocketResult::NoData {
            result = server_socket.receive(ProtocolTag::Raw);
        }
        assert_eq!(result, SocketResult::Success);
        assert_eq!(server_socket.take_plain().unwrap().payload(), b"ping");
        client_thread.join().unwrap();
    }

    #[test]
    fn accept_loop_round_trips_an_encrypted_heartbeat() {
        let listener = ListeningSocket::bind(0, Some("127.0.0.1")).unwrap();
        let port = listener.local_port().unwrap();
        let key = aes_key().unwrap();
        let client_thread = std::thread::spawn(move || {
            let mut client = Socket::connect("127.0.0.1", port).unwrap();
            loop {
                if client.heartbeat(&key) == SocketResult::Success {
                    break;
                }
            }
        });
        let mut server_socket = loop {
            if let Some(s) = listener.try_accept().unwrap() {
                break s;
            }
        };
        let mut result = server_socket.receive(ProtocolTag::Heartbeat);
        while result == SocketResult::NoData {
            result = server_socket.receive(ProtocolTag::Heartbeat);
        }
        assert_eq!(result, SocketResult::Success);
        assert!(server_socket.take_encrypted().is_some());
        client_thread.join().unwrap();
    }
}

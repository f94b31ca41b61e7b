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

//! Server side of the five-step mutual-authentication handshake (§4.3).
//!
//! Runs to completion on a single detached worker per accepted socket (see
//! `dbnet::listener`); every step here blocks with `wait_for`, which is the
//! one place in the crate allowed to suspend (§5).

use crate::config::definitions::ServerMeta;
use crate::crypto::aes::AesKey;
use crate::crypto::jwt::{self, JwksKeySet};
use crate::crypto::rsa::{KeyPair, PublicKey, RSA_BLOCK_BYTES};
use crate::crypto::{rand, SignatureKeyPair};
use crate::dbnet::repeat_token::RepeatTokenTable;
use crate::dbnet::socket::{Socket, SocketResult};
use crate::protocol::codes::{AuthMode, ConnectionResponseCode};
use crate::protocol::message::{EncryptedMessage, PlainMessage, ProtocolTag};
use crate::util::error::{DdbResult, Error};
use std::time::{Duration, Instant};

/// The portion of server state a handshake worker needs read access to.
/// `repeat_tokens` is looked up immutably here; new tokens are only ever
/// minted by the `RepeatTokenRequest` handler on the dispatcher's own thread.
pub struct HandshakeContext<'a> {
    pub server_identity: &'a KeyPair,
    pub signature_keys: &'a SignatureKeyPair,
    pub app_id: &'a str,
    pub jwks: &'a JwksKeySet,
    pub repeat_tokens: &'a RepeatTokenTable,
}

pub struct AuthenticatedPeer {
    pub socket: Socket,
    pub aes_key: AesKey,
    pub session_token: u64,
    pub server_nonce: u32,
    pub email: String,
}

const STEP_TIMEOUT_FLOOR: Duration = Duration::from_millis(50);

fn remaining(deadline: Instant) -> Duration {
    deadline.saturating_duration_since(Instant::now()).max(STEP_TIMEOUT_FLOOR)
}

/// Sends `ConnectionResponse::Failed` and closes the socket, per the
/// handshake's uniform failure propagation rule.
fn fail(mut socket: Socket, reason: impl ToString) -> DdbResult<AuthenticatedPeer> {
    let response = PlainMessage::new(ProtocolTag::ConnectionResponse, &ConnectionResponseCode::Failed.to_byte())
        .expect("single-byte payload always validates");
    let _ = socket.send(&response);
    socket.close();
    Err(Error::crypto(reason.to_string()))
}

/// Packs a value into the low bytes of an `RSA_BLOCK_BYTES`-sized big-endian
/// block, zero-padding the high bytes — the convention the handshake uses
/// both for the client's nonce challenge and the server's signed reply.
fn pack_tail(parts: &[&[u8]]) -> [u8; RSA_BLOCK_BYTES] {
    let mut block = [0u8; RSA_BLOCK_BYTES];
    let total: usize = parts.iter().map(|p| p.len()).sum();
    let mut offset = RSA_BLOCK_BYTES - total;
    for part in parts {
        block[offset..offset + part.len()].copy_from_slice(part);
        offset += part.len();
    }
    block
}

pub fn run(mut socket: Socket, ctx: &HandshakeContext) -> DdbResult<AuthenticatedPeer> {
    let deadline = Instant::now() + Duration::from_secs(ServerMeta::HANDSHAKE_TIMEOUT_SECS);

    // Step 1: C -> S, K_C.
    if socket.wait_for(ProtocolTag::Key, remaining(deadline)) != SocketResult::Success {
        return fail(socket, "timed out waiting for client public key");
    }
    let client_key_msg = socket.take_plain().ok_or_else(|| Error::protocol("missing client key"))?;
    let client_public = match PublicKey::from_wire(client_key_msg.payload()) {
        Ok(k) => k,
        Err(e) => return fail(socket, e),
    };

    // Step 2: S -> C, K_S.
    let server_key_msg = match PlainMessage::new(ProtocolTag::Key, &ctx.server_identity.public().to_wire()) {
        Ok(m) => m,
        Err(e) => return fail(socket, e),
    };
    if socket.send(&server_key_msg) != SocketResult::Success {
        return fail(socket, "failed to send server public key");
    }

    // Step 3: C -> S, {N_C}_{K_S}. High bits above bit 63 must be zero.
    if socket.wait_for(ProtocolTag::Rsa, remaining(deadline)) != SocketResult::Success {
        return fail(socket, "timed out waiting for client nonce challenge");
    }
    let challenge_msg = socket.take_plain().ok_or_else(|| Error::protocol("missing challenge"))?;
    let mut ciphertext = [0u8; RSA_BLOCK_BYTES];
    ciphertext.copy_from_slice(challenge_msg.payload());
    let block = match ctx.server_identity.decrypt_raw(&ciphertext) {
        Ok(b) => b,
        Err(e) => return fail(socket, e),
    };
    if block[..RSA_BLOCK_BYTES - 8].iter().any(|&b| b != 0) {
        return fail(socket, "challenge bit-pattern violation: high bits set");
    }
    let mut nc_bytes = [0u8; 8];
    nc_bytes.copy_from_slice(&block[RSA_BLOCK_BYTES - 8..]);
    let client_nonce = u64::from_be_bytes(nc_bytes);

    // Step 4: S -> C, {{N_C, N_S, K, T}_SIG}_{K_C}.
    let server_nonce = match rand::auth_nonce() {
        Ok(n) => n,
        Err(e) => return fail(socket, e),
    };
    let aes_key = match rand::aes_key() {
        Ok(k) => k,
        Err(e) => return fail(socket, e),
    };
    let session_token = match rand::session_token() {
        Ok(t) => t,
        Err(e) => return fail(socket, e),
    };
    let signed_plain = pack_tail(&[
        &client_nonce.to_be_bytes(),
        &server_nonce.to_be_bytes(),
        aes_key.as_bytes(),
        &session_token.to_be_bytes(),
    ]);
    let signature = match ctx.signature_keys.sign(&signed_plain) {
        Ok(s) => s,
        Err(e) => return fail(socket, e),
    };
    let reply_ciphertext = match client_public.encrypt_raw(&signature) {
        Ok(c) => c,
        Err(e) => return fail(socket, e),
    };
    let reply_msg = match PlainMessage::new(ProtocolTag::Rsa, &reply_ciphertext) {
        Ok(m) => m,
        Err(e) => return fail(socket, e),
    };
    if socket.send(&reply_msg) != SocketResult::Success {
        return fail(socket, "failed to send signed handshake reply");
    }

    // Step 5: C -> S, encrypted under K, payload = [AuthMode | body].
    if socket.wait_for(ProtocolTag::Aes, remaining(deadline)) != SocketResult::Success {
        return fail(socket, "timed out waiting for client auth message");
    }
    let auth_frame = socket.take_encrypted().ok_or_else(|| Error::protocol("missing auth frame"))?;
    let plaintext = match auth_frame.decrypt(&aes_key) {
        Ok(p) => p,
        Err(e) => return fail(socket, e),
    };
    if plaintext.is_empty() {
        return fail(socket, "empty auth payload");
    }
    let mode = match AuthMode::try_from(plaintext[0]) {
        Ok(m) => m,
        Err(e) => return fail(socket, e),
    };
    let body = &plaintext[1..];

    let email = match mode {
        AuthMode::Jwt => {
            let jwt = match std::str::from_utf8(body) {
                Ok(s) => s,
                Err(_) => return fail(socket, "auth body is not valid UTF-8"),
            };
            let (outcome, email) = jwt::validate(jwt, ctx.app_id, server_nonce, ctx.jwks);
            match (outcome, email) {
                (jwt::JwtOutcome::Authenticated, Some(email)) => email,
                (outcome, _) => return fail(socket, format!("JWT rejected: {outcome:?}")),
            }
        }
        AuthMode::RepeatToken => {
            if body.len() != 32 {
                return fail(socket, "malformed repeat token");
            }
            let mut token = [0u8; 32];
            token.copy_from_slice(body);
            match ctx.repeat_tokens.lookup(&token) {
                Some(email) => email,
                None => return fail(socket, "unrecognised repeat token"),
            }
        }
    };

    let response = PlainMessage::new(ProtocolTag::ConnectionResponse, &ConnectionResponseCode::Success.to_byte())
        .expect("single-byte payload always validates");
    if socket.send(&response) != SocketResult::Success {
        return fail(socket, "failed to send connection response");
    }

    log::info!("client {email} successfully authenticated");
    Ok(AuthenticatedPeer {
        socket,
        aes_key,
        session_token,
        server_nonce,
        email,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_tail_right_aligns_and_zero_pads() {
        let block = pack_tail(&[&[0xAAu8; 2], &[0xBBu8; 3]]);
        assert!(block[..RSA_BLOCK_BYTES - 5].iter().all(|&b| b == 0));
        assert_eq!(&block[RSA_BLOCK_BYTES - 5..RSA_BLOCK_BYTES - 3], &[0xAA, 0xAA]);
        assert_eq!(&block[RSA_BLOCK_BYTES - 3..], &[0xBB, 0xBB, 0xBB]);
    }

    #[test]
    fn client_rejects_handshake_with_wrong_tag() {
        let listener = crate::dbnet::socket::ListeningSocket::bind(0, Some("127.0.0.1")).unwrap();
        let port = listener.local_port().unwrap();
        let client_thread = std::thread::spawn(move || {
            let mut client = Socket::connect("127.0.0.1", port).unwrap();
            // Sends a Raw message where the server expects a Key message.
            let msg = PlainMessage::new(ProtocolTag::Raw, b"oops").unwrap();
            loop {
                if client.send(&msg) == SocketResult::Success {
                    break;
                }
            }
            client
        });
        let server_socket = loop {
            if let Some(s) = listener.try_accept().unwrap() {
                break s;
            }
        };
        let server_identity = KeyPair::generate().unwrap();
        let signature_keys = SignatureKeyPair::generate().unwrap();
        let jwks = JwksKeySet::new();
        let repeat_tokens = RepeatTokenTable::new();
        let ctx = HandshakeContext {
            server_identity: &server_identity,
            signature_keys: &signature_keys,
            app_id: "app",
            jwks: &jwks,
            repeat_tokens: &repeat_tokens,
        };
        let result = run(server_socket, &ctx);
        assert!(result.is_err());
        client_thread.join().unwrap();
    }
}

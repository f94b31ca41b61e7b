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

//! Cryptographic capability boundary (SPEC_FULL.md §10.5).
//!
//! The primitives (RSA-2048, AES-128-CBC, SHA-256, signatures, CSPRNG) are
//! specified by the parent spec as external collaborators; this module wraps
//! `openssl` (already the teacher's TLS dependency) and `jsonwebtoken` behind
//! a small, typed surface so the rest of the crate never reaches for raw
//! crypto calls directly.

pub mod aes;
pub mod jwt;
pub mod rand;
pub mod rsa;

pub use aes::AesKey;
pub use rsa::{KeyPair, PublicKey};

/// Tags the two distinct usages of an RSA keypair in the handshake: one pair
/// per peer for key exchange, plus a server-only pair used purely for
/// signing. They are never interchanged even though they share a
/// representation (§3).
pub struct SignatureKeyPair(pub KeyPair);

impl SignatureKeyPair {
    pub fn generate() -> crate::util::error::DdbResult<Self> {
        Ok(Self(KeyPair::generate()?))
    }

    pub fn sign(&self, block: &rsa::Block) -> crate::util::error::DdbResult<rsa::Block> {
        self.0.sign_raw(block)
    }

    pub fn public(&self) -> &PublicKey {
        self.0.public()
    }
}

/// Verifies a signature produced by [`SignatureKeyPair::sign`] against the
/// signer's public key: recovers the original block via the public-key
/// (verification) transform and compares it to the expected plaintext.
pub fn verify_signature(
    signer_public: &PublicKey,
    expected: &rsa::Block,
    signature: &rsa::Block,
) -> crate::util::error::DdbResult<bool> {
    let recovered = signer_public.encrypt_raw(signature)?;
    Ok(&recovered == expected)
}

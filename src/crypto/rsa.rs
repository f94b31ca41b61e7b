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

//! 2048-bit RSA key exchange primitives.
//!
//! The handshake embeds small, fixed-size values (a 64-bit nonce, a session
//! key, a session token) directly into a single 2048-bit block rather than
//! encrypting a variable-length message, so every block is encrypted and
//! decrypted with no padding scheme (`Padding::NONE`) — the block *is* the
//! message, left-zero-padded. This mirrors the wire format fixed by the
//! specification (§3, §4.3) rather than textbook best practice; see
//! `DESIGN.md` for the rationale.

use crate::util::error::{DdbResult, Error};
use openssl::bn::BigNum;
use openssl::pkey::{Private, Public};
use openssl::rsa::{Padding, Rsa};

/// 2048 bits.
pub const RSA_BLOCK_BYTES: usize = 256;
/// Wire size of a serialised [`PublicKey`]: 256-byte modulus + 4-byte exponent.
pub const PUBLIC_KEY_WIRE_SIZE: usize = RSA_BLOCK_BYTES + 4;

/// A single RSA block, always exactly [`RSA_BLOCK_BYTES`] long.
pub type Block = [u8; RSA_BLOCK_BYTES];

/// The public half of an RSA keypair, in the fixed wire representation used
/// by the `Key` protocol tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub n: [u8; RSA_BLOCK_BYTES],
    pub e: u32,
}

impl PublicKey {
    pub fn to_wire(&self) -> [u8; PUBLIC_KEY_WIRE_SIZE] {
        let mut out = [0u8; PUBLIC_KEY_WIRE_SIZE];
        out[..RSA_BLOCK_BYTES].copy_from_slice(&self.n);
        out[RSA_BLOCK_BYTES..].copy_from_slice(&self.e.to_le_bytes());
        out
    }

    pub fn from_wire(bytes: &[u8]) -> DdbResult<Self> {
        if bytes.len() != PUBLIC_KEY_WIRE_SIZE {
            return Err(Error::protocol("malformed public key"));
        }
        let mut n = [0u8; RSA_BLOCK_BYTES];
        n.copy_from_slice(&bytes[..RSA_BLOCK_BYTES]);
        let mut e_bytes = [0u8; 4];
        e_bytes.copy_from_slice(&bytes[RSA_BLOCK_BYTES..]);
        Ok(Self {
            n,
            e: u32::from_le_bytes(e_bytes),
        })
    }

    fn to_openssl(&self) -> DdbResult<Rsa<Public>> {
        let n = BigNum::from_slice(&self.n)?;
        let e = BigNum::from_u32(self.e)?;
        Ok(Rsa::from_public_components(n, e)?)
    }

    /// Raw, unpadded RSA encryption under this public key. Used both for
    /// ordinary key-exchange blocks and, with the signature keypair, to
    /// *verify* a signature (signature verification is the public-key
    /// operation applied to the signed block).
    pub fn encrypt_raw(&self, block: &Block) -> DdbResult<Block> {
        let rsa = self.to_openssl()?;
        let mut out = [0u8; RSA_BLOCK_BYTES];
        let written = rsa.public_encrypt(block, &mut out, Padding::NONE)?;
        debug_assert_eq!(written, RSA_BLOCK_BYTES);
        Ok(out)
    }
}

/// A full RSA keypair. Used both as the server/client identity keys (for
/// key-exchange encryption) and, separately tagged, as the digital-signature
/// keypair (§3's `SignatureKeyPair`) — the two are never interchanged even
/// though they share this representation.
pub struct KeyPair {
    rsa: Rsa<Private>,
    public: PublicKey,
}

impl KeyPair {
    pub fn generate() -> DdbResult<Self> {
        let rsa = Rsa::generate((RSA_BLOCK_BYTES * 8) as u32)?;
        let public = Self::extract_public(&rsa)?;
        Ok(Self { rsa, public })
    }

    /// Reconstruct a keypair from externally-managed key material (the
    /// key-file format itself is out of scope per §1; callers hand us raw
    /// PEM/DER bytes produced by the setup CLI).
    pub fn from_pem(pem: &[u8]) -> DdbResult<Self> {
        let rsa = Rsa::private_key_from_pem(pem)?;
        let public = Self::extract_public(&rsa)?;
        Ok(Self { rsa, public })
    }

    fn extract_public(rsa: &Rsa<Private>) -> DdbResult<PublicKey> {
        let n_bytes = rsa.n().to_vec();
        let mut n = [0u8; RSA_BLOCK_BYTES];
        // BigNum::to_vec is big-endian and may be shorter than the modulus
        // size if the leading byte is zero; right-align into the fixed block.
        let offset = RSA_BLOCK_BYTES.saturating_sub(n_bytes.len());
        n[offset..].copy_from_slice(&n_bytes);
        let e = rsa
            .e()
            .to_vec()
            .iter()
            .fold(0u32, |acc, b| (acc << 8) | *b as u32);
        Ok(PublicKey { n, e })
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }

    /// Raw, unpadded RSA decryption with the private key.
    pub fn decrypt_raw(&self, block: &Block) -> DdbResult<Block> {
        let mut out = [0u8; RSA_BLOCK_BYTES];
        let written = self.rsa.private_decrypt(block, &mut out, Padding::NONE)?;
        debug_assert!(written <= RSA_BLOCK_BYTES);
        // private_decrypt with Padding::NONE writes exactly RSA_BLOCK_BYTES.
        Ok(out)
    }

    /// Raw RSA "signing" operation: the private-key transform applied to a
    /// block. Together with [`PublicKey::encrypt_raw`] as the verification
    /// step, this implements the bespoke digital signature scheme the
    /// handshake relies on (§4.3 step 4).
    pub fn sign_raw(&self, block: &Block) -> DdbResult<Block> {
        self.decrypt_raw(block)
    }
}

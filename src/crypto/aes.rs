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

//! AES-128-CBC with a 64-bit wire IV (§3, §6).
//!
//! The wire format fixes an 8-byte IV field, while AES-CBC needs a 16-byte
//! IV. We extend the wire IV into an OpenSSL IV by zero-extending the high
//! 8 bytes — both peers derive the same 16-byte IV from the same 8-byte wire
//! value, so this is an implementation detail, not a protocol change.
//!
//! Padding is handled explicitly by the caller (the message codec pads every
//! plaintext up to a multiple of 16 bytes with zeroes before encrypting), so
//! OpenSSL's own PKCS7 padding is disabled: ciphertext length always equals
//! padded-plaintext length.

use crate::util::error::DdbResult;
use openssl::symm::{Cipher, Crypter, Mode};

pub const AES_KEY_BYTES: usize = 16;
pub const AES_BLOCK_BYTES: usize = 16;
pub const WIRE_IV_BYTES: usize = 8;

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct AesKey(pub [u8; AES_KEY_BYTES]);

impl AesKey {
    pub fn as_bytes(&self) -> &[u8; AES_KEY_BYTES] {
        &self.0
    }
}

fn expand_iv(wire_iv: u64) -> [u8; AES_BLOCK_BYTES] {
    let mut iv = [0u8; AES_BLOCK_BYTES];
    iv[..WIRE_IV_BYTES].copy_from_slice(&wire_iv.to_le_bytes());
    iv
}

/// Pads `data` up to the next multiple of [`AES_BLOCK_BYTES`] with zero bytes,
/// matching `PADDED_SIZE(s, AES_CHUNK_SIZE)` from the original wire format.
pub fn pad_to_block(data: &[u8]) -> Vec<u8> {
    let padded_len = data.len().div_ceil(AES_BLOCK_BYTES) * AES_BLOCK_BYTES;
    let mut out = vec![0u8; padded_len];
    out[..data.len()].copy_from_slice(data);
    out
}

/// Encrypts `plaintext` (which must already be a multiple of 16 bytes; use
/// [`pad_to_block`] first) under `key` with the given wire IV.
pub fn encrypt(key: &AesKey, wire_iv: u64, plaintext: &[u8]) -> DdbResult<Vec<u8>> {
    let iv = expand_iv(wire_iv);
    let cipher = Cipher::aes_128_cbc();
    let mut crypter = Crypter::new(cipher, Mode::Encrypt, &key.0, Some(&iv))?;
    crypter.pad(false);
    let mut out = vec![0u8; plaintext.len() + cipher.block_size()];
    let mut count = crypter.update(plaintext, &mut out)?;
    count += crypter.finalize(&mut out[count..])?;
    out.truncate(count);
    Ok(out)
}

/// Decrypts `ciphertext` (a multiple of 16 bytes) under `key` with the given
/// wire IV. The returned buffer retains the zero padding the encoder applied;
/// callers trim to the frame's declared plaintext length.
pub fn decrypt(key: &AesKey, wire_iv: u64, ciphertext: &[u8]) -> DdbResult<Vec<u8>> {
    let iv = expand_iv(wire_iv);
    let cipher = Cipher::aes_128_cbc();
    let mut crypter = Crypter::new(cipher, Mode::Decrypt, &key.0, Some(&iv))?;
    crypter.pad(false);
    let mut out = vec![0u8; ciphertext.len() + cipher.block_size()];
    let mut count = crypter.update(ciphertext, &mut out)?;
    count += crypter.finalize(&mut out[count..])?;
    out.truncate(count);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rand::{aes_key, wire_iv};

    #[test]
    fn round_trips_arbitrary_payload() {
        let key = aes_key().unwrap();
        let iv = wire_iv().unwrap();
        let plain = b"a drawing search query payload";
        let padded = pad_to_block(plain);
        let cipher = encrypt(&key, iv, &padded).unwrap();
        let decrypted = decrypt(&key, iv, &cipher).unwrap();
        assert_eq!(&decrypted[..plain.len()], plain);
    }

    #[test]
    fn bit_flip_breaks_round_trip() {
        let key = aes_key().unwrap();
        let iv = wire_iv().unwrap();
        let plain = pad_to_block(b"0123456789abcdef");
        let mut cipher = encrypt(&key, iv, &plain).unwrap();
        cipher[0] ^= 0x01;
        let decrypted = decrypt(&key, iv, &cipher).unwrap();
        assert_ne!(decrypted, plain);
    }
}

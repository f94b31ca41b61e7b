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

//! CSPRNG-backed generators for the values the handshake and dispatcher hand
//! out: the AES session key, the session token, the auth nonce, the IV, and
//! repeat tokens. All routed through OpenSSL's RNG rather than `rand`'s
//! default thread RNG, since these values are security-sensitive.

use crate::crypto::aes::{AesKey, AES_KEY_BYTES};
use crate::util::error::DdbResult;
use openssl::rand::rand_bytes;

pub type RepeatTokenBytes = [u8; 32];

pub fn aes_key() -> DdbResult<AesKey> {
    let mut buf = [0u8; AES_KEY_BYTES];
    rand_bytes(&mut buf)?;
    Ok(AesKey(buf))
}

pub fn session_token() -> DdbResult<u64> {
    let mut buf = [0u8; 8];
    rand_bytes(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn auth_nonce() -> DdbResult<u32> {
    let mut buf = [0u8; 4];
    rand_bytes(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub fn wire_iv() -> DdbResult<u64> {
    let mut buf = [0u8; 8];
    rand_bytes(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

pub fn repeat_token() -> DdbResult<RepeatTokenBytes> {
    let mut buf = [0u8; 32];
    rand_bytes(&mut buf)?;
    Ok(buf)
}

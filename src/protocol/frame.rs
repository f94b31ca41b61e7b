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

//! Wire framing constants shared by the codec and the socket layer (§6).

/// Unit of stream padding and of non-blocking socket reads.
pub const CHUNK_SIZE: usize = 128;
/// AES ciphertext is padded to a multiple of this many bytes.
pub const AES_BLOCK_SIZE: usize = 16;
/// Largest payload length representable in the 24-bit length field.
pub const MAX_PAYLOAD_LEN: usize = 65_532;
/// Header: 1-byte tag + 3-byte little-endian length.
pub const HEADER_SIZE: usize = 4;
/// The encrypted frame additionally carries an 8-byte IV after the header.
pub const IV_SIZE: usize = 8;

/// Rounds `size` up to the next multiple of `to`.
pub const fn padded_size(size: usize, to: usize) -> usize {
    if size % to == 0 {
        size
    } else {
        (size / to + 1) * to
    }
}

/// Rounds a frame's total length up to the next multiple of [`CHUNK_SIZE`].
pub const fn chunk_padded(size: usize) -> usize {
    padded_size(size, CHUNK_SIZE)
}

/// Encodes a 24-bit little-endian length into the header's length field.
pub fn encode_len24(len: usize) -> [u8; 3] {
    debug_assert!(len <= MAX_PAYLOAD_LEN);
    let bytes = (len as u32).to_le_bytes();
    [bytes[0], bytes[1], bytes[2]]
}

/// Decodes a 24-bit little-endian length field.
pub fn decode_len24(bytes: &[u8]) -> usize {
    debug_assert!(bytes.len() >= 3);
    (bytes[0] as usize) | ((bytes[1] as usize) << 8) | ((bytes[2] as usize) << 16)
}

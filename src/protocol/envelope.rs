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

//! The session envelope carried inside every post-handshake `Aes` message's
//! plaintext: an 8-byte session token followed by a 4-byte [`RequestKind`]
//! and the request body (§6).

use crate::protocol::request_kind::RequestKind;
use crate::util::error::{DdbResult, Error};

pub const ENVELOPE_HEADER_SIZE: usize = 8 + RequestKind::WIRE_SIZE;

#[derive(Debug, Clone)]
pub struct Envelope {
    pub session_token: u64,
    pub kind: RequestKind,
    pub body: Vec<u8>,
}

impl Envelope {
    pub fn new(session_token: u64, kind: RequestKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            session_token,
            kind,
            body: body.into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(ENVELOPE_HEADER_SIZE + self.body.len());
        out.extend_from_slice(&self.session_token.to_le_bytes());
        out.extend_from_slice(&self.kind.to_le_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    pub fn decode(bytes: &[u8]) -> DdbResult<Self> {
        if bytes.len() < ENVELOPE_HEADER_SIZE {
            return Err(Error::protocol("envelope shorter than its fixed header"));
        }
        let mut token_bytes = [0u8; 8];
        token_bytes.copy_from_slice(&bytes[..8]);
        let session_token = u64::from_le_bytes(token_bytes);

        let mut kind_bytes = [0u8; 4];
        kind_bytes.copy_from_slice(&bytes[8..ENVELOPE_HEADER_SIZE]);
        let kind = RequestKind::try_from(u32::from_le_bytes(kind_bytes))?;

        Ok(Self {
            session_token,
            kind,
            body: bytes[ENVELOPE_HEADER_SIZE..].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let env = Envelope::new(0xDEAD_BEEF_CAFE_F00D, RequestKind::DrawingSearchQuery, vec![1, 2, 3]);
        let bytes = env.encode();
        let decoded = Envelope::decode(&bytes).unwrap();
        assert_eq!(decoded.session_token, env.session_token);
        assert_eq!(decoded.kind, env.kind);
        assert_eq!(decoded.body, env.body);
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(Envelope::decode(&[0u8; 4]).is_err());
    }

    #[test]
    fn empty_body_is_valid() {
        let env = Envelope::new(1, RequestKind::NextDrawingNumber, Vec::new());
        let decoded = Envelope::decode(&env.encode()).unwrap();
        assert!(decoded.body.is_empty());
    }
}

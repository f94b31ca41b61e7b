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

//! The message codec (§4.2): `PlainMessage` and `EncryptedMessage`, sharing a
//! length-prefixed, protocol-tagged, chunk-padded frame, with incremental
//! decode that tolerates an arbitrary split of the frame's bytes across
//! socket reads (§8's round-trip/chunking property).

use crate::crypto::aes::{self, AesKey};
use crate::crypto::rsa;
use crate::protocol::frame::{
    chunk_padded, decode_len24, encode_len24, HEADER_SIZE, IV_SIZE, MAX_PAYLOAD_LEN,
};
use crate::util::error::{DdbResult, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ProtocolTag {
    Key = 0,
    Rsa = 1,
    Aes = 2,
    Raw = 3,
    ConnectionResponse = 4,
    Disconnect = 5,
    Heartbeat = 6,
}

impl TryFrom<u8> for ProtocolTag {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        use ProtocolTag::*;
        Ok(match value {
            0 => Key,
            1 => Rsa,
            2 => Aes,
            3 => Raw,
            4 => ConnectionResponse,
            5 => Disconnect,
            6 => Heartbeat,
            other => return Err(Error::protocol(format!("unknown protocol tag {other}"))),
        })
    }
}

/// Validates a declared payload length against the exact/maximum size table
/// fixed for each protocol tag (§4.2).
fn validate_len(tag: ProtocolTag, len: usize) -> DdbResult<()> {
    let ok = match tag {
        ProtocolTag::Key => len == rsa::PUBLIC_KEY_WIRE_SIZE,
        ProtocolTag::Rsa => len == rsa::RSA_BLOCK_BYTES,
        ProtocolTag::Aes => len <= MAX_PAYLOAD_LEN,
        ProtocolTag::Raw => len <= MAX_PAYLOAD_LEN,
        ProtocolTag::ConnectionResponse => len == 1,
        ProtocolTag::Disconnect => len == 1,
        ProtocolTag::Heartbeat => len == 1,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::protocol(format!(
            "payload of length {len} is invalid for tag {tag:?}"
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    Decoded,
    Decoding,
    Error,
}

/// Accumulates bytes from arbitrarily-split chunks until `target` bytes have
/// been collected. Shared by the header and (for encrypted frames) IV stages
/// of both decoders.
#[derive(Default)]
struct ByteAccumulator {
    buf: Vec<u8>,
}

impl ByteAccumulator {
    /// Consumes as many bytes as needed from the front of `chunk`, returning
    /// `Some(bytes)` once `target` have been collected (and advancing
    /// `chunk` past what was consumed), or `None` if still short.
    fn take<'a>(&mut self, target: usize, chunk: &mut &'a [u8]) -> Option<Vec<u8>> {
        let need = target - self.buf.len();
        let take = need.min(chunk.len());
        self.buf.extend_from_slice(&chunk[..take]);
        *chunk = &chunk[take..];
        if self.buf.len() == target {
            Some(std::mem::take(&mut self.buf))
        } else {
            None
        }
    }
}

/// A fully-formed, un-framed plaintext message: a protocol tag plus payload.
#[derive(Debug, Clone)]
pub struct PlainMessage {
    tag: ProtocolTag,
    payload: Vec<u8>,
}

impl PlainMessage {
    pub fn new(tag: ProtocolTag, payload: &[u8]) -> DdbResult<Self> {
        validate_len(tag, payload.len())?;
        Ok(Self {
            tag,
            payload: payload.to_vec(),
        })
    }

    pub fn tag(&self) -> ProtocolTag {
        self.tag
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Produces the full, chunk-padded wire frame.
    pub fn encode(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(chunk_padded(HEADER_SIZE + self.payload.len()));
        frame.push(self.tag as u8);
        frame.extend_from_slice(&encode_len24(self.payload.len()));
        frame.extend_from_slice(&self.payload);
        frame.resize(chunk_padded(frame.len()), 0);
        frame
    }
}

/// Incremental decoder for [`PlainMessage`]. Feed it chunks (of any size, not
/// necessarily [`super::frame::CHUNK_SIZE`]-aligned) until it reports
/// [`DecodeState::Decoded`].
#[derive(Default)]
pub struct PlainDecoder {
    header_acc: ByteAccumulator,
    header: Option<(ProtocolTag, usize)>,
    payload: Vec<u8>,
    read_left: usize,
    error: bool,
}

impl PlainDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, mut chunk: &[u8]) -> DecodeState {
        if self.error {
            return DecodeState::Error;
        }
        if self.header.is_none() {
            match self.header_acc.take(HEADER_SIZE, &mut chunk) {
                Some(bytes) => {
                    let tag = match ProtocolTag::try_from(bytes[0]) {
                        Ok(t) => t,
                        Err(_) => {
                            self.error = true;
                            return DecodeState::Error;
                        }
                    };
                    let len = decode_len24(&bytes[1..4]);
                    if validate_len(tag, len).is_err() {
                        self.error = true;
                        return DecodeState::Error;
                    }
                    self.read_left = len;
                    self.payload = Vec::with_capacity(len);
                    self.header = Some((tag, len));
                }
                None => return DecodeState::Decoding,
            }
        }
        let take = self.read_left.min(chunk.len());
        self.payload.extend_from_slice(&chunk[..take]);
        self.read_left -= take;
        if self.read_left == 0 {
            DecodeState::Decoded
        } else {
            DecodeState::Decoding
        }
    }

    /// Consumes the decoder into the finished message. Only meaningful after
    /// `feed` has returned [`DecodeState::Decoded`].
    pub fn finish(self) -> DdbResult<PlainMessage> {
        if self.error {
            return Err(Error::protocol("decode error: buffer quarantined"));
        }
        let (tag, _) = self
            .header
            .ok_or_else(|| Error::protocol("decode incomplete"))?;
        Ok(PlainMessage {
            tag,
            payload: self.payload,
        })
    }
}

/// An encrypted frame: tag (restricted to `Aes`, `Heartbeat`, `Disconnect`),
/// declared plaintext length, an 8-byte IV, and padded-to-16 ciphertext.
/// Decryption is lazy: the ciphertext is only decrypted when the caller
/// supplies the session key.
#[derive(Debug, Clone)]
pub struct EncryptedMessage {
    tag: ProtocolTag,
    plaintext_len: usize,
    iv: u64,
    ciphertext: Vec<u8>,
}

impl EncryptedMessage {
    /// Encrypts `plaintext` under `key` with a fresh CSPRNG-generated IV.
    pub fn encrypt(tag: ProtocolTag, plaintext: &[u8], key: &AesKey) -> DdbResult<Self> {
        validate_len(tag, plaintext.len())?;
        let iv = crate::crypto::rand::wire_iv()?;
        let padded = aes::pad_to_block(plaintext);
        let ciphertext = aes::encrypt(key, iv, &padded)?;
        Ok(Self {
            tag,
            plaintext_len: plaintext.len(),
            iv,
            ciphertext,
        })
    }

    pub fn tag(&self) -> ProtocolTag {
        self.tag
    }

    pub fn decrypt(&self, key: &AesKey) -> DdbResult<Vec<u8>> {
        let mut plain = aes::decrypt(key, self.iv, &self.ciphertext)?;
        plain.truncate(self.plaintext_len);
        Ok(plain)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut frame =
            Vec::with_capacity(chunk_padded(HEADER_SIZE + IV_SIZE + self.ciphertext.len()));
        frame.push(self.tag as u8);
        frame.extend_from_slice(&encode_len24(self.plaintext_len));
        frame.extend_from_slice(&self.iv.to_le_bytes());
        frame.extend_from_slice(&self.ciphertext);
        frame.resize(chunk_padded(frame.len()), 0);
        frame
    }
}

pub(crate) fn is_encryptable_tag(tag: ProtocolTag) -> bool {
    matches!(
        tag,
        ProtocolTag::Aes | ProtocolTag::Heartbeat | ProtocolTag::Disconnect
    )
}

/// Incremental decoder for [`EncryptedMessage`].
#[derive(Default)]
pub struct EncryptedDecoder {
    header_acc: ByteAccumulator,
    header: Option<(ProtocolTag, usize)>,
    iv_acc: ByteAccumulator,
    iv: Option<u64>,
    ciphertext: Vec<u8>,
    read_left: usize,
    error: bool,
}

impl EncryptedDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, mut chunk: &[u8]) -> DecodeState {
        if self.error {
            return DecodeState::Error;
        }
        if self.header.is_none() {
            match self.header_acc.take(HEADER_SIZE, &mut chunk) {
                Some(bytes) => {
                    let tag = match ProtocolTag::try_from(bytes[0]) {
                        Ok(t) if is_encryptable_tag(t) => t,
                        _ => {
                            self.error = true;
                            return DecodeState::Error;
                        }
                    };
                    let len = decode_len24(&bytes[1..4]);
                    if validate_len(tag, len).is_err() {
                        self.error = true;
                        return DecodeState::Error;
                    }
                    let padded = crate::protocol::frame::padded_size(
                        len,
                        crate::crypto::aes::AES_BLOCK_BYTES,
                    );
                    self.read_left = padded;
                    self.ciphertext = Vec::with_capacity(padded);
                    self.header = Some((tag, len));
                }
                None => return DecodeState::Decoding,
            }
        }
        if self.iv.is_none() {
            match self.iv_acc.take(IV_SIZE, &mut chunk) {
                Some(bytes) => {
                    let mut iv_bytes = [0u8; 8];
                    iv_bytes.copy_from_slice(&bytes);
                    self.iv = Some(u64::from_le_bytes(iv_bytes));
                }
                None => return DecodeState::Decoding,
            }
        }
        let take = self.read_left.min(chunk.len());
        self.ciphertext.extend_from_slice(&chunk[..take]);
        self.read_left -= take;
        if self.read_left == 0 {
            DecodeState::Decoded
        } else {
            DecodeState::Decoding
        }
    }

    pub fn finish(self) -> DdbResult<EncryptedMessage> {
        if self.error {
            return Err(Error::protocol("decode error: buffer quarantined"));
        }
        let (tag, plaintext_len) = self
            .header
            .ok_or_else(|| Error::protocol("decode incomplete"))?;
        let iv = self.iv.ok_or_else(|| Error::protocol("decode incomplete"))?;
        Ok(EncryptedMessage {
            tag,
            plaintext_len,
            iv,
            ciphertext: self.ciphertext,
        })
    }
}

/// A decoded frame of either framing. The socket layer doesn't know ahead of
/// time which one it's about to read off the wire — only the tag, once the
/// 4-byte header arrives, tells it — so `AnyDecoder` peeks the tag and
/// dispatches to the right sub-decoder without re-parsing the header twice.
#[derive(Debug, Clone)]
pub enum Frame {
    Plain(PlainMessage),
    Encrypted(EncryptedMessage),
}

impl Frame {
    pub fn tag(&self) -> ProtocolTag {
        match self {
            Frame::Plain(m) => m.tag(),
            Frame::Encrypted(m) => m.tag(),
        }
    }
}

enum DecoderInner {
    Plain(PlainDecoder),
    Encrypted(EncryptedDecoder),
}

#[derive(Default)]
pub struct AnyDecoder {
    header_acc: ByteAccumulator,
    inner: Option<DecoderInner>,
    error: bool,
}

impl AnyDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, mut chunk: &[u8]) -> DecodeState {
        if self.error {
            return DecodeState::Error;
        }
        if self.inner.is_none() {
            let header_bytes = match self.header_acc.take(HEADER_SIZE, &mut chunk) {
                Some(bytes) => bytes,
                None => return DecodeState::Decoding,
            };
            let tag = match ProtocolTag::try_from(header_bytes[0]) {
                Ok(t) => t,
                Err(_) => {
                    self.error = true;
                    return DecodeState::Error;
                }
            };
            let mut inner = if is_encryptable_tag(tag) {
                DecoderInner::Encrypted(EncryptedDecoder::new())
            } else {
                DecoderInner::Plain(PlainDecoder::new())
            };
            let state = match &mut inner {
                DecoderInner::Plain(d) => d.feed(&header_bytes),
                DecoderInner::Encrypted(d) => d.feed(&header_bytes),
            };
            self.inner = Some(inner);
            match state {
                DecodeState::Error => {
                    self.error = true;
                    return DecodeState::Error;
                }
                DecodeState::Decoded => return DecodeState::Decoded,
                DecodeState::Decoding => {}
            }
        }
        if chunk.is_empty() {
            return DecodeState::Decoding;
        }
        let state = match self.inner.as_mut().unwrap() {
            DecoderInner::Plain(d) => d.feed(chunk),
            DecoderInner::Encrypted(d) => d.feed(chunk),
        };
        if state == DecodeState::Error {
            self.error = true;
        }
        state
    }

    pub fn finish(self) -> DdbResult<Frame> {
        if self.error {
            return Err(Error::protocol("decode error: buffer quarantined"));
        }
        match self.inner {
            Some(DecoderInner::Plain(d)) => Ok(Frame::Plain(d.finish()?)),
            Some(DecoderInner::Encrypted(d)) => Ok(Frame::Encrypted(d.finish()?)),
            None => Err(Error::protocol("decode incomplete")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::rand::aes_key;

    fn decode_in_arbitrary_chunks(frame: &[u8], splits: &[usize]) -> DecodeState {
        let mut decoder = PlainDecoder::new();
        let mut offset = 0;
        let mut state = DecodeState::Decoding;
        for &split in splits {
            let end = (offset + split).min(frame.len());
            state = decoder.feed(&frame[offset..end]);
            offset = end;
            if state != DecodeState::Decoding {
                break;
            }
        }
        if offset < frame.len() {
            state = decoder.feed(&frame[offset..]);
        }
        state
    }

    #[test]
    fn plain_round_trip_arbitrary_splits() {
        let msg = PlainMessage::new(ProtocolTag::Raw, b"hello component catalog").unwrap();
        let frame = msg.encode();
        for splits in [vec![1, 1, 1, frame.len()], vec![3, 2, frame.len()], vec![frame.len()]] {
            let state = decode_in_arbitrary_chunks(&frame, &splits);
            assert_eq!(state, DecodeState::Decoded);
        }
    }

    #[test]
    fn max_payload_encodes_and_decodes() {
        let payload = vec![0xABu8; MAX_PAYLOAD_LEN];
        let msg = PlainMessage::new(ProtocolTag::Raw, &payload).unwrap();
        let frame = msg.encode();
        let mut decoder = PlainDecoder::new();
        assert_eq!(decoder.feed(&frame), DecodeState::Decoded);
        let decoded = decoder.finish().unwrap();
        assert_eq!(decoded.payload(), payload.as_slice());
    }

    #[test]
    fn oversize_payload_is_rejected_at_construction() {
        let payload = vec![0u8; MAX_PAYLOAD_LEN + 1];
        assert!(PlainMessage::new(ProtocolTag::Raw, &payload).is_err());
    }

    #[test]
    fn empty_payload_round_trips() {
        let msg = PlainMessage::new(ProtocolTag::Raw, &[]).unwrap();
        let frame = msg.encode();
        assert_eq!(frame.len() % crate::protocol::frame::CHUNK_SIZE, 0);
        let mut decoder = PlainDecoder::new();
        assert_eq!(decoder.feed(&frame), DecodeState::Decoded);
        assert!(decoder.finish().unwrap().payload().is_empty());
    }

    #[test]
    fn encrypted_round_trip() {
        let key = aes_key().unwrap();
        let payload = b"0123456789session-envelope-bytes";
        let msg = EncryptedMessage::encrypt(ProtocolTag::Aes, payload, &key).unwrap();
        let frame = msg.encode();
        let mut decoder = EncryptedDecoder::new();
        assert_eq!(decoder.feed(&frame), DecodeState::Decoded);
        let decoded = decoder.finish().unwrap();
        assert_eq!(decoded.decrypt(&key).unwrap(), payload);
    }

    #[test]
    fn any_decoder_routes_plain_and_encrypted_by_tag() {
        let plain = PlainMessage::new(ProtocolTag::Key, &[0u8; rsa::PUBLIC_KEY_WIRE_SIZE]).unwrap();
        let mut decoder = AnyDecoder::new();
        assert_eq!(decoder.feed(&plain.encode()), DecodeState::Decoded);
        assert!(matches!(decoder.finish().unwrap(), Frame::Plain(_)));

        let key = aes_key().unwrap();
        let encrypted = EncryptedMessage::encrypt(ProtocolTag::Aes, b"hi", &key).unwrap();
        let mut decoder = AnyDecoder::new();
        assert_eq!(decoder.feed(&encrypted.encode()), DecodeState::Decoded);
        assert!(matches!(decoder.finish().unwrap(), Frame::Encrypted(_)));
    }

    #[test]
    fn frame_size_matches_invariant() {
        let payload = vec![7u8; 200];
        let msg = PlainMessage::new(ProtocolTag::Raw, &payload).unwrap();
        let frame = msg.encode();
        let expected = chunk_padded(HEADER_SIZE + payload.len());
        assert_eq!(frame.len(), expected);
    }
}

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

//! Wire encoding primitives shared by every component kind (§4.5, §6):
//! strings as a 1-byte length prefix + UTF-8 bytes, floats as 4-byte
//! little-endian IEEE-754, optionals as a 1-byte presence flag + value,
//! enums as a single byte.

use crate::util::error::{DdbResult, Error};

/// A cursor over a kind's `entity_bytes` slice. Every `read_*` advances the
/// cursor and fails if the slice runs out, so a truncated element is caught
/// at the point of the short read rather than silently producing garbage.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> DdbResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(Error::protocol("truncated entity buffer"));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> DdbResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> DdbResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_u16(&mut self) -> DdbResult<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> DdbResult<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> DdbResult<f32> {
        Ok(f32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_string(&mut self) -> DdbResult<String> {
        let len = self.read_u8()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| Error::protocol("entity string is not valid UTF-8"))
    }

    pub fn read_option_f32(&mut self) -> DdbResult<Option<f32>> {
        if self.read_bool()? {
            Ok(Some(self.read_f32()?))
        } else {
            Ok(None)
        }
    }

    pub fn read_option_u32(&mut self) -> DdbResult<Option<u32>> {
        if self.read_bool()? {
            Ok(Some(self.read_u32()?))
        } else {
            Ok(None)
        }
    }
}

/// Accumulates a kind's `entity_bytes` for the server-side builder (§4.5
/// step 3). Kept append-only and infallible: callers compute a size budget
/// up front, so nothing here ever needs to fail.
#[derive(Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn write_bool(&mut self, v: bool) -> &mut Self {
        self.write_u8(v as u8)
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_f32(&mut self, v: f32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn write_string(&mut self, s: &str) -> &mut Self {
        debug_assert!(s.len() <= u8::MAX as usize, "entity string exceeds 255 bytes");
        self.write_u8(s.len() as u8);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    pub fn write_option_f32(&mut self, v: Option<f32>) -> &mut Self {
        match v {
            Some(f) => {
                self.write_bool(true);
                self.write_f32(f);
            }
            None => {
                self.write_bool(false);
            }
        }
        self
    }

    pub fn write_option_u32(&mut self, v: Option<u32>) -> &mut Self {
        match v {
            Some(n) => {
                self.write_bool(true);
                self.write_u32(n);
            }
            None => {
                self.write_bool(false);
            }
        }
        self
    }
}

/// A component entity kind, serialised/deserialised per §4.5's per-kind
/// reader/writer contract. `id(0)` must produce the catalog's null entity
/// for handle 0 — every kind's "id 0" row is a harmless placeholder, never
/// read by a real lookup.
pub trait Entity: Sized {
    /// Builds the null placeholder stored at handle 0.
    fn null() -> Self;

    /// Reads one element's kind-specific fields. Must consume exactly the
    /// bytes the writer produced for this element, or the caller's "exactly
    /// `entity_bytes`" invariant (§4.5) is violated.
    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self>;

    /// Writes this element's kind-specific fields (the `id` is written by
    /// the caller as part of the `{handle, id, entity_bytes}` triple).
    fn write(&self, writer: &mut ByteWriter);

    /// The database id this entity was loaded under.
    fn id(&self) -> u32;
}

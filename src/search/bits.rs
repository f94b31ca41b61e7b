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

//! LSB-first bit packing, shared by the compression schema and every drawing
//! summary it compresses (§4.5's "compression schema for search results").

use crate::util::error::{DdbResult, Error};

/// Minimal number of bits needed to represent every value in `0..=max`,
/// never less than one (so a field with maximum `0` still reserves a bit).
pub fn bits_for(max: u32) -> u8 {
    (32 - max.leading_zeros()).max(1) as u8
}

#[derive(Default)]
pub struct BitWriter {
    buf: Vec<u8>,
    bit_pos: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bits(&mut self, value: u32, bits: u8) {
        for i in 0..bits {
            if self.bit_pos == 0 {
                self.buf.push(0);
            }
            if (value >> i) & 1 == 1 {
                *self.buf.last_mut().unwrap() |= 1 << self.bit_pos;
            }
            self.bit_pos = (self.bit_pos + 1) % 8;
        }
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.write_bits(*b as u32, 8);
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

pub struct BitReader<'a> {
    buf: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, bit_pos: 0 }
    }

    pub fn read_bits(&mut self, bits: u8) -> DdbResult<u32> {
        let mut value = 0u32;
        for i in 0..bits as usize {
            let pos = self.bit_pos + i;
            let byte = pos / 8;
            let offset = pos % 8;
            let bit = *self.buf.get(byte).ok_or_else(|| Error::protocol("truncated bit-packed summary"))? >> offset & 1;
            value |= (bit as u32) << i;
        }
        self.bit_pos += bits as usize;
        Ok(value)
    }

    pub fn read_bytes(&mut self, count: usize) -> DdbResult<Vec<u8>> {
        (0..count).map(|_| self.read_bits(8).map(|v| v as u8)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_width_fields() {
        let mut writer = BitWriter::new();
        writer.write_bits(5, 3);
        writer.write_bits(300, 12);
        writer.write_bits(1, 1);
        let bytes = writer.into_bytes();
        let mut reader = BitReader::new(&bytes);
        assert_eq!(reader.read_bits(3).unwrap(), 5);
        assert_eq!(reader.read_bits(12).unwrap(), 300);
        assert_eq!(reader.read_bits(1).unwrap(), 1);
    }

    #[test]
    fn bits_for_reserves_at_least_one_bit() {
        assert_eq!(bits_for(0), 1);
        assert_eq!(bits_for(1), 1);
        assert_eq!(bits_for(255), 8);
        assert_eq!(bits_for(256), 9);
    }
}

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

//! Aperture catalog (§3): a cutting tool, identified by its cross-section
//! shape and dimensions. `shape_handle` and `nibble_handle` are already
//! resolved catalog handles (not raw database ids) by the time an aperture
//! reaches the wire — the server resolves them against the aperture-shape
//! catalog while building the stream (§4.5, §9's Material/BackingStrip
//! ordering note applies here too: aperture shapes are sourced before
//! apertures on every refresh).

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::DdbResult;

#[derive(Debug, Clone, Default)]
pub struct Aperture {
    pub id: u32,
    pub width: f32,
    pub length: f32,
    pub base_width: u16,
    pub base_length: u16,
    pub shape_handle: u32,
    pub quantity: u16,
    /// `Some(handle)` if this aperture is a nibbled variant of another.
    pub nibble_handle: Option<u32>,
}

impl Aperture {
    /// The user-visible name: width x length, e.g. "20.0x30.0".
    pub fn name(&self) -> String {
        format!("{:.1}x{:.1}", self.width, self.length)
    }
}

impl Entity for Aperture {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self {
            id,
            width: reader.read_f32()?,
            length: reader.read_f32()?,
            base_width: reader.read_u16()?,
            base_length: reader.read_u16()?,
            shape_handle: reader.read_u32()?,
            quantity: reader.read_u16()?,
            nibble_handle: reader.read_option_u32()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_f32(self.width)
            .write_f32(self.length)
            .write_u16(self.base_width)
            .write_u16(self.base_length)
            .write_u32(self.shape_handle)
            .write_u16(self.quantity)
            .write_option_u32(self.nibble_handle);
    }

    fn id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_entity_bytes() {
        let aperture = Aperture {
            id: 4,
            width: 20.0,
            length: 30.0,
            base_width: 18,
            base_length: 28,
            shape_handle: 2,
            quantity: 1,
            nibble_handle: Some(7),
        };
        let mut writer = ByteWriter::new();
        aperture.write(&mut writer);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let back = Aperture::read(4, &mut reader).unwrap();
        assert_eq!(back.name(), "20.0x30.0");
        assert_eq!(back.nibble_handle, Some(7));
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn no_nibble_round_trips() {
        let aperture = Aperture { id: 1, nibble_handle: None, ..Default::default() };
        let mut writer = ByteWriter::new();
        aperture.write(&mut writer);
        let back = Aperture::read(1, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.nibble_handle, None);
    }
}

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

//! `DrawingSummaryCompressionSchema` (§4.5): a small header the server
//! rebuilds whenever a contributing catalog (apertures, materials,
//! side-iron prices — `CatalogStore::compression_schema_dirty`) changes,
//! recording the bit width each of ten fields needs to represent the
//! database's current maxima. Both peers use the same schema to compress
//! and decompress every summary in a search response.
//!
//! `DatabaseManager.cpp`'s `createCompressionSchema()` grounds the maxima
//! this is built from (`MAX(mat_id)`, `MAX(width)`, `MAX(length)`, a
//! per-table `MAX(material_id)`, the widest sidelap/overlap, `MAX(aperture_id)`,
//! `MAX(LENGTH(drawing_number))`); the two fields it doesn't compute
//! (bar-spacing count, extra-aperture count) are inferred from the
//! distillation's explicit ten-field list (§4.5) since the original
//! `DrawingSummaryCompressionSchema` type definition itself was filtered out
//! of the retrieved source — see `DESIGN.md`.

use crate::catalog::entity::{ByteReader, ByteWriter};
use crate::search::bits::bits_for;
use crate::util::error::DdbResult;

/// Decimal fields (width, length, lap size, bar spacing) are transmitted as
/// tenths-of-a-unit integers rather than floats, keeping every packed field
/// a plain bit-width integer.
pub const DECIMAL_SCALE: f32 = 10.0;

pub fn quantize(value: f32) -> u32 {
    (value * DECIMAL_SCALE).round().max(0.0) as u32
}

pub fn dequantize(value: u32) -> f32 {
    value as f32 / DECIMAL_SCALE
}

/// The maxima the schema's bit widths are computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawingSummaryMaxima {
    pub mat_id: u32,
    pub width: f32,
    pub length: f32,
    pub material_handle: u32,
    pub lap_size: f32,
    pub aperture_handle: u32,
    pub bar_spacing_count: u32,
    pub bar_spacing: f32,
    pub drawing_number_length: u32,
    pub extra_aperture_count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingSummaryCompressionSchema {
    pub mat_id_bits: u8,
    pub width_bits: u8,
    pub length_bits: u8,
    pub material_handle_bits: u8,
    pub lap_size_bits: u8,
    pub aperture_handle_bits: u8,
    pub bar_spacing_count_bits: u8,
    pub bar_spacing_bits: u8,
    pub drawing_number_length_bits: u8,
    pub extra_aperture_count_bits: u8,
}

impl DrawingSummaryCompressionSchema {
    pub fn build(maxima: &DrawingSummaryMaxima) -> Self {
        Self {
            mat_id_bits: bits_for(maxima.mat_id),
            width_bits: bits_for(quantize(maxima.width)),
            length_bits: bits_for(quantize(maxima.length)),
            material_handle_bits: bits_for(maxima.material_handle),
            lap_size_bits: bits_for(quantize(maxima.lap_size)),
            aperture_handle_bits: bits_for(maxima.aperture_handle),
            bar_spacing_count_bits: bits_for(maxima.bar_spacing_count),
            bar_spacing_bits: bits_for(quantize(maxima.bar_spacing)),
            drawing_number_length_bits: bits_for(maxima.drawing_number_length),
            extra_aperture_count_bits: bits_for(maxima.extra_aperture_count),
        }
    }

    /// Writes the schema's ten bit widths, one byte each, so it can be sent
    /// in-band ahead of a search response's summaries (§6, §8 scenario 4).
    pub fn write(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.mat_id_bits);
        writer.write_u8(self.width_bits);
        writer.write_u8(self.length_bits);
        writer.write_u8(self.material_handle_bits);
        writer.write_u8(self.lap_size_bits);
        writer.write_u8(self.aperture_handle_bits);
        writer.write_u8(self.bar_spacing_count_bits);
        writer.write_u8(self.bar_spacing_bits);
        writer.write_u8(self.drawing_number_length_bits);
        writer.write_u8(self.extra_aperture_count_bits);
    }

    pub fn read(reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self {
            mat_id_bits: reader.read_u8()?,
            width_bits: reader.read_u8()?,
            length_bits: reader.read_u8()?,
            material_handle_bits: reader.read_u8()?,
            lap_size_bits: reader.read_u8()?,
            aperture_handle_bits: reader.read_u8()?,
            bar_spacing_count_bits: reader.read_u8()?,
            bar_spacing_bits: reader.read_u8()?,
            drawing_number_length_bits: reader.read_u8()?,
            extra_aperture_count_bits: reader.read_u8()?,
        })
    }

    /// The fixed, non-repeating portion of every summary's bit width: the
    /// repeated groups (bar spacings, drawing number bytes, extra aperture
    /// handles) are sized per-summary on top of this.
    pub fn fixed_bits(&self) -> u32 {
        self.mat_id_bits as u32
            + self.width_bits as u32
            + self.length_bits as u32
            + self.material_handle_bits as u32
            + self.lap_size_bits as u32
            + self.aperture_handle_bits as u32
            + self.bar_spacing_count_bits as u32
            + self.drawing_number_length_bits as u32
            + self.extra_aperture_count_bits as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_bit_widths_cover_the_stated_maxima() {
        let maxima = DrawingSummaryMaxima {
            mat_id: 300,
            width: 3.0,
            length: 5.0,
            material_handle: 2,
            lap_size: 1.5,
            aperture_handle: 4,
            bar_spacing_count: 3,
            bar_spacing: 12.5,
            drawing_number_length: 12,
            extra_aperture_count: 2,
        };
        let schema = DrawingSummaryCompressionSchema::build(&maxima);
        assert_eq!(schema.mat_id_bits, 9);
        assert_eq!((1u32 << schema.width_bits) - 1 >= quantize(maxima.width), true);
        assert_eq!(schema.material_handle_bits, 2);
    }

    #[test]
    fn schema_round_trips_through_its_wire_form() {
        let schema = DrawingSummaryCompressionSchema::build(&DrawingSummaryMaxima {
            mat_id: 300,
            width: 3.0,
            length: 5.0,
            material_handle: 2,
            lap_size: 1.5,
            aperture_handle: 4,
            bar_spacing_count: 3,
            bar_spacing: 12.5,
            drawing_number_length: 12,
            extra_aperture_count: 2,
        });
        let mut writer = ByteWriter::new();
        schema.write(&mut writer);
        let bytes = writer.into_bytes();
        assert_eq!(bytes.len(), 10);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(DrawingSummaryCompressionSchema::read(&mut reader).unwrap(), schema);
    }
}

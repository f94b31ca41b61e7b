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

//! `DrawingSummary` (§4.5, §8's search scenario): one search-result row,
//! compressed against a [`DrawingSummaryCompressionSchema`] the two peers
//! have agreed on. The schema fixes a bit width per field; this module only
//! packs/unpacks values into those widths.

use crate::search::bits::{BitReader, BitWriter};
use crate::search::schema::{dequantize, quantize, DrawingSummaryCompressionSchema};
use crate::util::error::{DdbResult, Error};

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSummary {
    pub mat_id: u32,
    pub width: f32,
    pub length: f32,
    pub material_handle: u32,
    pub lap_size: f32,
    pub aperture_handle: u32,
    pub bar_spacings: Vec<f32>,
    pub drawing_number: String,
    pub extra_apertures: Vec<u32>,
}

impl DrawingSummary {
    /// Total packed size in bytes for this specific summary under `schema`;
    /// varies per-summary since the bar-spacing and extra-aperture groups
    /// are repeated a variable number of times (§8: "7 bit-packed summaries
    /// each of exactly `compressed_size(summary)` bytes").
    pub fn compressed_size(&self, schema: &DrawingSummaryCompressionSchema) -> usize {
        let bits = schema.fixed_bits() as usize
            + self.bar_spacings.len() * schema.bar_spacing_bits as usize
            + self.drawing_number.len() * 8
            + self.extra_apertures.len() * schema.aperture_handle_bits as usize;
        bits.div_ceil(8)
    }

    pub fn compress(&self, schema: &DrawingSummaryCompressionSchema) -> Vec<u8> {
        let mut writer = BitWriter::new();
        writer.write_bits(self.mat_id, schema.mat_id_bits);
        writer.write_bits(quantize(self.width), schema.width_bits);
        writer.write_bits(quantize(self.length), schema.length_bits);
        writer.write_bits(self.material_handle, schema.material_handle_bits);
        writer.write_bits(quantize(self.lap_size), schema.lap_size_bits);
        writer.write_bits(self.aperture_handle, schema.aperture_handle_bits);
        writer.write_bits(self.bar_spacings.len() as u32, schema.bar_spacing_count_bits);
        for spacing in &self.bar_spacings {
            writer.write_bits(quantize(*spacing), schema.bar_spacing_bits);
        }
        writer.write_bits(self.drawing_number.len() as u32, schema.drawing_number_length_bits);
        writer.write_bytes(self.drawing_number.as_bytes());
        writer.write_bits(self.extra_apertures.len() as u32, schema.extra_aperture_count_bits);
        for handle in &self.extra_apertures {
            writer.write_bits(*handle, schema.aperture_handle_bits);
        }
        writer.into_bytes()
    }

    pub fn decompress(bytes: &[u8], schema: &DrawingSummaryCompressionSchema) -> DdbResult<Self> {
        let mut reader = BitReader::new(bytes);
        let mat_id = reader.read_bits(schema.mat_id_bits)?;
        let width = dequantize(reader.read_bits(schema.width_bits)?);
        let length = dequantize(reader.read_bits(schema.length_bits)?);
        let material_handle = reader.read_bits(schema.material_handle_bits)?;
        let lap_size = dequantize(reader.read_bits(schema.lap_size_bits)?);
        let aperture_handle = reader.read_bits(schema.aperture_handle_bits)?;
        let bar_spacing_count = reader.read_bits(schema.bar_spacing_count_bits)?;
        let mut bar_spacings = Vec::with_capacity(bar_spacing_count as usize);
        for _ in 0..bar_spacing_count {
            bar_spacings.push(dequantize(reader.read_bits(schema.bar_spacing_bits)?));
        }
        let drawing_number_length = reader.read_bits(schema.drawing_number_length_bits)? as usize;
        let drawing_number = String::from_utf8(reader.read_bytes(drawing_number_length)?)
            .map_err(|_| Error::protocol("drawing number is not valid UTF-8"))?;
        let extra_aperture_count = reader.read_bits(schema.extra_aperture_count_bits)?;
        let mut extra_apertures = Vec::with_capacity(extra_aperture_count as usize);
        for _ in 0..extra_aperture_count {
            extra_apertures.push(reader.read_bits(schema.aperture_handle_bits)?);
        }
        Ok(Self { mat_id, width, length, material_handle, lap_size, aperture_handle, bar_spacings, drawing_number, extra_apertures })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::schema::DrawingSummaryMaxima;

    fn schema() -> DrawingSummaryCompressionSchema {
        DrawingSummaryCompressionSchema::build(&DrawingSummaryMaxima {
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
        })
    }

    #[test]
    fn round_trips_a_summary_with_repeated_groups() {
        let schema = schema();
        let summary = DrawingSummary {
            mat_id: 200,
            width: 3.0,
            length: 5.0,
            material_handle: 1,
            lap_size: 1.0,
            aperture_handle: 2,
            bar_spacings: vec![10.0, 12.5],
            drawing_number: "SCS15620001".into(),
            extra_apertures: vec![1, 3],
        };
        let bytes = summary.compress(&schema);
        assert_eq!(bytes.len(), summary.compressed_size(&schema));
        let back = DrawingSummary::decompress(&bytes, &schema).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn round_trips_a_summary_with_no_repeated_groups() {
        let schema = schema();
        let summary = DrawingSummary {
            mat_id: 1,
            width: 0.0,
            length: 0.0,
            material_handle: 0,
            lap_size: 0.0,
            aperture_handle: 0,
            bar_spacings: vec![],
            drawing_number: String::new(),
            extra_apertures: vec![],
        };
        let bytes = summary.compress(&schema);
        let back = DrawingSummary::decompress(&bytes, &schema).unwrap();
        assert_eq!(back, summary);
    }
}

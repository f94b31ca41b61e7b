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

//! Material catalog (§3): a mat material, priced per size band.
//!
//! `Material::material_prices` carries one `MaterialPrice` tuple per size
//! band, confirmed against `Material::materialPrices` in
//! `examples/original_source/include/database/drawingComponents.h` — the
//! distilled spec's prose ("Material (with embedded price tuples)") is
//! realised here as a `Vec<MaterialPrice>` rather than a single price.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::{DdbResult, Error};

/// How a [`MaterialPrice`] tuple's `price` field should be interpreted,
/// mirroring `MaterialPricingType` in the original header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MaterialPricingType {
    RunningMetre = 0,
    SquareMetre = 1,
    Sheet = 2,
}

impl TryFrom<u8> for MaterialPricingType {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        Ok(match value {
            0 => Self::RunningMetre,
            1 => Self::SquareMetre,
            2 => Self::Sheet,
            other => return Err(Error::protocol(format!("unknown material pricing type {other}"))),
        })
    }
}

/// One size band's price: `(price_material_id, width, length, price, pricing_type)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialPrice {
    pub price_material_id: u32,
    pub width: f32,
    pub length: f32,
    pub price: f32,
    pub pricing_type: MaterialPricingType,
}

#[derive(Debug, Clone, Default)]
pub struct Material {
    pub id: u32,
    pub name: String,
    pub hardness: u16,
    pub thickness: u16,
    pub prices: Vec<MaterialPrice>,
}

impl Entity for Material {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        let name = reader.read_string()?;
        let hardness = reader.read_u16()?;
        let thickness = reader.read_u16()?;
        let count = reader.read_u8()? as usize;
        let mut prices = Vec::with_capacity(count);
        for _ in 0..count {
            prices.push(MaterialPrice {
                price_material_id: reader.read_u32()?,
                width: reader.read_f32()?,
                length: reader.read_f32()?,
                price: reader.read_f32()?,
                pricing_type: MaterialPricingType::try_from(reader.read_u8()?)?,
            });
        }
        Ok(Self { id, name, hardness, thickness, prices })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.name);
        writer.write_u16(self.hardness);
        writer.write_u16(self.thickness);
        debug_assert!(self.prices.len() <= u8::MAX as usize);
        writer.write_u8(self.prices.len() as u8);
        for price in &self.prices {
            writer
                .write_u32(price.price_material_id)
                .write_f32(price.width)
                .write_f32(price.length)
                .write_f32(price.price)
                .write_u8(price.pricing_type as u8);
        }
    }

    fn id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_with_embedded_price_tuples() {
        let material = Material {
            id: 9,
            name: "Polyurethane".into(),
            hardness: 70,
            thickness: 12,
            prices: vec![
                MaterialPrice {
                    price_material_id: 1,
                    width: 1.0,
                    length: 2.0,
                    price: 35.5,
                    pricing_type: MaterialPricingType::SquareMetre,
                },
                MaterialPrice {
                    price_material_id: 2,
                    width: 2.0,
                    length: 4.0,
                    price: 120.0,
                    pricing_type: MaterialPricingType::Sheet,
                },
            ],
        };
        let mut writer = ByteWriter::new();
        material.write(&mut writer);
        let bytes = writer.into_bytes();
        let mut reader = ByteReader::new(&bytes);
        let back = Material::read(9, &mut reader).unwrap();
        assert_eq!(back.name, "Polyurethane");
        assert_eq!(back.prices.len(), 2);
        assert_eq!(back.prices[1].pricing_type, MaterialPricingType::Sheet);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn no_price_bands_round_trips() {
        let material = Material { id: 1, name: "Blank".into(), ..Default::default() };
        let mut writer = ByteWriter::new();
        material.write(&mut writer);
        let back = Material::read(1, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert!(back.prices.is_empty());
    }
}

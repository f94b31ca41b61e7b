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

//! Side-iron-price catalog (§3): a price banded by length range, shared
//! across a run of side irons of the same type rather than priced
//! individually (§4.5's "SideIronPrice with its side-iron-type table" join).

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::catalog::kinds::side_iron::SideIronType;
use crate::util::error::DdbResult;

#[derive(Debug, Clone, Default)]
pub struct SideIronPrice {
    pub id: u32,
    pub side_iron_type: SideIronType,
    pub lower_length: u32,
    pub upper_length: u32,
    pub extraflex: bool,
    pub price: f32,
}

impl Entity for SideIronPrice {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self {
            id,
            side_iron_type: SideIronType::try_from(reader.read_u8()?)?,
            lower_length: reader.read_u32()?,
            upper_length: reader.read_u32()?,
            extraflex: reader.read_bool()?,
            price: reader.read_f32()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_u8(self.side_iron_type as u8)
            .write_u32(self.lower_length)
            .write_u32(self.upper_length)
            .write_bool(self.extraflex)
            .write_f32(self.price);
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
        let price = SideIronPrice {
            id: 6,
            side_iron_type: SideIronType::C,
            lower_length: 500,
            upper_length: 1500,
            extraflex: true,
            price: 22.5,
        };
        let mut writer = ByteWriter::new();
        price.write(&mut writer);
        let back = SideIronPrice::read(6, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.upper_length, 1500);
        assert!(back.extraflex);
    }

    #[test]
    fn orders_by_price() {
        let cheap = SideIronPrice { price: 10.0, ..Default::default() };
        let pricey = SideIronPrice { price: 20.0, ..Default::default() };
        assert!(cheap.price < pricey.price);
    }
}

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

//! Side-iron catalog (§3): a physical side iron fitted to a mat.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::{DdbResult, Error};

/// The five side-iron families plus the absence of one, matching
/// `SideIronType` in `examples/original_source/include/database/drawingComponents.h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SideIronType {
    #[default]
    None = 0,
    A = 1,
    B = 2,
    C = 3,
    D = 4,
    E = 5,
}

impl TryFrom<u8> for SideIronType {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        Ok(match value {
            0 => Self::None,
            1 => Self::A,
            2 => Self::B,
            3 => Self::C,
            4 => Self::D,
            5 => Self::E,
            other => return Err(Error::protocol(format!("unknown side iron type {other}"))),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct SideIron {
    pub id: u32,
    pub side_iron_type: SideIronType,
    pub length: u16,
    pub drawing_number: String,
    pub hyperlink: String,
    pub price: Option<f32>,
    pub screws: Option<u32>,
}

impl SideIron {
    /// The full display name, e.g. "A 1200".
    pub fn name(&self) -> String {
        format!("{:?} {}", self.side_iron_type, self.length)
    }
}

impl Entity for SideIron {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self {
            id,
            side_iron_type: SideIronType::try_from(reader.read_u8()?)?,
            length: reader.read_u16()?,
            drawing_number: reader.read_string()?,
            hyperlink: reader.read_string()?,
            price: reader.read_option_f32()?,
            screws: reader.read_option_u32()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer
            .write_u8(self.side_iron_type as u8)
            .write_u16(self.length)
            .write_string(&self.drawing_number)
            .write_string(&self.hyperlink)
            .write_option_f32(self.price)
            .write_option_u32(self.screws);
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
        let side_iron = SideIron {
            id: 2,
            side_iron_type: SideIronType::B,
            length: 1200,
            drawing_number: "DWG-100".into(),
            hyperlink: "https://example/100".into(),
            price: Some(15.0),
            screws: Some(8),
        };
        let mut writer = ByteWriter::new();
        side_iron.write(&mut writer);
        let back = SideIron::read(2, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.name(), "B 1200");
        assert_eq!(back.screws, Some(8));
    }
}

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

//! Machine catalog (§3): a customer's screening machine.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::DdbResult;

#[derive(Debug, Clone, Default)]
pub struct Machine {
    pub id: u32,
    pub manufacturer: String,
    pub model: String,
}

impl Machine {
    /// The default combobox mode: "manufacturer model". Modes 1 and 2
    /// (manufacturer-only, model-only) are a GUI adapter concern (§1) and
    /// are not implemented here.
    pub fn name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model)
    }
}

impl Entity for Machine {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self {
            id,
            manufacturer: reader.read_string()?,
            model: reader.read_string()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.manufacturer);
        writer.write_string(&self.model);
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
        let machine = Machine { id: 1, manufacturer: "Acme".into(), model: "X200".into() };
        let mut writer = ByteWriter::new();
        machine.write(&mut writer);
        let back = Machine::read(1, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.name(), "Acme X200");
    }
}

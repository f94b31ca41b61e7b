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

//! Machine-deck catalog (§3): a named deck belonging to a customer's machine.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::DdbResult;

#[derive(Debug, Clone, Default)]
pub struct MachineDeck {
    pub id: u32,
    pub deck: String,
}

impl Entity for MachineDeck {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self { id, deck: reader.read_string()? })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_string(&self.deck);
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
        let deck = MachineDeck { id: 3, deck: "Top deck".into() };
        let mut writer = ByteWriter::new();
        deck.write(&mut writer);
        let back = MachineDeck::read(3, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.deck, "Top deck");
    }
}

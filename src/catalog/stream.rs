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

//! The compact binary stream every catalog kind is hydrated from and
//! re-serialised to (§4.5, §6): `[RequestKind][element_count]` followed by
//! `element_count` repetitions of `[handle][database_id][entity_bytes]`.
//! Shared by [`super::registry::Catalog::source`] (client/server hydration)
//! and [`crate::db::builder`] (server-side stream production).

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::protocol::request_kind::RequestKind;
use crate::util::error::{DdbResult, Error};

/// Decodes a full component stream, validating that the declared kind
/// matches `expected` and that every element consumes exactly its
/// `entity_bytes` (§4.5's "deserialisation must consume exactly
/// `entity_bytes` per element or the whole source is corrupt").
pub fn decode_stream<T: Entity>(bytes: &[u8], expected: RequestKind) -> DdbResult<Vec<(u32, T)>> {
    let mut reader = ByteReader::new(bytes);
    let kind = RequestKind::try_from(reader.read_u32()?)?;
    if kind != expected {
        return Err(Error::protocol(format!(
            "component stream kind mismatch: expected {expected:?}, got {kind:?}"
        )));
    }
    let count = reader.read_u32()? as usize;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let handle = reader.read_u32()?;
        let id = reader.read_u32()?;
        let entity = T::read(id, &mut reader)?;
        elements.push((handle, entity));
    }
    if reader.remaining() != 0 {
        return Err(Error::protocol("component stream has trailing bytes"));
    }
    Ok(elements)
}

/// Encodes a full component stream from already-handle-assigned elements
/// (§4.5 step 3 of the server-side builder pipeline).
pub fn encode_stream<T: Entity>(kind: RequestKind, elements: &[(u32, T)]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_u32(kind as u32);
    writer.write_u32(elements.len() as u32);
    for (handle, entity) in elements {
        writer.write_u32(*handle);
        writer.write_u32(entity.id());
        entity.write(&mut writer);
    }
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kinds::product::Product;

    #[test]
    fn round_trips_a_stream() {
        let elements = vec![
            (1u32, Product { id: 10, name: "A".into() }),
            (2u32, Product { id: 11, name: "B".into() }),
        ];
        let bytes = encode_stream(RequestKind::SourceProductTable, &elements);
        let decoded: Vec<(u32, Product)> = decode_stream(&bytes, RequestKind::SourceProductTable).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[1].1.name, "B");
    }

    #[test]
    fn rejects_wrong_kind() {
        let bytes = encode_stream(RequestKind::SourceProductTable, &[(1u32, Product { id: 1, name: "A".into() })]);
        let result: DdbResult<Vec<(u32, Product)>> = decode_stream(&bytes, RequestKind::SourceApertureShapeTable);
        assert!(result.is_err());
    }
}

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

//! Backing-strip catalog (§3): a strip identified only by the material it's
//! made from. Its display name is resolved through the material catalog
//! rather than stored, so material must be sourced before backing strips on
//! every refresh (§9's mutual-ordering note) — enforced by the request
//! dispatch, not by this type itself.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::catalog::kinds::material::Material;
use crate::catalog::registry::Catalog;
use crate::util::error::DdbResult;

#[derive(Debug, Clone, Default)]
pub struct BackingStrip {
    pub id: u32,
    pub material_handle: u32,
}

impl BackingStrip {
    /// Resolves this strip's display name through the material catalog.
    /// Fails if `material_handle` isn't present, which would mean the
    /// material catalog was rebuilt out of order relative to this one.
    pub fn name(&self, materials: &Catalog<Material>) -> DdbResult<String> {
        Ok(materials.get_by_handle(self.material_handle)?.name.clone())
    }
}

impl Entity for BackingStrip {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        Ok(Self { id, material_handle: reader.read_u32()? })
    }

    fn write(&self, writer: &mut ByteWriter) {
        writer.write_u32(self.material_handle);
    }

    fn id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_name_through_material_catalog() {
        let mut materials = Catalog::<Material>::new();
        materials
            .source_entities(vec![(1, Material { id: 501, name: "Nylon".into(), ..Default::default() })])
            .unwrap();
        let strip = BackingStrip { id: 10, material_handle: 1 };
        assert_eq!(strip.name(&materials).unwrap(), "Nylon");
    }

    #[test]
    fn missing_material_handle_is_an_error() {
        let materials = Catalog::<Material>::new();
        let strip = BackingStrip { id: 10, material_handle: 99 };
        assert!(strip.name(&materials).is_err());
    }
}

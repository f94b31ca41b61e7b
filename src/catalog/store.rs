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

//! `CatalogStore`: the server's heterogeneous container of per-kind
//! catalogs (§9's design note — "the server owns one instance per kind in a
//! heterogeneous container keyed by a kind tag"). Main-thread-only (§5):
//! the dispatcher is the sole owner and the sole caller of every mutating
//! method here.

use crate::catalog::kinds::*;
use crate::catalog::registry::Catalog;
use crate::protocol::request_kind::RequestKind;

#[derive(Default)]
pub struct CatalogStore {
    pub products: Catalog<Product>,
    pub apertures: Catalog<Aperture>,
    pub aperture_shapes: Catalog<ApertureShape>,
    pub materials: Catalog<Material>,
    pub extra_prices: Catalog<ExtraPrice>,
    pub labour_times: Catalog<LabourTime>,
    pub side_irons: Catalog<SideIron>,
    pub side_iron_prices: Catalog<SideIronPrice>,
    pub powder_coating_prices: Catalog<PowderCoatingPrice>,
    pub machines: Catalog<Machine>,
    pub machine_decks: Catalog<MachineDeck>,
    pub backing_strips: Catalog<BackingStrip>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any catalog that feeds the search-summary compression schema
    /// (§4.5's `DrawingSummaryCompressionSchema`) is dirty.
    pub fn compression_schema_dirty(&self) -> bool {
        self.apertures.dirty() || self.materials.dirty() || self.side_iron_prices.dirty()
    }
}

/// Maps a `Source*Table` [`RequestKind`] to the catalog kind it refreshes,
/// used by the request router to decide which builder to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Product,
    Aperture,
    ApertureShape,
    Material,
    ExtraPrice,
    LabourTime,
    SideIron,
    SideIronPrice,
    PowderCoatingPrice,
    Machine,
    MachineDeck,
    BackingStrip,
}

impl CatalogKind {
    pub fn from_request_kind(kind: RequestKind) -> Option<Self> {
        use RequestKind::*;
        Some(match kind {
            SourceProductTable => Self::Product,
            SourceApertureTable => Self::Aperture,
            SourceApertureShapeTable => Self::ApertureShape,
            SourceMaterialTable => Self::Material,
            SourceExtraPricesTable => Self::ExtraPrice,
            SourceLabourTimesTable => Self::LabourTime,
            SourceSideIronTable => Self::SideIron,
            SourceSideIronPricesTable => Self::SideIronPrice,
            SourcePowderCoatingTable => Self::PowderCoatingPrice,
            SourceMachineTable => Self::Machine,
            SourceMachineDeckTable => Self::MachineDeck,
            SourceBackingStripsTable => Self::BackingStrip,
            _ => return None,
        })
    }

    pub fn request_kind(self) -> RequestKind {
        use RequestKind::*;
        match self {
            Self::Product => SourceProductTable,
            Self::Aperture => SourceApertureTable,
            Self::ApertureShape => SourceApertureShapeTable,
            Self::Material => SourceMaterialTable,
            Self::ExtraPrice => SourceExtraPricesTable,
            Self::LabourTime => SourceLabourTimesTable,
            Self::SideIron => SourceSideIronTable,
            Self::SideIronPrice => SourceSideIronPricesTable,
            Self::PowderCoatingPrice => SourcePowderCoatingTable,
            Self::Machine => SourceMachineTable,
            Self::MachineDeck => SourceMachineDeckTable,
            Self::BackingStrip => SourceBackingStripsTable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_kind_round_trips_through_catalog_kind() {
        for kind in [
            CatalogKind::Product,
            CatalogKind::Aperture,
            CatalogKind::BackingStrip,
        ] {
            let request = kind.request_kind();
            assert_eq!(CatalogKind::from_request_kind(request), Some(kind));
        }
    }

    #[test]
    fn non_source_request_kinds_have_no_catalog() {
        assert_eq!(CatalogKind::from_request_kind(RequestKind::EmailRequest), None);
    }
}

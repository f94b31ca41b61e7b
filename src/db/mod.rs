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

//! The server-side half of the component catalog (§4.5): row-shape
//! contracts for the relational driver we don't specify (§1), and the
//! pure builder that turns rows into the wire streams `catalog::Catalog`
//! hydrates from.

pub mod builder;
pub mod rows;

use crate::util::error::DdbResult;

/// The relational driver's query surface, exactly as far as this core
/// specifies it (§1: "we specify only the row-shape contract"). `request::Router`
/// is generic over this trait rather than over a concrete database client, so
/// the core never depends on SQL generation or a connection pool.
pub trait RowSource {
    fn products(&self) -> DdbResult<Vec<rows::ProductRow>>;
    fn aperture_shapes(&self) -> DdbResult<Vec<rows::ApertureShapeRow>>;
    fn apertures(&self) -> DdbResult<Vec<rows::ApertureRow>>;
    fn materials(&self) -> DdbResult<Vec<rows::MaterialRow>>;
    fn material_prices(&self) -> DdbResult<Vec<rows::MaterialPriceRow>>;
    fn extra_prices(&self) -> DdbResult<Vec<rows::ExtraPriceRow>>;
    fn labour_times(&self) -> DdbResult<Vec<rows::LabourTimeRow>>;
    fn side_irons(&self) -> DdbResult<Vec<rows::SideIronRow>>;
    fn side_iron_prices(&self) -> DdbResult<Vec<rows::SideIronPriceRow>>;
    fn powder_coating_prices(&self) -> DdbResult<Vec<rows::PowderCoatingPriceRow>>;
    fn machines(&self) -> DdbResult<Vec<rows::MachineRow>>;
    fn machine_decks(&self) -> DdbResult<Vec<rows::MachineDeckRow>>;
    fn backing_strips(&self) -> DdbResult<Vec<rows::BackingStripRow>>;
}

/// A `RowSource` that never has any rows. Every catalog it feeds hydrates
/// empty and stays clean after the first `Source*Table` request. Useful as
/// the default until a real relational driver (out of scope per §1) is
/// wired into `request::Router`.
#[derive(Default)]
pub struct NullRowSource;

impl RowSource for NullRowSource {
    fn products(&self) -> DdbResult<Vec<rows::ProductRow>> {
        Ok(Vec::new())
    }
    fn aperture_shapes(&self) -> DdbResult<Vec<rows::ApertureShapeRow>> {
        Ok(Vec::new())
    }
    fn apertures(&self) -> DdbResult<Vec<rows::ApertureRow>> {
        Ok(Vec::new())
    }
    fn materials(&self) -> DdbResult<Vec<rows::MaterialRow>> {
        Ok(Vec::new())
    }
    fn material_prices(&self) -> DdbResult<Vec<rows::MaterialPriceRow>> {
        Ok(Vec::new())
    }
    fn extra_prices(&self) -> DdbResult<Vec<rows::ExtraPriceRow>> {
        Ok(Vec::new())
    }
    fn labour_times(&self) -> DdbResult<Vec<rows::LabourTimeRow>> {
        Ok(Vec::new())
    }
    fn side_irons(&self) -> DdbResult<Vec<rows::SideIronRow>> {
        Ok(Vec::new())
    }
    fn side_iron_prices(&self) -> DdbResult<Vec<rows::SideIronPriceRow>> {
        Ok(Vec::new())
    }
    fn powder_coating_prices(&self) -> DdbResult<Vec<rows::PowderCoatingPriceRow>> {
        Ok(Vec::new())
    }
    fn machines(&self) -> DdbResult<Vec<rows::MachineRow>> {
        Ok(Vec::new())
    }
    fn machine_decks(&self) -> DdbResult<Vec<rows::MachineDeckRow>> {
        Ok(Vec::new())
    }
    fn backing_strips(&self) -> DdbResult<Vec<rows::BackingStripRow>> {
        Ok(Vec::new())
    }
}

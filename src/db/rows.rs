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

//! Raw row shapes the server-side builder consumes (§4.5's "query the
//! appropriate table(s)" step, §6's "database row contracts"). The
//! relational driver itself is out of scope (§1) — only the column order and
//! nullability a real driver's rows must match. Grounded on the per-kind
//! `*Data` structs in
//! `examples/original_source/include/database/DatabaseRequestHandler.h` and
//! their population in `DatabaseRequestHandler.cpp`'s `constructDataElements`
//! specializations.
//!
//! Columns the original treats as possibly-`NULL` stay `Option<T>` here;
//! [`super::builder`] rejects a row outright when a *required* optional (shape
//! id, material id) is `None`, logging and skipping it rather than failing
//! the whole table (§6).

use crate::catalog::kinds::{ExtraPriceKind, MaterialPricingType};

pub struct ProductRow {
    pub id: u32,
    pub name: String,
}

pub struct ApertureShapeRow {
    pub id: u32,
    pub shape: String,
}

/// One row from `apertures`. `shape_id` is the required column the original
/// explicitly checks and logs `"Aperture with missing shape ID detected."`
/// for; every other numeric column defaults to zero when `NULL`, mirroring
/// the original's `row[n].isNull() ? 0 : ...` pattern.
pub struct ApertureRow {
    pub id: u32,
    pub width: Option<f32>,
    pub length: Option<f32>,
    pub base_width: Option<u16>,
    pub base_length: Option<u16>,
    pub quantity: Option<u16>,
    pub shape_id: Option<u32>,
    pub is_nibble: bool,
    pub nibble_aperture_id: Option<u32>,
}

/// One size-band price row, joined against its owning material by
/// `material_id` (§4.5's "Material with its per-size price tuples").
pub struct MaterialPriceRow {
    pub material_id: u32,
    pub price_material_id: u32,
    pub width: f32,
    pub length: f32,
    pub price: f32,
    pub pricing_type: MaterialPricingType,
}

pub struct MaterialRow {
    pub id: u32,
    pub name: String,
    pub hardness: Option<u16>,
    pub thickness: Option<u16>,
}

pub struct ExtraPriceRow {
    pub id: u32,
    pub kind: ExtraPriceKind,
    pub price: f32,
    pub square_metres: Option<f32>,
    pub amount: Option<u32>,
}

pub struct LabourTimeRow {
    pub id: u32,
    pub job: String,
    pub minutes: u32,
}

pub struct SideIronRow {
    pub id: u32,
    pub side_iron_type: Option<u8>,
    pub length: Option<u16>,
    pub drawing_number: String,
    pub hyperlink: String,
    pub price: Option<f32>,
    pub screws: Option<u32>,
}

/// Every column is nullable in the original (each is checked and the row
/// skipped on the first `NULL`, per `constructDataElements<SideIronPriceData>`).
pub struct SideIronPriceRow {
    pub id: Option<u32>,
    pub side_iron_type: Option<u8>,
    pub lower_length: Option<u32>,
    pub upper_length: Option<u32>,
    pub extraflex: Option<bool>,
    pub price: Option<f32>,
}

pub struct PowderCoatingPriceRow {
    pub id: u32,
    pub hook_price: Option<f32>,
    pub strap_price: Option<f32>,
}

pub struct MachineRow {
    pub id: u32,
    pub manufacturer: String,
    pub model: String,
}

pub struct MachineDeckRow {
    pub id: u32,
    pub deck: String,
}

/// `material_id` is the join key joining a backing strip to a `Material`,
/// required for `name()` resolution (§3a).
pub struct BackingStripRow {
    pub id: u32,
    pub material_id: u32,
}

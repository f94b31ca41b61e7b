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

//! The server-side table builder (§4.5's three-step generic pipeline):
//! query rows, walk them allocating a handle per logical entity, then
//! serialise into the wire stream [`crate::catalog::stream::encode_stream`]
//! already defines. Grounded on `DatabaseRequestHandler::createSourceData`
//! and its per-type `constructDataElements`/`serialiseDataElement`
//! specializations.
//!
//! Every `build_*` function here is pure: rows in, a stream out. The
//! dirty-checking and catalog installation that picks *when* to call them
//! lives in `request::Router`, matching the original's `onMessageReceived`
//! switch rather than folding that policy into the builder itself.

use crate::catalog::entity::Entity;
use crate::catalog::kinds::*;
use crate::catalog::registry::Catalog;
use crate::catalog::stream;
use crate::db::rows::*;
use crate::protocol::request_kind::RequestKind;
use std::collections::BTreeMap;

/// Numbers `elements` densely from handle 1 (handle 0 is reserved for the
/// catalog's null entity) and encodes them into the wire stream for `kind`.
fn build_stream<T: Entity>(kind: RequestKind, elements: Vec<T>) -> Vec<u8> {
    let numbered: Vec<(u32, T)> = elements.into_iter().enumerate().map(|(i, e)| (i as u32 + 1, e)).collect();
    stream::encode_stream(kind, &numbered)
}

pub fn build_products(rows: Vec<ProductRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| Product { id: r.id, name: r.name }).collect();
    build_stream(RequestKind::SourceProductTable, elements)
}

pub fn build_aperture_shapes(rows: Vec<ApertureShapeRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| ApertureShape { id: r.id, shape: r.shape }).collect();
    build_stream(RequestKind::SourceApertureShapeTable, elements)
}

/// Resolves each row's `shape_id` (a database id) to the shape's catalog
/// handle via `shapes` — mirrors
/// `DrawingComponentManager<ApertureShape>::findComponentByID(row[6]).handle()`.
/// A row with no shape id is rejected and logged, matching the original's
/// `ERROR_RAW_SAFE("Aperture with missing shape ID detected.", ...)`.
pub fn build_apertures(rows: Vec<ApertureRow>, shapes: &Catalog<ApertureShape>) -> Vec<u8> {
    let mut elements = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(shape_id) = row.shape_id else {
            log::error!("aperture {} has missing shape ID, skipping", row.id);
            continue;
        };
        let Ok(shape_handle) = shapes.handle_by_id(shape_id) else {
            log::error!("aperture {} references unknown shape id {shape_id}, skipping", row.id);
            continue;
        };
        elements.push(Aperture {
            id: row.id,
            width: row.width.unwrap_or(0.0),
            length: row.length.unwrap_or(0.0),
            base_width: row.base_width.unwrap_or(0),
            base_length: row.base_length.unwrap_or(0),
            shape_handle,
            quantity: row.quantity.unwrap_or(0),
            nibble_handle: if row.is_nibble { row.nibble_aperture_id } else { None },
        });
    }
    build_stream(RequestKind::SourceApertureTable, elements)
}

/// Joins `prices` onto `materials` by database id, grouping in ascending-id
/// order to match the original's `std::map<unsigned, MaterialData>` —
/// handles are nonetheless assigned by encounter order in `materials`, not
/// by id, since that's the order a real query would return them in.
pub fn build_materials(materials: Vec<MaterialRow>, prices: Vec<MaterialPriceRow>) -> Vec<u8> {
    let mut by_id: BTreeMap<u32, Material> = BTreeMap::new();
    let mut order: Vec<u32> = Vec::new();
    for row in materials {
        order.push(row.id);
        by_id.insert(
            row.id,
            Material {
                id: row.id,
                name: row.name,
                hardness: row.hardness.unwrap_or(0),
                thickness: row.thickness.unwrap_or(0),
                prices: Vec::new(),
            },
        );
    }
    for price in prices {
        if let Some(material) = by_id.get_mut(&price.material_id) {
            material.prices.push(MaterialPrice {
                price_material_id: price.price_material_id,
                width: price.width,
                length: price.length,
                price: price.price,
                pricing_type: price.pricing_type,
            });
        }
    }
    let elements = order.into_iter().filter_map(|id| by_id.remove(&id)).collect();
    build_stream(RequestKind::SourceMaterialTable, elements)
}

pub fn build_extra_prices(rows: Vec<ExtraPriceRow>) -> Vec<u8> {
    let elements = rows
        .into_iter()
        .map(|r| ExtraPrice { id: r.id, kind: Some(r.kind), price: r.price, square_metres: r.square_metres, amount: r.amount })
        .collect();
    build_stream(RequestKind::SourceExtraPricesTable, elements)
}

pub fn build_labour_times(rows: Vec<LabourTimeRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| LabourTime { id: r.id, job: r.job, minutes: r.minutes }).collect();
    build_stream(RequestKind::SourceLabourTimesTable, elements)
}

/// A row missing any required column is skipped and logged, matching the
/// original's sequential `row[n].isNull()` early-continues in
/// `constructDataElements<SideIronPriceData>`.
pub fn build_side_iron_prices(rows: Vec<SideIronPriceRow>) -> Vec<u8> {
    let mut elements = Vec::with_capacity(rows.len());
    for row in rows {
        let (Some(id), Some(kind), Some(lower), Some(upper), Some(extraflex), Some(price)) =
            (row.id, row.side_iron_type, row.lower_length, row.upper_length, row.extraflex, row.price)
        else {
            log::error!("side iron price row missing a required column, skipping");
            continue;
        };
        let Ok(side_iron_type) = SideIronType::try_from(kind) else {
            log::error!("side iron price {id} has unknown side iron type {kind}, skipping");
            continue;
        };
        elements.push(SideIronPrice { id, side_iron_type, lower_length: lower, upper_length: upper, extraflex, price });
    }
    build_stream(RequestKind::SourceSideIronPricesTable, elements)
}

pub fn build_powder_coating_prices(rows: Vec<PowderCoatingPriceRow>) -> Vec<u8> {
    let elements = rows
        .into_iter()
        .map(|r| PowderCoatingPrice { id: r.id, hook_price: r.hook_price.unwrap_or(0.0), strap_price: r.strap_price.unwrap_or(0.0) })
        .collect();
    build_stream(RequestKind::SourcePowderCoatingTable, elements)
}

pub fn build_side_irons(rows: Vec<SideIronRow>) -> Vec<u8> {
    let mut elements = Vec::with_capacity(rows.len());
    for row in rows {
        let side_iron_type = row.side_iron_type.map(SideIronType::try_from).transpose().unwrap_or(None).unwrap_or_default();
        elements.push(SideIron {
            id: row.id,
            side_iron_type,
            length: row.length.unwrap_or(0),
            drawing_number: row.drawing_number,
            hyperlink: row.hyperlink,
            price: row.price,
            screws: row.screws,
        });
    }
    build_stream(RequestKind::SourceSideIronTable, elements)
}

pub fn build_machines(rows: Vec<MachineRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| Machine { id: r.id, manufacturer: r.manufacturer, model: r.model }).collect();
    build_stream(RequestKind::SourceMachineTable, elements)
}

pub fn build_machine_decks(rows: Vec<MachineDeckRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| MachineDeck { id: r.id, deck: r.deck }).collect();
    build_stream(RequestKind::SourceMachineDeckTable, elements)
}

pub fn build_backing_strips(rows: Vec<BackingStripRow>) -> Vec<u8> {
    let elements = rows.into_iter().map(|r| BackingStrip { id: r.id, material_handle: r.material_id }).collect();
    build_stream(RequestKind::SourceBackingStripsTable, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::stream::decode_stream;

    #[test]
    fn builds_and_installs_a_product_stream() {
        let rows = vec![ProductRow { id: 1, name: "Conveyor Belt".into() }, ProductRow { id: 2, name: "Screen".into() }];
        let bytes = build_products(rows);
        let decoded: Vec<(u32, Product)> = decode_stream(&bytes, RequestKind::SourceProductTable).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].0, 1);
        assert_eq!(decoded[1].1.name, "Screen");
    }

    #[test]
    fn aperture_missing_shape_id_is_skipped() {
        let shapes = Catalog::<ApertureShape>::new();
        let rows = vec![ApertureRow {
            id: 1,
            width: Some(1.0),
            length: Some(2.0),
            base_width: Some(10),
            base_length: Some(20),
            quantity: Some(1),
            shape_id: None,
            is_nibble: false,
            nibble_aperture_id: None,
        }];
        let bytes = build_apertures(rows, &shapes);
        let decoded: Vec<(u32, Aperture)> = decode_stream(&bytes, RequestKind::SourceApertureTable).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn materials_join_price_bands_by_id() {
        let materials = vec![MaterialRow { id: 5, name: "Rubber".into(), hardness: Some(60), thickness: Some(10) }];
        let prices = vec![MaterialPriceRow {
            material_id: 5,
            price_material_id: 5,
            width: 1.0,
            length: 1.0,
            price: 20.0,
            pricing_type: MaterialPricingType::SquareMetre,
        }];
        let bytes = build_materials(materials, prices);
        let decoded: Vec<(u32, Material)> = decode_stream(&bytes, RequestKind::SourceMaterialTable).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].1.prices.len(), 1);
    }

    #[test]
    fn side_iron_price_row_missing_column_is_skipped() {
        let rows = vec![SideIronPriceRow {
            id: Some(1),
            side_iron_type: Some(1),
            lower_length: Some(100),
            upper_length: None,
            extraflex: Some(false),
            price: Some(10.0),
        }];
        let bytes = build_side_iron_prices(rows);
        let decoded: Vec<(u32, SideIronPrice)> = decode_stream(&bytes, RequestKind::SourceSideIronPricesTable).unwrap();
        assert!(decoded.is_empty());
    }
}

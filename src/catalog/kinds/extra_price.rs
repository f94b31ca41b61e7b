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

//! Extra-price catalog (§3): prices not attributable to any general
//! component (nuts, screws, glue, labour, primer, shot-blasting).
//!
//! The original (`ExtraPriceTrait<ExtraPriceType>` specialisations in
//! `drawingComponents.h`) models this as one struct with two always-present
//! optional fields (`squareMetres`, `amount`) whose *meaning* is picked by a
//! template parameter. Per §9's design note ("best modeled as tagged
//! variants each carrying its own payload and its own pricing function"),
//! `ExtraPriceKind` fixes which optional field a given row actually uses,
//! and `calc` replaces the per-specialisation `getPrice<T>` free functions.
//! The original also `new`s one of these per catalog element with no
//! matching `delete` (§9's leak note) — storing `ExtraPrice` by value in the
//! catalog's `Vec` sidesteps that by construction.

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::util::error::{DdbResult, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtraPriceKind {
    SideIronNuts = 0,
    SideIronScrews = 1,
    TackybackGlue = 2,
    Labour = 3,
    Primer = 4,
    ShotBlasting = 5,
}

impl TryFrom<u8> for ExtraPriceKind {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        Ok(match value {
            0 => Self::SideIronNuts,
            1 => Self::SideIronScrews,
            2 => Self::TackybackGlue,
            3 => Self::Labour,
            4 => Self::Primer,
            5 => Self::ShotBlasting,
            other => return Err(Error::protocol(format!("unknown extra price kind {other}"))),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExtraPrice {
    pub id: u32,
    pub kind: Option<ExtraPriceKind>,
    pub price: f32,
    pub square_metres: Option<f32>,
    pub amount: Option<u32>,
}

impl ExtraPrice {
    /// Computes the price for `n` units of whatever this kind measures
    /// (a count for nuts/screws, an area for glue/primer/shot-blasting, or
    /// a flat rate for labour) — the per-specialisation `getPrice<T>` from
    /// the original collapsed into one method keyed on `kind`.
    pub fn calc(&self, n: f32) -> f32 {
        match self.kind {
            Some(ExtraPriceKind::Labour) => self.price,
            _ => self.price * n,
        }
    }
}

impl Entity for ExtraPrice {
    fn null() -> Self {
        Self::default()
    }

    fn read(id: u32, reader: &mut ByteReader) -> DdbResult<Self> {
        let kind = ExtraPriceKind::try_from(reader.read_u8()?)?;
        Ok(Self {
            id,
            kind: Some(kind),
            price: reader.read_f32()?,
            square_metres: reader.read_option_f32()?,
            amount: reader.read_option_u32()?,
        })
    }

    fn write(&self, writer: &mut ByteWriter) {
        let kind = self.kind.unwrap_or(ExtraPriceKind::Labour);
        writer
            .write_u8(kind as u8)
            .write_f32(self.price)
            .write_option_f32(self.square_metres)
            .write_option_u32(self.amount);
    }

    fn id(&self) -> u32 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_area_priced_kind() {
        let extra = ExtraPrice {
            id: 3,
            kind: Some(ExtraPriceKind::TackybackGlue),
            price: 2.5,
            square_metres: Some(1.2),
            amount: None,
        };
        let mut writer = ByteWriter::new();
        extra.write(&mut writer);
        let back = ExtraPrice::read(3, &mut ByteReader::new(&writer.into_bytes())).unwrap();
        assert_eq!(back.square_metres, Some(1.2));
        assert!((back.calc(1.2) - 3.0).abs() < 1e-4);
    }

    #[test]
    fn labour_ignores_the_multiplier() {
        let extra = ExtraPrice { id: 1, kind: Some(ExtraPriceKind::Labour), price: 40.0, ..Default::default() };
        assert_eq!(extra.calc(3.0), 40.0);
    }
}

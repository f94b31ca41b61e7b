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

//! The component entity kinds (§3): each a plain struct implementing
//! [`super::entity::Entity`].

pub mod aperture;
pub mod aperture_shape;
pub mod backing_strip;
pub mod extra_price;
pub mod labour_time;
pub mod machine;
pub mod machine_deck;
pub mod material;
pub mod powder_coating_price;
pub mod product;
pub mod side_iron;
pub mod side_iron_price;

pub use aperture::Aperture;
pub use aperture_shape::ApertureShape;
pub use backing_strip::BackingStrip;
pub use extra_price::{ExtraPrice, ExtraPriceKind};
pub use labour_time::LabourTime;
pub use machine::Machine;
pub use machine_deck::MachineDeck;
pub use material::{Material, MaterialPrice, MaterialPricingType};
pub use powder_coating_price::PowderCoatingPrice;
pub use product::Product;
pub use side_iron::{SideIron, SideIronType};
pub use side_iron_price::SideIronPrice;

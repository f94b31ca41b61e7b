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

//! `Router`: the `RequestHandler` implementation that turns a decoded
//! `RequestKind` and request body into zero or more outbound messages
//! (§4.4's routing table). Grounded on `DatabaseRequestHandler::onMessageReceived`'s
//! switch (`examples/original_source/src/database/DatabaseRequestHandler.cpp`),
//! generalized from its per-`RequestType` `case` arms onto `RequestKind`.
//!
//! `Router` is generic over [`db::RowSource`] rather than over a concrete
//! database client: the relational driver itself stays out of scope (§1),
//! and everything past "rows in" is pure and already exercised by
//! `db::builder`'s tests.

pub mod drawings;

use crate::catalog::entity::{ByteReader, ByteWriter, Entity};
use crate::catalog::kinds::*;
use crate::catalog::store::{CatalogKind, CatalogStore};
use crate::db::{self, builder, RowSource};
use crate::dbnet::connection::ConnectionHandle;
use crate::dbnet::dispatcher::RequestHandler;
use crate::dbnet::repeat_token::RepeatTokenTable;
use crate::dbnet::send_queue::SendQueue;
use crate::protocol::codes::ConnectionResponseCode;
use crate::protocol::message::ProtocolTag;
use crate::protocol::request_kind::RequestKind;
use crate::search::{DrawingSummary, DrawingSummaryCompressionSchema, DrawingSummaryMaxima};
use crate::util::error::{DdbResult, Error};
use drawings::{DrawingExists, DrawingRecord, DrawingStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Mirrors `DrawingInsert::{SUCCESS, FAILED, DRAWING_EXISTS}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum DrawingInsertResponse {
    Success = 0,
    Failed = 1,
    DrawingExists = 2,
}

/// Mirrors `ComponentInsert::ComponentInsertResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum ComponentInsertResponse {
    Success = 0,
    Failed = 1,
}

/// Mirrors `DatabaseBackup::BackupResponse`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum BackupResponse {
    Success = 0,
    Failed = 1,
}

/// Mirrors `NextDrawing::DrawingType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
enum DrawingNumberKind {
    Automatic = 0,
    Manual = 1,
}

impl TryFrom<u8> for DrawingNumberKind {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        match value {
            0 => Ok(Self::Automatic),
            1 => Ok(Self::Manual),
            other => Err(Error::protocol(format!("unknown drawing number kind {other}"))),
        }
    }
}

fn header(kind: RequestKind) -> Vec<u8> {
    kind.to_le_bytes().to_vec()
}

pub struct Router<R: RowSource> {
    catalogs: CatalogStore,
    drawings: DrawingStore,
    repeat_tokens: Arc<RepeatTokenTable>,
    rows: R,
    backup_path: PathBuf,
    compression_schema: DrawingSummaryCompressionSchema,
}

impl<R: RowSource> Router<R> {
    pub fn new(repeat_tokens: Arc<RepeatTokenTable>, rows: R, backup_path: PathBuf) -> Self {
        Self {
            catalogs: CatalogStore::new(),
            drawings: DrawingStore::new(),
            repeat_tokens,
            rows,
            backup_path,
            compression_schema: DrawingSummaryCompressionSchema::build(&DrawingSummaryMaxima::default()),
        }
    }

    /// Rebuilds `kind`'s catalog from `self.rows` if it's dirty, honoring
    /// the two cross-kind refresh orderings the original enforces:
    /// aperture shapes before apertures, and material before backing strip
    /// (§9's "mutually recursive dependencies" note).
    fn rebuild_if_dirty(&mut self, kind: CatalogKind) -> DdbResult<()> {
        use CatalogKind::*;
        match kind {
            Product => {
                if self.catalogs.products.dirty() {
                    let bytes = builder::build_products(self.rows.products()?);
                    self.catalogs.products.source(bytes, RequestKind::SourceProductTable)?;
                }
            }
            ApertureShape => {
                if self.catalogs.aperture_shapes.dirty() {
                    let bytes = builder::build_aperture_shapes(self.rows.aperture_shapes()?);
                    self.catalogs
                        .aperture_shapes
                        .source(bytes, RequestKind::SourceApertureShapeTable)?;
                }
            }
            Aperture => {
                if self.catalogs.apertures.dirty() {
                    self.rebuild_if_dirty(ApertureShape)?;
                    let bytes = builder::build_apertures(self.rows.apertures()?, &self.catalogs.aperture_shapes);
                    self.catalogs.apertures.source(bytes, RequestKind::SourceApertureTable)?;
                }
            }
            Material => {
                if self.catalogs.materials.dirty() {
                    let bytes = builder::build_materials(self.rows.materials()?, self.rows.material_prices()?);
                    self.catalogs.materials.source(bytes, RequestKind::SourceMaterialTable)?;
                }
            }
            BackingStrip => {
                if self.catalogs.backing_strips.dirty() {
                    self.rebuild_if_dirty(Material)?;
                    let bytes = builder::build_backing_strips(self.rows.backing_strips()?);
                    self.catalogs
                        .backing_strips
                        .source(bytes, RequestKind::SourceBackingStripsTable)?;
                }
            }
            ExtraPrice => {
                if self.catalogs.extra_prices.dirty() {
                    let bytes = builder::build_extra_prices(self.rows.extra_prices()?);
                    self.catalogs.extra_prices.source(bytes, RequestKind::SourceExtraPricesTable)?;
                }
            }
            LabourTime => {
                if self.catalogs.labour_times.dirty() {
                    let bytes = builder::build_labour_times(self.rows.labour_times()?);
                    self.catalogs.labour_times.source(bytes, RequestKind::SourceLabourTimesTable)?;
                }
            }
            SideIron => {
                if self.catalogs.side_irons.dirty() {
                    let bytes = builder::build_side_irons(self.rows.side_irons()?);
                    self.catalogs.side_irons.source(bytes, RequestKind::SourceSideIronTable)?;
                }
            }
            SideIronPrice => {
                if self.catalogs.side_iron_prices.dirty() {
                    let bytes = builder::build_side_iron_prices(self.rows.side_iron_prices()?);
                    self.catalogs
                        .side_iron_prices
                        .source(bytes, RequestKind::SourceSideIronPricesTable)?;
                }
            }
            PowderCoatingPrice => {
                if self.catalogs.powder_coating_prices.dirty() {
                    let bytes = builder::build_powder_coating_prices(self.rows.powder_coating_prices()?);
                    self.catalogs
                        .powder_coating_prices
                        .source(bytes, RequestKind::SourcePowderCoatingTable)?;
                }
            }
            Machine => {
                if self.catalogs.machines.dirty() {
                    let bytes = builder::build_machines(self.rows.machines()?);
                    self.catalogs.machines.source(bytes, RequestKind::SourceMachineTable)?;
                }
            }
            MachineDeck => {
                if self.catalogs.machine_decks.dirty() {
                    let bytes = builder::build_machine_decks(self.rows.machine_decks()?);
                    self.catalogs.machine_decks.source(bytes, RequestKind::SourceMachineDeckTable)?;
                }
            }
        }
        Ok(())
    }

    fn raw_stream_bytes(&self, kind: CatalogKind) -> Vec<u8> {
        use CatalogKind::*;
        match kind {
            Product => self.catalogs.products.raw_source_bytes(),
            Aperture => self.catalogs.apertures.raw_source_bytes(),
            ApertureShape => self.catalogs.aperture_shapes.raw_source_bytes(),
            Material => self.catalogs.materials.raw_source_bytes(),
            ExtraPrice => self.catalogs.extra_prices.raw_source_bytes(),
            LabourTime => self.catalogs.labour_times.raw_source_bytes(),
            SideIron => self.catalogs.side_irons.raw_source_bytes(),
            SideIronPrice => self.catalogs.side_iron_prices.raw_source_bytes(),
            PowderCoatingPrice => self.catalogs.powder_coating_prices.raw_source_bytes(),
            Machine => self.catalogs.machines.raw_source_bytes(),
            MachineDeck => self.catalogs.machine_decks.raw_source_bytes(),
            BackingStrip => self.catalogs.backing_strips.raw_source_bytes(),
        }
        .map(<[u8]>::to_vec)
        .unwrap_or_default()
    }

    fn handle_source_table(&mut self, from: ConnectionHandle, kind: CatalogKind, send_queue: &SendQueue) {
        if let Err(e) = self.rebuild_if_dirty(kind) {
            log::error!("failed to rebuild {kind:?} catalog: {e}");
        }
        send_queue.push_to(from, ProtocolTag::Aes, self.raw_stream_bytes(kind));
    }

    /// Decodes one new entity of `target`'s kind from `body`, appends it to
    /// the catalog's current contents and reinstalls, returning the
    /// refreshed stream bytes for broadcast (`AddComponent`, §4.4).
    fn add_component(&mut self, target: CatalogKind, body: &[u8]) -> DdbResult<Vec<u8>> {
        use CatalogKind::*;
        let mut reader = ByteReader::new(body);
        match target {
            Product => append_and_reinstall(&mut self.catalogs.products, RequestKind::SourceProductTable, &mut reader),
            Aperture => append_and_reinstall(&mut self.catalogs.apertures, RequestKind::SourceApertureTable, &mut reader),
            ApertureShape => append_and_reinstall(
                &mut self.catalogs.aperture_shapes,
                RequestKind::SourceApertureShapeTable,
                &mut reader,
            ),
            Material => append_and_reinstall(&mut self.catalogs.materials, RequestKind::SourceMaterialTable, &mut reader),
            ExtraPrice => {
                append_and_reinstall(&mut self.catalogs.extra_prices, RequestKind::SourceExtraPricesTable, &mut reader)
            }
            LabourTime => {
                append_and_reinstall(&mut self.catalogs.labour_times, RequestKind::SourceLabourTimesTable, &mut reader)
            }
            SideIron => append_and_reinstall(&mut self.catalogs.side_irons, RequestKind::SourceSideIronTable, &mut reader),
            SideIronPrice => append_and_reinstall(
                &mut self.catalogs.side_iron_prices,
                RequestKind::SourceSideIronPricesTable,
                &mut reader,
            ),
            PowderCoatingPrice => append_and_reinstall(
                &mut self.catalogs.powder_coating_prices,
                RequestKind::SourcePowderCoatingTable,
                &mut reader,
            ),
            Machine => append_and_reinstall(&mut self.catalogs.machines, RequestKind::SourceMachineTable, &mut reader),
            MachineDeck => {
                append_and_reinstall(&mut self.catalogs.machine_decks, RequestKind::SourceMachineDeckTable, &mut reader)
            }
            BackingStrip => append_and_reinstall(
                &mut self.catalogs.backing_strips,
                RequestKind::SourceBackingStripsTable,
                &mut reader,
            ),
        }
    }

    /// Rebuilds the compression schema from the current catalog maxima plus
    /// the drawing store's own maxima, but only when a contributing catalog
    /// is dirty (§4.5).
    fn refresh_compression_schema(&mut self) {
        if !self.catalogs.compression_schema_dirty() {
            return;
        }
        let maxima = DrawingSummaryMaxima {
            mat_id: self.drawings_max(|r| r.mat_id),
            width: self.drawings_max_f32(|r| r.width),
            length: self.drawings_max_f32(|r| r.length),
            material_handle: self.catalogs.materials.max_handle(),
            lap_size: self.drawings_max_f32(|r| r.lap_size),
            aperture_handle: self.catalogs.apertures.max_handle(),
            bar_spacing_count: self.drawings_max(|r| r.bar_spacings.len() as u32),
            bar_spacing: self
                .drawings_iter()
                .flat_map(|r| r.bar_spacings.iter().copied())
                .fold(0.0f32, f32::max),
            drawing_number_length: self.drawings_max(|r| r.drawing_number.len() as u32),
            extra_aperture_count: self.drawings_max(|r| r.extra_apertures.len() as u32),
        };
        self.compression_schema = DrawingSummaryCompressionSchema::build(&maxima);
    }

    fn drawings_iter(&self) -> impl Iterator<Item = &DrawingRecord> {
        self.drawings.search("")
    }

    fn drawings_max(&self, f: impl Fn(&DrawingRecord) -> u32) -> u32 {
        self.drawings_iter().map(|r| f(r)).max().unwrap_or(0)
    }

    fn drawings_max_f32(&self, f: impl Fn(&DrawingRecord) -> f32) -> f32 {
        self.drawings_iter().map(|r| f(r)).fold(0.0f32, f32::max)
    }

    fn handle_repeat_token_request(&mut self, from: ConnectionHandle, email: &str, send_queue: &SendQueue) {
        match self.repeat_tokens.issue(email) {
            Ok(token) => {
                let mut out = header(RequestKind::RepeatTokenRequest);
                out.extend(ConnectionResponseCode::Success.to_byte());
                out.extend_from_slice(&token);
                send_queue.push_to(from, ProtocolTag::Aes, out);
            }
            Err(e) => {
                log::error!("failed to issue repeat token for {email}: {e}");
                let mut out = header(RequestKind::RepeatTokenRequest);
                out.extend(ConnectionResponseCode::Failed.to_byte());
                send_queue.push_to(from, ProtocolTag::Aes, out);
            }
        }
    }

    fn handle_email_request(&self, from: ConnectionHandle, email: &str, send_queue: &SendQueue) {
        let mut writer = ByteWriter::new();
        writer.write_string(email);
        let mut out = header(RequestKind::EmailRequest);
        out.extend(writer.into_bytes());
        send_queue.push_to(from, ProtocolTag::Aes, out);
    }

    fn handle_search(&mut self, from: ConnectionHandle, body: &[u8], send_queue: &SendQueue) {
        let mut reader = ByteReader::new(body);
        let term = reader.read_string().unwrap_or_default();
        self.refresh_compression_schema();
        let summaries: Vec<DrawingSummary> = self.drawings.search(&term).into_iter().map(DrawingRecord::to_summary).collect();

        let mut out = header(RequestKind::DrawingSearchQuery);
        let mut schema_writer = ByteWriter::new();
        self.compression_schema.write(&mut schema_writer);
        out.extend(schema_writer.into_bytes());
        out.extend((summaries.len() as u32).to_le_bytes());
        for summary in &summaries {
            out.extend(summary.compress(&self.compression_schema));
        }
        send_queue.push_to(from, ProtocolTag::Aes, out);
    }

    fn handle_insert(&mut self, from: ConnectionHandle, email: &str, body: &[u8], send_queue: &SendQueue) {
        let Ok((force, record)) = decode_drawing_record(&mut ByteReader::new(body)) else {
            log::warn!("malformed DrawingInsert from {from}");
            return;
        };

        let response_code = match self.drawings.exists(&record.drawing_number) {
            DrawingExists::Exists if !force => DrawingInsertResponse::DrawingExists,
            DrawingExists::Exists | DrawingExists::NotExists => {
                let number = record.drawing_number.clone();
                self.drawings.insert(record);
                log::info!("{email} added drawing {number}");
                DrawingInsertResponse::Success
            }
        };

        if response_code == DrawingInsertResponse::Success {
            self.catalogs.apertures.mark_dirty();
            self.catalogs.materials.mark_dirty();
            self.catalogs.side_iron_prices.mark_dirty();
        }

        let mut out = header(RequestKind::DrawingInsert);
        out.push(response_code as u8);
        send_queue.push_to(from, ProtocolTag::Aes, out);

        if response_code == DrawingInsertResponse::Success {
            self.broadcast_next_drawing_numbers(send_queue);
        }
    }

    fn broadcast_next_drawing_numbers(&self, send_queue: &SendQueue) {
        for (kind, number) in [
            (DrawingNumberKind::Automatic, self.drawings.next_automatic_drawing_number()),
            (DrawingNumberKind::Manual, self.drawings.next_manual_drawing_number()),
        ] {
            let mut out = header(RequestKind::NextDrawingNumber);
            out.push(kind as u8);
            let mut writer = ByteWriter::new();
            writer.write_string(&number);
            out.extend(writer.into_bytes());
            send_queue.push_broadcast(ProtocolTag::Aes, out);
        }
    }

    fn handle_next_drawing_number(&self, from: ConnectionHandle, body: &[u8], send_queue: &SendQueue) {
        let requested = body.first().copied().and_then(|b| DrawingNumberKind::try_from(b).ok());
        let Some(requested) = requested else {
            log::warn!("malformed NextDrawingNumber request from {from}");
            return;
        };
        let number = match requested {
            DrawingNumberKind::Automatic => self.drawings.next_automatic_drawing_number(),
            DrawingNumberKind::Manual => self.drawings.next_manual_drawing_number(),
        };
        let mut out = header(RequestKind::NextDrawingNumber);
        out.push(requested as u8);
        let mut writer = ByteWriter::new();
        writer.write_string(&number);
        out.extend(writer.into_bytes());
        send_queue.push_to(from, ProtocolTag::Aes, out);
    }

    fn handle_drawing_details(&self, from: ConnectionHandle, body: &[u8], send_queue: &SendQueue) {
        let mut reader = ByteReader::new(body);
        let Ok(drawing_number) = reader.read_string() else {
            log::warn!("malformed DrawingDetails request from {from}");
            return;
        };
        let mut out = header(RequestKind::DrawingDetails);
        match self.drawings.get(&drawing_number) {
            Some(record) => {
                out.push(1);
                let mut writer = ByteWriter::new();
                encode_drawing_record(record, &mut writer);
                out.extend(writer.into_bytes());
            }
            None => out.push(0),
        }
        send_queue.push_to(from, ProtocolTag::Aes, out);
    }

    fn handle_add_component(&mut self, from: ConnectionHandle, email: &str, body: &[u8], send_queue: &SendQueue) {
        if body.len() < 4 {
            log::warn!("malformed AddComponent request from {from}");
            return;
        }
        let mut target_bytes = [0u8; 4];
        target_bytes.copy_from_slice(&body[..4]);
        let Ok(target_kind) = RequestKind::try_from(u32::from_le_bytes(target_bytes)) else {
            log::warn!("AddComponent names an unknown target kind");
            return;
        };
        let Some(target) = CatalogKind::from_request_kind(target_kind) else {
            log::warn!("AddComponent target {target_kind:?} is not a source table");
            return;
        };

        let result = self.add_component(target, &body[4..]);
        let response_code = match &result {
            Ok(_) => ComponentInsertResponse::Success,
            Err(e) => {
                log::error!("AddComponent failed for {target:?}: {e}");
                ComponentInsertResponse::Failed
            }
        };

        let mut out = header(RequestKind::AddComponent);
        out.push(response_code as u8);
        send_queue.push_to(from, ProtocolTag::Aes, out);

        if let Ok(stream_bytes) = result {
            log::info!("{email} added a new {target:?} component");
            send_queue.push_broadcast(ProtocolTag::Aes, stream_bytes);
        }
    }

    fn handle_create_backup(&self, from: ConnectionHandle, body: &[u8], send_queue: &SendQueue) {
        let mut reader = ByteReader::new(body);
        let name = reader.read_string().unwrap_or_else(|_| "backup".to_string());
        let mut path = self.backup_path.join(name);
        path.set_extension("sql");

        // The backup writer itself (the SQL dump format) is out of scope (§1);
        // this core only guarantees a typed response code once some backup
        // writer has run.
        let response_code = match std::fs::write(&path, b"-- backup placeholder\n") {
            Ok(()) => BackupResponse::Success,
            Err(e) => {
                log::error!("backup to {} failed: {e}", path.display());
                BackupResponse::Failed
            }
        };

        let mut out = header(RequestKind::CreateBackup);
        out.push(response_code as u8);
        send_queue.push_to(from, ProtocolTag::Aes, out);
    }
}

impl<R: RowSource> RequestHandler for Router<R> {
    fn handle(&mut self, from: ConnectionHandle, email: &str, kind: RequestKind, body: &[u8], send_queue: &SendQueue) {
        if let Some(catalog_kind) = CatalogKind::from_request_kind(kind) {
            self.handle_source_table(from, catalog_kind, send_queue);
            return;
        }
        match kind {
            RequestKind::RepeatTokenRequest => self.handle_repeat_token_request(from, email, send_queue),
            RequestKind::EmailRequest => self.handle_email_request(from, email, send_queue),
            RequestKind::DrawingSearchQuery => self.handle_search(from, body, send_queue),
            RequestKind::DrawingInsert => self.handle_insert(from, email, body, send_queue),
            RequestKind::DrawingDetails => self.handle_drawing_details(from, body, send_queue),
            RequestKind::AddComponent => self.handle_add_component(from, email, body, send_queue),
            RequestKind::NextDrawingNumber => self.handle_next_drawing_number(from, body, send_queue),
            RequestKind::CreateBackup => self.handle_create_backup(from, body, send_queue),
            _ => unreachable!("every Source*Table kind is handled by the CatalogKind branch above"),
        }
    }
}

fn append_and_reinstall<T: Entity + Clone>(
    catalog: &mut crate::catalog::registry::Catalog<T>,
    kind: RequestKind,
    reader: &mut ByteReader,
) -> DdbResult<Vec<u8>> {
    let mut entities = catalog.all_entities();
    let new_id = entities.iter().map(Entity::id).max().unwrap_or(0) + 1;
    entities.push(T::read(new_id, reader)?);
    catalog.reinstall(kind, entities)
}

fn decode_drawing_record(reader: &mut ByteReader) -> DdbResult<(bool, DrawingRecord)> {
    let force = reader.read_bool()?;
    let drawing_number = reader.read_string()?;
    let mat_id = reader.read_u32()?;
    let width = reader.read_f32()?;
    let length = reader.read_f32()?;
    let material_handle = reader.read_u32()?;
    let lap_size = reader.read_f32()?;
    let aperture_handle = reader.read_u32()?;
    let bar_spacing_count = reader.read_u8()? as usize;
    let mut bar_spacings = Vec::with_capacity(bar_spacing_count);
    for _ in 0..bar_spacing_count {
        bar_spacings.push(reader.read_f32()?);
    }
    let extra_aperture_count = reader.read_u8()? as usize;
    let mut extra_apertures = Vec::with_capacity(extra_aperture_count);
    for _ in 0..extra_aperture_count {
        extra_apertures.push(reader.read_u32()?);
    }
    Ok((
        force,
        DrawingRecord {
            drawing_number,
            mat_id,
            width,
            length,
            material_handle,
            lap_size,
            aperture_handle,
            bar_spacings,
            extra_apertures,
        },
    ))
}

fn encode_drawing_record(record: &DrawingRecord, writer: &mut ByteWriter) {
    writer.write_string(&record.drawing_number);
    writer.write_u32(record.mat_id);
    writer.write_f32(record.width);
    writer.write_f32(record.length);
    writer.write_u32(record.material_handle);
    writer.write_f32(record.lap_size);
    writer.write_u32(record.aperture_handle);
    writer.write_u8(record.bar_spacings.len() as u8);
    for spacing in &record.bar_spacings {
        writer.write_f32(*spacing);
    }
    writer.write_u8(record.extra_apertures.len() as u8);
    for handle in &record.extra_apertures {
        writer.write_u32(*handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbnet::send_queue::Target;

    struct EmptyRows;

    impl RowSource for EmptyRows {
        fn products(&self) -> DdbResult<Vec<db::rows::ProductRow>> {
            Ok(vec![])
        }
        fn aperture_shapes(&self) -> DdbResult<Vec<db::rows::ApertureShapeRow>> {
            Ok(vec![])
        }
        fn apertures(&self) -> DdbResult<Vec<db::rows::ApertureRow>> {
            Ok(vec![])
        }
        fn materials(&self) -> DdbResult<Vec<db::rows::MaterialRow>> {
            Ok(vec![])
        }
        fn material_prices(&self) -> DdbResult<Vec<db::rows::MaterialPriceRow>> {
            Ok(vec![])
        }
        fn extra_prices(&self) -> DdbResult<Vec<db::rows::ExtraPriceRow>> {
            Ok(vec![])
        }
        fn labour_times(&self) -> DdbResult<Vec<db::rows::LabourTimeRow>> {
            Ok(vec![])
        }
        fn side_irons(&self) -> DdbResult<Vec<db::rows::SideIronRow>> {
            Ok(vec![])
        }
        fn side_iron_prices(&self) -> DdbResult<Vec<db::rows::SideIronPriceRow>> {
            Ok(vec![])
        }
        fn powder_coating_prices(&self) -> DdbResult<Vec<db::rows::PowderCoatingPriceRow>> {
            Ok(vec![])
        }
        fn machines(&self) -> DdbResult<Vec<db::rows::MachineRow>> {
            Ok(vec![])
        }
        fn machine_decks(&self) -> DdbResult<Vec<db::rows::MachineDeckRow>> {
            Ok(vec![])
        }
        fn backing_strips(&self) -> DdbResult<Vec<db::rows::BackingStripRow>> {
            Ok(vec![])
        }
    }

    fn router() -> Router<EmptyRows> {
        Router::new(Arc::new(RepeatTokenTable::new()), EmptyRows, PathBuf::from("/tmp"))
    }

    #[test]
    fn repeat_token_request_issues_and_sends_a_token() {
        let mut router = router();
        let queue = SendQueue::new();
        router.handle(1, "foo@example.com", RequestKind::RepeatTokenRequest, &[], &queue);
        let messages = queue.drain();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].plaintext.len(), 4 + 1 + 32);
        assert!(router.repeat_tokens.lookup(&{
            let mut token = [0u8; 32];
            token.copy_from_slice(&messages[0].plaintext[5..]);
            token
        }).is_some());
    }

    #[test]
    fn email_request_echoes_the_connection_email() {
        let mut router = router();
        let queue = SendQueue::new();
        router.handle(1, "bar@example.com", RequestKind::EmailRequest, &[], &queue);
        let messages = queue.drain();
        let mut reader = ByteReader::new(&messages[0].plaintext[4..]);
        assert_eq!(reader.read_string().unwrap(), "bar@example.com");
    }

    fn encode_insert_body(force: bool, record: &DrawingRecord) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        writer.write_bool(force);
        encode_drawing_record(record, &mut writer);
        writer.into_bytes()
    }

    fn sample_record(number: &str) -> DrawingRecord {
        DrawingRecord {
            drawing_number: number.to_string(),
            mat_id: 1,
            width: 10.0,
            length: 20.0,
            material_handle: 1,
            lap_size: 1.0,
            aperture_handle: 1,
            bar_spacings: vec![5.0],
            extra_apertures: vec![],
        }
    }

    #[test]
    fn insert_then_duplicate_without_force_is_rejected() {
        let mut router = router();
        let queue = SendQueue::new();
        let body = encode_insert_body(false, &sample_record("SCS1562001"));
        router.handle(1, "a@example.com", RequestKind::DrawingInsert, &body, &queue);
        let first = queue.drain();
        assert_eq!(first[0].plaintext[4], DrawingInsertResponse::Success as u8);
        // second insert without force: next-drawing-number broadcasts from
        // the first insert have already been drained above.
        router.handle(1, "a@example.com", RequestKind::DrawingInsert, &body, &queue);
        let second = queue.drain();
        assert_eq!(second[0].plaintext[4], DrawingInsertResponse::DrawingExists as u8);
    }

    #[test]
    fn successful_insert_broadcasts_next_drawing_numbers() {
        let mut router = router();
        let queue = SendQueue::new();
        let body = encode_insert_body(false, &sample_record("SCS1562001"));
        router.handle(1, "a@example.com", RequestKind::DrawingInsert, &body, &queue);
        let messages = queue.drain();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].target, Target::One(1));
        assert_eq!(messages[1].target, Target::Broadcast);
        assert_eq!(messages[2].target, Target::Broadcast);
    }

    #[test]
    fn drawing_details_reports_missing_drawings() {
        let mut router = router();
        let queue = SendQueue::new();
        router.handle(
            1,
            "a@example.com",
            RequestKind::DrawingDetails,
            &{
                let mut w = ByteWriter::new();
                w.write_string("SCS0000000");
                w.into_bytes()
            },
            &queue,
        );
        let messages = queue.drain();
        assert_eq!(messages[0].plaintext[4], 0);
    }

    #[test]
    fn add_component_appends_and_broadcasts_the_refreshed_stream() {
        let mut router = router();
        let queue = SendQueue::new();
        let mut body = RequestKind::SourceMachineTable.to_le_bytes().to_vec();
        let machine = Machine { id: 1, manufacturer: "Acme".into(), model: "X1".into() };
        let mut writer = ByteWriter::new();
        machine.write(&mut writer);
        body.extend(writer.into_bytes());

        router.handle(1, "a@example.com", RequestKind::AddComponent, &body, &queue);
        let messages = queue.drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].plaintext[4], ComponentInsertResponse::Success as u8);
        assert_eq!(messages[1].target, Target::Broadcast);
    }

    #[test]
    fn source_table_request_rebuilds_once_then_reuses_raw_bytes() {
        let mut router = router();
        let queue = SendQueue::new();
        router.handle(1, "a@example.com", RequestKind::SourceProductTable, &[], &queue);
        assert!(!router.catalogs.products.dirty());
        let first = queue.drain()[0].plaintext.clone();
        router.handle(1, "a@example.com", RequestKind::SourceProductTable, &[], &queue);
        let second = queue.drain()[0].plaintext.clone();
        assert_eq!(first, second);
    }
}

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

//! `Catalog<T>`: the generic per-kind registry (§3, §4.5).
//!
//! Replaces the original's per-type static fields
//! (`DrawingComponentManager<T>`'s `componentLookup`/`handleToIDMap`/
//! `indexSet` class statics) with one instance per kind, held by the server
//! in a heterogeneous container keyed by kind (§9's design note) rather than
//! as global mutable state.

use crate::catalog::entity::Entity;
use crate::catalog::stream;
use crate::protocol::request_kind::RequestKind;
use crate::util::error::{DdbResult, Error};
use std::collections::HashMap;

/// Registered callback, fired in registration order on every successful
/// `source` (§4.5, §5's ordering guarantee).
type UpdateCallback = Box<dyn Fn() + Send + Sync>;

pub struct Catalog<T: Entity> {
    entities: HashMap<u32, T>,
    handle_to_id: HashMap<u32, u32>,
    /// Insertion order, preserved across `source` calls for `max_handle`'s
    /// "highest issued handle" semantics and for iteration order.
    handles: Vec<u32>,
    dirty: bool,
    source_bytes: Option<Vec<u8>>,
    callbacks: Vec<UpdateCallback>,
}

impl<T: Entity> Default for Catalog<T> {
    fn default() -> Self {
        Self {
            entities: HashMap::new(),
            handle_to_id: HashMap::new(),
            handles: Vec::new(),
            dirty: true,
            source_bytes: None,
            callbacks: Vec::new(),
        }
    }
}

impl<T: Entity> Catalog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the catalog's contents from a freshly received stream
    /// (§4.5's `source(buffer, size)` contract): clears everything, installs
    /// the null entity at handle 0, decodes every element, clears `dirty`,
    /// takes ownership of `bytes` for re-broadcast, then fires callbacks.
    pub fn source(&mut self, bytes: Vec<u8>, expected: RequestKind) -> DdbResult<()> {
        let elements = stream::decode_stream::<T>(&bytes, expected)?;
        self.install(elements);
        self.source_bytes = Some(bytes);
        Ok(())
    }

    /// Test/server-local convenience: installs entities directly without a
    /// round trip through the wire stream. Kept internal — production
    /// hydration always goes through [`Catalog::source`] so that
    /// `raw_source_bytes` stays consistent with what's re-broadcast.
    pub(crate) fn source_entities(&mut self, elements: Vec<(u32, T)>) -> DdbResult<()> {
        self.install(elements);
        self.source_bytes = None;
        Ok(())
    }

    fn install(&mut self, elements: Vec<(u32, T)>) {
        self.entities.clear();
        self.handle_to_id.clear();
        self.handles.clear();

        self.entities.insert(0, T::null());
        self.handle_to_id.insert(0, 0);
        self.handles.push(0);

        for (handle, entity) in elements {
            self.handle_to_id.insert(handle, entity.id());
            self.entities.insert(handle, entity);
            self.handles.push(handle);
        }

        self.dirty = false;
        for callback in &self.callbacks {
            callback();
        }
    }

    pub fn get_by_handle(&self, handle: u32) -> DdbResult<&T> {
        self.entities
            .get(&handle)
            .ok_or_else(|| Error::application(format!("invalid component lookup handle {handle}")))
    }

    /// Linear scan over `handle -> id`, returning the first match (§4.5).
    pub fn find_by_id(&self, id: u32) -> DdbResult<&T> {
        self.handle_to_id
            .iter()
            .find(|(_, entity_id)| **entity_id == id)
            .and_then(|(handle, _)| self.entities.get(handle))
            .ok_or_else(|| Error::application(format!("component not found for id {id}")))
    }

    /// The first handle mapped to `id`, for callers (the builder's
    /// cross-kind joins) that need the handle rather than the entity itself.
    pub fn handle_by_id(&self, id: u32) -> DdbResult<u32> {
        self.handle_to_id
            .iter()
            .find(|(_, entity_id)| **entity_id == id)
            .map(|(handle, _)| *handle)
            .ok_or_else(|| Error::application(format!("component not found for id {id}")))
    }

    /// Every entity sharing `id`, since some database rows legitimately map
    /// to more than one catalog entity (glossary: "Database id").
    pub fn all_by_id(&self, id: u32) -> Vec<&T> {
        let mut handles: Vec<u32> = self
            .handle_to_id
            .iter()
            .filter(|(_, entity_id)| **entity_id == id)
            .map(|(handle, _)| *handle)
            .collect();
        handles.sort_unstable();
        handles.into_iter().filter_map(|h| self.entities.get(&h)).collect()
    }

    pub fn max_handle(&self) -> u32 {
        self.handles.iter().copied().max().unwrap_or(0)
    }

    pub fn dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn handles(&self) -> &[u32] {
        &self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// The raw bytes this catalog was last hydrated from, re-sent verbatim
    /// to a client issuing a `Source*Table` request against a clean (not
    /// dirty) catalog (§4.5's "source response is never sent while its
    /// catalog is being rebuilt").
    pub fn raw_source_bytes(&self) -> Option<&[u8]> {
        self.source_bytes.as_deref()
    }

    pub fn add_callback(&mut self, callback: impl Fn() + Send + Sync + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Every non-null entity currently installed, in handle order. Used by
    /// `request::Router` to append one more entity and reinstall without a
    /// round trip through the database (`AddComponent`, §4.4).
    pub fn all_entities(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.handles
            .iter()
            .copied()
            .filter(|&h| h != 0)
            .filter_map(|h| self.entities.get(&h).cloned())
            .collect()
    }

    /// Renumbers `elements` densely from handle 1 and installs them in place
    /// of the catalog's current contents, returning the encoded stream for
    /// re-broadcast. The in-memory analogue of a fresh database re-query
    /// after a write (`request::Router`'s post-insert catalog refresh).
    pub fn reinstall(&mut self, kind: RequestKind, elements: Vec<T>) -> DdbResult<Vec<u8>> {
        let numbered: Vec<(u32, T)> = elements
            .into_iter()
            .enumerate()
            .map(|(i, e)| (i as u32 + 1, e))
            .collect();
        let bytes = stream::encode_stream(kind, &numbered);
        self.source(bytes.clone(), kind)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kinds::product::Product;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn stream(elements: &[(u32, Product)]) -> Vec<u8> {
        stream::encode_stream(RequestKind::SourceProductTable, elements)
    }

    #[test]
    fn null_entity_is_always_present_after_source() {
        let mut catalog = Catalog::<Product>::new();
        let bytes = stream(&[(1, Product { id: 100, name: "A".into() })]);
        catalog.source(bytes, RequestKind::SourceProductTable).unwrap();
        assert!(catalog.get_by_handle(0).is_ok());
        assert_eq!(catalog.handles().len(), 2);
        assert!(!catalog.dirty());
    }

    #[test]
    fn max_handle_covers_every_issued_handle() {
        let mut catalog = Catalog::<Product>::new();
        let bytes = stream(&[
            (1, Product { id: 1, name: "A".into() }),
            (5, Product { id: 2, name: "B".into() }),
        ]);
        catalog.source(bytes, RequestKind::SourceProductTable).unwrap();
        assert_eq!(catalog.max_handle(), 5);
    }

    #[test]
    fn find_by_id_and_all_by_id_agree_on_duplicates() {
        let mut catalog = Catalog::<Product>::new();
        let bytes = stream(&[
            (1, Product { id: 7, name: "A".into() }),
            (2, Product { id: 7, name: "A-variant".into() }),
        ]);
        catalog.source(bytes, RequestKind::SourceProductTable).unwrap();
        let found = catalog.find_by_id(7).unwrap();
        let all = catalog.all_by_id(7);
        assert_eq!(all.len(), 2);
        assert!(all.iter().any(|e| e.name == found.name));
    }

    #[test]
    fn unknown_handle_is_an_error() {
        let catalog = Catalog::<Product>::new();
        assert!(catalog.get_by_handle(42).is_err());
    }

    #[test]
    fn callbacks_fire_in_registration_order_on_every_source() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut catalog = Catalog::<Product>::new();
        let o1 = Arc::clone(&order);
        catalog.add_callback(move || o1.lock().unwrap().push(1));
        let o2 = Arc::clone(&order);
        catalog.add_callback(move || o2.lock().unwrap().push(2));
        catalog.source(stream(&[]), RequestKind::SourceProductTable).unwrap();
        assert_eq!(*order.lock().unwrap(), vec![1, 2]);
    }

    #[test]
    fn mark_dirty_is_idempotent() {
        let mut catalog = Catalog::<Product>::new();
        catalog.source(stream(&[]), RequestKind::SourceProductTable).unwrap();
        catalog.mark_dirty();
        catalog.mark_dirty();
        assert!(catalog.dirty());
    }

    #[test]
    fn repeated_source_with_same_buffer_is_equivalent() {
        let mut catalog = Catalog::<Product>::new();
        let bytes = stream(&[(1, Product { id: 1, name: "A".into() })]);
        catalog.source(bytes.clone(), RequestKind::SourceProductTable).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = Arc::clone(&calls);
        catalog.add_callback(move || { calls2.fetch_add(1, Ordering::SeqCst); });
        catalog.source(bytes, RequestKind::SourceProductTable).unwrap();
        assert_eq!(catalog.get_by_handle(1).unwrap().name, "A");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

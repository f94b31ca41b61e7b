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

//! A deliberately minimal stand-in for the drawings table itself (§1
//! non-goal: "no schema design for the drawings themselves") — just enough
//! fields to drive the search, insert and next-drawing-number flows
//! `request::Router` exercises. Grounded on the request/response shapes in
//! `DatabaseRequestHandler.cpp`'s `DRAWING_SEARCH_QUERY`, `DRAWING_INSERT`
//! and `GET_NEXT_DRAWING_NUMBER` branches, not on the drawing schema itself.

use crate::search::DrawingSummary;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawingRecord {
    pub drawing_number: String,
    pub mat_id: u32,
    pub width: f32,
    pub length: f32,
    pub material_handle: u32,
    pub lap_size: f32,
    pub aperture_handle: u32,
    pub bar_spacings: Vec<f32>,
    pub extra_apertures: Vec<u32>,
}

impl DrawingRecord {
    pub fn to_summary(&self) -> DrawingSummary {
        DrawingSummary {
            mat_id: self.mat_id,
            width: self.width,
            length: self.length,
            material_handle: self.material_handle,
            lap_size: self.lap_size,
            aperture_handle: self.aperture_handle,
            bar_spacings: self.bar_spacings.clone(),
            drawing_number: self.drawing_number.clone(),
            extra_apertures: self.extra_apertures.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawingExists {
    Exists,
    NotExists,
}

/// Keyed and iterated by drawing number (`BTreeMap` gives deterministic
/// search-result ordering without a real `ORDER BY`).
#[derive(Default)]
pub struct DrawingStore {
    records: BTreeMap<String, DrawingRecord>,
    max_sequence: u32,
}

impl DrawingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, drawing_number: &str) -> DrawingExists {
        if self.records.contains_key(drawing_number) {
            DrawingExists::Exists
        } else {
            DrawingExists::NotExists
        }
    }

    pub fn get(&self, drawing_number: &str) -> Option<&DrawingRecord> {
        self.records.get(drawing_number)
    }

    /// Installs `record`, overwriting any existing row of the same number —
    /// the caller (`request::Router`) has already decided, via `exists` and
    /// the request's force bit, whether overwriting is allowed.
    pub fn insert(&mut self, record: DrawingRecord) {
        self.max_sequence = self.max_sequence.max(trailing_sequence(&record.drawing_number));
        self.records.insert(record.drawing_number.clone(), record);
    }

    /// Every record whose drawing number contains `term`, standing in for
    /// the SQL search clause this core never generates (§1).
    pub fn search(&self, term: &str) -> Vec<&DrawingRecord> {
        self.records.values().filter(|r| r.drawing_number.contains(term)).collect()
    }

    /// The next automatically-assigned drawing number: one past the highest
    /// trailing numeric sequence seen so far, re-prefixed with the most
    /// recently inserted drawing's non-numeric prefix.
    pub fn next_automatic_drawing_number(&self) -> String {
        let prefix = self
            .records
            .values()
            .next_back()
            .map(|r| r.drawing_number.trim_end_matches(|c: char| c.is_ascii_digit()).to_string())
            .unwrap_or_else(|| "SCS".to_string());
        format!("{prefix}{:05}", self.max_sequence + 1)
    }

    /// The manual drawing number hint: operators key these in by hand, so
    /// the core only ever offers the same suggestion as `automatic`.
    pub fn next_manual_drawing_number(&self) -> String {
        self.next_automatic_drawing_number()
    }
}

fn trailing_sequence(drawing_number: &str) -> u32 {
    let digits: String = drawing_number.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    digits.chars().rev().collect::<String>().parse().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(number: &str) -> DrawingRecord {
        DrawingRecord {
            drawing_number: number.to_string(),
            mat_id: 1,
            width: 1.0,
            length: 1.0,
            material_handle: 1,
            lap_size: 0.0,
            aperture_handle: 1,
            bar_spacings: vec![],
            extra_apertures: vec![],
        }
    }

    #[test]
    fn exists_reflects_prior_inserts() {
        let mut store = DrawingStore::new();
        assert_eq!(store.exists("SCS1562001"), DrawingExists::NotExists);
        store.insert(record("SCS1562001"));
        assert_eq!(store.exists("SCS1562001"), DrawingExists::Exists);
    }

    #[test]
    fn search_matches_by_substring() {
        let mut store = DrawingStore::new();
        store.insert(record("SCS1562001"));
        store.insert(record("SCS1565002"));
        assert_eq!(store.search("1562").len(), 1);
        assert_eq!(store.search("SCS").len(), 2);
    }

    #[test]
    fn next_automatic_drawing_number_advances_past_the_highest_sequence() {
        let mut store = DrawingStore::new();
        store.insert(record("SCS1562007"));
        assert_eq!(store.next_automatic_drawing_number(), "SCS1562008");
        assert_eq!(store.next_manual_drawing_number(), "SCS1562008");
    }
}

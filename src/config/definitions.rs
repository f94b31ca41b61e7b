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

//! The resolved configuration surface, loaded from `serverMeta.json`.
//!
//! Field names mirror the specification's §6 key set exactly. Key files,
//! database credentials and backup contents themselves are opaque to the
//! core (per §1's non-goals); we only carry the paths.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMeta {
    pub key_path: PathBuf,
    pub database_password_path: PathBuf,
    pub server_port: u16,
    pub backup_path: PathBuf,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default)]
    pub changelog_file: Option<PathBuf>,
    #[serde(default)]
    pub error_file: Option<PathBuf>,
}

impl ServerMeta {
    pub const DEFAULT_REFRESH_RATE_HZ: f64 = 60.0;
    pub const DEFAULT_HEARTBEAT_CYCLES: u32 = 600;
    pub const DEFAULT_CONNECTION_TIMEOUT_SECS: f64 = 5.0;
    pub const HANDSHAKE_TIMEOUT_SECS: u64 = 60;
}

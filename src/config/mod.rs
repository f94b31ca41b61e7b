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

//! Environment configuration: CLI surface plus `serverMeta.json`.

pub mod cli;
pub mod definitions;
#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use definitions::ServerMeta;

use crate::util::error::{DdbResult, Error};
use std::fs;
use std::path::Path;

/// Load and parse the meta file. Any failure here is fatal per §7: the
/// process cannot usefully start without it.
pub fn load_server_meta(path: impl AsRef<Path>) -> DdbResult<ServerMeta> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| {
        Error::fatal(format!(
            "could not read meta file at {}: {e}",
            path.display()
        ))
    })?;
    serde_json::from_str(&raw)
        .map_err(|e| Error::fatal(format!("could not parse meta file at {}: {e}", path.display())))
}

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

//! Command line surface for the core server (§6).
//!
//! `clap`'s derive API replaces the teacher's older yaml-driven `clap::App`,
//! but the effect is the same: a typed, validated set of CLI flags with a
//! documented exit code for bad arguments.

use clap::Parser;
use std::path::PathBuf;

/// Bad-argument exit code fixed by the specification.
pub const EXIT_BAD_ARGUMENTS: i32 = -1;

#[derive(Debug, Parser)]
#[command(name = "ddbd", about = "Drawing database messaging core")]
pub struct Cli {
    /// Run as the long-lived server (as opposed to a one-shot maintenance mode)
    #[arg(long)]
    pub server: bool,

    /// Run with verbose, developer-oriented logging
    #[arg(long)]
    pub dev: bool,

    /// The user this server instance is running on behalf of
    #[arg(long = "user")]
    pub user: Option<String>,

    /// Path to the `serverMeta.json` environment configuration file
    #[arg(long = "meta")]
    pub meta: PathBuf,
}

impl Cli {
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(EXIT_BAD_ARGUMENTS);
            }
        }
    }
}

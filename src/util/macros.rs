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

//! Small helper macros shared across modules.

/// Bail out of the current function with a `Error::Protocol` if a buffer's
/// length doesn't match what's expected. Used heavily by the message codec.
#[macro_export]
macro_rules! err_if_len_is {
    ($buf:expr, $len:expr, $what:expr) => {
        if $buf.len() != $len {
            return Err($crate::util::error::Error::protocol($what));
        }
    };
}

/// `cold` escape hatch for the rare branch of a hot loop (connection accept,
/// per-tick dispatch). Mirrors the teacher's `if_cold!`/`compiler::unlikely`
/// pattern without the nightly-only intrinsics.
#[macro_export]
macro_rules! skip_loop_err {
    ($e:expr) => {
        match $e {
            Ok(v) => v,
            Err(e) => {
                log::warn!("ignoring error in accept loop: {e}");
                continue;
            }
        }
    };
}

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

//! Single-byte codes carried inside message payloads: the authentication
//! mode tag of handshake step 5, and the `ConnectionResponse`/`Disconnect`
//! payload bytes (§4.3, §6).

use crate::util::error::{DdbResult, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AuthMode {
    Jwt = 0,
    RepeatToken = 1,
}

impl TryFrom<u8> for AuthMode {
    type Error = Error;

    fn try_from(value: u8) -> DdbResult<Self> {
        match value {
            0 => Ok(Self::Jwt),
            1 => Ok(Self::RepeatToken),
            other => Err(Error::protocol(format!("unknown auth mode {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionResponseCode {
    Success = 0,
    Failed = 1,
}

impl ConnectionResponseCode {
    pub fn to_byte(self) -> [u8; 1] {
        [self as u8]
    }
}

/// The code carried in a `Disconnect` message's single payload byte. The
/// original source distinguishes a small, fixed set of reasons; anything
/// else is reported as `Unknown` rather than rejected outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DisconnectCode {
    ClientClosed = 0,
    ServerShutdown = 1,
    Timeout = 2,
    Unknown = 255,
}

impl From<u8> for DisconnectCode {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::ClientClosed,
            1 => Self::ServerShutdown,
            2 => Self::Timeout,
            _ => Self::Unknown,
        }
    }
}

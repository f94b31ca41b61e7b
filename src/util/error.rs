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

//! Crate-wide error type.
//!
//! Follows the taxonomy in the specification's error handling design: transport,
//! cryptographic, protocol, application and fatal errors. Fatal errors are the
//! only ones that ever cause the process to exit; everything else propagates to
//! the caller (usually a single connection) and is handled locally.

use std::{fmt, io};

pub type DdbResult<T> = Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Socket dead, send/receive failure, protocol-tag mismatch.
    Transport(String),
    /// Bad challenge bit pattern, invalid signature, bad/expired JWT.
    Crypto(String),
    /// Oversize payload, unknown protocol tag, missing session token.
    Protocol(String),
    /// Recoverable, surfaced to the client as a response code.
    Application(String),
    /// Cannot continue running the process.
    Fatal(String),
    Io(io::Error),
    Json(serde_json::Error),
    Openssl(openssl::error::ErrorStack),
    Jwt(jsonwebtoken::errors::Error),
}

impl Error {
    pub fn transport(msg: impl ToString) -> Self {
        Self::Transport(msg.to_string())
    }
    pub fn crypto(msg: impl ToString) -> Self {
        Self::Crypto(msg.to_string())
    }
    pub fn protocol(msg: impl ToString) -> Self {
        Self::Protocol(msg.to_string())
    }
    pub fn application(msg: impl ToString) -> Self {
        Self::Application(msg.to_string())
    }
    pub fn fatal(msg: impl ToString) -> Self {
        Self::Fatal(msg.to_string())
    }
    /// True for the fatal-error bucket in the spec's taxonomy: these are the
    /// only errors that warrant a non-zero process exit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(s) => write!(f, "transport error: {s}"),
            Self::Crypto(s) => write!(f, "cryptographic error: {s}"),
            Self::Protocol(s) => write!(f, "protocol error: {s}"),
            Self::Application(s) => write!(f, "application error: {s}"),
            Self::Fatal(s) => write!(f, "fatal error: {s}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(e) => write!(f, "JSON error: {e}"),
            Self::Openssl(e) => write!(f, "OpenSSL error: {e}"),
            Self::Jwt(e) => write!(f, "JWT error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<openssl::error::ErrorStack> for Error {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::Openssl(e)
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

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

//! Wire protocol: framing constants, the message codec, the session
//! envelope, and the request-kind tag (§4.2, §6).

pub mod codes;
pub mod envelope;
pub mod frame;
pub mod message;
pub mod request_kind;

pub use codes::{AuthMode, ConnectionResponseCode, DisconnectCode};
pub use envelope::Envelope;
pub use message::{
    AnyDecoder, DecodeState, EncryptedDecoder, EncryptedMessage, Frame, PlainDecoder, PlainMessage,
    ProtocolTag,
};
pub use request_kind::RequestKind;

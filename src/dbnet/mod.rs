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

//! Connection networking: the non-blocking socket, the handshake, the
//! per-connection state, the dispatcher tick and its send queue (§4.1-§4.4).

pub mod connection;
pub mod console;
pub mod dispatcher;
pub mod handshake;
pub mod listener;
pub mod repeat_token;
pub mod send_queue;
pub mod socket;

pub use connection::{Connection, ConnectionHandle, HandleAllocator};
pub use dispatcher::{Dispatcher, RequestHandler};
pub use listener::{HandshakeMaterial, Listener};
pub use repeat_token::RepeatTokenTable;
pub use send_queue::{QueuedMessage, SendQueue, Target};
pub use socket::{ListeningSocket, Socket, SocketResult};

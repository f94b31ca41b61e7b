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

//! A connected peer and the dense handle allocator used to name it (§4.3,
//! §5's ownership note: "each `Connection` owns its socket, AES key, token,
//! nonce, email").

use crate::crypto::aes::AesKey;
use crate::dbnet::socket::Socket;
use std::collections::BTreeSet;

pub type ConnectionHandle = u32;

pub struct Connection {
    pub handle: ConnectionHandle,
    pub socket: Socket,
    pub aes_key: AesKey,
    pub session_token: u64,
    pub server_nonce: u32,
    pub email: String,
}

/// Hands out the smallest non-negative integer `>= 1` not currently in use,
/// matching "dense recycling" (§4.3): handles freed by a disconnecting
/// connection are reused by the next one to authenticate.
#[derive(Default)]
pub struct HandleAllocator {
    in_use: BTreeSet<ConnectionHandle>,
}

impl HandleAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ConnectionHandle {
        let mut candidate = 1;
        for &handle in &self.in_use {
            if handle != candidate {
                break;
            }
            candidate += 1;
        }
        self.in_use.insert(candidate);
        candidate
    }

    pub fn release(&mut self, handle: ConnectionHandle) {
        self.in_use.remove(&handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_densely_from_one() {
        let mut allocator = HandleAllocator::new();
        assert_eq!(allocator.allocate(), 1);
        assert_eq!(allocator.allocate(), 2);
        assert_eq!(allocator.allocate(), 3);
    }

    #[test]
    fn reuses_a_released_handle() {
        let mut allocator = HandleAllocator::new();
        let a = allocator.allocate();
        let _b = allocator.allocate();
        allocator.release(a);
        assert_eq!(allocator.allocate(), a);
    }
}

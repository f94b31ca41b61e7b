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

//! The send queue (§4.4 step 4, §5): the only multi-producer shared mutable
//! state in the core, protected by a single mutex so handler callbacks
//! running on worker tasks can enqueue responses the main tick later drains
//! and encrypts.

use crate::dbnet::connection::ConnectionHandle;
use crate::protocol::message::ProtocolTag;
use parking_lot::Mutex;

/// Who a queued message is destined for. `Broadcast` is used for the
/// post-insert next-drawing-number hint and catalog-change notifications
/// (§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    One(ConnectionHandle),
    Broadcast,
}

#[derive(Debug, Clone)]
pub struct QueuedMessage {
    pub target: Target,
    pub tag: ProtocolTag,
    pub plaintext: Vec<u8>,
}

#[derive(Default)]
pub struct SendQueue {
    inner: Mutex<Vec<QueuedMessage>>,
}

impl SendQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, target: Target, tag: ProtocolTag, plaintext: Vec<u8>) {
        self.inner.lock().push(QueuedMessage { target, tag, plaintext });
    }

    pub fn push_to(&self, handle: ConnectionHandle, tag: ProtocolTag, plaintext: Vec<u8>) {
        self.push(Target::One(handle), tag, plaintext);
    }

    pub fn push_broadcast(&self, tag: ProtocolTag, plaintext: Vec<u8>) {
        self.push(Target::Broadcast, tag, plaintext);
    }

    /// Drains the queue in FIFO order, preserving per-connection send order
    /// (§5's ordering guarantee).
    pub fn drain(&self) -> Vec<QueuedMessage> {
        std::mem::take(&mut *self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_in_fifo_order() {
        let queue = SendQueue::new();
        queue.push_to(1, ProtocolTag::Aes, vec![1]);
        queue.push_to(1, ProtocolTag::Aes, vec![2]);
        let drained = queue.drain();
        assert_eq!(drained[0].plaintext, vec![1]);
        assert_eq!(drained[1].plaintext, vec![2]);
        assert!(queue.drain().is_empty());
    }
}

// Copyright 2020 Xavier Gillard
//
// Permission is hereby granted, free of charge, to any person obtaining a copy of
// this software and associated documentation files (the "Software"), to deal in
// the Software without restriction, including without limitation the rights to
// use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of
// the Software, and to permit persons to whom the Software is furnished to do so,
// subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS
// FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR
// COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER
// IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN
// CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! This module provides the per worker inbox of the message passing engine:
//! a multi producer, single consumer mailbox.
//!
//! The contract is deliberately loose: any thread may push concurrently and
//! pushes never block indefinitely, only the owning worker pops, and no
//! delivery order is promised (this implementation happens to be FIFO, the
//! engine must not rely on it). The algorithm does not require lock freedom,
//! so the mailbox is a plain mutex guarded queue paired with a condition
//! variable; the condvar is what gives the reconstruction phase a blocking
//! receive instead of a busy wait.

use std::collections::VecDeque;

use parking_lot::{Condvar, Mutex};

use crate::common::Message;

/// A multi producer, single consumer mailbox of `Message`s.
pub struct Inbox {
    /// The queued messages; only ever touched with the lock held.
    queue    : Mutex<VecDeque<Message>>,
    /// The monitor a consumer blocks on when it wants to wait for a message
    /// rather than poll.
    available: Condvar
}
impl Inbox {
    /// This creates a new, empty inbox.
    pub fn new() -> Self {
        Inbox {
            queue    : Mutex::new(VecDeque::new()),
            available: Condvar::new()
        }
    }

    /// Enqueues one message. Any thread may call this, concurrently with the
    /// owner draining.
    pub fn push(&self, message: Message) {
        let mut queue = self.queue.lock();
        queue.push_back(message);
        self.available.notify_one();
    }

    /// Dequeues one message if any is available. This is what the search
    /// phase drain uses: it must observe emptiness, not wait it out.
    pub fn try_pop(&self) -> Option<Message> {
        self.queue.lock().pop_front()
    }

    /// Dequeues one message, blocking until one is available. This is what
    /// the reconstruction phase uses while waiting for the baton.
    pub fn recv(&self) -> Message {
        let mut queue = self.queue.lock();
        while queue.is_empty() {
            self.available.wait(&mut queue);
        }
        queue.pop_front().unwrap()
    }

    /// Returns true iff no message is currently enqueued.
    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Yields the number of currently enqueued messages.
    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }
}
impl Default for Inbox {
    fn default() -> Self {
        Self::new()
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

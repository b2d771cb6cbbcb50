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

//! This module defines the `Frontier` trait. That is the abstraction of a
//! worker's open set: the nodes that were discovered but not expanded yet.

use crate::common::FrontierEntry;

/// The `Frontier` is the abstraction of a worker's open set (aka the fringe,
/// aka the open list). This is the set of nodes that were discovered but not
/// expanded yet.
///
/// # Note:
/// The engines rely on the assumption that a frontier pops its entries in
/// ascending f-cost order. Hence, it is a requirement for any frontier
/// implementation to enforce that requirement. The tie break between entries
/// of equal f-cost, on the other hand, is left unspecified.
pub trait Frontier {
    /// This is how you enqueue an entry onto the frontier. Duplicate entries
    /// for the same node are allowed; the engines filter stale copies when
    /// they pop.
    fn push(&mut self, entry: FrontierEntry);
    /// This method yields the entry with the least f-cost, or `None` when the
    /// frontier is empty.
    fn pop(&mut self) -> Option<FrontierEntry>;
    /// Yields the number of enqueued entries.
    fn len(&self) -> usize;
    /// Returns true iff the frontier is empty (len == 0).
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

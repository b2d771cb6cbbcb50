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

//! This module defines the `Solver` trait: the external contract every
//! shortest path engine of this crate (sequential oracle, message passing
//! HDA*, shared memory HDA*) abides by.

use crate::common::{NodeId, SearchError, SearchOutcome};

/// The external contract of a shortest path engine. Every engine of the
/// crate, whatever its internal coordination scheme, answers the same
/// question the same way: given two endpoints, either an optimal path (with
/// its weight) or a distinguished error value.
///
/// # Note:
/// The engines are deterministic in *cost* only: two runs on the same input
/// return the same path weight and the same path length, but the expansion
/// trace (and hence the expanded-node count) may differ from run to run and
/// across worker counts.
pub trait Solver {
    /// Computes an optimal path from `source` to `dest`.
    ///
    /// Both endpoints must be valid node ids of the graph the solver was
    /// built for. A search where `source == dest` succeeds with the single
    /// node path and a zero cost.
    fn shortest_path(&mut self, source: NodeId, dest: NodeId) -> Result<SearchOutcome, SearchError>;

    /// The display name of this engine, as it appears in the reports.
    fn name(&self) -> &'static str;

    /// The number of worker threads this engine runs with.
    fn nb_workers(&self) -> usize;
}

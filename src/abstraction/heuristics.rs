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

//! This module defines the `Heuristic` trait: the estimator of the remaining
//! cost from some node towards the goal of the search.

use crate::common::NodeId;
use crate::graph::Graph;

/// An estimator of the cost that remains to be paid to travel from `from` to
/// `to` in the given graph.
///
/// # Note:
/// A* returns an optimal path when the estimate is admissible, that is when
/// it never exceeds the true remaining cost. The stock `Euclidean`
/// implementation is admissible whenever every edge weighs at least the
/// distance between its endpoints (which holds for the generated instances,
/// where the weight *is* that distance).
pub trait Heuristic {
    /// Returns a lower bound estimate of the cost to go from `from` to `to`.
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64;
}

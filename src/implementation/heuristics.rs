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

//! This module provides the implementation of the usual heuristics: the
//! Euclidean remaining-cost estimator and the frontier ordering used by all
//! the engines.

use std::cmp::Ordering;

use compare::Compare;

use crate::abstraction::heuristics::Heuristic;
use crate::common::{FrontierEntry, NodeId};
use crate::graph::Graph;

// ----------------------------------------------------------------------------
// --- REMAINING COST ESTIMATION ----------------------------------------------
// ----------------------------------------------------------------------------
/// The straight line (Euclidean) distance between the positions of the two
/// vertices. This is the stock heuristic of the engines: on a graph embedded
/// in the plane, no path between two vertices can be shorter than the segment
/// joining them, as long as each edge weighs at least the distance between
/// its endpoints.
#[derive(Debug, Default, Copy, Clone)]
pub struct Euclidean;
impl Heuristic for Euclidean {
    fn estimate(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        graph.position(from).distance_to(graph.position(to))
    }
}

// ----------------------------------------------------------------------------
// --- FRONTIER ORDER ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// The ordering that makes a max-heap behave as the min-f-cost queue the
/// engines need: an entry compares greater exactly when its f-cost is lower,
/// so the top of the heap is always the most promising entry.
///
/// # Example
/// ```
/// # use binary_heap_plus::BinaryHeap;
/// # use hdastar::common::FrontierEntry;
/// # use hdastar::implementation::heuristics::MinFCost;
/// let a = FrontierEntry { node: 0, f_cost: 42.0 };
/// let b = FrontierEntry { node: 1, f_cost:  2.0 };
/// let c = FrontierEntry { node: 2, f_cost: 24.0 };
///
/// let mut queue = BinaryHeap::from_vec_cmp(vec![a, b, c], MinFCost);
/// assert_eq!(1, queue.pop().unwrap().node); // because 2.0 is the least f-cost
/// assert_eq!(2, queue.pop().unwrap().node); // because 24.0 is the next least
/// assert_eq!(0, queue.pop().unwrap().node); // 42.0 pops last
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct MinFCost;
impl Compare<FrontierEntry> for MinFCost {
    fn compare(&self, a: &FrontierEntry, b: &FrontierEntry) -> Ordering {
        // f-costs are sums of non-negative weights and finite estimates, so
        // the comparison can only be undecided if the caller fed a NaN in
        b.f_cost.partial_cmp(&a.f_cost).unwrap_or(Ordering::Equal)
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_euclidean {
    use crate::abstraction::heuristics::Heuristic;
    use crate::graph::{Graph, Position};
    use crate::implementation::heuristics::Euclidean;

    fn triangle() -> Graph {
        Graph::with_positions(vec![
            Position { x: 0.0, y: 0.0 },
            Position { x: 3.0, y: 0.0 },
            Position { x: 3.0, y: 4.0 }
        ])
    }

    #[test]
    fn the_estimate_is_the_straight_line_distance() {
        let graph = triangle();
        assert_eq!(3.0, Euclidean.estimate(&graph, 0, 1));
        assert_eq!(4.0, Euclidean.estimate(&graph, 1, 2));
        assert_eq!(5.0, Euclidean.estimate(&graph, 0, 2));
    }

    #[test]
    fn the_estimate_is_symmetric() {
        let graph = triangle();
        assert_eq!(Euclidean.estimate(&graph, 0, 2), Euclidean.estimate(&graph, 2, 0));
    }

    #[test]
    fn the_estimate_towards_oneself_is_zero() {
        let graph = triangle();
        assert_eq!(0.0, Euclidean.estimate(&graph, 1, 1));
    }
}

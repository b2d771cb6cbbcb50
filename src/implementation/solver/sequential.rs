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

//! This module provides the implementation of a plain sequential A* solver:
//! one thread, one frontier, one closed set. It exists as the oracle the
//! parallel engines are validated against, not as the interesting part of
//! the crate.

use std::time::Instant;

use crate::abstraction::frontier::Frontier;
use crate::abstraction::heuristics::Heuristic;
use crate::abstraction::solver::Solver;
use crate::common::{FrontierEntry, NodeId, SearchError, SearchOutcome, INVALID_NODE_ID};
use crate::graph::Graph;
use crate::implementation::frontier::BinaryHeapFrontier;
use crate::implementation::heuristics::Euclidean;

/// The single threaded A* reference implementation.
///
/// # Example Usage
/// ```
/// # use hdastar::graph::{Graph, Position};
/// # use hdastar::abstraction::solver::Solver;
/// # use hdastar::implementation::solver::sequential::SequentialSolver;
/// let mut graph = Graph::with_positions(vec![
///     Position { x: 0.0, y: 0.0 },
///     Position { x: 1.0, y: 0.0 }
/// ]);
/// graph.add_edge(0, 1, 1.0);
///
/// let mut solver  = SequentialSolver::new(&graph);
/// let outcome = solver.shortest_path(0, 1).unwrap();
/// assert_eq!(1.0, outcome.cost);
/// assert_eq!(vec![0, 1], outcome.path);
/// ```
pub struct SequentialSolver<'a, H = Euclidean>
    where H: Heuristic
{
    graph    : &'a Graph,
    heuristic: H
}

impl <'a> SequentialSolver<'a, Euclidean> {
    /// This creates a solver that uses the stock Euclidean heuristic.
    pub fn new(graph: &'a Graph) -> Self {
        Self::customized(graph, Euclidean)
    }
}
impl <'a, H> SequentialSolver<'a, H>
    where H: Heuristic
{
    /// This constructor lets you provide the heuristic yourself.
    pub fn customized(graph: &'a Graph, heuristic: H) -> Self {
        SequentialSolver { graph, heuristic }
    }

    /// Walks the predecessor table back from `dest` to `source` and returns
    /// the path in source-to-destination order.
    fn reconstruct(&self, source: NodeId, dest: NodeId, came_from: &[NodeId])
        -> Result<Vec<NodeId>, SearchError> {
        let mut path    = vec![];
        let mut current = dest;
        loop {
            path.insert(0, current);
            if current == source {
                return Ok(path);
            }
            current = came_from[current];
            if current == INVALID_NODE_ID {
                // dest was popped, so a predecessor chain must exist
                return Err(SearchError::Inconsistent);
            }
        }
    }
}

impl <'a, H> Solver for SequentialSolver<'a, H>
    where H: Heuristic
{
    fn shortest_path(&mut self, source: NodeId, dest: NodeId) -> Result<SearchOutcome, SearchError> {
        let nb_nodes = self.graph.nb_nodes();
        assert!(source < nb_nodes && dest < nb_nodes, "endpoints out of range");

        let start            = Instant::now();
        let mut frontier     = BinaryHeapFrontier::new();
        let mut closed       = vec![false; nb_nodes];
        let mut cost_to_come = vec![std::f64::INFINITY; nb_nodes];
        let mut came_from    = vec![INVALID_NODE_ID; nb_nodes];
        let mut nb_expanded  = 0;

        cost_to_come[source] = 0.0;
        frontier.push(FrontierEntry { node: source, f_cost: 0.0 });

        while let Some(entry) = frontier.pop() {
            let node = entry.node;
            if node == dest {
                let searched = Instant::now();
                let path     = self.reconstruct(source, dest, &came_from)?;
                return Ok(SearchOutcome {
                    cost: cost_to_come[dest],
                    path,
                    nb_expanded,
                    search_time        : searched - start,
                    reconstruction_time: searched.elapsed()
                });
            }
            if closed[node] {
                continue;
            }
            closed[node] = true;
            nb_expanded += 1;

            let ctc = cost_to_come[node];
            for &(neighbor, weight) in self.graph.neighbors(node) {
                if closed[neighbor] {
                    continue;
                }
                let g_cost = ctc + weight;
                if g_cost < cost_to_come[neighbor] {
                    cost_to_come[neighbor] = g_cost;
                    came_from[neighbor]    = node;
                    let f_cost = g_cost + self.heuristic.estimate(self.graph, neighbor, dest);
                    frontier.push(FrontierEntry { node: neighbor, f_cost });
                }
            }
        }

        Err(SearchError::NoPath)
    }

    fn name(&self) -> &'static str {
        "A* Sequential"
    }

    fn nb_workers(&self) -> usize {
        1
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

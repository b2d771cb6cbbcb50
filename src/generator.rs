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

//! This module provides the random test graph generator: `nb_nodes` distinct
//! vertices are drawn on the integer lattice of an `grid_size x grid_size`
//! square, and each vertex is connected to its `k` nearest neighbours by an
//! edge whose weight is the Euclidean distance between the endpoints.
//!
//! Because edge weights equal the embedded distance, the straight line
//! heuristic is admissible on every generated instance, which is what makes
//! these graphs suitable for comparing the parallel engines against the
//! sequential oracle.
//!
//! # Note:
//! Nothing guarantees the generated graph is connected: searches between two
//! components legitimately end with a no-path outcome.

use std::collections::BTreeSet;
use std::fmt;

use crate::common::NodeId;
use crate::graph::{Graph, Position};

/// What can go wrong when requesting a generated instance.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GeneratorError {
    /// More vertices requested than there are lattice points in the grid.
    GridTooSmall,
    /// `k` must be smaller than the vertex count.
    TooManyNeighbors
}
impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorError::GridTooSmall =>
                write!(f, "nb_nodes must be at most (grid_size - 1)^2"),
            GeneratorError::TooManyNeighbors =>
                write!(f, "k must be less than nb_nodes")
        }
    }
}

/// Generates a k-nearest graph with `nb_nodes` vertices drawn (reproducibly,
/// from `seed`) on the lattice points of a `grid_size x grid_size` grid with
/// coordinates in `[1, grid_size - 1]`.
pub fn k_nearest_graph(grid_size: u64, nb_nodes: usize, k: usize, seed: u64)
    -> Result<Graph, GeneratorError> {
    if grid_size < 2 || nb_nodes as u64 > (grid_size - 1) * (grid_size - 1) {
        return Err(GeneratorError::GridTooSmall);
    }
    if k >= nb_nodes {
        return Err(GeneratorError::TooManyNeighbors);
    }

    // draw nb_nodes distinct lattice points; the ordered set makes the
    // vertex numbering independent of the draw order
    let mut rng    = XorShift64::new(seed);
    let mut points = BTreeSet::new();
    while points.len() < nb_nodes {
        let x = 1 + rng.next() % (grid_size - 1);
        let y = 1 + rng.next() % (grid_size - 1);
        points.insert((x, y));
    }

    let positions = points.iter()
        .map(|&(x, y)| Position { x: x as f64, y: y as f64 })
        .collect::<Vec<Position>>();
    let mut graph = Graph::with_positions(positions);

    for i in 0..nb_nodes {
        let mut by_distance = (0..nb_nodes)
            .filter(|j| *j != i)
            .map(|j| (graph.position(i).distance_to(graph.position(j)), j))
            .collect::<Vec<(f64, NodeId)>>();
        by_distance.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for &(distance, j) in by_distance.iter().take(k) {
            graph.add_edge(i, j, distance);
        }
    }

    Ok(graph)
}

// ----------------------------------------------------------------------------
// --- RANDOM NUMBERS ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// A tiny xorshift generator. The generator only exists to make instances
/// reproducible from a single seed; it has no cryptographic ambition.
struct XorShift64 {
    state: u64
}
impl XorShift64 {
    fn new(seed: u64) -> Self {
        // the all-zero state is the one fixed point of xorshift
        XorShift64 { state: seed.max(1) }
    }
    fn next(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

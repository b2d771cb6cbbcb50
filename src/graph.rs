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

//! This module provides the definition of the weighted undirected graphs the
//! engines search, together with their ASCII serialisation and the derivation
//! of reproducible (source, destination) pairs from a seed.
//!
//! The file format is the one emitted by the test graph generator:
//! the first line holds the vertex count `N`; the `N` following lines hold
//! the `x y` position of each vertex (vertex id = line index - 1); every
//! remaining line holds one `u v w` edge until the end of the file. Edges
//! are undirected, and nothing prevents the same pair of vertices from
//! appearing on several lines.

use std::fmt;
use std::fs::File;
use std::io;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::debug;

use crate::common::NodeId;

// ----------------------------------------------------------------------------
// --- POSITION ---------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The position of a vertex in the plane. Positions only ever serve one
/// purpose: measuring the straight line distance between two vertices, which
/// is what the search uses as its heuristic estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64
}
impl Position {
    /// Returns the Euclidean (norm 2) distance between the two positions.
    pub fn distance_to(self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ----------------------------------------------------------------------------
// --- GRAPH ------------------------------------------------------------------
// ----------------------------------------------------------------------------
/// A weighted undirected graph embedded in the plane. The graph is built once
/// (parsed or generated) and provided read-only to the engines.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    /// The position of each vertex; its length is the vertex count.
    positions: Vec<Position>,
    /// The adjacency lists. Because the graph is undirected, an edge (u, v)
    /// appears both as `(v, w)` in `adjacency[u]` and `(u, w)` in
    /// `adjacency[v]`.
    adjacency: Vec<Vec<(NodeId, f64)>>
}

impl Graph {
    /// Creates a graph holding the given vertices and no edge yet.
    pub fn with_positions(positions: Vec<Position>) -> Graph {
        let nb_nodes = positions.len();
        Graph {
            positions,
            adjacency: vec![vec![]; nb_nodes]
        }
    }

    /// Returns the number of vertices of the graph.
    pub fn nb_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Returns the position of the given vertex.
    pub fn position(&self, node: NodeId) -> Position {
        self.positions[node]
    }

    /// Adds an undirected edge of weight `w` between `a` and `b`. Nothing
    /// forbids parallel edges: the relaxation step of the search simply never
    /// benefits from the redundant copies.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId, w: f64) {
        self.adjacency[a].push((b, w));
        if a != b {
            self.adjacency[b].push((a, w));
        }
    }

    /// Returns the neighbours of the given vertex, each paired with the
    /// weight of the connecting edge.
    pub fn neighbors(&self, node: NodeId) -> &[(NodeId, f64)] {
        &self.adjacency[node]
    }

    /// Returns the weight of an edge between `a` and `b` if one exists.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        self.adjacency[a].iter()
            .find(|(node, _)| *node == b)
            .map(|(_, w)| *w)
    }

    /// Returns the total weight of the given path, or `None` when two
    /// consecutive nodes of the sequence are not connected by an edge.
    /// The empty and single-node paths both cost zero.
    pub fn path_cost(&self, path: &[NodeId]) -> Option<f64> {
        let mut cost = 0.0;
        for pair in path.windows(2) {
            cost += self.edge_weight(pair[0], pair[1])?;
        }
        Some(cost)
    }

    /// Parses a graph from the given file.
    pub fn from_file<P: AsRef<Path>>(fname: P) -> Result<Graph, GraphError> {
        let file = File::open(fname)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses a graph from any buffered reader. Blank lines are skipped, all
    /// other lines must follow the format described in the module
    /// documentation.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Graph, GraphError> {
        let mut lines = reader.lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| match line {
                Ok(text) => !text.trim().is_empty(),
                Err(_)   => true
            });

        let (lineno, first) = lines.next()
            .ok_or_else(|| GraphError::malformed(1, "the file is empty"))?;
        let nb_nodes = first?.trim().parse::<usize>()
            .map_err(|_| GraphError::malformed(lineno, "the vertex count is not an integer"))?;

        let mut positions = Vec::with_capacity(nb_nodes);
        for _ in 0..nb_nodes {
            let (lineno, line) = lines.next()
                .ok_or_else(|| GraphError::malformed(lineno, "fewer vertex lines than announced"))?;
            let line   = line?;
            let mut it = line.split_whitespace();
            let x = Self::parse_field(&mut it, lineno, "x")?;
            let y = Self::parse_field(&mut it, lineno, "y")?;
            positions.push(Position { x, y });
        }

        let mut graph = Graph::with_positions(positions);
        for (lineno, line) in lines {
            let line   = line?;
            let mut it = line.split_whitespace();
            let u = Self::parse_index(&mut it, lineno, "u")?;
            let v = Self::parse_index(&mut it, lineno, "v")?;
            let w = Self::parse_field(&mut it, lineno, "w")?;
            if u >= nb_nodes || v >= nb_nodes {
                return Err(GraphError::malformed(lineno, "edge endpoint out of range"));
            }
            graph.add_edge(u, v, w);
        }

        debug!("parsed graph: {} vertices", graph.nb_nodes());
        Ok(graph)
    }

    fn parse_field(it: &mut dyn Iterator<Item = &str>, lineno: usize, what: &str) -> Result<f64, GraphError> {
        it.next()
            .ok_or_else(|| GraphError::malformed(lineno, &format!("missing field '{}'", what)))?
            .parse::<f64>()
            .map_err(|_| GraphError::malformed(lineno, &format!("field '{}' is not a number", what)))
    }

    fn parse_index(it: &mut dyn Iterator<Item = &str>, lineno: usize, what: &str) -> Result<usize, GraphError> {
        it.next()
            .ok_or_else(|| GraphError::malformed(lineno, &format!("missing field '{}'", what)))?
            .parse::<usize>()
            .map_err(|_| GraphError::malformed(lineno, &format!("field '{}' is not a node id", what)))
    }

    /// Writes the graph in the ASCII format `from_reader` understands. Each
    /// undirected edge is written once.
    pub fn write_into<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{}", self.nb_nodes())?;
        for position in self.positions.iter() {
            writeln!(out, "{} {}", position.x, position.y)?;
        }
        for (u, neighbors) in self.adjacency.iter().enumerate() {
            for &(v, w) in neighbors.iter() {
                // every edge sits in both endpoint lists: emit it from the
                // lower endpoint only (self loops belong to one list)
                if u <= v {
                    writeln!(out, "{} {} {}", u, v, w)?;
                }
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// --- GRAPH ERROR ------------------------------------------------------------
// ----------------------------------------------------------------------------
/// What can go wrong while reading a graph file.
#[derive(Debug)]
pub enum GraphError {
    /// The file could not be read at all.
    Io(io::Error),
    /// The file could be read but its content does not follow the format.
    Malformed {
        line   : usize,
        details: String
    }
}
impl GraphError {
    fn malformed(line: usize, details: &str) -> GraphError {
        GraphError::Malformed { line, details: details.to_string() }
    }
}
impl From<io::Error> for GraphError {
    fn from(error: io::Error) -> Self {
        GraphError::Io(error)
    }
}
impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Io(e) =>
                write!(f, "cannot read the graph file: {}", e),
            GraphError::Malformed { line, details } =>
                write!(f, "malformed graph file (line {}): {}", line, details)
        }
    }
}

// ----------------------------------------------------------------------------
// --- ENDPOINT DERIVATION ----------------------------------------------------
// ----------------------------------------------------------------------------
/// Derives a reproducible (source, destination) pair from a seed with a two
/// step linear congruential generator:
/// `r1 = (seed * 22695477 + 1) mod |V|`, `r2 = (r1 * 22695477 + 1) mod |V|`.
///
/// This is what gives the test harness stable endpoint pairs across runs and
/// across implementations.
///
/// # Example
/// ```
/// # use hdastar::graph::derive_endpoints;
/// let (source, dest) = derive_endpoints(42, 500);
/// assert_eq!((35, 196), (source, dest));
/// ```
pub fn derive_endpoints(seed: u64, nb_nodes: usize) -> (NodeId, NodeId) {
    debug_assert!(nb_nodes > 0);
    let modulus = nb_nodes as u64;
    let r1 = seed.wrapping_mul(22_695_477).wrapping_add(1) % modulus;
    let r2 = r1.wrapping_mul(22_695_477).wrapping_add(1) % modulus;
    (r1 as NodeId, r2 as NodeId)
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_graph {
    use std::io::Cursor;

    use crate::graph::{derive_endpoints, Graph, GraphError, Position};

    fn parse(text: &str) -> Result<Graph, GraphError> {
        Graph::from_reader(Cursor::new(text.to_string()))
    }

    #[test]
    fn a_parsed_graph_knows_its_vertices_and_positions() {
        let graph = parse("3\n0 0\n1 0\n0.5 0.87\n0 1 1\n1 2 1\n0 2 1\n").unwrap();
        assert_eq!(3, graph.nb_nodes());
        assert_eq!(Position { x: 0.5, y: 0.87 }, graph.position(2));
    }

    #[test]
    fn edges_are_undirected() {
        let graph = parse("2\n0 0\n3 4\n0 1 5\n").unwrap();
        assert_eq!(Some(5.0), graph.edge_weight(0, 1));
        assert_eq!(Some(5.0), graph.edge_weight(1, 0));
        assert_eq!(&[(1, 5.0)][..], graph.neighbors(0));
        assert_eq!(&[(0, 5.0)][..], graph.neighbors(1));
    }

    #[test]
    fn a_vertex_may_carry_more_edges_than_it_declared() {
        // the generator emits k directed lines per vertex; undirected reading
        // can hence give a vertex more than k incident edges
        let graph = parse("3\n0 0\n1 0\n2 0\n0 1 1\n1 0 1\n1 2 1\n").unwrap();
        assert_eq!(3, graph.neighbors(1).len());
    }

    #[test]
    fn blank_lines_are_skipped() {
        let graph = parse("2\n\n0 0\n1 1\n\n0 1 2\n\n").unwrap();
        assert_eq!(2, graph.nb_nodes());
        assert_eq!(Some(2.0), graph.edge_weight(0, 1));
    }

    #[test]
    fn an_empty_file_is_malformed() {
        assert!(parse("").is_err());
    }

    #[test]
    fn a_non_numeric_vertex_count_is_malformed() {
        assert!(parse("three\n").is_err());
    }

    #[test]
    fn missing_vertex_lines_are_malformed() {
        assert!(parse("3\n0 0\n1 1\n").is_err());
    }

    #[test]
    fn an_out_of_range_edge_is_malformed() {
        assert!(parse("2\n0 0\n1 1\n0 7 1\n").is_err());
    }

    #[test]
    fn path_cost_sums_the_traversed_edge_weights() {
        let graph = parse("3\n0 0\n1 0\n2 0\n0 1 1.5\n1 2 2.5\n").unwrap();
        assert_eq!(Some(4.0), graph.path_cost(&[0, 1, 2]));
        assert_eq!(Some(0.0), graph.path_cost(&[1]));
        assert_eq!(None, graph.path_cost(&[0, 2]));
    }

    #[test]
    fn writing_then_parsing_gives_the_graph_back() {
        let mut graph = Graph::with_positions(vec![
            Position { x: 0.0, y: 0.0 },
            Position { x: 3.0, y: 0.0 },
            Position { x: 3.0, y: 3.0 }
        ]);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 2.25);

        let mut buffer = vec![];
        graph.write_into(&mut buffer).unwrap();
        let reread = Graph::from_reader(Cursor::new(buffer)).unwrap();
        assert_eq!(graph, reread);
    }

    #[test]
    fn endpoints_follow_the_two_step_lcg() {
        assert_eq!((35, 196), derive_endpoints(42, 500));
        // (0 * 22695477 + 1) % n = 1, (1 * 22695477 + 1) % 10 = 8
        assert_eq!((1, 8), derive_endpoints(0, 10));
    }

    #[test]
    fn endpoints_of_a_single_node_graph_coincide() {
        assert_eq!((0, 0), derive_endpoints(42, 1));
    }
}

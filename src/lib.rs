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

//! # HDASTAR
//! HDASTAR computes shortest paths in large weighted undirected graphs
//! embedded in the plane, parallelising the A* algorithm across worker
//! threads with the Hash Distributed A* (HDA*) scheme: every node of the
//! graph is statically assigned to one worker (its owner), each worker runs
//! its own priority ordered expansion loop, and discovered nodes are routed
//! to their owner rather than expanded in place. A shared, monotonically
//! tightening upper bound on the optimal path weight prunes the search, a
//! two phase barrier snapshot detects global quiescence, and the final path
//! is reconstructed from the distributed predecessor tables.
//!
//! Two variants share the same external contract: a *message passing* one
//! where workers own disjoint state and communicate through per worker
//! inboxes, and a *shared memory* one where the cost and predecessor tables
//! are global, sharded by owner under fine grained locking. A trivial
//! sequential A* is included as the oracle the parallel engines are checked
//! against.

pub mod common;
pub mod graph;
pub mod generator;
pub mod stats;

pub mod abstraction;
pub mod implementation;

pub use crate::common::{
    FrontierEntry, Message, NodeId, SearchError, SearchOutcome, INVALID_NODE_ID
};
pub use crate::graph::{derive_endpoints, Graph, GraphError, Position};
pub use crate::generator::k_nearest_graph;
pub use crate::stats::{Report, REPORT_FILE};

pub use crate::abstraction::frontier::Frontier;
pub use crate::abstraction::heuristics::Heuristic;
pub use crate::abstraction::solver::Solver;

pub use crate::implementation::frontier::BinaryHeapFrontier;
pub use crate::implementation::heuristics::{Euclidean, MinFCost};
pub use crate::implementation::inbox::Inbox;
pub use crate::implementation::partition::Partitioner;
pub use crate::implementation::solver::message_passing::MessagePassingSolver;
pub use crate::implementation::solver::sequential::SequentialSolver;
pub use crate::implementation::solver::shared_memory::SharedMemorySolver;

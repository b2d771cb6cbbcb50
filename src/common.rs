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

//! This module defines the most basic data types that are used throughout all
//! the code of our library (both at the abstraction and implementation levels).
//! These are also the types your client code is likely to work with.
//!
//! In particular, this module comprises the definition of the following types:
//! - `NodeId` (+ the associated `INVALID_NODE_ID` sentinel)
//! - `FrontierEntry`
//! - `Message`
//! - `SearchOutcome`
//! - `SearchError`

use std::fmt;
use std::time::Duration;

// ----------------------------------------------------------------------------
// --- NODE ID ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// This type denotes one vertex of the searched graph. Each node is assumed
/// to be identified with an integer ranging from 0 until `graph.nb_nodes()`.
pub type NodeId = usize;

/// The sentinel value standing for "no predecessor". It is the initial value
/// of every entry of the `came_from` tables, and reading it back during path
/// reconstruction means the walk reached a node that was never relaxed.
pub const INVALID_NODE_ID: NodeId = std::usize::MAX;

// ----------------------------------------------------------------------------
// --- FRONTIER ENTRY ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// An entry of some worker's frontier: a node paired with the f-cost (cost to
/// come + heuristic estimate towards the goal) it had when it was enqueued.
///
/// # Note:
/// The same node may be present several times in a frontier, with different
/// f-costs. This is fine: the entry bearing the lowest f-cost pops first and
/// installs the tightest cost; the stale duplicates are filtered out when
/// they pop (their f-cost can no longer beat the best known path).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierEntry {
    /// The node to (maybe) expand.
    pub node  : NodeId,
    /// The priority of this entry: `cost_to_come(node) + h(node, goal)` at
    /// the time the entry was created.
    pub f_cost: f64
}

// ----------------------------------------------------------------------------
// --- MESSAGE ----------------------------------------------------------------
// ----------------------------------------------------------------------------
/// The messages workers of the message passing engine exchange through their
/// inboxes. The first two kinds flow during the search phase, the last two
/// during the distributed path reconstruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    /// A unit of work routed to the owner of `target`: the sender discovered
    /// that `target` can be reached from `parent` for a total cost of
    /// `g_cost`. The owner installs it iff it strictly improves its table.
    Work {
        target: NodeId,
        parent: NodeId,
        f_cost: f64,
        g_cost: f64
    },
    /// Broadcast by a worker that popped the goal: every receiver lowers its
    /// cached copy of the best known path weight to `f_cost` (if tighter).
    TargetReached {
        f_cost: f64
    },
    /// The reconstruction baton: the receiver owns `target` and must prepend
    /// it to the output path, then pass the baton to the owner of the
    /// predecessor of `target`.
    PathReconstruction {
        target: NodeId
    },
    /// Broadcast when the reconstruction is over (the baton reached the
    /// source, or hit a dead end): every worker still waiting exits.
    PathEnd
}

// ----------------------------------------------------------------------------
// --- SEARCH OUTCOME ---------------------------------------------------------
// ----------------------------------------------------------------------------
/// The result of a successful shortest path computation.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// The weight of the optimal path from source to destination.
    pub cost: f64,
    /// The optimal path itself, source first, destination last. A search
    /// where source == destination yields the single-node path `[source]`.
    pub path: Vec<NodeId>,
    /// The total number of nodes the engine expanded (all workers summed).
    pub nb_expanded: usize,
    /// Wall clock time spent in the search phase.
    pub search_time: Duration,
    /// Wall clock time spent reconstructing the path after quiescence.
    pub reconstruction_time: Duration
}

// ----------------------------------------------------------------------------
// --- SEARCH ERROR -----------------------------------------------------------
// ----------------------------------------------------------------------------
/// The reasons why a shortest path computation may fail to produce a path.
/// This is deliberately an explicit sum type rather than a panic channel:
/// both variants are ordinary outcomes the driver must be able to report.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SearchError {
    /// The destination is not reachable from the source.
    NoPath,
    /// The engine state was found self-contradictory: the search declared a
    /// finite best path weight but the predecessor chain hit the
    /// `INVALID_NODE_ID` sentinel before reaching the source.
    Inconsistent
}
impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::NoPath       => write!(f, "no path exists between the given endpoints"),
            SearchError::Inconsistent => write!(f, "internal inconsistency detected during path reconstruction")
        }
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

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

//! This module provides the message passing variant of the hash distributed
//! A* solver. Every worker owns a disjoint slice of the search state (the
//! cost and predecessor entries of the nodes it owns, plus its frontier) and
//! the workers only ever interact through their inboxes: work units are
//! routed to the owner of the node they concern, and the best known path
//! weight is propagated by broadcast.
//!
//! The delicate part is telling "nobody has work right now" apart from
//! "nobody will ever have work again": a worker with an empty frontier may
//! still receive work from a peer that is mid expansion. Termination is
//! therefore detected with a two phase snapshot: every worker enters a first
//! barrier, drains its inbox once more, publishes whether it is idle, enters
//! a second barrier, and only quits when the flags of *all* workers were
//! true in the same round. Between the two barriers nobody expands, so
//! nobody sends, and the snapshot is consistent.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Barrier;
use std::time::Instant;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::abstraction::frontier::Frontier;
use crate::abstraction::heuristics::Heuristic;
use crate::abstraction::solver::Solver;
use crate::common::{FrontierEntry, Message, NodeId, SearchError, SearchOutcome, INVALID_NODE_ID};
use crate::graph::Graph;
use crate::implementation::frontier::BinaryHeapFrontier;
use crate::implementation::heuristics::Euclidean;
use crate::implementation::inbox::Inbox;
use crate::implementation::partition::Partitioner;

/// The state which is shared among the many running workers. Apart from the
/// graph (read only) and the inboxes (the communication fabric), everything
/// in here belongs to the coordination protocol, not to the search proper:
/// the search tables live on each worker's stack.
struct Shared<'a, H> {
    graph      : &'a Graph,
    heuristic  : &'a H,
    partitioner: Partitioner,
    source     : NodeId,
    goal       : NodeId,
    /// When set, the termination detector additionally requires a finite
    /// best path weight before declaring completion.
    assume_path_exists: bool,
    /// One mailbox per worker; any worker may push into any mailbox but each
    /// worker only ever pops its own.
    inboxes : Vec<Inbox>,
    /// The rendezvous used by both phases of the termination snapshot.
    barrier : Barrier,
    /// The per worker idle flags of the snapshot. Written by worker i at
    /// index i between the two barriers, read by everyone after the second
    /// one; the barrier crossing is what makes the relaxed accesses safe.
    finished: Vec<AtomicBool>,
    /// The per worker expansion counters, published once when the search
    /// phase ends.
    expanded: Vec<AtomicUsize>,
    /// The reconstructed path. Only the worker holding the baton appends to
    /// it, so the lock is never contended.
    path    : Mutex<Vec<NodeId>>,
    /// The verdict of a failed reconstruction, if any.
    failure : Mutex<Option<SearchError>>,
    /// The instant the search phase ended, stamped by worker 0 before the
    /// reconstruction starts.
    search_done: Mutex<Option<Instant>>
}

/// This is the structure implementing the message passing HDA* solver.
///
/// # Example Usage
/// ```
/// # use hdastar::graph::{Graph, Position};
/// # use hdastar::abstraction::solver::Solver;
/// # use hdastar::implementation::solver::message_passing::MessagePassingSolver;
/// let mut graph = Graph::with_positions(vec![
///     Position { x: 0.0, y: 0.0 },
///     Position { x: 1.0, y: 0.0 }
/// ]);
/// graph.add_edge(0, 1, 1.0);
///
/// let mut solver  = MessagePassingSolver::new(&graph).with_nb_workers(2);
/// let outcome = solver.shortest_path(0, 1).unwrap();
/// assert_eq!(1.0, outcome.cost);
/// assert_eq!(vec![0, 1], outcome.path);
/// ```
pub struct MessagePassingSolver<'a, H = Euclidean>
    where H: Heuristic + Send + Sync
{
    graph     : &'a Graph,
    heuristic : H,
    nb_workers: usize,
    assume_path_exists: bool
}

impl <'a> MessagePassingSolver<'a, Euclidean> {
    /// This creates a solver with the stock Euclidean heuristic and as many
    /// workers as the number of hardware threads available on the machine.
    pub fn new(graph: &'a Graph) -> Self {
        Self::customized(graph, Euclidean, num_cpus::get(), false)
    }
}

impl <'a, H> MessagePassingSolver<'a, H>
    where H: Heuristic + Send + Sync
{
    /// This constructor lets you specify all the configuration parameters of
    /// the solver.
    pub fn customized(graph: &'a Graph, heuristic: H, nb_workers: usize, assume_path_exists: bool) -> Self {
        debug_assert!(nb_workers > 0);
        MessagePassingSolver { graph, heuristic, nb_workers, assume_path_exists }
    }
    /// Sets the number of workers used by the solver.
    pub fn with_nb_workers(mut self, nb_workers: usize) -> Self {
        debug_assert!(nb_workers > 0);
        self.nb_workers = nb_workers;
        self
    }
    /// Tells the solver that the caller guarantees a path exists. The
    /// termination detector then refuses to declare completion while the
    /// best known path weight is still infinite, which rules out a transient
    /// all-empty state racing a goal announcement still in flight.
    ///
    /// # Warning
    /// With this switch on, a search towards an actually unreachable
    /// destination never terminates. Leave it off unless you can really
    /// assert existence.
    pub fn with_assume_path_exists(mut self, assume_path_exists: bool) -> Self {
        self.assume_path_exists = assume_path_exists;
        self
    }

    /// Enqueues one copy of `message` into the inbox of every worker but the
    /// sender.
    fn broadcast(shared: &Shared<H>, sender: usize, message: Message) {
        for (worker, inbox) in shared.inboxes.iter().enumerate() {
            if worker != sender {
                inbox.push(message);
            }
        }
    }

    /// Moves every pending inbox message into the worker's local state:
    /// work units are installed (cost, predecessor, frontier entry) iff they
    /// strictly improve the local table and still beat the best known path,
    /// and goal announcements tighten the local bound cache.
    fn drain_inbox(shared: &Shared<H>,
                   worker_id: usize,
                   frontier: &mut BinaryHeapFrontier,
                   cost_to_come: &mut [f64],
                   came_from: &mut [NodeId],
                   best_path_weight: &mut f64) {
        while let Some(message) = shared.inboxes[worker_id].try_pop() {
            match message {
                Message::Work { target, parent, f_cost, g_cost } => {
                    if f_cost < *best_path_weight && g_cost < cost_to_come[target] {
                        cost_to_come[target] = g_cost;
                        came_from[target]    = parent;
                        frontier.push(FrontierEntry { node: target, f_cost });
                    }
                }
                Message::TargetReached { f_cost } => {
                    if f_cost < *best_path_weight {
                        *best_path_weight = f_cost;
                    }
                }
                // reconstruction traffic cannot flow while some worker still
                // searches; seeing it here means a protocol bug
                other => {
                    warn!("worker {} ignored {:?} during the search phase", worker_id, other);
                }
            }
        }
    }

    /// The per worker expansion loop, ending when the two phase snapshot
    /// observes global quiescence.
    fn search(shared: &Shared<H>,
              worker_id: usize,
              frontier: &mut BinaryHeapFrontier,
              cost_to_come: &mut [f64],
              came_from: &mut [NodeId]) -> f64 {
        let mut best_path_weight = std::f64::INFINITY;
        let mut nb_expanded      = 0_usize;

        loop {
            Self::drain_inbox(shared, worker_id, frontier, cost_to_come, came_from, &mut best_path_weight);

            // termination condition
            if frontier.is_empty() {
                shared.barrier.wait();
                // catch anything sent before the peers reached the barrier,
                // then publish the idle flag for this round
                Self::drain_inbox(shared, worker_id, frontier, cost_to_come, came_from, &mut best_path_weight);
                let idle = frontier.is_empty()
                    && shared.inboxes[worker_id].is_empty()
                    && (!shared.assume_path_exists || best_path_weight.is_finite());
                shared.finished[worker_id].store(idle, Ordering::Relaxed);
                shared.barrier.wait();

                // check if all workers finished working, otherwise continue
                if shared.finished.iter().all(|flag| flag.load(Ordering::Relaxed)) {
                    break;
                } else {
                    continue;
                }
            }

            let entry = frontier.pop().unwrap();
            if entry.f_cost >= best_path_weight {
                continue;
            }

            // check if we reached the goal: announce and do not expand
            if entry.node == shared.goal {
                best_path_weight = entry.f_cost;
                Self::broadcast(shared, worker_id, Message::TargetReached { f_cost: entry.f_cost });
                continue;
            }

            // iterate over the neighbours, routing each update to its owner
            let ctc = cost_to_come[entry.node];
            nb_expanded += 1;
            for &(neighbor, weight) in shared.graph.neighbors(entry.node) {
                let g_cost = ctc + weight;
                let f_cost = g_cost + shared.heuristic.estimate(shared.graph, neighbor, shared.goal);
                if f_cost >= best_path_weight {
                    continue;
                }
                let owner = shared.partitioner.owner_of(neighbor);
                if owner == worker_id {
                    if g_cost < cost_to_come[neighbor] {
                        cost_to_come[neighbor] = g_cost;
                        came_from[neighbor]    = entry.node;
                        frontier.push(FrontierEntry { node: neighbor, f_cost });
                    }
                } else {
                    shared.inboxes[owner].push(Message::Work {
                        target: neighbor,
                        parent: entry.node,
                        f_cost,
                        g_cost
                    });
                }
            }
        }

        shared.expanded[worker_id].store(nb_expanded, Ordering::Relaxed);
        best_path_weight
    }

    /// The baton protocol run by every worker after quiescence: the owner of
    /// the goal seeds the walk, each message carries the next node to
    /// prepend, and the walk ends when the source is reached (or when a node
    /// without predecessor proves there is nothing to reconstruct).
    fn reconstruct(shared: &Shared<H>,
                   worker_id: usize,
                   came_from: &[NodeId],
                   best_path_weight: f64) {
        if shared.partitioner.owner_of(shared.goal) == worker_id {
            shared.inboxes[worker_id].push(Message::PathReconstruction { target: shared.goal });
        }

        loop {
            match shared.inboxes[worker_id].recv() {
                Message::PathReconstruction { target } => {
                    shared.path.lock().insert(0, target);

                    if target == shared.source {
                        Self::broadcast(shared, worker_id, Message::PathEnd);
                        return;
                    }
                    let prev = came_from[target];
                    if prev == INVALID_NODE_ID {
                        // a finite bound with a broken predecessor chain is a
                        // bug; an infinite one is the ordinary no-path case
                        let verdict = if best_path_weight.is_finite() {
                            SearchError::Inconsistent
                        } else {
                            SearchError::NoPath
                        };
                        *shared.failure.lock() = Some(verdict);
                        Self::broadcast(shared, worker_id, Message::PathEnd);
                        return;
                    }
                    shared.inboxes[shared.partitioner.owner_of(prev)]
                        .push(Message::PathReconstruction { target: prev });
                }
                Message::PathEnd => return,
                other => {
                    warn!("worker {} ignored {:?} during reconstruction", worker_id, other);
                }
            }
        }
    }

    /// The whole lifetime of one worker: search to quiescence, stamp the
    /// phase transition (worker 0), then take part in the reconstruction.
    fn run_worker(shared: &Shared<H>, worker_id: usize) {
        let nb_nodes         = shared.graph.nb_nodes();
        let mut frontier     = BinaryHeapFrontier::new();
        let mut cost_to_come = vec![std::f64::INFINITY; nb_nodes];
        let mut came_from    = vec![INVALID_NODE_ID; nb_nodes];

        let best_path_weight = Self::search(shared, worker_id, &mut frontier, &mut cost_to_come, &mut came_from);

        if worker_id == 0 {
            debug!("search phase over, best path weight {}", best_path_weight);
            *shared.search_done.lock() = Some(Instant::now());
        }

        Self::reconstruct(shared, worker_id, &came_from, best_path_weight);
    }
}

impl <'a, H> Solver for MessagePassingSolver<'a, H>
    where H: Heuristic + Send + Sync
{
    /// Runs the hash distributed search: spawns `nb_workers` scoped threads,
    /// seeds the owner of the source, joins everybody back and interprets
    /// what the workers left in the shared state.
    fn shortest_path(&mut self, source: NodeId, dest: NodeId) -> Result<SearchOutcome, SearchError> {
        let nb_nodes = self.graph.nb_nodes();
        assert!(source < nb_nodes && dest < nb_nodes, "endpoints out of range");

        let nb_workers  = self.nb_workers;
        let partitioner = Partitioner::new(nb_workers);
        let shared      = Shared {
            graph      : self.graph,
            heuristic  : &self.heuristic,
            partitioner,
            source,
            goal       : dest,
            assume_path_exists: self.assume_path_exists,
            inboxes    : (0..nb_workers).map(|_| Inbox::new()).collect(),
            barrier    : Barrier::new(nb_workers),
            finished   : (0..nb_workers).map(|_| AtomicBool::new(false)).collect(),
            expanded   : (0..nb_workers).map(|_| AtomicUsize::new(0)).collect(),
            path       : Mutex::new(vec![]),
            failure    : Mutex::new(None),
            search_done: Mutex::new(None)
        };

        // bootstrap: the owner of the source discovers it at no cost
        shared.inboxes[partitioner.owner_of(source)].push(Message::Work {
            target: source,
            parent: source,
            f_cost: 0.0,
            g_cost: 0.0
        });

        let start = Instant::now();
        crossbeam::thread::scope(|s| {
            for worker_id in 0..nb_workers {
                let shared = &shared;
                s.spawn(move |_| Self::run_worker(shared, worker_id));
            }
        }).expect("worker thread panicked");
        let end = Instant::now();

        let Shared { inboxes: _, path, failure, expanded, search_done, .. } = shared;
        if let Some(error) = failure.into_inner() {
            return Err(error);
        }

        let path = path.into_inner();
        let cost = self.graph.path_cost(&path).ok_or(SearchError::Inconsistent)?;
        let searched = search_done.into_inner().unwrap_or(end);
        Ok(SearchOutcome {
            cost,
            path,
            nb_expanded: expanded.iter().map(|counter| counter.load(Ordering::Relaxed)).sum(),
            search_time        : searched - start,
            reconstruction_time: end - searched
        })
    }

    fn name(&self) -> &'static str {
        "HDA* Message Passing"
    }

    fn nb_workers(&self) -> usize {
        self.nb_workers
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

/// Unlike the rest of the library, the solver modules are not unit tested in
/// depth (the interesting properties are global ones). We basically unit test
/// the configuration capabilities of the solver here and resort to solving
/// instances with a known optimum (see the tests directory) to validate the
/// search itself.
#[cfg(test)]
mod test_message_passing {
    use crate::abstraction::solver::Solver;
    use crate::common::SearchError;
    use crate::graph::{Graph, Position};
    use crate::implementation::solver::message_passing::MessagePassingSolver;

    fn square() -> Graph {
        let mut graph = Graph::with_positions(vec![
            Position { x: 0.0, y: 0.0 },
            Position { x: 3.0, y: 0.0 },
            Position { x: 3.0, y: 3.0 },
            Position { x: 0.0, y: 3.0 }
        ]);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(1, 2, 1.0);
        graph.add_edge(2, 3, 1.0);
        graph.add_edge(0, 3, 10.0);
        graph
    }

    #[test]
    fn by_default_it_uses_all_hw_threads() {
        let graph  = square();
        let solver = MessagePassingSolver::new(&graph);
        assert_eq!(num_cpus::get(), solver.nb_workers());
    }

    #[test]
    fn the_number_of_workers_can_be_customized() {
        let graph  = square();
        let solver = MessagePassingSolver::new(&graph).with_nb_workers(3);
        assert_eq!(3, solver.nb_workers());
    }

    #[test]
    fn by_default_it_does_not_assume_a_path_exists() {
        let graph  = square();
        let solver = MessagePassingSolver::new(&graph);
        assert!(!solver.assume_path_exists);
    }

    #[test]
    fn it_solves_the_square_with_more_workers_than_nodes() {
        let graph       = square();
        let mut solver  = MessagePassingSolver::new(&graph).with_nb_workers(16);
        let outcome = solver.shortest_path(0, 3).unwrap();
        assert_eq!(3.0, outcome.cost);
        assert_eq!(vec![0, 1, 2, 3], outcome.path);
    }

    #[test]
    fn it_solves_the_square_with_a_single_worker() {
        let graph       = square();
        let mut solver  = MessagePassingSolver::new(&graph).with_nb_workers(1);
        let outcome = solver.shortest_path(0, 3).unwrap();
        assert_eq!(3.0, outcome.cost);
        assert_eq!(4, outcome.path.len());
    }

    #[test]
    fn an_unreachable_destination_terminates_with_no_path() {
        let mut graph = Graph::with_positions(vec![
            Position { x: 0.0, y: 0.0 },
            Position { x: 1.0, y: 0.0 },
            Position { x: 5.0, y: 5.0 },
            Position { x: 6.0, y: 5.0 }
        ]);
        graph.add_edge(0, 1, 1.0);
        graph.add_edge(2, 3, 1.0);

        let mut solver = MessagePassingSolver::new(&graph).with_nb_workers(4);
        assert_eq!(Err(SearchError::NoPath), solver.shortest_path(0, 3).map(|_| ()));
    }
}

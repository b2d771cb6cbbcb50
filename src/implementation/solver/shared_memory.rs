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

//! This module provides the shared memory variant of the hash distributed A*
//! solver. Workers still own their frontier, but the cost and predecessor
//! tables are global, sharded by node owner and protected by one mutex per
//! shard; the best known path weight is a single global word under its own
//! mutex. A worker that discovers a remote node takes the owner's table
//! shard lock to install the improvement, then the owner's frontier lock to
//! enqueue the entry.
//!
//! Lock order: a worker holds at most one table shard lock and one frontier
//! lock at a time, and always acquires the table shard before the frontier.
//! Termination uses the same two phase barrier snapshot as the message
//! passing variant (there are no inboxes to check here, only frontiers).
//! Reconstruction, on the other hand, is trivial: after the workers joined,
//! a single thread walks the shared predecessor table.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Barrier;
use std::time::Instant;

use log::{debug, error};
use parking_lot::Mutex;

use crate::abstraction::frontier::Frontier;
use crate::abstraction::heuristics::Heuristic;
use crate::abstraction::solver::Solver;
use crate::common::{FrontierEntry, NodeId, SearchError, SearchOutcome, INVALID_NODE_ID};
use crate::graph::Graph;
use crate::implementation::frontier::BinaryHeapFrontier;
use crate::implementation::heuristics::Euclidean;
use crate::implementation::partition::Partitioner;

/// One owner's slice of the global search tables. The entry of node `v`
/// (with `owner(v) = i`) sits in shard `i` at local index `v / W`.
struct TableShard {
    cost_to_come: Vec<f64>,
    came_from   : Vec<NodeId>
}
impl TableShard {
    fn new(nb_entries: usize) -> Self {
        TableShard {
            cost_to_come: vec![std::f64::INFINITY; nb_entries],
            came_from   : vec![INVALID_NODE_ID; nb_entries]
        }
    }
}

/// The state which is shared among the many running workers.
struct Shared<'a, H> {
    graph      : &'a Graph,
    heuristic  : &'a H,
    partitioner: Partitioner,
    goal       : NodeId,
    /// The sharded global tables, one shard (and one lock) per owner.
    tables     : Vec<Mutex<TableShard>>,
    /// The per worker open sets; the owner pops, anybody may push.
    frontiers  : Vec<Mutex<BinaryHeapFrontier>>,
    /// The best known path weight, single global word under its mutex.
    best_path_weight: Mutex<f64>,
    /// The rendezvous used by both phases of the termination snapshot.
    barrier    : Barrier,
    /// The per worker idle flags of the snapshot; written between the two
    /// barriers, read after the second one.
    finished   : Vec<AtomicBool>,
    /// The per worker expansion counters, published once per worker.
    expanded   : Vec<AtomicUsize>
}

/// This is the structure implementing the shared memory HDA* solver.
///
/// # Example Usage
/// ```
/// # use hdastar::graph::{Graph, Position};
/// # use hdastar::abstraction::solver::Solver;
/// # use hdastar::implementation::solver::shared_memory::SharedMemorySolver;
/// let mut graph = Graph::with_positions(vec![
///     Position { x: 0.0, y: 0.0 },
///     Position { x: 1.0, y: 0.0 }
/// ]);
/// graph.add_edge(0, 1, 1.0);
///
/// let mut solver  = SharedMemorySolver::new(&graph).with_nb_workers(2);
/// let outcome = solver.shortest_path(0, 1).unwrap();
/// assert_eq!(1.0, outcome.cost);
/// assert_eq!(vec![0, 1], outcome.path);
/// ```
pub struct SharedMemorySolver<'a, H = Euclidean>
    where H: Heuristic + Send + Sync
{
    graph     : &'a Graph,
    heuristic : H,
    nb_workers: usize
}

impl <'a> SharedMemorySolver<'a, Euclidean> {
    /// This creates a solver with the stock Euclidean heuristic and as many
    /// workers as the number of hardware threads available on the machine.
    pub fn new(graph: &'a Graph) -> Self {
        Self::customized(graph, Euclidean, num_cpus::get())
    }
}

impl <'a, H> SharedMemorySolver<'a, H>
    where H: Heuristic + Send + Sync
{
    /// This constructor lets you specify all the configuration parameters of
    /// the solver.
    pub fn customized(graph: &'a Graph, heuristic: H, nb_workers: usize) -> Self {
        debug_assert!(nb_workers > 0);
        SharedMemorySolver { graph, heuristic, nb_workers }
    }
    /// Sets the number of workers used by the solver.
    pub fn with_nb_workers(mut self, nb_workers: usize) -> Self {
        debug_assert!(nb_workers > 0);
        self.nb_workers = nb_workers;
        self
    }

    /// Reads the cost to come of a node from the shard of its owner.
    fn cost_of(shared: &Shared<H>, node: NodeId) -> f64 {
        let owner = shared.partitioner.owner_of(node);
        let index = shared.partitioner.local_index(node);
        shared.tables[owner].lock().cost_to_come[index]
    }

    /// The per worker expansion loop, ending when the two phase snapshot
    /// observes every frontier empty at once.
    fn search(shared: &Shared<H>, worker_id: usize) {
        let mut nb_expanded = 0_usize;

        loop {
            let popped = shared.frontiers[worker_id].lock().pop();
            let entry  = match popped {
                Some(entry) => entry,
                None => {
                    // termination condition
                    shared.barrier.wait();
                    let idle = shared.frontiers[worker_id].lock().is_empty();
                    shared.finished[worker_id].store(idle, Ordering::Relaxed);
                    shared.barrier.wait();

                    // check if all workers finished working, otherwise continue
                    if shared.finished.iter().all(|flag| flag.load(Ordering::Relaxed)) {
                        break;
                    } else {
                        continue;
                    }
                }
            };

            if entry.f_cost >= *shared.best_path_weight.lock() {
                continue;
            }

            // tighten the bound if we popped the goal; no expansion
            if entry.node == shared.goal {
                let mut best = shared.best_path_weight.lock();
                if entry.f_cost < *best {
                    *best = entry.f_cost;
                }
                continue;
            }

            let ctc = Self::cost_of(shared, entry.node);
            nb_expanded += 1;
            for &(neighbor, weight) in shared.graph.neighbors(entry.node) {
                let g_cost = ctc + weight;
                let f_cost = g_cost + shared.heuristic.estimate(shared.graph, neighbor, shared.goal);
                if f_cost >= *shared.best_path_weight.lock() {
                    continue;
                }

                let owner = shared.partitioner.owner_of(neighbor);
                let index = shared.partitioner.local_index(neighbor);
                // table shard first, frontier second, never both at once
                let improved = {
                    let mut shard = shared.tables[owner].lock();
                    if g_cost < shard.cost_to_come[index] {
                        shard.cost_to_come[index] = g_cost;
                        shard.came_from[index]    = entry.node;
                        true
                    } else {
                        false
                    }
                };
                if improved {
                    shared.frontiers[owner].lock().push(FrontierEntry { node: neighbor, f_cost });
                }
            }
        }

        shared.expanded[worker_id].store(nb_expanded, Ordering::Relaxed);
    }

    /// Walks the shared predecessor table back from the goal, single
    /// threaded, once every worker has joined.
    fn reconstruct(shared: &Shared<H>, source: NodeId) -> Result<Vec<NodeId>, SearchError> {
        let best_path_weight = *shared.best_path_weight.lock();
        let mut path    = vec![];
        let mut current = shared.goal;
        loop {
            path.insert(0, current);
            if current == source {
                return Ok(path);
            }
            if path.len() > shared.graph.nb_nodes() {
                // a predecessor chain longer than the node count is a cycle
                error!("reconstruction walked {} nodes without reaching the source", path.len());
                return Err(SearchError::Inconsistent);
            }

            let owner = shared.partitioner.owner_of(current);
            let index = shared.partitioner.local_index(current);
            let prev  = shared.tables[owner].lock().came_from[index];
            if prev == INVALID_NODE_ID {
                return if best_path_weight.is_finite() {
                    error!("dead end at node {} despite a finite bound", current);
                    Err(SearchError::Inconsistent)
                } else {
                    Err(SearchError::NoPath)
                };
            }
            current = prev;
        }
    }
}

impl <'a, H> Solver for SharedMemorySolver<'a, H>
    where H: Heuristic + Send + Sync
{
    /// Runs the hash distributed search over the shared tables: spawns
    /// `nb_workers` scoped threads, joins them on quiescence, then walks the
    /// predecessor table on the calling thread.
    fn shortest_path(&mut self, source: NodeId, dest: NodeId) -> Result<SearchOutcome, SearchError> {
        let nb_nodes = self.graph.nb_nodes();
        assert!(source < nb_nodes && dest < nb_nodes, "endpoints out of range");

        let nb_workers  = self.nb_workers;
        let partitioner = Partitioner::new(nb_workers);
        let shared      = Shared {
            graph      : self.graph,
            heuristic  : &self.heuristic,
            partitioner,
            goal       : dest,
            tables     : (0..nb_workers)
                .map(|worker| Mutex::new(TableShard::new(partitioner.nb_owned(nb_nodes, worker))))
                .collect(),
            frontiers  : (0..nb_workers)
                .map(|_| Mutex::new(BinaryHeapFrontier::new()))
                .collect(),
            best_path_weight: Mutex::new(std::f64::INFINITY),
            barrier    : Barrier::new(nb_workers),
            finished   : (0..nb_workers).map(|_| AtomicBool::new(false)).collect(),
            expanded   : (0..nb_workers).map(|_| AtomicUsize::new(0)).collect()
        };

        // bootstrap: the source costs nothing to reach
        {
            let owner = partitioner.owner_of(source);
            let index = partitioner.local_index(source);
            shared.tables[owner].lock().cost_to_come[index] = 0.0;
            shared.frontiers[owner].lock().push(FrontierEntry { node: source, f_cost: 0.0 });
        }

        let start = Instant::now();
        crossbeam::thread::scope(|s| {
            for worker_id in 0..nb_workers {
                let shared = &shared;
                s.spawn(move |_| Self::search(shared, worker_id));
            }
        }).expect("worker thread panicked");
        let searched = Instant::now();
        debug!("search phase over, best path weight {}", *shared.best_path_weight.lock());

        let path = Self::reconstruct(&shared, source)?;
        let cost = self.graph.path_cost(&path).ok_or(SearchError::Inconsistent)?;
        Ok(SearchOutcome {
            cost,
            path,
            nb_expanded: shared.expanded.iter().map(|counter| counter.load(Ordering::Relaxed)).sum(),
            search_time        : searched - start,
            reconstruction_time: searched.elapsed()
        })
    }

    fn name(&self) -> &'static str {
        "HDA* Shared Memory"
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
mod test_shared_memory {
    use crate::abstraction::solver::Solver;
    use crate::common::SearchError;
    use crate::graph::{Graph, Position};
    use crate::implementation::solver::shared_memory::SharedMemorySolver;

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
        let solver = SharedMemorySolver::new(&graph);
        assert_eq!(num_cpus::get(), solver.nb_workers());
    }

    #[test]
    fn the_number_of_workers_can_be_customized() {
        let graph  = square();
        let solver = SharedMemorySolver::new(&graph).with_nb_workers(5);
        assert_eq!(5, solver.nb_workers());
    }

    #[test]
    fn it_solves_the_square_with_more_workers_than_nodes() {
        let graph       = square();
        let mut solver  = SharedMemorySolver::new(&graph).with_nb_workers(16);
        let outcome = solver.shortest_path(0, 3).unwrap();
        assert_eq!(3.0, outcome.cost);
        assert_eq!(vec![0, 1, 2, 3], outcome.path);
    }

    #[test]
    fn it_solves_the_square_with_a_single_worker() {
        let graph       = square();
        let mut solver  = SharedMemorySolver::new(&graph).with_nb_workers(1);
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

        let mut solver = SharedMemorySolver::new(&graph).with_nb_workers(4);
        assert_eq!(Err(SearchError::NoPath), solver.shortest_path(0, 3).map(|_| ()));
    }

    #[test]
    fn searching_from_a_node_to_itself_costs_nothing() {
        let graph       = square();
        let mut solver  = SharedMemorySolver::new(&graph).with_nb_workers(2);
        let outcome = solver.shortest_path(2, 2).unwrap();
        assert_eq!(0.0, outcome.cost);
        assert_eq!(vec![2], outcome.path);
    }
}

#![cfg(test)]
extern crate hdastar;

use hdastar::abstraction::solver::Solver;
use hdastar::common::SearchError;
use hdastar::generator::k_nearest_graph;
use hdastar::graph::{derive_endpoints, Graph, Position};
use hdastar::implementation::solver::message_passing::MessagePassingSolver;
use hdastar::implementation::solver::sequential::SequentialSolver;
use hdastar::implementation::solver::shared_memory::SharedMemorySolver;

/// Verifies costs up to the usual floating point tolerance.
fn assert_close(expected: f64, actual: f64) {
    let tolerance = 1e-9 * expected.abs().max(1.0);
    assert!((expected - actual).abs() <= tolerance,
            "expected a cost of {} but got {}", expected, actual);
}

/// The summary of a run the properties compare: the cost, or the error.
fn summary(result: Result<hdastar::common::SearchOutcome, SearchError>) -> Result<f64, SearchError> {
    result.map(|outcome| outcome.cost)
}

// whatever the number of workers, the reported cost is the oracle's
#[test]
fn the_cost_is_invariant_in_the_number_of_workers() {
    let graph = k_nearest_graph(50, 200, 4, 7).unwrap();
    let (source, dest) = derive_endpoints(7, graph.nb_nodes());
    let oracle = summary(SequentialSolver::new(&graph).shortest_path(source, dest));

    for nb_workers in &[1, 2, 4, 8, 16] {
        let mp = summary(MessagePassingSolver::new(&graph)
            .with_nb_workers(*nb_workers)
            .shortest_path(source, dest));
        let sm = summary(SharedMemorySolver::new(&graph)
            .with_nb_workers(*nb_workers)
            .shortest_path(source, dest));

        match &oracle {
            Ok(expected) => {
                assert_close(*expected, mp.unwrap());
                assert_close(*expected, sm.unwrap());
            }
            Err(expected) => {
                assert_eq!(Err(*expected), mp);
                assert_eq!(Err(*expected), sm);
            }
        }
    }
}

// two independent runs on the same instance agree on cost and path length
#[test]
fn independent_runs_agree_on_cost_and_path_length() {
    let graph = k_nearest_graph(80, 300, 5, 123).unwrap();
    let (source, dest) = derive_endpoints(123, graph.nb_nodes());

    for _ in 0..2 {
        let first  = MessagePassingSolver::new(&graph).with_nb_workers(8).shortest_path(source, dest);
        let second = MessagePassingSolver::new(&graph).with_nb_workers(8).shortest_path(source, dest);
        match (first, second) {
            (Ok(a), Ok(b)) => {
                assert_close(a.cost, b.cost);
                assert_eq!(a.path.len(), b.path.len());
            }
            (Err(a), Err(b)) => assert_eq!(a, b),
            (a, b) => panic!("one run found a path, the other did not: {:?} vs {:?}",
                             a.map(|o| o.cost), b.map(|o| o.cost))
        }
    }
}

// a whole campaign of seeds: the engines never disagree with the oracle
#[test]
fn no_seed_makes_the_engines_disagree_with_the_oracle() {
    let graph = k_nearest_graph(60, 250, 4, 99).unwrap();
    for seed in 0..10_u64 {
        let (source, dest) = derive_endpoints(seed, graph.nb_nodes());
        let oracle = summary(SequentialSolver::new(&graph).shortest_path(source, dest));
        let mp = summary(MessagePassingSolver::new(&graph).with_nb_workers(4).shortest_path(source, dest));
        let sm = summary(SharedMemorySolver::new(&graph).with_nb_workers(4).shortest_path(source, dest));

        match &oracle {
            Ok(expected) => {
                assert_close(*expected, mp.expect("message passing found no path"));
                assert_close(*expected, sm.expect("shared memory found no path"));
            }
            Err(expected) => {
                assert_eq!(Err(*expected), mp, "seed {}", seed);
                assert_eq!(Err(*expected), sm, "seed {}", seed);
            }
        }
    }
}

// asserting path existence on a connected instance changes nothing to the answer
#[test]
fn assuming_path_existence_returns_the_same_answer_when_a_path_exists() {
    let mut graph = Graph::with_positions(
        (0..10).map(|i| Position { x: i as f64, y: 0.0 }).collect()
    );
    for i in 1..10 {
        graph.add_edge(i - 1, i, 1.5);
    }

    let plain   = MessagePassingSolver::new(&graph)
        .with_nb_workers(4)
        .shortest_path(0, 9)
        .unwrap();
    let assumed = MessagePassingSolver::new(&graph)
        .with_nb_workers(4)
        .with_assume_path_exists(true)
        .shortest_path(0, 9)
        .unwrap();

    assert_close(plain.cost, assumed.cost);
    assert_eq!(plain.path, assumed.path);
}

// the announced number of expanded nodes is at least the path length on a
// line (every intermediate node must have been expanded by someone)
#[test]
fn a_line_requires_expanding_every_node_but_the_last() {
    let mut graph = Graph::with_positions(
        (0..6).map(|i| Position { x: i as f64, y: 0.0 }).collect()
    );
    for i in 1..6 {
        graph.add_edge(i - 1, i, 1.0);
    }

    let outcome = SharedMemorySolver::new(&graph)
        .with_nb_workers(2)
        .shortest_path(0, 5)
        .unwrap();
    assert!(outcome.nb_expanded >= 5);
}

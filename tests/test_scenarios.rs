#![cfg(test)]
extern crate hdastar;

use std::path::PathBuf;

use hdastar::abstraction::solver::Solver;
use hdastar::common::{SearchError, SearchOutcome};
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

/// Checks that an outcome is a well formed path between the two endpoints
/// and that its edges really sum up to the announced cost.
fn assert_valid(graph: &Graph, source: usize, dest: usize, outcome: &SearchOutcome) {
    assert_eq!(Some(&source), outcome.path.first());
    assert_eq!(Some(&dest), outcome.path.last());
    let replayed = graph.path_cost(&outcome.path)
        .expect("two consecutive path nodes are not connected");
    assert_close(outcome.cost, replayed);
}

/// Solves the same instance with the oracle and both parallel engines and
/// checks they all agree on the expected optimum.
fn check_all_engines(graph: &Graph, source: usize, dest: usize, cost: f64, steps: usize) {
    let mut engines: Vec<Box<dyn Solver + '_>> = vec![
        Box::new(SequentialSolver::new(graph)),
        Box::new(MessagePassingSolver::new(graph).with_nb_workers(4)),
        Box::new(SharedMemorySolver::new(graph).with_nb_workers(4))
    ];
    for engine in engines.iter_mut() {
        let outcome = engine.shortest_path(source, dest)
            .unwrap_or_else(|e| panic!("{} failed: {}", engine.name(), e));
        assert_close(cost, outcome.cost);
        assert_eq!(steps, outcome.path.len(), "{} path length", engine.name());
        assert_valid(graph, source, dest, &outcome);
    }
}

/// Checks that every engine reports the absence of a path.
fn check_no_path(graph: &Graph, source: usize, dest: usize) {
    let mut engines: Vec<Box<dyn Solver + '_>> = vec![
        Box::new(SequentialSolver::new(graph)),
        Box::new(MessagePassingSolver::new(graph).with_nb_workers(4)),
        Box::new(SharedMemorySolver::new(graph).with_nb_workers(4))
    ];
    for engine in engines.iter_mut() {
        assert_eq!(Err(SearchError::NoPath),
                   engine.shortest_path(source, dest).map(|_| ()),
                   "{}", engine.name());
    }
}

#[test]
fn square_with_an_expensive_shortcut() {
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

    check_all_engines(&graph, 0, 3, 3.0, 4);
}

#[test]
fn triangle_with_a_direct_edge() {
    let mut graph = Graph::with_positions(vec![
        Position { x: 0.0, y: 0.0 },
        Position { x: 1.0, y: 0.0 },
        Position { x: 0.5, y: 0.87 }
    ]);
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(1, 2, 1.0);
    graph.add_edge(0, 2, 1.0);

    check_all_engines(&graph, 0, 2, 1.0, 2);
}

#[test]
fn line_of_five_nodes() {
    let mut graph = Graph::with_positions(
        (0..5).map(|i| Position { x: i as f64, y: 0.0 }).collect()
    );
    for i in 1..5 {
        graph.add_edge(i - 1, i, 2.0);
    }

    check_all_engines(&graph, 0, 4, 8.0, 5);
}

#[test]
fn disconnected_components_yield_no_path() {
    let mut graph = Graph::with_positions(vec![
        Position { x: 0.0, y: 0.0 },
        Position { x: 1.0, y: 0.0 },
        Position { x: 9.0, y: 9.0 },
        Position { x: 8.0, y: 9.0 }
    ]);
    graph.add_edge(0, 1, 1.0);
    graph.add_edge(2, 3, 1.0);

    check_no_path(&graph, 0, 3);
}

#[test]
fn a_single_node_graph_reaches_itself_for_free() {
    let graph = Graph::with_positions(vec![Position { x: 5.0, y: 5.0 }]);
    check_all_engines(&graph, 0, 0, 0.0, 1);
}

#[test]
fn generated_instance_matches_the_sequential_oracle() {
    let graph = k_nearest_graph(100, 500, 5, 42).unwrap();
    let (source, dest) = derive_endpoints(42, graph.nb_nodes());

    let oracle = SequentialSolver::new(&graph).shortest_path(source, dest);
    let mut engines: Vec<Box<dyn Solver + '_>> = vec![
        Box::new(MessagePassingSolver::new(&graph).with_nb_workers(8)),
        Box::new(SharedMemorySolver::new(&graph).with_nb_workers(8))
    ];
    for engine in engines.iter_mut() {
        match (&oracle, engine.shortest_path(source, dest)) {
            (Ok(expected), Ok(actual)) => {
                assert_close(expected.cost, actual.cost);
                assert_eq!(expected.path.len(), actual.path.len(), "{} path length", engine.name());
                assert_valid(&graph, source, dest, &actual);
            }
            (Err(expected), Err(actual)) => assert_eq!(*expected, actual),
            (expected, actual) => panic!(
                "{} disagrees with the oracle: {:?} vs {:?}",
                engine.name(), expected.as_ref().map(|o| o.cost), actual.map(|o| o.cost))
        }
    }
}

#[test]
fn the_square_survives_a_trip_through_its_file_format() {
    let location = PathBuf::new()
        .join(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources/square.txt");
    let graph = Graph::from_file(&location).expect("resource not found");
    assert_eq!(4, graph.nb_nodes());
    check_all_engines(&graph, 0, 3, 3.0, 4);
}

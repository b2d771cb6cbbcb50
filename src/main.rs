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

extern crate hdastar;
extern crate structopt;

use std::process;
use std::str::FromStr;
use std::time::Instant;

use log::{error, info, warn};
use structopt::StructOpt;

use hdastar::abstraction::solver::Solver;
use hdastar::common::SearchError;
use hdastar::graph::{derive_endpoints, Graph};
use hdastar::implementation::solver::message_passing::MessagePassingSolver;
use hdastar::implementation::solver::sequential::SequentialSolver;
use hdastar::implementation::solver::shared_memory::SharedMemorySolver;
use hdastar::stats::{Report, REPORT_FILE};

// exit codes of the driver
const EXIT_BAD_INPUT: i32 = 1;
const EXIT_BAD_ARG  : i32 = 2;
const EXIT_NO_PATH  : i32 = 3;

/// Computes shortest paths on a planar graph with hash distributed A*
#[derive(StructOpt)]
struct Args {
    /// Path to the graph file
    fname: String,
    /// Seed from which the (source, destination) pair is derived
    starting_seed: String,
    /// How many consecutive seeds to run, starting at STARTING_SEED
    n_seeds: Option<String>,
    /// How many times each seed is repeated
    n_reps: Option<String>,
    /// Which engine to run: message-passing, shared-memory or sequential
    #[structopt(short, long, default_value = "message-passing")]
    algorithm: Algorithm,
    /// The number of worker threads of the parallel engines
    #[structopt(short, long, default_value = "16")]
    threads: usize,
    /// Assert that a path exists: the message passing engine then refuses to
    /// declare completion before a finite bound is known (never terminates
    /// when the assertion is wrong)
    #[structopt(long)]
    assume_path_exists: bool
}

#[derive(Debug, Clone, Copy)]
enum Algorithm {
    MessagePassing,
    SharedMemory,
    Sequential
}
impl FromStr for Algorithm {
    type Err = String;
    fn from_str(text: &str) -> Result<Self, String> {
        match text {
            "message-passing" => Ok(Algorithm::MessagePassing),
            "shared-memory"   => Ok(Algorithm::SharedMemory),
            "sequential"      => Ok(Algorithm::Sequential),
            _ => Err(format!("unknown algorithm '{}' (expected message-passing, shared-memory or sequential)", text))
        }
    }
}

fn main() {
    env_logger::Builder::from_env("RUST_LOG").init();
    let args = Args::from_args();
    process::exit(run(args));
}

fn run(args: Args) -> i32 {
    let starting_seed = match parse_number(&args.starting_seed, "STARTING_SEED") {
        Ok(seed) => seed,
        Err(code) => return code
    };
    let n_seeds = match parse_optional(&args.n_seeds, "N_SEEDS") {
        Ok(n)  => n,
        Err(code) => return code
    };
    let n_reps = match parse_optional(&args.n_reps, "N_REPS") {
        Ok(n)  => n,
        Err(code) => return code
    };

    let read_start = Instant::now();
    let graph = match Graph::from_file(&args.fname) {
        Ok(graph) => graph,
        Err(error) => {
            eprintln!("{}", error);
            return EXIT_BAD_INPUT;
        }
    };
    let graph_read_secs = read_start.elapsed().as_secs_f64();
    if graph.nb_nodes() == 0 {
        eprintln!("the graph file declares no vertex");
        return EXIT_BAD_INPUT;
    }
    info!("graph read: {} vertices in {:.3}s", graph.nb_nodes(), graph_read_secs);

    let mut solver: Box<dyn Solver + '_> = match args.algorithm {
        Algorithm::MessagePassing => Box::new(
            MessagePassingSolver::new(&graph)
                .with_nb_workers(args.threads)
                .with_assume_path_exists(args.assume_path_exists)),
        Algorithm::SharedMemory => Box::new(
            SharedMemorySolver::new(&graph)
                .with_nb_workers(args.threads)),
        Algorithm::Sequential => Box::new(
            SequentialSolver::new(&graph))
    };

    // a single (seed, repetition) failure is fatal; in monte carlo mode the
    // failing iterations are skipped and the campaign carries on
    let monte_carlo = n_seeds > 1 || n_reps > 1;
    for seed in starting_seed..starting_seed + n_seeds {
        for _ in 0..n_reps {
            let (source, dest) = derive_endpoints(seed, graph.nb_nodes());
            info!("{} from {} to {} (seed {})", solver.name(), source, dest, seed);

            match solver.shortest_path(source, dest) {
                Ok(outcome) => {
                    println!("Total cost: {}", outcome.cost);
                    println!("Total steps: {}", outcome.path.len());

                    let report = Report {
                        algorithm           : solver.name().to_string(),
                        nb_threads          : solver.nb_workers(),
                        input_file          : args.fname.clone(),
                        seed,
                        total_cost          : outcome.cost,
                        total_steps         : outcome.path.len(),
                        graph_read_secs,
                        search_secs         : outcome.search_time.as_secs_f64(),
                        reconstruction_secs : outcome.reconstruction_time.as_secs_f64(),
                        nodes_visited       : outcome.nb_expanded,
                        path                : outcome.path
                    };
                    if let Err(error) = report.append_to(REPORT_FILE) {
                        warn!("could not append to {}: {}", REPORT_FILE, error);
                    }
                }
                Err(error) => {
                    if error == SearchError::Inconsistent {
                        error!("seed {}: {}", seed, error);
                    }
                    if monte_carlo {
                        warn!("seed {}: {}, skipping the iteration", seed, error);
                    } else {
                        eprintln!("{}", error);
                        return EXIT_NO_PATH;
                    }
                }
            }
        }
    }
    0
}

fn parse_number(text: &str, what: &str) -> Result<u64, i32> {
    text.parse::<u64>().map_err(|_| {
        eprintln!("{} must be a number, got {} instead", what, text);
        EXIT_BAD_ARG
    })
}

fn parse_optional(text: &Option<String>, what: &str) -> Result<u64, i32> {
    match text {
        None       => Ok(1),
        Some(text) => parse_number(text, what)
    }
}

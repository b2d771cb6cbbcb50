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

//! This module provides the statistics collector of the driver: one `Report`
//! per run, appended as a CSV row to `AstarReport.csv` so that consecutive
//! benchmark invocations accumulate in a single file.

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;

use crate::common::NodeId;

/// The name of the file the reports accumulate into.
pub const REPORT_FILE: &str = "AstarReport.csv";

/// Everything the harness wants to know about one completed run. One report
/// becomes one CSV row with the columns: algorithm name, thread count, input
/// filename, seed, total cost, total steps, graph read seconds, search
/// seconds, reconstruction seconds, total nodes visited, and the path itself
/// as `v0-v1-...-vk`.
#[derive(Debug, Clone)]
pub struct Report {
    pub algorithm           : String,
    pub nb_threads          : usize,
    pub input_file          : String,
    pub seed                : u64,
    pub total_cost          : f64,
    pub total_steps         : usize,
    pub graph_read_secs     : f64,
    pub search_secs         : f64,
    pub reconstruction_secs : f64,
    pub nodes_visited       : usize,
    pub path                : Vec<NodeId>
}

impl Report {
    /// Renders the report as one CSV row (no trailing newline).
    pub fn csv_row(&self) -> String {
        let path = self.path.iter()
            .map(|node| node.to_string())
            .collect::<Vec<String>>()
            .join("-");
        format!("{},{},{},{},{},{},{},{},{},{},{}",
                self.algorithm,
                self.nb_threads,
                self.input_file,
                self.seed,
                self.total_cost,
                self.total_steps,
                self.graph_read_secs,
                self.search_secs,
                self.reconstruction_secs,
                self.nodes_visited,
                path)
    }

    /// Appends the report to the given file, creating it if needed.
    pub fn append_to<P: AsRef<Path>>(&self, fname: P) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(fname)?;
        writeln!(file, "{}", self.csv_row())
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

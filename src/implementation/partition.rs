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

//! This module provides the partitioner: the pure function that statically
//! assigns each node of the graph to exactly one worker (its *owner*). The
//! whole point of hash distributing the search is that only the owner of a
//! node ever installs a cost or predecessor for it.

use crate::common::NodeId;

/// The static assignment of nodes to workers: `owner(v) = v mod W`. The
/// modulus is chosen for O(1) routing and an even spread of random node ids;
/// the partition is fixed for the lifetime of a run.
///
/// The partitioner also centralises the layout arithmetic of the sharded
/// tables: the nodes owned by worker `i` are stored contiguously at local
/// indices `v / W`.
///
/// # Example
/// ```
/// # use hdastar::implementation::partition::Partitioner;
/// let partitioner = Partitioner::new(4);
/// assert_eq!(2, partitioner.owner_of(6));
/// assert_eq!(1, partitioner.local_index(6));
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Partitioner {
    nb_workers: usize
}
impl Partitioner {
    /// Creates the partition of the node space across `nb_workers` workers.
    pub fn new(nb_workers: usize) -> Self {
        debug_assert!(nb_workers > 0);
        Partitioner { nb_workers }
    }

    /// The number of workers the node space is spread over.
    pub fn nb_workers(self) -> usize {
        self.nb_workers
    }

    /// The identifier of the single worker owning the given node.
    pub fn owner_of(self, node: NodeId) -> usize {
        node % self.nb_workers
    }

    /// The index of the given node inside the table shard of its owner.
    pub fn local_index(self, node: NodeId) -> usize {
        node / self.nb_workers
    }

    /// The number of nodes (out of `nb_nodes`) owned by the given worker,
    /// which is the size of that worker's table shard.
    pub fn nb_owned(self, nb_nodes: usize, worker: usize) -> usize {
        debug_assert!(worker < self.nb_workers);
        (nb_nodes + self.nb_workers - 1 - worker) / self.nb_workers
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
mod test_partitioner {
    use crate::implementation::partition::Partitioner;

    #[test]
    fn every_node_has_exactly_one_owner() {
        let partitioner = Partitioner::new(3);
        for node in 0..100 {
            assert_eq!(node % 3, partitioner.owner_of(node));
        }
    }

    #[test]
    fn a_single_worker_owns_everything() {
        let partitioner = Partitioner::new(1);
        for node in 0..100 {
            assert_eq!(0, partitioner.owner_of(node));
            assert_eq!(node, partitioner.local_index(node));
        }
    }

    #[test]
    fn local_indices_enumerate_the_owned_nodes_contiguously() {
        let partitioner = Partitioner::new(4);
        // worker 1 owns 1, 5, 9, ... at local indices 0, 1, 2, ...
        assert_eq!(0, partitioner.local_index(1));
        assert_eq!(1, partitioner.local_index(5));
        assert_eq!(2, partitioner.local_index(9));
    }

    #[test]
    fn shard_sizes_sum_to_the_node_count() {
        let partitioner = Partitioner::new(7);
        for nb_nodes in &[0, 1, 6, 7, 8, 50, 100] {
            let total: usize = (0..7).map(|w| partitioner.nb_owned(*nb_nodes, w)).sum();
            assert_eq!(*nb_nodes, total);
        }
    }

    #[test]
    fn every_local_index_fits_its_shard() {
        let partitioner = Partitioner::new(4);
        let nb_nodes    = 10;
        for node in 0..nb_nodes {
            let owner = partitioner.owner_of(node);
            assert!(partitioner.local_index(node) < partitioner.nb_owned(nb_nodes, owner));
        }
    }
}

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

//! This module provides the implementation of the usual frontier.

use binary_heap_plus::BinaryHeap;

use crate::abstraction::frontier::Frontier;
use crate::common::FrontierEntry;
use crate::implementation::heuristics::MinFCost;

/// The simplest frontier implementation you can think of: it basically
/// consists of a binary heap that pushes and pops frontier entries in
/// ascending f-cost order.
///
/// # Note:
/// This is the frontier every engine of the crate uses for its per worker
/// open set. It performs no duplicate elimination whatsoever: pushing the
/// same node twice yields two entries, and the engines discard the stale one
/// when it pops.
pub struct BinaryHeapFrontier {
    heap: BinaryHeap<FrontierEntry, MinFCost>
}
impl BinaryHeapFrontier {
    /// This creates a new, empty frontier.
    pub fn new() -> Self {
        BinaryHeapFrontier {
            heap: BinaryHeap::from_vec_cmp(vec![], MinFCost)
        }
    }
}
impl Default for BinaryHeapFrontier {
    fn default() -> Self {
        Self::new()
    }
}
impl Frontier for BinaryHeapFrontier {
    fn push(&mut self, entry: FrontierEntry) {
        self.heap.push(entry)
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}


// ############################################################################
// #### TESTS #################################################################
// ############################################################################

#[cfg(test)]
#[allow(clippy::many_single_char_names)]
mod test_binary_heap_frontier {
    use crate::abstraction::frontier::Frontier;
    use crate::common::FrontierEntry;
    use crate::implementation::frontier::BinaryHeapFrontier;

    // by default, it is empty
    #[test]
    fn by_default_it_is_empty() {
        assert!(BinaryHeapFrontier::default().is_empty())
    }

    // when the size is zero, then it is empty
    #[test]
    fn when_the_size_is_zero_then_it_is_empty() {
        let frontier = empty_frontier();
        assert_eq!(frontier.len(), 0);
        assert!(frontier.is_empty());
    }

    // when I push an entry onto the frontier then the length increases
    #[test]
    fn when_i_push_an_entry_onto_the_frontier_then_the_length_increases() {
        let mut frontier = empty_frontier();
        frontier.push(FrontierEntry { node: 42, f_cost: 1.0 });
        assert_eq!(frontier.len(), 1);
        frontier.push(FrontierEntry { node: 43, f_cost: 2.0 });
        assert_eq!(frontier.len(), 2);
    }

    // when I pop an entry off the frontier then the length decreases
    #[test]
    fn when_i_pop_an_entry_off_the_frontier_then_the_length_decreases() {
        let mut frontier = non_empty_frontier();
        assert_eq!(frontier.len(), 1);
        frontier.pop();
        assert_eq!(frontier.len(), 0);
    }

    // when I try to pop an entry off an empty frontier, I get none
    #[test]
    fn when_i_try_to_pop_an_entry_off_an_empty_frontier_i_get_none() {
        let mut frontier = empty_frontier();
        assert_eq!(frontier.pop(), None);
    }

    // when I pop an entry, it is always the one with the least f-cost
    #[test]
    fn when_i_pop_an_entry_it_is_always_the_one_with_the_least_f_cost() {
        let a = FrontierEntry { node: 1, f_cost: 42.0 };
        let b = FrontierEntry { node: 2, f_cost:  2.0 };
        let c = FrontierEntry { node: 3, f_cost: 24.0 };
        let d = FrontierEntry { node: 4, f_cost: 13.0 };
        let e = FrontierEntry { node: 5, f_cost: 65.0 };

        let mut frontier = empty_frontier();
        frontier.push(a);
        frontier.push(e);
        frontier.push(b);
        frontier.push(d);
        frontier.push(c);

        assert_eq!(frontier.pop(), Some(b));
        assert_eq!(frontier.pop(), Some(d));
        assert_eq!(frontier.pop(), Some(c));
        assert_eq!(frontier.pop(), Some(a));
        assert_eq!(frontier.pop(), Some(e));
    }

    // duplicate entries for the same node may coexist in the frontier
    #[test]
    fn duplicate_entries_for_the_same_node_may_coexist() {
        let mut frontier = empty_frontier();
        frontier.push(FrontierEntry { node: 7, f_cost: 3.0 });
        frontier.push(FrontierEntry { node: 7, f_cost: 1.0 });
        assert_eq!(frontier.len(), 2);

        assert_eq!(frontier.pop(), Some(FrontierEntry { node: 7, f_cost: 1.0 }));
        assert_eq!(frontier.pop(), Some(FrontierEntry { node: 7, f_cost: 3.0 }));
    }

    fn empty_frontier() -> BinaryHeapFrontier {
        BinaryHeapFrontier::new()
    }
    fn non_empty_frontier() -> BinaryHeapFrontier {
        let mut frontier = BinaryHeapFrontier::new();
        frontier.push(FrontierEntry { node: 42, f_cost: 0.0 });
        frontier
    }
}

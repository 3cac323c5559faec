// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::index::NodeIndex;
use crate::problem::instance::Instance;

/// Default candidate list width used by the candidate-restricted search.
pub const DEFAULT_CANDIDATES: usize = 10;

/// Per-node k-nearest-neighbor lists, precomputed once and read-only during
/// the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLists {
    k: usize,
    lists: Vec<Vec<NodeIndex>>,
}

impl CandidateLists {
    /// Sorts every node's neighbors by distance and keeps the closest `k`.
    pub fn build<T: Copy + Ord>(instance: &Instance<T>, k: usize) -> Self {
        let n = instance.dimension();
        let mut lists = Vec::with_capacity(n);
        let mut scratch: Vec<NodeIndex> = Vec::with_capacity(n.saturating_sub(1));
        for node in 0..n {
            let node = NodeIndex::new(node);
            scratch.clear();
            scratch.extend((0..n).map(NodeIndex::new).filter(|&other| other != node));
            scratch.sort_unstable_by_key(|&other| instance.distance(node, other));
            scratch.truncate(k);
            lists.push(scratch.clone());
        }
        Self { k, lists }
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.lists.len()
    }

    /// The `rank`-th nearest neighbor of `node` (rank 0 is the closest).
    #[inline]
    pub fn candidate(&self, node: NodeIndex, rank: usize) -> Option<NodeIndex> {
        self.lists.get(node.get()).and_then(|l| l.get(rank)).copied()
    }

    #[inline]
    pub fn neighbors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.lists[node.get()]
    }
}

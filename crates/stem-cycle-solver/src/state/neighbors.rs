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

use crate::state::err::NeighborMismatchError;
use stem_cycle_model::prelude::NodeIndex;

const NO_NODE: usize = usize::MAX;

#[inline(always)]
fn decode(raw: usize) -> Option<NodeIndex> {
    if raw == NO_NODE {
        None
    } else {
        Some(NodeIndex::new(raw))
    }
}

#[inline(always)]
fn encode(slot: Option<NodeIndex>) -> usize {
    match slot {
        Some(node) => node.get(),
        None => NO_NODE,
    }
}

/// Arena-style doubly-linked tour structure: two neighbor slots per node,
/// stored as flat index arrays with `usize::MAX` as the no-node stub.
///
/// In a pure tour every node has both slots filled with its two tour
/// neighbors. During a stem-and-cycle pass exactly one node (the stem tip)
/// carries an open slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborStructure {
    left: Vec<usize>,
    right: Vec<usize>,
}

impl NeighborStructure {
    pub fn new(len: usize) -> Self {
        Self {
            left: vec![NO_NODE; len],
            right: vec![NO_NODE; len],
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.left.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Relinks the whole structure from a tour permutation in O(n).
    pub fn reset_from_tour(&mut self, tour: &[NodeIndex]) {
        debug_assert_eq!(tour.len(), self.len());
        let n = tour.len();
        for (i, &node) in tour.iter().enumerate() {
            let prev = tour[(i + n - 1) % n];
            let next = tour[(i + 1) % n];
            self.left[node.get()] = prev.get();
            self.right[node.get()] = next.get();
        }
    }

    #[inline]
    pub fn left(&self, node: NodeIndex) -> Option<NodeIndex> {
        decode(self.left[node.get()])
    }

    #[inline]
    pub fn right(&self, node: NodeIndex) -> Option<NodeIndex> {
        decode(self.right[node.get()])
    }

    #[inline]
    pub fn set_left(&mut self, node: NodeIndex, slot: Option<NodeIndex>) {
        self.left[node.get()] = encode(slot);
    }

    #[inline]
    pub fn set_right(&mut self, node: NodeIndex, slot: Option<NodeIndex>) {
        self.right[node.get()] = encode(slot);
    }

    #[inline]
    fn mismatch(&self, node: NodeIndex, expected: Option<NodeIndex>) -> NeighborMismatchError {
        NeighborMismatchError::new(node, expected, self.left(node), self.right(node))
    }

    /// Given one neighbor of `node`, returns whatever occupies the other
    /// slot (`None` for the open stub). Errors when `known` matches neither
    /// slot.
    #[inline]
    pub fn other_neighbor(
        &self,
        node: NodeIndex,
        known: NodeIndex,
    ) -> Result<Option<NodeIndex>, NeighborMismatchError> {
        let l = self.left[node.get()];
        let r = self.right[node.get()];
        if l == known.get() {
            Ok(decode(r))
        } else if r == known.get() {
            Ok(decode(l))
        } else {
            Err(self.mismatch(node, Some(known)))
        }
    }

    /// Like [`other_neighbor`](Self::other_neighbor) but requires the other
    /// slot to be occupied; used on walks that must never hit the stem tip.
    #[inline]
    pub fn counterpart(
        &self,
        node: NodeIndex,
        known: NodeIndex,
    ) -> Result<NodeIndex, NeighborMismatchError> {
        match self.other_neighbor(node, known)? {
            Some(other) => Ok(other),
            None => Err(self.mismatch(node, Some(known))),
        }
    }

    /// Replaces whichever slot currently holds `old` with `new`. Passing
    /// `old = None` fills the open slot.
    pub fn replace_slot(
        &mut self,
        node: NodeIndex,
        old: Option<NodeIndex>,
        new: Option<NodeIndex>,
    ) -> Result<(), NeighborMismatchError> {
        let raw_old = encode(old);
        let i = node.get();
        if self.left[i] == raw_old {
            self.left[i] = encode(new);
            Ok(())
        } else if self.right[i] == raw_old {
            self.right[i] = encode(new);
            Ok(())
        } else {
            Err(self.mismatch(node, old))
        }
    }

    /// Replaces the slot *opposite* to `known` with `new`.
    pub fn replace_other(
        &mut self,
        node: NodeIndex,
        known: NodeIndex,
        new: Option<NodeIndex>,
    ) -> Result<(), NeighborMismatchError> {
        let i = node.get();
        if self.left[i] == known.get() {
            self.right[i] = encode(new);
            Ok(())
        } else if self.right[i] == known.get() {
            self.left[i] = encode(new);
            Ok(())
        } else {
            Err(self.mismatch(node, Some(known)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    fn ring(n: usize) -> NeighborStructure {
        let mut links = NeighborStructure::new(n);
        let tour: Vec<NodeIndex> = (0..n).map(NodeIndex::new).collect();
        links.reset_from_tour(&tour);
        links
    }

    #[test]
    fn test_reset_from_tour_wires_cyclically() {
        let links = ring(5);
        assert_eq!(links.left(NodeIndex::new(0)), Some(NodeIndex::new(4)));
        assert_eq!(links.right(NodeIndex::new(0)), Some(NodeIndex::new(1)));
        assert_eq!(links.left(NodeIndex::new(3)), Some(NodeIndex::new(2)));
        assert_eq!(links.right(NodeIndex::new(4)), Some(NodeIndex::new(0)));
    }

    #[test]
    fn test_reset_from_shuffled_tour() {
        let mut links = NeighborStructure::new(4);
        links.reset_from_tour(&nodes(&[2, 0, 3, 1]));
        assert_eq!(links.left(NodeIndex::new(2)), Some(NodeIndex::new(1)));
        assert_eq!(links.right(NodeIndex::new(2)), Some(NodeIndex::new(0)));
        assert_eq!(links.right(NodeIndex::new(1)), Some(NodeIndex::new(2)));
    }

    #[test]
    fn test_other_neighbor() {
        let links = ring(5);
        let other = links
            .other_neighbor(NodeIndex::new(2), NodeIndex::new(1))
            .unwrap();
        assert_eq!(other, Some(NodeIndex::new(3)));
    }

    #[test]
    fn test_other_neighbor_rejects_stranger() {
        let links = ring(5);
        let err = links
            .other_neighbor(NodeIndex::new(2), NodeIndex::new(4))
            .unwrap_err();
        assert_eq!(err.node(), NodeIndex::new(2));
        assert_eq!(err.expected(), Some(NodeIndex::new(4)));
    }

    #[test]
    fn test_replace_slot_and_open_stub() {
        let mut links = ring(4);
        // Break the edge 2-3: node 2 gets an open slot.
        links
            .replace_slot(NodeIndex::new(2), Some(NodeIndex::new(3)), None)
            .unwrap();
        assert_eq!(
            links.other_neighbor(NodeIndex::new(2), NodeIndex::new(1)),
            Ok(None)
        );
        assert!(links
            .counterpart(NodeIndex::new(2), NodeIndex::new(1))
            .is_err());
        // Fill the open slot again.
        links
            .replace_slot(NodeIndex::new(2), None, Some(NodeIndex::new(0)))
            .unwrap();
        assert_eq!(
            links.other_neighbor(NodeIndex::new(2), NodeIndex::new(1)),
            Ok(Some(NodeIndex::new(0)))
        );
    }

    #[test]
    fn test_replace_slot_rejects_missing_old() {
        let mut links = ring(4);
        assert!(links
            .replace_slot(NodeIndex::new(0), Some(NodeIndex::new(2)), None)
            .is_err());
    }

    #[test]
    fn test_replace_other() {
        let mut links = ring(4);
        // Node 1 has slots 0 and 2; replace the slot opposite to 0.
        links
            .replace_other(NodeIndex::new(1), NodeIndex::new(0), Some(NodeIndex::new(3)))
            .unwrap();
        assert_eq!(
            links.other_neighbor(NodeIndex::new(1), NodeIndex::new(0)),
            Ok(Some(NodeIndex::new(3)))
        );
    }
}

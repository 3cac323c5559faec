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

use crate::core::numeric::TourNumeric;
use crate::eval::objective::Objective;
use crate::state::err::{BrokenTraversalError, MissingSubRootError, StructureError};
use crate::state::neighbors::NeighborStructure;
use crate::state::tabu::TabuEdges;
use stem_cycle_model::prelude::NodeIndex;

/// A full stem/cycle split of the structure, produced by [`SecContext::decompose`].
///
/// `cycle` starts at the root and lists the cycle nodes in link order; `stem`
/// runs from the begin-stem node to the open-slotted tip and is empty for the
/// degenerate (pure tour) state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecDecomposition {
    pub cycle: Vec<NodeIndex>,
    pub stem: Vec<NodeIndex>,
}

/// All transient state of one stem-and-cycle pass: the neighbor links, the
/// per-level tabu set, the three anchor nodes and the running gain of the
/// current level.
///
/// Structural conventions:
/// - Degenerate state: `begin_stem == end_stem == root` and the links form a
///   plain tour with no open slot.
/// - Otherwise the root's two slots hold its cycle neighbors (the sub-roots),
///   the begin-stem node stores the root in one slot (the root does not store
///   it back), and the end-stem tip carries the single open slot.
#[derive(Debug, Clone)]
pub struct SecContext<T> {
    pub(crate) links: NeighborStructure,
    pub(crate) tabu: TabuEdges,
    pub(crate) root: NodeIndex,
    pub(crate) begin_stem: NodeIndex,
    pub(crate) end_stem: NodeIndex,
    pub(crate) scratch: Vec<NodeIndex>,
    pub(crate) sum_gain: T,
}

impl<T: TourNumeric> SecContext<T> {
    pub fn new(dimension: usize) -> Self {
        Self {
            links: NeighborStructure::new(dimension),
            tabu: TabuEdges::new(dimension),
            root: NodeIndex::new(0),
            begin_stem: NodeIndex::new(0),
            end_stem: NodeIndex::new(0),
            scratch: Vec::with_capacity(dimension),
            sum_gain: T::zero(),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }

    #[inline]
    pub fn begin_stem(&self) -> NodeIndex {
        self.begin_stem
    }

    #[inline]
    pub fn end_stem(&self) -> NodeIndex {
        self.end_stem
    }

    #[inline]
    pub fn sum_gain(&self) -> T {
        self.sum_gain
    }

    /// The tour buffer last filled by [`write_closed_tour`](Self::write_closed_tour).
    #[inline]
    pub fn scratch(&self) -> &[NodeIndex] {
        &self.scratch
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.begin_stem == self.root && self.end_stem == self.root
    }

    /// Relinks the structure into the degenerate state for `tour`.
    pub fn reset_from_tour(&mut self, tour: &[NodeIndex]) {
        self.links.reset_from_tour(tour);
        self.root = tour[0];
        self.begin_stem = tour[0];
        self.end_stem = tour[0];
        self.sum_gain = T::zero();
    }

    /// Re-anchors the search at `root`. The structure must be degenerate.
    pub fn select_root(&mut self, root: NodeIndex) {
        debug_assert!(self.is_degenerate());
        self.root = root;
        self.begin_stem = root;
        self.end_stem = root;
    }

    /// Starts a fresh search level: no tabu edges, zero accumulated gain.
    pub fn clear_level(&mut self) {
        self.tabu.clear();
        self.sum_gain = T::zero();
    }

    /// The root's two cycle neighbors.
    pub fn sub_roots(&self) -> Result<(NodeIndex, NodeIndex), MissingSubRootError> {
        let left = self.links.left(self.root);
        let right = self.links.right(self.root);
        match (left, right) {
            (Some(a), Some(b)) => Ok((a, b)),
            _ => Err(MissingSubRootError::new(self.root, left, right)),
        }
    }

    /// The sub-root on which closing the structure is cheapest, together
    /// with the closure gain `distance(root, s) - distance(end_stem, s)`.
    /// Ties go to the first sub-root.
    pub fn better_side<O: Objective<T>>(
        &self,
        objective: &O,
    ) -> Result<(NodeIndex, T), MissingSubRootError> {
        let (s1, s2) = self.sub_roots()?;
        let g1 = objective.distance(self.root, s1) - objective.distance(self.end_stem, s1);
        let g2 = objective.distance(self.root, s2) - objective.distance(self.end_stem, s2);
        if g2 > g1 {
            Ok((s2, g2))
        } else {
            Ok((s1, g1))
        }
    }

    /// Closes the stem into the cycle on the cheaper side, leaving the
    /// structure degenerate. Returns the closure gain (zero when already
    /// degenerate).
    pub fn close_in_place<O: Objective<T>>(&mut self, objective: &O) -> Result<T, StructureError> {
        if self.is_degenerate() {
            return Ok(T::zero());
        }
        let (side, gain) = self.better_side(objective)?;
        // Tip takes the side node, the side node swaps root for the tip, and
        // the root's freed slot turns the half-stored root/begin edge into a
        // real tour edge.
        self.links.replace_slot(self.end_stem, None, Some(side))?;
        self.links
            .replace_slot(side, Some(self.root), Some(self.end_stem))?;
        self.links
            .replace_slot(self.root, Some(side), Some(self.begin_stem))?;
        self.begin_stem = self.root;
        self.end_stem = self.root;
        Ok(gain)
    }

    /// Writes the tour the structure would become if closed on the cheaper
    /// side into the scratch buffer, without mutating any links.
    pub fn write_closed_tour<O: Objective<T>>(
        &mut self,
        objective: &O,
    ) -> Result<(), StructureError> {
        let n = self.links.len();
        self.scratch.clear();
        if self.is_degenerate() {
            let (start, _) = self.sub_roots()?;
            self.scratch.push(self.root);
            let mut prev = self.root;
            let mut at = start;
            while at != self.root {
                if self.scratch.len() > n {
                    return Err(BrokenTraversalError::new(n, self.scratch.len()).into());
                }
                self.scratch.push(at);
                let next = self.links.counterpart(at, prev)?;
                prev = at;
                at = next;
            }
        } else {
            let (side, _) = self.better_side(objective)?;
            self.scratch.push(self.root);
            // Stem first, begin to tip.
            let mut prev = self.root;
            let mut at = self.begin_stem;
            loop {
                if self.scratch.len() > n {
                    return Err(BrokenTraversalError::new(n, self.scratch.len()).into());
                }
                self.scratch.push(at);
                if at == self.end_stem {
                    break;
                }
                let next = self.links.counterpart(at, prev)?;
                prev = at;
                at = next;
            }
            // Then the cycle from the closing side away from the root.
            let mut prev = self.root;
            let mut at = side;
            while at != self.root {
                if self.scratch.len() > n {
                    return Err(BrokenTraversalError::new(n, self.scratch.len()).into());
                }
                self.scratch.push(at);
                let next = self.links.counterpart(at, prev)?;
                prev = at;
                at = next;
            }
        }
        if self.scratch.len() != n {
            return Err(BrokenTraversalError::new(n, self.scratch.len()).into());
        }
        Ok(())
    }

    /// Walks the structure into its cycle and stem node sequences.
    pub fn decompose(&self) -> Result<SecDecomposition, StructureError> {
        let n = self.links.len();
        let (s1, _) = self.sub_roots()?;
        let mut cycle = vec![self.root];
        let mut prev = self.root;
        let mut at = s1;
        while at != self.root {
            if cycle.len() > n {
                return Err(BrokenTraversalError::new(n, cycle.len()).into());
            }
            cycle.push(at);
            let next = self.links.counterpart(at, prev)?;
            prev = at;
            at = next;
        }
        let mut stem = Vec::new();
        if !self.is_degenerate() {
            let mut prev = self.root;
            let mut at = self.begin_stem;
            loop {
                if cycle.len() + stem.len() > n {
                    return Err(BrokenTraversalError::new(n, cycle.len() + stem.len()).into());
                }
                stem.push(at);
                if at == self.end_stem {
                    break;
                }
                let next = self.links.counterpart(at, prev)?;
                prev = at;
                at = next;
            }
        }
        Ok(SecDecomposition { cycle, stem })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::objective::InstanceObjective;
    use stem_cycle_model::prelude::Instance;

    fn pentagon() -> Instance<i64> {
        Instance::from_euclidean(&[
            (0.0, 0.0),
            (40.0, 0.0),
            (50.0, 30.0),
            (20.0, 50.0),
            (-10.0, 30.0),
        ])
        .unwrap()
    }

    fn nodes(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    /// Cycle 0-1-2-0 plus the stem 0~3-4 with 4 as the open tip.
    fn stem_state() -> SecContext<i64> {
        let mut ctx = SecContext::new(5);
        ctx.links.set_left(NodeIndex::new(0), Some(NodeIndex::new(1)));
        ctx.links.set_right(NodeIndex::new(0), Some(NodeIndex::new(2)));
        ctx.links.set_left(NodeIndex::new(1), Some(NodeIndex::new(0)));
        ctx.links.set_right(NodeIndex::new(1), Some(NodeIndex::new(2)));
        ctx.links.set_left(NodeIndex::new(2), Some(NodeIndex::new(1)));
        ctx.links.set_right(NodeIndex::new(2), Some(NodeIndex::new(0)));
        ctx.links.set_left(NodeIndex::new(3), Some(NodeIndex::new(0)));
        ctx.links.set_right(NodeIndex::new(3), Some(NodeIndex::new(4)));
        ctx.links.set_left(NodeIndex::new(4), Some(NodeIndex::new(3)));
        ctx.links.set_right(NodeIndex::new(4), None);
        ctx.root = NodeIndex::new(0);
        ctx.begin_stem = NodeIndex::new(3);
        ctx.end_stem = NodeIndex::new(4);
        ctx
    }

    #[test]
    fn test_reset_is_degenerate() {
        let mut ctx = SecContext::<i64>::new(5);
        ctx.reset_from_tour(&nodes(&[2, 0, 3, 1, 4]));
        assert!(ctx.is_degenerate());
        assert_eq!(ctx.root(), NodeIndex::new(2));
        let (s1, s2) = ctx.sub_roots().unwrap();
        assert_eq!((s1, s2), (NodeIndex::new(4), NodeIndex::new(0)));
    }

    #[test]
    fn test_decompose_stem_state() {
        let ctx = stem_state();
        let parts = ctx.decompose().unwrap();
        assert_eq!(parts.cycle, nodes(&[0, 1, 2]));
        assert_eq!(parts.stem, nodes(&[3, 4]));
    }

    #[test]
    fn test_close_on_degenerate_is_free() {
        let inst = pentagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = SecContext::<i64>::new(5);
        ctx.reset_from_tour(&nodes(&[0, 1, 2, 3, 4]));
        let before = ctx.links.clone();
        assert_eq!(ctx.close_in_place(&objective).unwrap(), 0);
        assert_eq!(ctx.links, before);
    }

    #[test]
    fn test_write_closed_tour_degenerate_rotation() {
        let inst = pentagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = SecContext::<i64>::new(5);
        ctx.reset_from_tour(&nodes(&[3, 1, 4, 0, 2]));
        ctx.write_closed_tour(&objective).unwrap();
        assert_eq!(ctx.scratch().len(), 5);
        assert_eq!(ctx.scratch()[0], NodeIndex::new(3));
        assert_eq!(
            inst.tour_length(ctx.scratch()),
            inst.tour_length(&nodes(&[3, 1, 4, 0, 2]))
        );
    }

    #[test]
    fn test_write_closed_tour_is_permutation() {
        let inst = pentagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = stem_state();
        ctx.write_closed_tour(&objective).unwrap();
        let mut seen = [false; 5];
        for &node in ctx.scratch() {
            assert!(!seen[node.get()]);
            seen[node.get()] = true;
        }
        assert_eq!(ctx.scratch()[0], NodeIndex::new(0));
        assert_eq!(ctx.scratch()[1], NodeIndex::new(3));
        assert_eq!(ctx.scratch()[2], NodeIndex::new(4));
    }

    #[test]
    fn test_close_matches_written_tour() {
        let inst = pentagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = stem_state();
        ctx.write_closed_tour(&objective).unwrap();
        let predicted = ctx.scratch().to_vec();
        ctx.close_in_place(&objective).unwrap();
        assert!(ctx.is_degenerate());
        let parts = ctx.decompose().unwrap();
        assert!(parts.stem.is_empty());
        assert_eq!(parts.cycle.len(), 5);
        assert_eq!(inst.tour_length(&parts.cycle), inst.tour_length(&predicted));
    }

    #[test]
    fn test_better_side_prefers_cheaper_closure() {
        let inst = pentagon();
        let objective = InstanceObjective::new(&inst);
        let ctx = stem_state();
        let (side, gain) = ctx.better_side(&objective).unwrap();
        let (s1, s2) = ctx.sub_roots().unwrap();
        let r = ctx.root();
        let e = ctx.end_stem();
        let g1 = inst.distance(r, s1) - inst.distance(e, s1);
        let g2 = inst.distance(r, s2) - inst.distance(e, s2);
        assert_eq!(gain, g1.max(g2));
        if g2 > g1 {
            assert_eq!(side, s2);
        } else {
            assert_eq!(side, s1);
        }
    }
}

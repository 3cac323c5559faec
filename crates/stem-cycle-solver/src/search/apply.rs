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
use crate::search::context::SecContext;
use crate::search::scan::{CycleMove, StemMove, StemSide};
use crate::state::err::StructureError;

/// Applies a cycle move: the stem tip attaches at `mv.at`, the cycle edge
/// `(mv.at, mv.removed)` breaks open, and the sub-root on the removed side
/// becomes the new begin-stem node.
///
/// Two shapes of the same exchange: from the degenerate state the root
/// itself plays the tip (the first move of a level splits the tour into
/// stem and cycle), otherwise the current tip is reattached. Either way the
/// removed edge goes tabu and `mv.removed` ends up with the open slot.
pub fn apply_cycle_move<T: TourNumeric>(
    ctx: &mut SecContext<T>,
    mv: &CycleMove<T>,
) -> Result<(), StructureError> {
    let (s1, s2) = ctx.sub_roots()?;
    let side_node = match mv.side {
        StemSide::SubRoot => s1,
        StemSide::SubRootAno => s2,
    };
    let root = ctx.root;
    if ctx.is_degenerate() {
        ctx.links.replace_slot(mv.at, Some(mv.removed), Some(root))?;
        ctx.links.replace_slot(mv.removed, Some(mv.at), None)?;
        ctx.links.replace_slot(root, Some(side_node), Some(mv.at))?;
    } else {
        let tip = ctx.end_stem;
        ctx.links.replace_slot(tip, None, Some(mv.at))?;
        ctx.links.replace_slot(mv.at, Some(mv.removed), Some(tip))?;
        ctx.links.replace_slot(mv.removed, Some(mv.at), None)?;
        ctx.links
            .replace_slot(root, Some(side_node), Some(ctx.begin_stem))?;
    }
    ctx.begin_stem = side_node;
    ctx.end_stem = mv.removed;
    ctx.tabu.insert(mv.at, mv.removed);
    ctx.sum_gain = ctx.sum_gain + mv.gain;
    Ok(())
}

/// Applies a stem move: the tail of the stem past `mv.at` reverses, the tip
/// attaches at `mv.at` and `mv.removed` becomes the new tip.
pub fn apply_stem_move<T: TourNumeric>(
    ctx: &mut SecContext<T>,
    mv: &StemMove<T>,
) -> Result<(), StructureError> {
    let tip = ctx.end_stem;
    ctx.links.replace_slot(tip, None, Some(mv.at))?;
    ctx.links.replace_slot(mv.at, Some(mv.removed), Some(tip))?;
    ctx.links.replace_slot(mv.removed, Some(mv.at), None)?;
    ctx.end_stem = mv.removed;
    ctx.tabu.insert(mv.at, mv.removed);
    ctx.sum_gain = ctx.sum_gain + mv.gain;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::objective::{InstanceObjective, Objective};
    use crate::search::scan::{find_best_on_cycle, find_best_on_stem};
    use stem_cycle_model::prelude::{Instance, NodeIndex};

    fn nodes(ids: &[usize]) -> Vec<NodeIndex> {
        ids.iter().copied().map(NodeIndex::new).collect()
    }

    fn octagon() -> Instance<i64> {
        Instance::from_euclidean(&[
            (0.0, 0.0),
            (30.0, -10.0),
            (60.0, 0.0),
            (75.0, 30.0),
            (60.0, 60.0),
            (30.0, 70.0),
            (0.0, 60.0),
            (-15.0, 30.0),
        ])
        .unwrap()
    }

    fn assert_valid_structure(ctx: &SecContext<i64>) {
        let parts = ctx.decompose().unwrap();
        let n = ctx.dimension();
        let mut seen = vec![false; n];
        for &node in parts.cycle.iter().chain(parts.stem.iter()) {
            assert!(!seen[node.get()], "node visited twice: {}", node);
            seen[node.get()] = true;
        }
        assert_eq!(parts.cycle.len() + parts.stem.len(), n);
    }

    #[test]
    fn test_first_cycle_move_splits_the_tour() {
        let inst = octagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = SecContext::<i64>::new(8);
        // A deliberately bad tour so an improving split exists.
        ctx.reset_from_tour(&nodes(&[0, 4, 1, 5, 2, 6, 3, 7]));
        let mv = find_best_on_cycle(&ctx, &objective).unwrap().unwrap();
        apply_cycle_move(&mut ctx, &mv).unwrap();
        assert!(!ctx.is_degenerate());
        assert_eq!(ctx.end_stem(), mv.removed);
        assert!(ctx.tabu.contains(mv.at, mv.removed));
        assert_valid_structure(&ctx);
    }

    #[test]
    fn test_moves_preserve_the_invariant() {
        let inst = octagon();
        let objective = InstanceObjective::new(&inst);
        let mut ctx = SecContext::<i64>::new(8);
        ctx.reset_from_tour(&nodes(&[0, 4, 1, 5, 2, 6, 3, 7]));
        for _ in 0..6 {
            let on_cycle = find_best_on_cycle(&ctx, &objective).unwrap();
            let on_stem = find_best_on_stem(&ctx, &objective).unwrap();
            match (on_cycle, on_stem) {
                (None, None) => break,
                (Some(c), None) => apply_cycle_move(&mut ctx, &c).unwrap(),
                (None, Some(s)) => apply_stem_move(&mut ctx, &s).unwrap(),
                (Some(c), Some(s)) => {
                    if c.gain >= s.gain {
                        apply_cycle_move(&mut ctx, &c).unwrap();
                    } else {
                        apply_stem_move(&mut ctx, &s).unwrap();
                    }
                }
            }
            assert_valid_structure(&ctx);
        }
    }

    #[test]
    fn test_gain_accounting_matches_materialized_length() {
        let inst = octagon();
        let mut objective = InstanceObjective::new(&inst);
        let mut ctx = SecContext::<i64>::new(8);
        let start = nodes(&[0, 4, 1, 5, 2, 6, 3, 7]);
        let start_len = inst.tour_length(&start);
        ctx.reset_from_tour(&start);
        ctx.clear_level();
        for _ in 0..4 {
            let on_cycle = find_best_on_cycle(&ctx, &objective).unwrap();
            let on_stem = find_best_on_stem(&ctx, &objective).unwrap();
            match (on_cycle, on_stem) {
                (None, None) => break,
                (Some(c), None) => apply_cycle_move(&mut ctx, &c).unwrap(),
                (None, Some(s)) => apply_stem_move(&mut ctx, &s).unwrap(),
                (Some(c), Some(s)) => {
                    if c.gain >= s.gain {
                        apply_cycle_move(&mut ctx, &c).unwrap();
                    } else {
                        apply_stem_move(&mut ctx, &s).unwrap();
                    }
                }
            }
            let closure = if ctx.is_degenerate() {
                0
            } else {
                ctx.better_side(&objective).unwrap().1
            };
            ctx.write_closed_tour(&objective).unwrap();
            let materialized = objective.evaluate(ctx.scratch());
            assert_eq!(materialized, start_len - ctx.sum_gain() - closure);
        }
    }

    #[test]
    fn test_stem_move_reverses_tail() {
        let inst = octagon();
        let mut ctx = SecContext::<i64>::new(8);
        // Cycle 0-1-2-3-4-0, stem 0~5-6-7 with tip 7.
        ctx.reset_from_tour(&nodes(&[0, 1, 2, 3, 4, 5, 6, 7]));
        let splitting = CycleMove {
            at: NodeIndex::new(4),
            removed: NodeIndex::new(5),
            side: StemSide::SubRoot,
            gain: inst.distance(NodeIndex::new(4), NodeIndex::new(5)),
        };
        // Force a known split instead of scanning for the best one.
        apply_cycle_move(&mut ctx, &splitting).unwrap();
        let parts = ctx.decompose().unwrap();
        assert_eq!(parts.stem.first(), Some(&ctx.begin_stem()));
        assert_eq!(parts.stem.last(), Some(&NodeIndex::new(5)));
        let mv = StemMove {
            at: ctx.begin_stem(),
            removed: ctx
                .links
                .counterpart(ctx.begin_stem(), ctx.root())
                .unwrap(),
            gain: 0,
        };
        if mv.removed != ctx.end_stem() {
            apply_stem_move(&mut ctx, &mv).unwrap();
            assert_eq!(ctx.end_stem(), mv.removed);
            assert_valid_structure(&ctx);
        }
    }
}

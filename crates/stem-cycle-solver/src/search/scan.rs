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
use crate::search::context::SecContext;
use crate::state::err::{BrokenTraversalError, StructureError};
use stem_cycle_model::prelude::NodeIndex;

/// Which sub-root the removed edge leans toward; decides which sub-root
/// becomes the new begin-stem node when a cycle move is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemSide {
    SubRoot,
    SubRootAno,
}

/// A candidate edge exchange on the cycle: insert `(end_stem, at)`, remove
/// `(at, removed)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleMove<T> {
    pub at: NodeIndex,
    pub removed: NodeIndex,
    pub side: StemSide,
    pub gain: T,
}

/// A candidate edge exchange on the stem: insert `(end_stem, at)`, remove
/// `(at, removed)` where `removed` is `at`'s stem successor toward the tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StemMove<T> {
    pub at: NodeIndex,
    pub removed: NodeIndex,
    pub gain: T,
}

/// Scans every cycle node strictly between the two sub-roots as a
/// reattachment point for the stem tip.
///
/// For each node `j` both incident cycle edges are candidates for removal,
/// with `gain = distance(j, removed) - distance(j, end_stem)`. Tabu edges
/// are skipped. Returns `None` when the cycle carries no node besides the
/// root and its sub-roots, or when every candidate edge is tabu.
pub fn find_best_on_cycle<T: TourNumeric, O: Objective<T>>(
    ctx: &SecContext<T>,
    objective: &O,
) -> Result<Option<CycleMove<T>>, StructureError> {
    let (s1, s2) = ctx.sub_roots()?;
    let tip = ctx.end_stem();
    let n = ctx.dimension();
    let mut best: Option<CycleMove<T>> = None;
    let mut prev = s1;
    let mut at = ctx.links.counterpart(s1, ctx.root())?;
    let mut steps = 0usize;
    while at != s2 {
        steps += 1;
        if steps > n {
            return Err(BrokenTraversalError::new(n, steps).into());
        }
        let next = ctx.links.counterpart(at, prev)?;
        for (removed, side) in [(prev, StemSide::SubRoot), (next, StemSide::SubRootAno)] {
            if ctx.tabu.contains(at, removed) {
                continue;
            }
            let gain = objective.distance(at, removed) - objective.distance(at, tip);
            if best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(CycleMove {
                    at,
                    removed,
                    side,
                    gain,
                });
            }
        }
        prev = at;
        at = next;
    }
    Ok(best)
}

/// Scans the stem from the node nearest the root up to just before the tip.
///
/// Each node `j` pairs with its stem successor `f`; removing `(j, f)` and
/// inserting `(end_stem, j)` reverses the tail of the stem and makes `f` the
/// new tip. `f == end_stem` would be a no-op and is skipped. Returns `None`
/// for a zero-length stem (begin == end).
pub fn find_best_on_stem<T: TourNumeric, O: Objective<T>>(
    ctx: &SecContext<T>,
    objective: &O,
) -> Result<Option<StemMove<T>>, StructureError> {
    let tip = ctx.end_stem();
    if ctx.begin_stem() == tip {
        return Ok(None);
    }
    let n = ctx.dimension();
    let mut best: Option<StemMove<T>> = None;
    let mut prev = ctx.root();
    let mut at = ctx.begin_stem();
    let mut steps = 0usize;
    while at != tip {
        steps += 1;
        if steps > n {
            return Err(BrokenTraversalError::new(n, steps).into());
        }
        let next = ctx.links.counterpart(at, prev)?;
        if next != tip && !ctx.tabu.contains(at, next) {
            let gain = objective.distance(at, next) - objective.distance(at, tip);
            if best.as_ref().map_or(true, |b| gain > b.gain) {
                best = Some(StemMove {
                    at,
                    removed: next,
                    gain,
                });
            }
        }
        prev = at;
        at = next;
    }
    Ok(best)
}

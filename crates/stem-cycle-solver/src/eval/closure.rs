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
use crate::state::err::StructureError;
use stem_cycle_model::prelude::SolutionRecord;

/// Gain of virtually closing the structure into a full tour on its cheaper
/// side, without touching any links. Zero for the degenerate state.
pub fn trial_closure_gain<T: TourNumeric, O: Objective<T>>(
    ctx: &SecContext<T>,
    objective: &O,
) -> Result<T, StructureError> {
    if ctx.is_degenerate() {
        return Ok(T::zero());
    }
    let (_, gain) = ctx.better_side(objective)?;
    Ok(gain)
}

/// Materializes the current structure into a tour, runs the authoritative
/// evaluation and, if strictly shorter than the incumbent, overwrites the
/// incumbent in place. Returns whether the incumbent improved.
pub fn materialize_and_maybe_accept<T: TourNumeric, O: Objective<T>>(
    ctx: &mut SecContext<T>,
    objective: &mut O,
    incumbent: &mut SolutionRecord<T>,
) -> Result<bool, StructureError> {
    ctx.write_closed_tour(&*objective)?;
    let length = objective.evaluate(ctx.scratch());
    if length < incumbent.length() {
        tracing::debug!(%length, previous = %incumbent.length(), "incumbent improved");
        incumbent.install(ctx.scratch(), length);
        Ok(true)
    } else {
        Ok(false)
    }
}

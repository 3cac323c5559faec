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
use crate::monitor::budget::SearchBudget;
use stem_cycle_model::prelude::{Instance, NodeIndex};

/// The search's view of the problem being optimized.
///
/// `distance` feeds the incremental gain arithmetic; `evaluate` is the
/// authoritative full evaluation, invoked only at materialization points.
/// `should_terminate` is polled cooperatively once per structural move.
pub trait Objective<T> {
    fn dimension(&self) -> usize;

    fn distance(&self, a: NodeIndex, b: NodeIndex) -> T;

    /// Full tour length, counted against the evaluation budget.
    fn evaluate(&mut self, tour: &[NodeIndex]) -> T;

    fn should_terminate(&self) -> bool;
}

/// [`Objective`] over a distance-matrix [`Instance`], tracking how many full
/// evaluations the search has spent against a [`SearchBudget`].
#[derive(Debug)]
pub struct InstanceObjective<'i, T> {
    instance: &'i Instance<T>,
    budget: SearchBudget,
    evaluations: u64,
}

impl<'i, T> InstanceObjective<'i, T> {
    pub fn new(instance: &'i Instance<T>) -> Self {
        Self {
            instance,
            budget: SearchBudget::new(),
            evaluations: 0,
        }
    }

    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Number of authoritative evaluations performed so far.
    #[inline]
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }
}

impl<T: TourNumeric> Objective<T> for InstanceObjective<'_, T> {
    #[inline]
    fn dimension(&self) -> usize {
        self.instance.dimension()
    }

    #[inline]
    fn distance(&self, a: NodeIndex, b: NodeIndex) -> T {
        self.instance.distance(a, b)
    }

    fn evaluate(&mut self, tour: &[NodeIndex]) -> T {
        self.evaluations += 1;
        self.instance.tour_length(tour)
    }

    #[inline]
    fn should_terminate(&self) -> bool {
        self.budget.exhausted(self.evaluations)
    }
}

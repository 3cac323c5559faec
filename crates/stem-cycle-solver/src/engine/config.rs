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

/// Which outer search loop drives the per-root descents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPolicy {
    /// Random roots drawn from the full root list until most nodes have
    /// been tried.
    RootVarying,
    /// A root-varying warm-up followed by deep descents restricted to the
    /// nearest-neighbor candidates of recently disturbed nodes.
    CandidateRestricted,
}

/// Tuning knobs of the phase controller. The defaults reproduce the
/// canonical parameterization; they are rarely worth changing except for
/// experiments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    policy: SearchPolicy,
    partial_level_fraction: f64,
    min_partial_level: usize,
    root_list_floor_fraction: f64,
    shallow_level: usize,
    deep_level_factor: usize,
}

impl SearchConfig {
    pub fn new(policy: SearchPolicy) -> Self {
        Self {
            policy,
            partial_level_fraction: 0.45,
            min_partial_level: 2,
            root_list_floor_fraction: 0.85,
            shallow_level: 6,
            deep_level_factor: 2,
        }
    }

    pub fn with_partial_level_fraction(mut self, fraction: f64) -> Self {
        self.partial_level_fraction = fraction;
        self
    }

    pub fn with_min_partial_level(mut self, level: usize) -> Self {
        self.min_partial_level = level;
        self
    }

    pub fn with_root_list_floor_fraction(mut self, fraction: f64) -> Self {
        self.root_list_floor_fraction = fraction;
        self
    }

    pub fn with_shallow_level(mut self, level: usize) -> Self {
        self.shallow_level = level;
        self
    }

    pub fn with_deep_level_factor(mut self, factor: usize) -> Self {
        self.deep_level_factor = factor;
        self
    }

    #[inline]
    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    /// Number of moves per root-fixed descent: `max(min, round(fraction * n))`.
    #[inline]
    pub fn partial_level(&self, dimension: usize) -> usize {
        let scaled = (self.partial_level_fraction * dimension as f64).round() as usize;
        scaled.max(self.min_partial_level)
    }

    /// The root-varying loop stops once the root list shrinks to this size.
    #[inline]
    pub fn root_list_floor(&self, dimension: usize) -> usize {
        (self.root_list_floor_fraction * dimension as f64) as usize
    }

    #[inline]
    pub fn shallow_level(&self) -> usize {
        self.shallow_level
    }

    /// Moves per deep candidate-restricted descent: `factor * n`.
    #[inline]
    pub fn deep_level(&self, dimension: usize) -> usize {
        self.deep_level_factor * dimension
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new(SearchPolicy::RootVarying)
    }
}

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

use fixedbitset::FixedBitSet;
use stem_cycle_model::prelude::NodeIndex;

/// Symmetric set of edges forbidden from removal for the rest of the current
/// search level.
///
/// Backed by a dense `n x n` bit matrix; both orientations of a pair are set
/// so lookups need no ordering of the endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabuEdges {
    dimension: usize,
    bits: FixedBitSet,
}

impl TabuEdges {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            bits: FixedBitSet::with_capacity(dimension * dimension),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn insert(&mut self, a: NodeIndex, b: NodeIndex) {
        debug_assert!(a.get() < self.dimension && b.get() < self.dimension);
        self.bits.insert(a.get() * self.dimension + b.get());
        self.bits.insert(b.get() * self.dimension + a.get());
    }

    #[inline]
    pub fn contains(&self, a: NodeIndex, b: NodeIndex) -> bool {
        debug_assert!(a.get() < self.dimension && b.get() < self.dimension);
        self.bits.contains(a.get() * self.dimension + b.get())
    }

    #[inline]
    pub fn clear(&mut self) {
        self.bits.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.count_ones(..) == 0
    }
}

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
use crate::solution::err::NotAPermutationError;
use num_traits::Zero;

fn is_permutation(dimension: usize, tour: &[NodeIndex]) -> bool {
    if tour.len() != dimension {
        return false;
    }
    let mut seen = vec![false; dimension];
    for &node in tour {
        if node.get() >= dimension || seen[node.get()] {
            return false;
        }
        seen[node.get()] = true;
    }
    true
}

/// The caller-owned incumbent: a tour permutation and its total length.
///
/// The search reads it at entry and overwrites it in place whenever a
/// strictly better tour is found; the length never increases over the
/// lifetime of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionRecord<T> {
    tour: Vec<NodeIndex>,
    length: T,
}

impl<T: Copy> SolutionRecord<T> {
    pub fn new(
        dimension: usize,
        tour: Vec<NodeIndex>,
        length: T,
    ) -> Result<Self, NotAPermutationError> {
        if !is_permutation(dimension, &tour) {
            return Err(NotAPermutationError::new(dimension, tour.len()));
        }
        Ok(Self { tour, length })
    }

    #[inline]
    pub fn tour(&self) -> &[NodeIndex] {
        &self.tour
    }

    #[inline]
    pub fn length(&self) -> T {
        self.length
    }

    /// Overwrites the record in place. The tour must have been produced from
    /// a consistent structure walk; the permutation property is only checked
    /// in debug builds.
    #[inline]
    pub fn install(&mut self, tour: &[NodeIndex], length: T) {
        debug_assert!(is_permutation(self.tour.len(), tour));
        self.tour.clear();
        self.tour.extend_from_slice(tour);
        self.length = length;
    }
}

impl<T: Copy + Zero> SolutionRecord<T> {
    /// Evaluates `tour` against `instance` and wraps both into a record.
    pub fn from_tour(
        instance: &Instance<T>,
        tour: Vec<NodeIndex>,
    ) -> Result<Self, NotAPermutationError> {
        if !is_permutation(instance.dimension(), &tour) {
            return Err(NotAPermutationError::new(instance.dimension(), tour.len()));
        }
        let length = instance.tour_length(&tour);
        Ok(Self { tour, length })
    }

    /// The identity tour `0, 1, .., n-1`.
    pub fn canonical(instance: &Instance<T>) -> Self {
        let tour: Vec<NodeIndex> = (0..instance.dimension()).map(NodeIndex::new).collect();
        let length = instance.tour_length(&tour);
        Self { tour, length }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Instance<i64> {
        Instance::from_euclidean(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]).unwrap()
    }

    #[test]
    fn test_canonical_length() {
        let record = SolutionRecord::canonical(&square());
        assert_eq!(record.length(), 40);
        assert_eq!(record.tour().len(), 4);
    }

    #[test]
    fn test_rejects_duplicate_nodes() {
        let tour = vec![
            NodeIndex::new(0),
            NodeIndex::new(1),
            NodeIndex::new(1),
            NodeIndex::new(3),
        ];
        assert!(SolutionRecord::from_tour(&square(), tour).is_err());
    }

    #[test]
    fn test_rejects_wrong_length() {
        let tour = vec![NodeIndex::new(0), NodeIndex::new(1)];
        assert!(SolutionRecord::from_tour(&square(), tour).is_err());
    }

    #[test]
    fn test_install_overwrites_in_place() {
        let instance = square();
        let mut record = SolutionRecord::canonical(&instance);
        // Crossed tour, longer than the perimeter.
        let crossed = vec![
            NodeIndex::new(0),
            NodeIndex::new(2),
            NodeIndex::new(1),
            NodeIndex::new(3),
        ];
        let length = instance.tour_length(&crossed);
        record.install(&crossed, length);
        assert_eq!(record.tour(), crossed.as_slice());
        assert_eq!(record.length(), length);
    }
}

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
use crate::problem::err::{
    AsymmetricDistanceError, DimensionMismatchError, InstanceError, NotEnoughNodesError,
    ValueOutOfRangeError,
};
use num_traits::{FromPrimitive, Zero};

/// A symmetric TSP instance backed by a flattened `n x n` distance matrix.
///
/// Distances are integers (TSPLIB-style); the matrix is kept dense so that
/// `distance` is a single indexed load in the scan hot loops.
#[derive(Debug, Clone)]
pub struct Instance<T> {
    dimension: usize,
    distances: Vec<T>,
}

impl<T: Copy> Instance<T> {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> T {
        debug_assert!(a.get() < self.dimension && b.get() < self.dimension);
        self.distances[a.get() * self.dimension + b.get()]
    }
}

impl<T: Copy + PartialEq> Instance<T> {
    /// Builds an instance from a row-major distance matrix, validating shape
    /// and symmetry.
    pub fn from_matrix(dimension: usize, distances: Vec<T>) -> Result<Self, InstanceError> {
        if dimension < 3 {
            return Err(NotEnoughNodesError::new(dimension).into());
        }
        if distances.len() != dimension * dimension {
            return Err(
                DimensionMismatchError::new(dimension * dimension, distances.len()).into(),
            );
        }
        for i in 0..dimension {
            for j in (i + 1)..dimension {
                if distances[i * dimension + j] != distances[j * dimension + i] {
                    return Err(
                        AsymmetricDistanceError::new(NodeIndex::new(i), NodeIndex::new(j)).into(),
                    );
                }
            }
        }
        Ok(Self {
            dimension,
            distances,
        })
    }
}

impl<T: Copy + PartialEq + FromPrimitive> Instance<T> {
    /// Builds an instance from planar coordinates with TSPLIB EUC_2D
    /// nearest-integer rounding.
    pub fn from_euclidean(points: &[(f64, f64)]) -> Result<Self, InstanceError> {
        let dimension = points.len();
        if dimension < 3 {
            return Err(NotEnoughNodesError::new(dimension).into());
        }
        let mut distances = Vec::with_capacity(dimension * dimension);
        for &(xa, ya) in points {
            for &(xb, yb) in points {
                let dx = xa - xb;
                let dy = ya - yb;
                let rounded = ((dx * dx + dy * dy).sqrt() + 0.5).floor();
                let value =
                    T::from_f64(rounded).ok_or_else(|| ValueOutOfRangeError::new(rounded))?;
                distances.push(value);
            }
        }
        Ok(Self {
            dimension,
            distances,
        })
    }
}

impl<T: Copy + Zero> Instance<T> {
    /// Total length of a closed tour, including the wraparound edge.
    pub fn tour_length(&self, tour: &[NodeIndex]) -> T {
        debug_assert_eq!(tour.len(), self.dimension);
        let mut total = T::zero();
        for (i, &node) in tour.iter().enumerate() {
            let next = tour[(i + 1) % tour.len()];
            total = total + self.distance(node, next);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Instance<i64> {
        // 0-1: 3, 0-2: 4, 1-2: 5
        Instance::from_matrix(3, vec![0, 3, 4, 3, 0, 5, 4, 5, 0]).unwrap()
    }

    #[test]
    fn test_distance_lookup() {
        let inst = triangle();
        let (a, b, c) = (NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(2));
        assert_eq!(inst.distance(a, b), 3);
        assert_eq!(inst.distance(b, a), 3);
        assert_eq!(inst.distance(b, c), 5);
    }

    #[test]
    fn test_tour_length_with_wraparound() {
        let inst = triangle();
        let tour = [NodeIndex::new(0), NodeIndex::new(1), NodeIndex::new(2)];
        assert_eq!(inst.tour_length(&tour), 3 + 5 + 4);
    }

    #[test]
    fn test_rejects_asymmetric_matrix() {
        let err = Instance::<i64>::from_matrix(3, vec![0, 3, 4, 3, 0, 5, 4, 6, 0]).unwrap_err();
        assert!(matches!(err, InstanceError::AsymmetricDistance(_)));
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = Instance::<i64>::from_matrix(3, vec![0; 8]).unwrap_err();
        assert!(matches!(err, InstanceError::DimensionMismatch(_)));
    }

    #[test]
    fn test_rejects_tiny_instance() {
        let err = Instance::<i64>::from_matrix(2, vec![0; 4]).unwrap_err();
        assert!(matches!(err, InstanceError::NotEnoughNodes(_)));
    }

    #[test]
    fn test_euclidean_rounding() {
        // 3-4-5 right triangle, all integer distances
        let inst =
            Instance::<i64>::from_euclidean(&[(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]).unwrap();
        assert_eq!(inst.distance(NodeIndex::new(0), NodeIndex::new(1)), 3);
        assert_eq!(inst.distance(NodeIndex::new(1), NodeIndex::new(2)), 4);
        assert_eq!(inst.distance(NodeIndex::new(0), NodeIndex::new(2)), 5);
    }
}

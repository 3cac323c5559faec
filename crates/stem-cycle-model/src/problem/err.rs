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

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DimensionMismatchError {
    expected: usize,
    actual: usize,
}

impl DimensionMismatchError {
    #[inline]
    pub fn new(expected: usize, actual: usize) -> Self {
        Self { expected, actual }
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[inline]
    pub fn actual(&self) -> usize {
        self.actual
    }
}

impl std::fmt::Display for DimensionMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance matrix has {} entries, expected {}",
            self.actual, self.expected
        )
    }
}

impl std::error::Error for DimensionMismatchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AsymmetricDistanceError {
    a: NodeIndex,
    b: NodeIndex,
}

impl AsymmetricDistanceError {
    #[inline]
    pub fn new(a: NodeIndex, b: NodeIndex) -> Self {
        Self { a, b }
    }

    #[inline]
    pub fn a(&self) -> NodeIndex {
        self.a
    }

    #[inline]
    pub fn b(&self) -> NodeIndex {
        self.b
    }
}

impl std::fmt::Display for AsymmetricDistanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance between {} and {} differs by direction",
            self.a, self.b
        )
    }
}

impl std::error::Error for AsymmetricDistanceError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotEnoughNodesError {
    dimension: usize,
}

impl NotEnoughNodesError {
    #[inline]
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl std::fmt::Display for NotEnoughNodesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance with {} nodes is too small for a tour (minimum 3)",
            self.dimension
        )
    }
}

impl std::error::Error for NotEnoughNodesError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueOutOfRangeError {
    value: f64,
}

impl ValueOutOfRangeError {
    #[inline]
    pub fn new(value: f64) -> Self {
        Self { value }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl std::fmt::Display for ValueOutOfRangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Distance value {} is not representable in the cost type",
            self.value
        )
    }
}

impl std::error::Error for ValueOutOfRangeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum InstanceError {
    DimensionMismatch(DimensionMismatchError),
    AsymmetricDistance(AsymmetricDistanceError),
    NotEnoughNodes(NotEnoughNodesError),
    ValueOutOfRange(ValueOutOfRangeError),
}

impl std::fmt::Display for InstanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceError::DimensionMismatch(e) => write!(f, "{}", e),
            InstanceError::AsymmetricDistance(e) => write!(f, "{}", e),
            InstanceError::NotEnoughNodes(e) => write!(f, "{}", e),
            InstanceError::ValueOutOfRange(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for InstanceError {}

impl From<DimensionMismatchError> for InstanceError {
    fn from(err: DimensionMismatchError) -> Self {
        InstanceError::DimensionMismatch(err)
    }
}

impl From<AsymmetricDistanceError> for InstanceError {
    fn from(err: AsymmetricDistanceError) -> Self {
        InstanceError::AsymmetricDistance(err)
    }
}

impl From<NotEnoughNodesError> for InstanceError {
    fn from(err: NotEnoughNodesError) -> Self {
        InstanceError::NotEnoughNodes(err)
    }
}

impl From<ValueOutOfRangeError> for InstanceError {
    fn from(err: ValueOutOfRangeError) -> Self {
        InstanceError::ValueOutOfRange(err)
    }
}

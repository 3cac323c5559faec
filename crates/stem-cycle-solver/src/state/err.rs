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

use stem_cycle_model::prelude::NodeIndex;

fn fmt_slot(slot: Option<NodeIndex>) -> String {
    match slot {
        Some(node) => node.to_string(),
        None => "open".to_string(),
    }
}

/// A queried or replaced neighbor did not match either stored slot.
///
/// This signals a corrupted structure (a programming defect), recoverable
/// only by abandoning the current optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborMismatchError {
    node: NodeIndex,
    expected: Option<NodeIndex>,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl NeighborMismatchError {
    #[inline]
    pub fn new(
        node: NodeIndex,
        expected: Option<NodeIndex>,
        left: Option<NodeIndex>,
        right: Option<NodeIndex>,
    ) -> Self {
        Self {
            node,
            expected,
            left,
            right,
        }
    }

    #[inline]
    pub fn node(&self) -> NodeIndex {
        self.node
    }

    #[inline]
    pub fn expected(&self) -> Option<NodeIndex> {
        self.expected
    }

    #[inline]
    pub fn left(&self) -> Option<NodeIndex> {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Option<NodeIndex> {
        self.right
    }
}

impl std::fmt::Display for NeighborMismatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Neighbor {} not usable at {} (slots: {} / {})",
            fmt_slot(self.expected),
            self.node,
            fmt_slot(self.left),
            fmt_slot(self.right)
        )
    }
}

impl std::error::Error for NeighborMismatchError {}

/// The root's neighbor slots do not describe two cycle neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MissingSubRootError {
    root: NodeIndex,
    left: Option<NodeIndex>,
    right: Option<NodeIndex>,
}

impl MissingSubRootError {
    #[inline]
    pub fn new(root: NodeIndex, left: Option<NodeIndex>, right: Option<NodeIndex>) -> Self {
        Self { root, left, right }
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        self.root
    }
}

impl std::fmt::Display for MissingSubRootError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Root {} is missing a cycle neighbor (slots: {} / {})",
            self.root,
            fmt_slot(self.left),
            fmt_slot(self.right)
        )
    }
}

impl std::error::Error for MissingSubRootError {}

/// A full structure walk did not visit exactly the expected number of nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrokenTraversalError {
    expected: usize,
    visited: usize,
}

impl BrokenTraversalError {
    #[inline]
    pub fn new(expected: usize, visited: usize) -> Self {
        Self { expected, visited }
    }

    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    #[inline]
    pub fn visited(&self) -> usize {
        self.visited
    }
}

impl std::fmt::Display for BrokenTraversalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Structure walk visited {} nodes, expected {}",
            self.visited, self.expected
        )
    }
}

impl std::error::Error for BrokenTraversalError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureError {
    NeighborMismatch(NeighborMismatchError),
    MissingSubRoot(MissingSubRootError),
    BrokenTraversal(BrokenTraversalError),
}

impl std::fmt::Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureError::NeighborMismatch(e) => write!(f, "{}", e),
            StructureError::MissingSubRoot(e) => write!(f, "{}", e),
            StructureError::BrokenTraversal(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for StructureError {}

impl From<NeighborMismatchError> for StructureError {
    fn from(err: NeighborMismatchError) -> Self {
        StructureError::NeighborMismatch(err)
    }
}

impl From<MissingSubRootError> for StructureError {
    fn from(err: MissingSubRootError) -> Self {
        StructureError::MissingSubRoot(err)
    }
}

impl From<BrokenTraversalError> for StructureError {
    fn from(err: BrokenTraversalError) -> Self {
        StructureError::BrokenTraversal(err)
    }
}

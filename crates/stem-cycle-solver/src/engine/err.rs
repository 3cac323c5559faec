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

use crate::state::err::StructureError;

/// A root was requested but the root list is empty. Only reachable through
/// a logic defect in the outer loop's termination condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RootListExhaustedError;

impl RootListExhaustedError {
    pub fn new() -> Self {
        Self
    }
}

impl std::fmt::Display for RootListExhaustedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Root list exhausted while a root was still required")
    }
}

impl std::error::Error for RootListExhaustedError {}

/// Any internal-consistency failure that aborts one optimization run. The
/// process and any sibling runs are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchError {
    Structure(StructureError),
    RootListExhausted(RootListExhaustedError),
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::Structure(e) => write!(f, "{}", e),
            SearchError::RootListExhausted(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SearchError {}

impl From<StructureError> for SearchError {
    fn from(err: StructureError) -> Self {
        SearchError::Structure(err)
    }
}

impl From<RootListExhaustedError> for SearchError {
    fn from(err: RootListExhaustedError) -> Self {
        SearchError::RootListExhausted(err)
    }
}

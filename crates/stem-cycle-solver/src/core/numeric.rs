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

use num_traits::{CheckedAdd, CheckedSub, FromPrimitive, Signed, ToPrimitive, Zero};

/// Numeric bound for tour lengths and edge-exchange gains.
///
/// Gains are signed deltas of distances, so the type must be signed even
/// though distances themselves are non-negative. `i32` and `i64` satisfy all
/// of this.
pub trait TourNumeric:
    Copy
    + Ord
    + CheckedAdd
    + CheckedSub
    + Zero
    + Signed
    + Send
    + Sync
    + std::fmt::Debug
    + std::fmt::Display
    + From<i32>
    + FromPrimitive
    + ToPrimitive
    + 'static
{
}

impl<T> TourNumeric for T where
    T: Copy
        + Ord
        + CheckedAdd
        + CheckedSub
        + Zero
        + Signed
        + Send
        + Sync
        + std::fmt::Debug
        + std::fmt::Display
        + From<i32>
        + FromPrimitive
        + ToPrimitive
        + 'static
{
}

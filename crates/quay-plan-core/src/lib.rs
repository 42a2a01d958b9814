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

//! # Quay Plan Core (`quay-plan-core`)
//!
//! Domain-agnostic building blocks shared by the model and the engine:
//!
//! - [`primitives::Interval`]: closed intervals with the overlap test used by
//!   conflict detection.
//! - [`space`]: pier positions and lengths in meters, and vessel headings.
//! - [`time`]: millisecond instants and durations with `chrono` conversion.
//! - [`grid`]: snap-to-grid quantization of edited domain values.
//! - [`transform`]: domain to pixel mappings consumed during gestures.

pub mod grid;
pub mod primitives;
pub mod space;
pub mod time;
pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;
    use static_assertions::assert_impl_all;

    assert_impl_all!(space::PierPosition: Send, Sync, Copy);
    assert_impl_all!(time::TimePoint: Send, Sync, Copy, Ord);
    assert_impl_all!(grid::Grid: Send, Sync);
    assert_impl_all!(transform::LinearViewport: Send, Sync);
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates shared by culling and clipping.

use kurbo::Rect;

/// `true` if `inner` lies entirely within `outer` (edges may touch).
pub(crate) fn contains(outer: Rect, inner: Rect) -> bool {
    let (outer, inner) = (outer.abs(), inner.abs());
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && outer.x1 >= inner.x1 && outer.y1 >= inner.y1
}

/// `true` if the two rectangles share a region of positive area.
pub(crate) fn overlaps(a: Rect, b: Rect) -> bool {
    !a.abs().intersect(b.abs()).is_zero_area()
}

/// Whole-pixel extent of a length, rounded up.
#[expect(
    clippy::cast_possible_truncation,
    reason = "buffer sizes are bounded by surface sizes"
)]
pub(crate) fn pixel_extent(len: f64) -> u32 {
    if len.is_nan() || len <= 0.0 {
        0
    } else {
        len.ceil().min(f64::from(u32::MAX)) as u32
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-region tracking for a layer set.

use kurbo::Rect;

/// The area of a surface whose pixels may have changed since the last composite.
///
/// The region is a single bounding rectangle: the union of everything marked
/// since the last [`clear`](Self::clear). It is conservative (the union of two
/// distant rectangles also covers the gap between them), which is enough to
/// bound a repaint.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DirtyRegion {
    bounds: Option<Rect>,
}

impl DirtyRegion {
    /// Creates an empty region.
    #[must_use]
    pub const fn new() -> Self {
        Self { bounds: None }
    }

    /// Returns `true` if nothing is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// The bounding rectangle of everything marked, if any.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    /// Unions `rect` into the region. Empty rectangles are ignored.
    pub fn add(&mut self, rect: Rect) {
        let rect = rect.abs();
        if rect.is_zero_area() {
            return;
        }
        self.bounds = Some(match self.bounds {
            Some(current) => current.union(rect),
            None => rect,
        });
    }

    /// Merges another region into this one.
    pub fn merge(&mut self, other: &Self) {
        if let Some(rect) = other.bounds {
            self.add(rect);
        }
    }

    /// Returns `true` if `rect` lies entirely inside the region.
    #[must_use]
    pub fn contains_rect(&self, rect: Rect) -> bool {
        self.bounds.is_some_and(|b| crate::geometry::contains(b, rect))
    }

    /// Returns `true` if the region overlaps `rect`.
    #[must_use]
    pub fn intersects(&self, rect: Rect) -> bool {
        self.bounds.is_some_and(|b| crate::geometry::overlaps(b, rect))
    }

    /// Empties the region.
    pub fn clear(&mut self) {
        self.bounds = None;
    }
}

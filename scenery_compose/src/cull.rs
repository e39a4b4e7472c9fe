// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Occlusion culling and visibility clipping.
//!
//! A layer is culled only when nothing of it could show: it is hidden, has no
//! area, or an upper layer that is both visible and opaque contains its
//! bounds. Culling is purely an optimisation; the composite is the same with
//! or without it.

use kurbo::Rect;

use crate::geometry::{contains, overlaps};
use crate::layer::{Layer, LayerBase};

/// Returns `true` if `lower` does not need to be drawn under `uppers`.
///
/// `None` counts as nothing to draw. Invisible or non-opaque uppers never
/// cause a skip, however much they cover.
#[must_use]
pub fn should_skip_layer<I>(lower: Option<&dyn Layer<I>>, uppers: &[&dyn Layer<I>]) -> bool {
    let Some(lower) = lower else {
        return true;
    };
    is_occluded(lower.base(), uppers.iter().map(|u| u.base()))
}

/// Returns `true` if `layer` is visible and overlaps `rect`.
#[must_use]
pub fn is_layer_visible<I>(layer: &dyn Layer<I>, rect: Rect) -> bool {
    is_visible_in(layer.base(), rect)
}

/// The part of `layer`'s bounds inside `rect`. Zero-area when they do not
/// overlap.
#[must_use]
pub fn visible_region<I>(layer: &dyn Layer<I>, rect: Rect) -> Rect {
    let clipped = layer.bounds().abs().intersect(rect.abs());
    if clipped.is_zero_area() {
        Rect::ZERO
    } else {
        clipped
    }
}

pub(crate) fn is_visible_in(base: &LayerBase, rect: Rect) -> bool {
    base.is_visible() && overlaps(base.bounds(), rect)
}

pub(crate) fn is_occluded<'a>(
    lower: &LayerBase,
    uppers: impl IntoIterator<Item = &'a LayerBase>,
) -> bool {
    if lower.is_empty() {
        return true;
    }
    uppers
        .into_iter()
        .any(|u| u.is_visible() && u.is_opaque() && contains(u.bounds(), lower.bounds()))
}

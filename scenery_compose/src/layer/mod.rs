// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor layers.
//!
//! Every drawable in a [`PictureLayerSet`](crate::PictureLayerSet) is one of
//! five kinds, tagged by [`LayerKind`]. The kinds share a [`LayerBase`] record
//! (id, bounds, z-order, visibility, opacity, dirty flag) and the [`Layer`]
//! trait, which is all the compositor needs to sort, cull, and draw them.
//!
//! | Kind | Z-order | Opaque | Image |
//! |------|---------|--------|-------|
//! | [`BackgroundLayer`] | always 0 | yes | the picture's base image |
//! | [`DrawingLayer`] | first assignment | no | persistent canvas |
//! | [`DrawingEntry`] | per operation | no | snapshot of one draw call |
//! | [`CastLayer`] | per cast | no | cut from a source picture on demand |
//! | [`TextLayer`] | per text | no | rendered by the host |

mod background;
mod cast;
mod drawing;
mod text;

pub use background::BackgroundLayer;
pub use cast::{CastLayer, CastRecord};
pub use drawing::{DrawingEntry, DrawingLayer};
pub use text::{TextLayer, TextRecord};

use std::sync::Arc;

use kurbo::Rect;

use crate::id::LayerId;

/// The closed set of layer kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// The picture's background image.
    Background,
    /// The legacy whole-picture drawing canvas.
    Drawing,
    /// One freeform draw or transfer operation.
    DrawingEntry,
    /// A sprite instance.
    Cast,
    /// A rendered text block.
    Text,
}

/// State shared by every layer kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerBase {
    id: LayerId,
    bounds: Rect,
    z_order: i32,
    visible: bool,
    dirty: bool,
    opaque: bool,
}

impl LayerBase {
    pub(crate) fn new(id: LayerId, bounds: Rect, z_order: i32, opaque: bool) -> Self {
        Self {
            id,
            bounds,
            z_order,
            visible: true,
            dirty: true,
            opaque,
        }
    }

    /// The layer's id.
    #[must_use]
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Bounds in picture coordinates.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Stacking position; higher paints later.
    #[must_use]
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Visibility flag.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the layer changed since the last composite.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the layer fully covers its bounds with opaque pixels.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// `true` if the layer is invisible or has no area, so nothing of it can show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.visible || self.bounds.abs().is_zero_area()
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) -> bool {
        self.update(|b| &mut b.bounds, bounds)
    }

    pub(crate) fn set_z_order(&mut self, z_order: i32) -> bool {
        self.update(|b| &mut b.z_order, z_order)
    }

    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        self.update(|b| &mut b.visible, visible)
    }

    pub(crate) fn set_opaque(&mut self, opaque: bool) -> bool {
        self.update(|b| &mut b.opaque, opaque)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn update<T: PartialEq>(&mut self, field: impl FnOnce(&mut Self) -> &mut T, value: T) -> bool {
        let slot = field(self);
        if *slot == value {
            return false;
        }
        *slot = value;
        self.dirty = true;
        true
    }
}

/// The contract the compositor relies on.
///
/// Setters return whether the value changed; only a change marks the layer
/// dirty.
pub trait Layer<I> {
    /// The layer's kind tag.
    fn kind(&self) -> LayerKind;

    /// Shared state.
    fn base(&self) -> &LayerBase;

    /// Shared state, mutably.
    fn base_mut(&mut self) -> &mut LayerBase;

    /// The image to draw at [`bounds`](Self::bounds), rebuilding any cache
    /// first. `None` means there is nothing to draw yet.
    fn image(&mut self) -> Option<Arc<I>>;

    /// Marks the layer dirty unconditionally. Kinds with a derived image also
    /// drop their cache.
    fn invalidate(&mut self) {
        self.base_mut().mark_dirty();
    }

    /// The layer's id.
    fn id(&self) -> LayerId {
        self.base().id()
    }

    /// Bounds in picture coordinates.
    fn bounds(&self) -> Rect {
        self.base().bounds()
    }

    /// Stacking position.
    fn z_order(&self) -> i32 {
        self.base().z_order()
    }

    /// Visibility flag.
    fn is_visible(&self) -> bool {
        self.base().is_visible()
    }

    /// Dirty flag.
    fn is_dirty(&self) -> bool {
        self.base().is_dirty()
    }

    /// Opacity flag.
    fn is_opaque(&self) -> bool {
        self.base().is_opaque()
    }

    /// Sets the bounds.
    fn set_bounds(&mut self, bounds: Rect) -> bool {
        self.base_mut().set_bounds(bounds)
    }

    /// Sets the stacking position.
    fn set_z_order(&mut self, z_order: i32) -> bool {
        self.base_mut().set_z_order(z_order)
    }

    /// Shows or hides the layer.
    fn set_visible(&mut self, visible: bool) -> bool {
        self.base_mut().set_visible(visible)
    }

    /// Declares whether the layer's pixels are fully opaque.
    fn set_opaque(&mut self, opaque: bool) -> bool {
        self.base_mut().set_opaque(opaque)
    }

    /// Clears the dirty flag.
    fn clear_dirty(&mut self) {
        self.base_mut().clear_dirty();
    }
}

/// Drops a cached image, reporting whether there was one.
pub(crate) fn drop_cache<I>(cache: &mut Option<Arc<I>>) -> bool {
    cache.take().is_some()
}

/// `true` when both options are absent or point to the same image.
pub(crate) fn same_image<I>(a: Option<&Arc<I>>, b: Option<&Arc<I>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> LayerBase {
        let mut b = LayerBase::new(LayerId(1), Rect::new(0.0, 0.0, 10.0, 10.0), 3, false);
        b.clear_dirty();
        b
    }

    #[test]
    fn unchanged_values_stay_clean() {
        let mut b = base();
        assert!(!b.set_visible(true));
        assert!(!b.set_z_order(3));
        assert!(!b.set_bounds(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(!b.set_opaque(false));
        assert!(!b.is_dirty());

        assert!(b.set_opaque(true));
        assert!(b.is_dirty());
    }

    #[test]
    fn empty_when_hidden_or_zero_area() {
        let mut b = base();
        assert!(!b.is_empty());
        b.set_visible(false);
        assert!(b.is_empty());
        b.set_visible(true);
        b.set_bounds(Rect::new(4.0, 4.0, 4.0, 20.0));
        assert!(b.is_empty());
    }

    #[test]
    fn image_identity() {
        let a = Arc::new(1_u8);
        assert!(same_image(Some(&a), Some(&a.clone())));
        assert!(!same_image(Some(&a), Some(&Arc::new(1_u8))));
        assert!(same_image::<u8>(None, None));
        assert!(!same_image(Some(&a), None));
    }
}

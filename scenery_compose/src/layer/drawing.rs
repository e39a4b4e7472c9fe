// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Rect};
use scenery_core::Image;

use super::{Layer, LayerBase, LayerKind, same_image};
use crate::id::LayerId;

/// The legacy whole-picture drawing canvas.
///
/// A set holds at most one. It keeps the z-order it was first given, so later
/// casts and texts stack above it.
#[derive(Debug)]
pub struct DrawingLayer<I> {
    base: LayerBase,
    image: Arc<I>,
}

impl<I: Image> DrawingLayer<I> {
    pub(crate) fn new(id: LayerId, z_order: i32, image: Arc<I>) -> Self {
        let bounds = Rect::from_origin_size(Point::ORIGIN, image.size());
        Self {
            base: LayerBase::new(id, bounds, z_order, false),
            image,
        }
    }

    /// Replaces the canvas image.
    pub fn set_image(&mut self, image: Arc<I>) -> bool {
        if same_image(Some(&self.image), Some(&image)) {
            return false;
        }
        self.base
            .set_bounds(Rect::from_origin_size(Point::ORIGIN, image.size()));
        self.image = image;
        self.base.mark_dirty();
        true
    }
}

impl<I> Layer<I> for DrawingLayer<I> {
    fn kind(&self) -> LayerKind {
        LayerKind::Drawing
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn image(&mut self) -> Option<Arc<I>> {
        Some(Arc::clone(&self.image))
    }
}

/// The result of one freeform draw or transfer operation.
///
/// Entries are immutable once created, apart from visibility.
#[derive(Debug)]
pub struct DrawingEntry<I> {
    base: LayerBase,
    image: Arc<I>,
}

impl<I: Image> DrawingEntry<I> {
    /// Returns `None` for an image with no area.
    pub(crate) fn new(id: LayerId, z_order: i32, image: Arc<I>, at: Point) -> Option<Self> {
        let bounds = Rect::from_origin_size(at, image.size());
        if bounds.is_zero_area() {
            return None;
        }
        Some(Self {
            base: LayerBase::new(id, bounds, z_order, false),
            image,
        })
    }
}

impl<I> DrawingEntry<I> {
    /// The destination rectangle of the operation.
    #[must_use]
    pub fn dest_rect(&self) -> Rect {
        self.base.bounds()
    }
}

impl<I> Layer<I> for DrawingEntry<I> {
    fn kind(&self) -> LayerKind {
        LayerKind::DrawingEntry
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn image(&mut self) -> Option<Arc<I>> {
        Some(Arc::clone(&self.image))
    }

    fn set_bounds(&mut self, _bounds: Rect) -> bool {
        false
    }

    fn set_z_order(&mut self, _z_order: i32) -> bool {
        false
    }

    fn set_opaque(&mut self, _opaque: bool) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_image::PixelImage;
    use scenery_core::Rgba;

    #[test]
    fn entry_rejects_empty_images() {
        let empty = Arc::new(PixelImage::solid(0, 5, Rgba::WHITE));
        assert!(DrawingEntry::new(LayerId(1), 1, empty, Point::ORIGIN).is_none());
    }

    #[test]
    fn entry_is_frozen_except_visibility() {
        let img = Arc::new(PixelImage::solid(4, 3, Rgba::WHITE));
        let mut entry = DrawingEntry::new(LayerId(1), 2, img, Point::new(5.0, 6.0)).unwrap();
        assert_eq!(entry.dest_rect(), Rect::new(5.0, 6.0, 9.0, 9.0));
        assert!(!entry.set_bounds(Rect::ZERO));
        assert!(!entry.set_z_order(9));
        assert!(!entry.set_opaque(true));
        assert!(entry.set_visible(false));
        assert_eq!(entry.z_order(), 2);
    }

    #[test]
    fn drawing_layer_swaps_image() {
        let a = Arc::new(PixelImage::solid(8, 8, Rgba::WHITE));
        let mut layer = DrawingLayer::new(LayerId(1), 1, Arc::clone(&a));
        layer.clear_dirty();
        assert!(!layer.set_image(a));
        assert!(!layer.is_dirty());
        assert!(layer.set_image(Arc::new(PixelImage::solid(16, 8, Rgba::BLACK))));
        assert_eq!(layer.bounds().width(), 16.0);
        assert!(layer.is_dirty());
    }
}

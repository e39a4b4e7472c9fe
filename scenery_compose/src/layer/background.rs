// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Rect};
use scenery_core::Image;

use super::{Layer, LayerBase, LayerKind, same_image};
use crate::id::LayerId;

/// A picture's background image, always at z-order 0.
#[derive(Debug)]
pub struct BackgroundLayer<I> {
    base: LayerBase,
    image: Arc<I>,
}

impl<I: Image> BackgroundLayer<I> {
    pub(crate) fn new(id: LayerId, image: Arc<I>) -> Self {
        let bounds = Rect::from_origin_size(Point::ORIGIN, image.size());
        Self {
            base: LayerBase::new(id, bounds, 0, true),
            image,
        }
    }

    /// Replaces the image, resizing the bounds to match.
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

impl<I> BackgroundLayer<I> {
    /// The background image.
    #[must_use]
    pub fn source(&self) -> &Arc<I> {
        &self.image
    }
}

impl<I> Layer<I> for BackgroundLayer<I> {
    fn kind(&self) -> LayerKind {
        LayerKind::Background
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

    /// The background never leaves z-order 0.
    fn set_z_order(&mut self, _z_order: i32) -> bool {
        false
    }
}

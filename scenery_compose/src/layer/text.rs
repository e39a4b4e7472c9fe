// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Rect, Size};
use scenery_core::Image;

use super::{Layer, LayerBase, LayerKind, drop_cache, same_image};
use crate::id::LayerId;

/// The host's description of a text block, mirrored into a [`TextLayer`].
#[derive(Clone, Debug, PartialEq)]
pub struct TextRecord {
    /// The host's key for this text.
    pub text_id: u32,
    /// Top-left corner in picture coordinates.
    pub position: Point,
    /// The string being shown.
    pub text: String,
}

/// A block of rendered text.
///
/// Rasterizing is the host's job. Until [`set_image`](Self::set_image) is
/// called the layer has zero-size bounds and draws nothing; a change of string
/// drops the image again.
#[derive(Debug)]
pub struct TextLayer<I> {
    base: LayerBase,
    record: TextRecord,
    image: Option<Arc<I>>,
}

impl<I> TextLayer<I> {
    pub(crate) fn new(id: LayerId, z_order: i32, record: &TextRecord) -> Self {
        Self {
            base: LayerBase::new(
                id,
                Rect::from_origin_size(record.position, Size::ZERO),
                z_order,
                false,
            ),
            record: record.clone(),
            image: None,
        }
    }

    /// The host's text key.
    #[must_use]
    pub fn text_id(&self) -> u32 {
        self.record.text_id
    }

    /// The string being shown.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.record.text
    }

    /// Top-left corner.
    #[must_use]
    pub fn position(&self) -> Point {
        self.record.position
    }

    /// The rendered image, if one has been supplied.
    #[must_use]
    pub fn cached_image(&self) -> Option<&Arc<I>> {
        self.image.as_ref()
    }

    /// `true` until the host supplies a render for the current string.
    ///
    /// New layers, string changes, and [`Layer::invalidate`] all leave the
    /// layer blank, and it is skipped by compositing until
    /// [`set_image`](Self::set_image) is called.
    #[must_use]
    pub fn needs_render(&self) -> bool {
        self.image.is_none()
    }

    fn image_size(&self) -> Size
    where
        I: Image,
    {
        self.image.as_deref().map_or(Size::ZERO, Image::size)
    }
}

impl<I: Image> TextLayer<I> {
    /// Mirrors the host's record. A new string drops the rendered image.
    pub fn update_from_text(&mut self, record: &TextRecord) -> bool {
        if self.record == *record {
            return false;
        }
        if self.record.text != record.text {
            drop_cache(&mut self.image);
        }
        self.record.clone_from(record);
        let bounds = Rect::from_origin_size(record.position, self.image_size());
        self.base.set_bounds(bounds);
        self.base.mark_dirty();
        true
    }

    /// Supplies the rendered image. Bounds become position plus image size.
    pub fn set_image(&mut self, image: Arc<I>) -> bool {
        if same_image(self.image.as_ref(), Some(&image)) {
            return false;
        }
        self.base
            .set_bounds(Rect::from_origin_size(self.record.position, image.size()));
        self.image = Some(image);
        self.base.mark_dirty();
        true
    }
}

impl<I: Image> Layer<I> for TextLayer<I> {
    fn kind(&self) -> LayerKind {
        LayerKind::Text
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn image(&mut self) -> Option<Arc<I>> {
        self.image.clone()
    }

    fn invalidate(&mut self) {
        if drop_cache(&mut self.image) {
            self.base
                .set_bounds(Rect::from_origin_size(self.record.position, Size::ZERO));
        }
        self.base.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_image::PixelImage;
    use scenery_core::Rgba;

    fn record(text: &str) -> TextRecord {
        TextRecord {
            text_id: 3,
            position: Point::new(10.0, 10.0),
            text: text.into(),
        }
    }

    #[test]
    fn bounds_appear_once_rendered() {
        let mut text = TextLayer::<PixelImage>::new(LayerId(1), 2, &record("hi"));
        assert!(text.bounds().is_zero_area());
        assert!(text.needs_render());

        assert!(text.set_image(Arc::new(PixelImage::solid(40, 10, Rgba::BLACK))));
        assert_eq!(text.bounds(), Rect::new(10.0, 10.0, 50.0, 20.0));
        assert!(!text.needs_render());
        assert_eq!(text.text_id(), 3);
    }

    #[test]
    fn moving_keeps_image_new_string_drops_it() {
        let mut text = TextLayer::new(LayerId(1), 2, &record("hi"));
        text.set_image(Arc::new(PixelImage::solid(40, 10, Rgba::BLACK)));

        let mut moved = record("hi");
        moved.position = Point::new(0.0, 100.0);
        assert!(text.update_from_text(&moved));
        assert_eq!(text.bounds(), Rect::new(0.0, 100.0, 40.0, 110.0));
        assert!(text.cached_image().is_some());

        assert!(!text.update_from_text(&moved));

        let mut changed = moved;
        changed.text = "bye".into();
        assert!(text.update_from_text(&changed));
        assert_eq!(text.text(), "bye");
        assert!(text.cached_image().is_none());
        assert!(text.bounds().is_zero_area());
    }

    #[test]
    fn invalidate_forgets_render() {
        let mut text = TextLayer::new(LayerId(1), 2, &record("hi"));
        text.set_image(Arc::new(PixelImage::solid(40, 10, Rgba::BLACK)));
        text.clear_dirty();
        text.invalidate();
        assert!(text.is_dirty());
        assert!(text.image().is_none());
        assert!(text.needs_render());
    }
}

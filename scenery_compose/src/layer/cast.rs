// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kurbo::{Point, Rect};
use scenery_core::{Image, Rgba};

use super::{Layer, LayerBase, LayerKind, drop_cache, same_image};
use crate::id::{CastId, LayerId, PictureId};

/// The host's description of a cast, mirrored into a [`CastLayer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CastRecord {
    /// The host's key for this cast.
    pub cast_id: CastId,
    /// Picture the pixels are cut from.
    pub source_picture: PictureId,
    /// Where the cast is shown, in destination picture coordinates.
    pub position: Point,
    /// Rectangle of the source picture to show.
    pub source_rect: Rect,
    /// Pixels of this colour become transparent.
    pub color_key: Option<Rgba>,
}

/// A sprite instance cut from a source picture.
///
/// The drawable image is derived: the source rectangle of the source image,
/// colour-keyed if a key is set. It is built lazily and cached until the
/// source, rectangle, or key changes.
#[derive(Debug)]
pub struct CastLayer<I> {
    base: LayerBase,
    record: CastRecord,
    source: Option<Arc<I>>,
    cached: Option<Arc<I>>,
}

impl<I> CastLayer<I> {
    pub(crate) fn new(
        id: LayerId,
        z_order: i32,
        record: &CastRecord,
        source: Option<Arc<I>>,
    ) -> Self {
        Self {
            base: LayerBase::new(id, cast_bounds(record), z_order, false),
            record: *record,
            source,
            cached: None,
        }
    }

    /// The host's cast key.
    #[must_use]
    pub fn cast_id(&self) -> CastId {
        self.record.cast_id
    }

    /// Picture the pixels come from.
    #[must_use]
    pub fn source_picture(&self) -> PictureId {
        self.record.source_picture
    }

    /// The mirrored record.
    #[must_use]
    pub fn record(&self) -> &CastRecord {
        &self.record
    }

    /// The whole source picture image, if known.
    #[must_use]
    pub fn source_image(&self) -> Option<&Arc<I>> {
        self.source.as_ref()
    }

    /// The derived image, if it has been built and not invalidated since.
    #[must_use]
    pub fn cached_image(&self) -> Option<&Arc<I>> {
        self.cached.as_ref()
    }

    /// Mirrors the host's record.
    ///
    /// Moving only updates the bounds. A new source picture, source rectangle,
    /// or colour key also drops the cached image. Returns whether anything
    /// changed.
    pub fn update_from_cast(&mut self, record: &CastRecord) -> bool {
        if self.record == *record {
            return false;
        }
        let old = self.record;
        self.record = *record;
        if old.source_picture != record.source_picture
            || old.source_rect != record.source_rect
            || old.color_key != record.color_key
        {
            drop_cache(&mut self.cached);
        }
        self.base.set_bounds(cast_bounds(record));
        self.base.mark_dirty();
        true
    }

    /// Supplies the source picture's image. A different image drops the cache.
    pub fn set_source_image(&mut self, source: Option<Arc<I>>) -> bool {
        if same_image(self.source.as_ref(), source.as_ref()) {
            return false;
        }
        self.source = source;
        drop_cache(&mut self.cached);
        self.base.mark_dirty();
        true
    }
}

impl<I: Image> Layer<I> for CastLayer<I> {
    fn kind(&self) -> LayerKind {
        LayerKind::Cast
    }

    fn base(&self) -> &LayerBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut LayerBase {
        &mut self.base
    }

    fn image(&mut self) -> Option<Arc<I>> {
        if let Some(cached) = &self.cached {
            return Some(Arc::clone(cached));
        }
        let source = self.source.as_ref()?;
        let mut image = source.sub_image(self.record.source_rect)?;
        if let Some(key) = self.record.color_key {
            image = image.with_color_key(key);
        }
        let image = Arc::new(image);
        self.cached = Some(Arc::clone(&image));
        Some(image)
    }

    fn invalidate(&mut self) {
        drop_cache(&mut self.cached);
        self.base.mark_dirty();
    }
}

fn cast_bounds(record: &CastRecord) -> Rect {
    Rect::from_origin_size(record.position, record.source_rect.abs().size())
}

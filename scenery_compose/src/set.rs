// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-picture layer sets.
//!
//! A [`PictureLayerSet`] stacks every drawable of one picture in strict
//! operation order. The background sits at z-order 0; every other layer takes
//! the next value of one shared counter when it is added, so casts, texts, and
//! drawing operations interleave exactly as they were issued.
//!
//! Compositing follows a check-then-paint pattern:
//!
//! 1. **Check**: an empty visible rectangle, or a clean set whose buffer
//!    already covers the same rectangle, returns the cached buffer.
//! 2. **Paint**: otherwise the buffer is cleared and every layer is drawn back
//!    to front, skipping layers outside the visible rectangle and layers
//!    hidden under an opaque upper layer. All dirty state is then cleared.

use std::sync::Arc;

use kurbo::{Point, Rect};
use scenery_core::trace::{CompositeEvent, Tracer};
use scenery_core::{Image, ImageBuffer};

#[cfg(feature = "trace-rich")]
use scenery_core::trace::{DamageRect, LayerChange, LayerField};

use crate::config::CompositorConfig;
use crate::cull::{is_occluded, is_visible_in};
use crate::damage::DirtyRegion;
use crate::error::ComposeError;
use crate::geometry::pixel_extent;
use crate::id::{CastId, LayerId, LayerIdAllocator, PictureId};
use crate::layer::{
    BackgroundLayer, CastLayer, CastRecord, DrawingEntry, DrawingLayer, Layer, LayerBase,
    LayerKind, TextLayer, TextRecord,
};

/// Every layer of one picture, plus its dirty state and composite cache.
#[derive(Debug)]
pub struct PictureLayerSet<I> {
    picture: PictureId,
    background: Option<BackgroundLayer<I>>,
    drawing: Option<DrawingLayer<I>>,
    entries: Vec<DrawingEntry<I>>,
    casts: Vec<CastLayer<I>>,
    texts: Vec<TextLayer<I>>,
    next_z_order: i32,
    dirty_region: DirtyRegion,
    full_dirty: bool,
    buffer: Option<I>,
    buffer_rect: Rect,
    ids: LayerIdAllocator,
    config: CompositorConfig,
    #[cfg(feature = "trace-rich")]
    changes: Vec<LayerChange>,
}

impl<I> PictureLayerSet<I> {
    /// Creates an empty set drawing ids from `ids`.
    #[must_use]
    pub fn new(picture: PictureId, ids: LayerIdAllocator, config: CompositorConfig) -> Self {
        Self {
            picture,
            background: None,
            drawing: None,
            entries: Vec::new(),
            casts: Vec::new(),
            texts: Vec::new(),
            next_z_order: 1,
            dirty_region: DirtyRegion::new(),
            full_dirty: true,
            buffer: None,
            buffer_rect: Rect::ZERO,
            ids,
            config,
            #[cfg(feature = "trace-rich")]
            changes: Vec::new(),
        }
    }

    /// The picture this set belongs to.
    #[must_use]
    pub fn picture(&self) -> PictureId {
        self.picture
    }

    /// Compositing options.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Replaces the compositing options and forces a repaint.
    pub fn set_config(&mut self, config: CompositorConfig) {
        if self.config != config {
            self.config = config;
            self.full_dirty = true;
        }
    }

    /// The z-order the next added layer will receive.
    #[must_use]
    pub fn next_z_order(&self) -> i32 {
        self.next_z_order
    }

    // -- Lookup --

    /// The background layer, if set.
    #[must_use]
    pub fn background(&self) -> Option<&BackgroundLayer<I>> {
        self.background.as_ref()
    }

    /// The legacy drawing layer, if set.
    #[must_use]
    pub fn drawing_layer(&self) -> Option<&DrawingLayer<I>> {
        self.drawing.as_ref()
    }

    /// Drawing entries in insertion order.
    #[must_use]
    pub fn drawing_entries(&self) -> &[DrawingEntry<I>] {
        &self.entries
    }

    /// Cast layers in insertion order.
    #[must_use]
    pub fn casts(&self) -> &[CastLayer<I>] {
        &self.casts
    }

    /// Text layers in insertion order.
    #[must_use]
    pub fn texts(&self) -> &[TextLayer<I>] {
        &self.texts
    }

    /// The layer mirroring `cast`.
    #[must_use]
    pub fn cast_layer(&self, cast: CastId) -> Option<&CastLayer<I>> {
        self.casts.iter().find(|c| c.cast_id() == cast)
    }

    /// Mutable access to the layer mirroring `cast`.
    ///
    /// Edits made through the layer mark it dirty but do not record the area
    /// it used to cover; prefer [`update_cast`](Self::update_cast) for moves.
    pub fn cast_layer_mut(&mut self, cast: CastId) -> Option<&mut CastLayer<I>> {
        self.casts.iter_mut().find(|c| c.cast_id() == cast)
    }

    /// The drawing entry with the given id.
    #[must_use]
    pub fn drawing_entry(&self, id: LayerId) -> Option<&DrawingEntry<I>> {
        self.entries.iter().find(|e| e.base().id() == id)
    }

    /// Number of layers of one kind.
    #[must_use]
    pub fn count(&self, kind: LayerKind) -> usize {
        match kind {
            LayerKind::Background => usize::from(self.background.is_some()),
            LayerKind::Drawing => usize::from(self.drawing.is_some()),
            LayerKind::DrawingEntry => self.entries.len(),
            LayerKind::Cast => self.casts.len(),
            LayerKind::Text => self.texts.len(),
        }
    }

    /// Total number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.background.is_some())
            + usize::from(self.drawing.is_some())
            + self.entries.len()
            + self.casts.len()
            + self.texts.len()
    }

    /// Returns `true` if the set holds no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last composite, if any.
    #[must_use]
    pub fn composite_buffer(&self) -> Option<&I> {
        self.buffer.as_ref()
    }

    /// The visible rectangle the last composite covered.
    #[must_use]
    pub fn composite_rect(&self) -> Option<Rect> {
        self.buffer.as_ref().map(|_| self.buffer_rect)
    }

    // -- Dirty tracking --

    /// Marks `rect` as needing a repaint. Empty rectangles are ignored.
    pub fn add_dirty_region(&mut self, rect: Rect) {
        self.dirty_region.add(rect);
    }

    /// The union of everything marked since the last clear.
    #[must_use]
    pub fn dirty_region(&self) -> &DirtyRegion {
        &self.dirty_region
    }

    /// Empties the dirty region and clears the full-dirty flag.
    ///
    /// Per-layer dirty flags are left alone; see
    /// [`clear_all_dirty_flags`](Self::clear_all_dirty_flags).
    pub fn clear_dirty_region(&mut self) {
        self.dirty_region.clear();
        self.full_dirty = false;
    }

    /// Forces the next composite to repaint.
    pub fn mark_full_dirty(&mut self) {
        self.full_dirty = true;
    }

    /// Whether a structural change requires a full repaint.
    #[must_use]
    pub fn is_full_dirty(&self) -> bool {
        self.full_dirty
    }

    fn next_z(&mut self) -> i32 {
        let z = self.next_z_order;
        self.next_z_order = z.saturating_add(1);
        z
    }

    /// Records that a layer went away.
    fn forget(&mut self, base: &LayerBase) {
        self.dirty_region.add(base.bounds());
        self.full_dirty = true;
        #[cfg(feature = "trace-rich")]
        self.note(base.id(), LayerField::Removed);
    }

    #[cfg(feature = "trace-rich")]
    fn note(&mut self, id: LayerId, field: LayerField) {
        self.changes.push(LayerChange {
            layer_id: id.get(),
            field,
        });
    }
}

impl<I: Image> PictureLayerSet<I> {
    /// The cast layer with the given layer id.
    #[must_use]
    pub fn cast_layer_by_id(&self, id: LayerId) -> Option<&CastLayer<I>> {
        self.casts.iter().find(|c| c.base().id() == id)
    }

    /// The text layer with the given id.
    #[must_use]
    pub fn text_layer(&self, id: LayerId) -> Option<&TextLayer<I>> {
        self.texts.iter().find(|t| t.base().id() == id)
    }

    /// Mutable access to a text layer, for supplying its rendered image.
    pub fn text_layer_mut(&mut self, id: LayerId) -> Option<&mut TextLayer<I>> {
        self.texts.iter_mut().find(|t| t.base().id() == id)
    }

    // -- Insertion --

    /// Sets or replaces the background image. The background keeps its id
    /// and z-order 0 across replacements.
    pub fn set_background(&mut self, image: Arc<I>) -> LayerId {
        self.full_dirty = true;
        if let Some(bg) = &mut self.background {
            let (id, old) = (bg.id(), bg.bounds());
            if bg.set_image(image) {
                self.dirty_region.add(old);
                #[cfg(feature = "trace-rich")]
                self.note(id, LayerField::Image);
            }
            return id;
        }
        let bg = BackgroundLayer::new(self.ids.next(), image);
        let id = bg.id();
        self.background = Some(bg);
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Added);
        id
    }

    /// Sets or replaces the legacy drawing canvas. The first call takes the
    /// next z-order; replacements keep it.
    pub fn set_drawing_layer(&mut self, image: Arc<I>) -> LayerId {
        self.full_dirty = true;
        if let Some(drawing) = &mut self.drawing {
            drawing.set_image(image);
            return drawing.id();
        }
        let z = self.next_z();
        let drawing = DrawingLayer::new(self.ids.next(), z, image);
        let id = drawing.id();
        self.drawing = Some(drawing);
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Added);
        id
    }

    /// Adds a layer mirroring `record`.
    ///
    /// `source` is the source picture's image; it may be supplied later with
    /// [`CastLayer::set_source_image`].
    pub fn add_cast_layer(&mut self, record: &CastRecord, source: Option<Arc<I>>) -> LayerId {
        let z = self.next_z();
        let layer = CastLayer::new(self.ids.next(), z, record, source);
        let id = layer.id();
        self.casts.push(layer);
        self.added(id);
        id
    }

    /// Adds a text layer. The rendered image may come later through
    /// [`text_layer_mut`](Self::text_layer_mut).
    pub fn add_text_layer(&mut self, record: &TextRecord, image: Option<Arc<I>>) -> LayerId {
        let z = self.next_z();
        let mut layer = TextLayer::new(self.ids.next(), z, record);
        if let Some(image) = image {
            layer.set_image(image);
        }
        let id = layer.id();
        self.texts.push(layer);
        self.added(id);
        id
    }

    /// Records one draw or transfer operation whose result is `image`,
    /// placed at `at`.
    ///
    /// Returns `None`, consuming no z-order, when the image has no area.
    pub fn add_drawing_entry(&mut self, image: Arc<I>, at: Point) -> Option<LayerId> {
        if Rect::from_origin_size(at, image.size()).is_zero_area() {
            return None;
        }
        let z = self.next_z();
        let entry = DrawingEntry::new(self.ids.next(), z, image, at)?;
        let id = entry.id();
        self.entries.push(entry);
        self.added(id);
        Some(id)
    }

    fn added(&mut self, id: LayerId) {
        self.full_dirty = true;
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Added);
        #[cfg(not(feature = "trace-rich"))]
        {
            _ = id;
        }
    }

    // -- Update --

    /// Mirrors a cast record into its layer, marking both the old and the new
    /// bounds dirty.
    pub fn update_cast(&mut self, record: &CastRecord) -> Result<bool, ComposeError> {
        let layer = self
            .casts
            .iter_mut()
            .find(|c| c.cast_id() == record.cast_id)
            .ok_or(ComposeError::CastNotFound(record.cast_id))?;
        let old = layer.bounds();
        if !layer.update_from_cast(record) {
            return Ok(false);
        }
        let new = layer.bounds();
        #[cfg(feature = "trace-rich")]
        let id = layer.id();
        self.dirty_region.add(old);
        self.dirty_region.add(new);
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Bounds);
        Ok(true)
    }

    /// Mirrors a text record into its layer, marking both the old and the
    /// new bounds dirty.
    pub fn update_text(&mut self, id: LayerId, record: &TextRecord) -> Result<bool, ComposeError> {
        let layer = self
            .texts
            .iter_mut()
            .find(|t| t.base().id() == id)
            .ok_or(ComposeError::LayerNotFound(id))?;
        let old = layer.bounds();
        if !layer.update_from_text(record) {
            return Ok(false);
        }
        let new = layer.bounds();
        self.dirty_region.add(old);
        self.dirty_region.add(new);
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Bounds);
        Ok(true)
    }

    /// Shows or hides any layer, marking its bounds dirty on change.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> Result<bool, ComposeError> {
        let layer = self.layer_mut(id).ok_or(ComposeError::LayerNotFound(id))?;
        if !layer.set_visible(visible) {
            return Ok(false);
        }
        let bounds = layer.bounds();
        self.dirty_region.add(bounds);
        #[cfg(feature = "trace-rich")]
        self.note(id, LayerField::Visibility);
        Ok(true)
    }

    // -- Removal --

    /// Removes the layer mirroring `cast`.
    pub fn remove_cast_layer(&mut self, cast: CastId) -> bool {
        let removed = take_first(&mut self.casts, |c| c.cast_id() == cast);
        self.removed(removed.as_ref().map(Layer::base))
    }

    /// Removes a cast layer by layer id.
    pub fn remove_cast_layer_by_id(&mut self, id: LayerId) -> bool {
        let removed = take_first(&mut self.casts, |c| c.base().id() == id);
        self.removed(removed.as_ref().map(Layer::base))
    }

    /// Removes a text layer.
    pub fn remove_text_layer(&mut self, id: LayerId) -> bool {
        let removed = take_first(&mut self.texts, |t| t.base().id() == id);
        self.removed(removed.as_ref().map(Layer::base))
    }

    /// Removes one drawing entry.
    pub fn remove_drawing_entry(&mut self, id: LayerId) -> bool {
        let removed = take_first(&mut self.entries, |e| e.base().id() == id);
        self.removed(removed.as_ref().map(Layer::base))
    }

    /// Removes every drawing entry (a "clear screen" on the picture).
    pub fn clear_drawing_entries(&mut self) -> bool {
        let removed = std::mem::take(&mut self.entries);
        removed
            .iter()
            .fold(false, |any, e| self.removed(Some(e.base())) || any)
    }

    /// Removes every cast layer.
    pub fn clear_casts(&mut self) -> bool {
        let removed = std::mem::take(&mut self.casts);
        removed
            .iter()
            .fold(false, |any, c| self.removed(Some(c.base())) || any)
    }

    /// Removes every text layer.
    pub fn clear_texts(&mut self) -> bool {
        let removed = std::mem::take(&mut self.texts);
        removed
            .iter()
            .fold(false, |any, t| self.removed(Some(t.base())) || any)
    }

    /// Removes the background.
    pub fn clear_background(&mut self) -> bool {
        let removed = self.background.take();
        self.removed(removed.as_ref().map(Layer::base))
    }

    /// Removes the legacy drawing canvas.
    pub fn clear_drawing_layer(&mut self) -> bool {
        let removed = self.drawing.take();
        self.removed(removed.as_ref().map(Layer::base))
    }

    fn removed(&mut self, base: Option<&LayerBase>) -> bool {
        base.is_some_and(|base| {
            self.forget(base);
            true
        })
    }

    // -- Layer queries --

    /// Any layer by id.
    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<&dyn Layer<I>> {
        self.layers_unsorted().into_iter().find(|l| l.id() == id)
    }

    /// Any layer by id, mutably.
    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut dyn Layer<I>> {
        self.layers_unsorted_mut().into_iter().find(|l| l.id() == id)
    }

    /// Every layer in paint order (ascending z-order).
    #[must_use]
    pub fn layers_sorted(&self) -> Vec<&dyn Layer<I>> {
        let mut layers = self.layers_unsorted();
        layers.sort_by_key(|l| l.z_order());
        layers
    }

    /// Every layer, of any kind, with a z-order strictly above `z_order`.
    #[must_use]
    pub fn upper_layers(&self, z_order: i32) -> Vec<&dyn Layer<I>> {
        let mut layers = self.layers_sorted();
        layers.retain(|l| l.z_order() > z_order);
        layers
    }

    /// `true` if anything changed since the last composite.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.full_dirty
            || !self.dirty_region.is_empty()
            || self.layers_unsorted().iter().any(|l| l.is_dirty())
    }

    /// Resets the full-dirty flag, the dirty region, and every layer's flag.
    pub fn clear_all_dirty_flags(&mut self) {
        self.full_dirty = false;
        self.dirty_region.clear();
        for layer in self.layers_unsorted_mut() {
            layer.clear_dirty();
        }
    }

    /// Drops every derived image (cast cut-outs, text renders) and forces a
    /// repaint, for when the host's pixels changed behind the layers' backs.
    ///
    /// Casts rebuild their cut-outs on the next composite, but text layers
    /// stay blank until the host supplies a new render; those layers report
    /// [`TextLayer::needs_render`].
    pub fn invalidate_all(&mut self) {
        for layer in self.layers_unsorted_mut() {
            layer.invalidate();
        }
        self.full_dirty = true;
    }

    fn layers_unsorted(&self) -> Vec<&dyn Layer<I>> {
        let mut out: Vec<&dyn Layer<I>> = Vec::with_capacity(self.len());
        if let Some(bg) = &self.background {
            out.push(bg);
        }
        if let Some(drawing) = &self.drawing {
            out.push(drawing);
        }
        out.extend(self.entries.iter().map(|l| l as &dyn Layer<I>));
        out.extend(self.casts.iter().map(|l| l as &dyn Layer<I>));
        out.extend(self.texts.iter().map(|l| l as &dyn Layer<I>));
        out
    }

    fn layers_unsorted_mut(&mut self) -> Vec<&mut dyn Layer<I>> {
        let mut out: Vec<&mut dyn Layer<I>> = Vec::with_capacity(self.len());
        if let Some(bg) = &mut self.background {
            out.push(bg);
        }
        if let Some(drawing) = &mut self.drawing {
            out.push(drawing);
        }
        out.extend(self.entries.iter_mut().map(|l| l as &mut dyn Layer<I>));
        out.extend(self.casts.iter_mut().map(|l| l as &mut dyn Layer<I>));
        out.extend(self.texts.iter_mut().map(|l| l as &mut dyn Layer<I>));
        out
    }
}

impl<I: ImageBuffer> PictureLayerSet<I> {
    /// Composites the layers inside `visible_rect` and returns the buffer.
    ///
    /// The buffer covers exactly `visible_rect`, with its top-left pixel at
    /// `visible_rect`'s origin. Returns `None` only when no buffer can be
    /// allocated.
    pub fn composite(&mut self, visible_rect: Rect) -> Option<&I> {
        self.composite_traced(visible_rect, &mut Tracer::none())
    }

    /// Like [`composite`](Self::composite), reporting to `tracer`.
    pub fn composite_traced(&mut self, visible_rect: Rect, tracer: &mut Tracer<'_>) -> Option<&I> {
        let visible_rect = visible_rect.abs();
        let mut event = CompositeEvent {
            surface: self.picture.0,
            visible_rect: [
                visible_rect.x0,
                visible_rect.y0,
                visible_rect.x1,
                visible_rect.y1,
            ],
            reused: true,
            drawn: 0,
            culled: 0,
            clipped: 0,
        };
        if visible_rect.is_zero_area() {
            return self.buffer.as_ref();
        }
        if self.buffer.is_some() && self.buffer_rect == visible_rect && !self.is_dirty() {
            tracer.composite(&event);
            return self.buffer.as_ref();
        }

        let (width, height) = (
            pixel_extent(visible_rect.width()),
            pixel_extent(visible_rect.height()),
        );
        let mut buffer = match self.buffer.take() {
            Some(buffer) if buffer.width() == width && buffer.height() == height => buffer,
            _ => I::blank(width, height)?,
        };
        buffer.fill(self.config.clear_color);

        #[cfg(feature = "trace-rich")]
        {
            let damage: Vec<DamageRect> = if self.full_dirty {
                vec![DamageRect::from_rect(visible_rect)]
            } else {
                self.dirty_region
                    .bounds()
                    .map(DamageRect::from_rect)
                    .into_iter()
                    .collect()
            };
            tracer.damage_rects(self.picture.0, &damage);
            if !self.changes.is_empty() {
                tracer.layer_changes(self.picture.0, &self.changes);
                self.changes.clear();
            }
        }

        let culling = self.config.occlusion_culling;
        let mut layers = self.layers_unsorted_mut();
        layers.sort_by_key(|l| l.z_order());
        let bases: Vec<LayerBase> = layers.iter().map(|l| *l.base()).collect();
        // A layer without an image paints nothing, so it can never occlude.
        let images: Vec<Option<Arc<I>>> = layers
            .iter_mut()
            .zip(&bases)
            .map(|(layer, base)| {
                if is_visible_in(base, visible_rect) {
                    layer.image()
                } else {
                    None
                }
            })
            .collect();
        let (mut drawn, mut culled, mut clipped) = (0_u32, 0_u32, 0_u32);
        for (i, base) in bases.iter().enumerate() {
            if !is_visible_in(base, visible_rect) {
                clipped += 1;
                continue;
            }
            let uppers = bases[i + 1..]
                .iter()
                .zip(&images[i + 1..])
                .filter(|(u, image)| image.is_some() && u.z_order() > base.z_order())
                .map(|(u, _)| u);
            if culling && is_occluded(base, uppers) {
                culled += 1;
                continue;
            }
            let Some(image) = &images[i] else {
                clipped += 1;
                continue;
            };
            let at = (base.bounds().origin() - visible_rect.origin()).to_point();
            buffer.draw_image(image, at, 1.0);
            drawn += 1;
        }

        self.clear_all_dirty_flags();
        self.buffer = Some(buffer);
        self.buffer_rect = visible_rect;

        log::trace!(
            "{:?}: composited {drawn} layers ({culled} culled, {clipped} clipped)",
            self.picture
        );
        event.reused = false;
        event.drawn = drawn;
        event.culled = culled;
        event.clipped = clipped;
        tracer.composite(&event);
        self.buffer.as_ref()
    }
}

/// Removes and returns the first element matching `pred`, keeping the order of
/// the rest.
fn take_first<T>(list: &mut Vec<T>, pred: impl FnMut(&T) -> bool) -> Option<T> {
    let pos = list.iter().position(pred)?;
    Some(list.remove(pos))
}

#[cfg(test)]
mod tests {
    use kurbo::Size;
    use scenery_core::Rgba;

    use super::*;
    use crate::test_image::PixelImage;

    const RED: Rgba = Rgba::rgb(255, 0, 0);
    const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    const BLUE: Rgba = Rgba::rgb(0, 0, 255);

    fn set() -> PictureLayerSet<PixelImage> {
        PictureLayerSet::new(
            PictureId(0),
            LayerIdAllocator::new(),
            CompositorConfig::default(),
        )
    }

    fn solid(w: u32, h: u32, color: Rgba) -> Arc<PixelImage> {
        Arc::new(PixelImage::solid(w, h, color))
    }

    fn cast(id: u32, x: f64, y: f64, size: f64) -> CastRecord {
        CastRecord {
            cast_id: CastId(id),
            source_picture: PictureId(9),
            position: Point::new(x, y),
            source_rect: Rect::from_origin_size(Point::ORIGIN, Size::new(size, size)),
            color_key: None,
        }
    }

    fn text(id: u32, x: f64, y: f64) -> TextRecord {
        TextRecord {
            text_id: id,
            position: Point::new(x, y),
            text: "hello".into(),
        }
    }

    #[test]
    fn scenario_background_cast_text() {
        let mut set = set();
        let bg = set.set_background(solid(640, 480, Rgba::WHITE));
        let c = set.add_cast_layer(&cast(1, 10.0, 10.0, 32.0), Some(solid(64, 64, RED)));
        let t = set.add_text_layer(&text(1, 10.0, 10.0), Some(solid(40, 10, BLUE)));

        assert_eq!(set.layer(bg).unwrap().z_order(), 0);
        assert_eq!(set.layer(c).unwrap().z_order(), 1);
        assert_eq!(set.layer(t).unwrap().z_order(), 2);
        assert_eq!(
            set.layer(bg).unwrap().bounds(),
            Rect::new(0.0, 0.0, 640.0, 480.0)
        );

        let out = set.composite(Rect::new(0.0, 0.0, 640.0, 480.0)).unwrap();
        assert_eq!(out.pixel(15, 15), Some(BLUE), "text paints over cast");
        assert_eq!(out.pixel(15, 30), Some(RED), "cast below the text");
        assert_eq!(out.pixel(5, 5), Some(Rgba::WHITE));
        assert_eq!(out.pixel(100, 100), Some(Rgba::WHITE));
        assert!(!set.is_dirty());
    }

    #[test]
    fn scenario_remove_right_after_add() {
        let mut set = set();
        set.add_cast_layer(&cast(1, 0.0, 0.0, 50.0), None);
        set.clear_all_dirty_flags();

        assert!(set.remove_cast_layer(CastId(1)));
        assert_eq!(
            set.dirty_region().bounds(),
            Some(Rect::new(0.0, 0.0, 50.0, 50.0))
        );
        assert!(set.is_full_dirty());
        assert!(!set.remove_cast_layer(CastId(1)), "already gone");
    }

    #[test]
    fn z_orders_interleave_across_kinds() {
        let mut set = set();
        let a = set.add_cast_layer(&cast(1, 0.0, 0.0, 4.0), None);
        let b = set
            .add_drawing_entry(solid(4, 4, RED), Point::ORIGIN)
            .unwrap();
        let c = set.add_text_layer(&text(1, 0.0, 0.0), None);
        let d = set.add_cast_layer(&cast(2, 0.0, 0.0, 4.0), None);
        let bg = set.set_background(solid(8, 8, Rgba::WHITE));

        let order: Vec<LayerId> = set.layers_sorted().iter().map(|l| l.id()).collect();
        assert_eq!(order, vec![bg, a, b, c, d]);
        let z: Vec<i32> = set.layers_sorted().iter().map(|l| l.z_order()).collect();
        assert_eq!(z, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn z_orders_are_never_reused_after_removal() {
        let mut set = set();
        set.add_cast_layer(&cast(1, 0.0, 0.0, 4.0), None);
        let b = set.add_cast_layer(&cast(2, 0.0, 0.0, 4.0), None);
        set.remove_cast_layer_by_id(b);
        let c = set.add_cast_layer(&cast(3, 0.0, 0.0, 4.0), None);
        assert_eq!(set.layer(c).unwrap().z_order(), 3);
    }

    #[test]
    fn empty_drawing_entry_is_ignored() {
        let mut set = set();
        assert!(
            set.add_drawing_entry(solid(0, 4, RED), Point::ORIGIN)
                .is_none()
        );
        assert_eq!(set.next_z_order(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn drawing_layer_keeps_first_z() {
        let mut set = set();
        let d = set.set_drawing_layer(solid(8, 8, RED));
        set.add_cast_layer(&cast(1, 0.0, 0.0, 4.0), None);
        let again = set.set_drawing_layer(solid(8, 8, GREEN));
        assert_eq!(d, again);
        assert_eq!(set.drawing_layer().unwrap().z_order(), 1);
        assert!(set.clear_drawing_layer());
        assert!(set.drawing_layer().is_none());
    }

    #[test]
    fn removal_keeps_order_of_the_rest() {
        let mut set = set();
        for id in 1..=4 {
            set.add_cast_layer(&cast(id, 0.0, 0.0, 4.0), None);
        }
        assert!(set.remove_cast_layer(CastId(2)));
        let ids: Vec<CastId> = set.casts().iter().map(CastLayer::cast_id).collect();
        assert_eq!(ids, vec![CastId(1), CastId(3), CastId(4)]);
    }

    #[test]
    fn bulk_clears_union_bounds() {
        let mut set = set();
        set.add_drawing_entry(solid(10, 10, RED), Point::new(0.0, 0.0));
        set.add_drawing_entry(solid(10, 10, RED), Point::new(50.0, 50.0));
        set.clear_all_dirty_flags();

        assert!(set.clear_drawing_entries());
        assert_eq!(
            set.dirty_region().bounds(),
            Some(Rect::new(0.0, 0.0, 60.0, 60.0))
        );
        assert!(!set.clear_drawing_entries());
        assert!(!set.clear_casts());
        assert!(!set.clear_texts());
        assert!(!set.clear_background());
    }

    #[test]
    fn clear_all_dirty_flags_resets_everything() {
        let mut set = set();
        set.set_background(solid(8, 8, Rgba::WHITE));
        set.add_cast_layer(&cast(1, 0.0, 0.0, 4.0), None);
        set.add_dirty_region(Rect::new(0.0, 0.0, 3.0, 3.0));
        assert!(set.is_dirty());

        set.clear_all_dirty_flags();
        assert!(!set.is_dirty());
        assert!(!set.is_full_dirty());
        assert!(set.dirty_region().is_empty());
        assert!(set.layers_sorted().iter().all(|l| !l.is_dirty()));
    }

    #[test]
    fn layer_edits_make_the_set_dirty() {
        let mut set = set();
        let t = set.add_text_layer(&text(1, 0.0, 0.0), None);
        set.clear_all_dirty_flags();
        set.text_layer_mut(t).unwrap().set_image(solid(4, 4, RED));
        assert!(set.is_dirty());
        assert!(set.dirty_region().is_empty(), "only the layer flag is set");
    }

    #[test]
    fn update_cast_marks_old_and_new_bounds() {
        let mut set = set();
        set.add_cast_layer(&cast(1, 0.0, 0.0, 10.0), None);
        set.clear_all_dirty_flags();

        assert_eq!(set.update_cast(&cast(1, 100.0, 0.0, 10.0)), Ok(true));
        let dirty = set.dirty_region();
        assert!(dirty.contains_rect(Rect::new(0.0, 0.0, 10.0, 10.0)));
        assert!(dirty.contains_rect(Rect::new(100.0, 0.0, 110.0, 10.0)));
        assert_eq!(set.update_cast(&cast(1, 100.0, 0.0, 10.0)), Ok(false));
        assert_eq!(
            set.update_cast(&cast(5, 0.0, 0.0, 1.0)),
            Err(ComposeError::CastNotFound(CastId(5)))
        );
    }

    #[test]
    fn update_text_and_visibility_report_unknown_ids() {
        let mut set = set();
        let t = set.add_text_layer(&text(1, 0.0, 0.0), Some(solid(4, 4, RED)));
        set.clear_all_dirty_flags();
        assert_eq!(set.update_text(t, &text(1, 5.0, 5.0)), Ok(true));
        assert!(set.dirty_region().contains_rect(Rect::new(0.0, 0.0, 9.0, 9.0)));

        let bogus = LayerId(999);
        assert_eq!(
            set.update_text(bogus, &text(1, 0.0, 0.0)),
            Err(ComposeError::LayerNotFound(bogus))
        );
        assert_eq!(
            set.set_layer_visible(bogus, false),
            Err(ComposeError::LayerNotFound(bogus))
        );
        assert_eq!(set.set_layer_visible(t, false), Ok(true));
        assert_eq!(set.set_layer_visible(t, false), Ok(false));
    }

    #[test]
    fn upper_layers_are_strictly_above() {
        let mut set = set();
        set.set_background(solid(8, 8, Rgba::WHITE));
        let a = set.add_cast_layer(&cast(1, 0.0, 0.0, 4.0), None);
        let b = set.add_cast_layer(&cast(2, 0.0, 0.0, 4.0), None);
        let uppers: Vec<LayerId> = set.upper_layers(1).iter().map(|l| l.id()).collect();
        assert_eq!(uppers, vec![b]);
        let above_bg: Vec<LayerId> = set.upper_layers(0).iter().map(|l| l.id()).collect();
        assert_eq!(above_bg, vec![a, b]);
        assert!(set.upper_layers(2).is_empty());
    }

    #[test]
    fn composite_reuses_clean_buffer() {
        let mut set = set();
        set.set_background(solid(20, 20, GREEN));
        let view = Rect::new(0.0, 0.0, 20.0, 20.0);
        let first: *const PixelImage = set.composite(view).unwrap();
        let second: *const PixelImage = set.composite(view).unwrap();
        assert_eq!(first, second);
        assert!(!set.is_dirty());

        assert!(set.composite(Rect::new(3.0, 3.0, 3.0, 10.0)).is_some());
        assert_eq!(set.composite_rect(), Some(view), "empty rect keeps buffer");
    }

    #[test]
    fn composite_translates_by_visible_origin() {
        let mut set = set();
        set.set_background(solid(100, 100, Rgba::WHITE));
        set.add_drawing_entry(solid(5, 5, RED), Point::new(50.0, 50.0));

        let out = set.composite(Rect::new(40.0, 40.0, 60.0, 60.0)).unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
        assert_eq!(out.pixel(10, 10), Some(RED));
        assert_eq!(out.pixel(9, 9), Some(Rgba::WHITE));
        assert_eq!(out.pixel(15, 15), Some(Rgba::WHITE));
    }

    #[test]
    fn composite_repaints_after_changes() {
        let mut set = set();
        set.set_background(solid(10, 10, Rgba::WHITE));
        let view = Rect::new(0.0, 0.0, 10.0, 10.0);
        set.composite(view);
        set.add_drawing_entry(solid(2, 2, RED), Point::ORIGIN);
        assert_eq!(set.composite(view).unwrap().pixel(0, 0), Some(RED));

        set.clear_drawing_entries();
        assert_eq!(
            set.composite(view).unwrap().pixel(0, 0),
            Some(Rgba::WHITE)
        );
    }

    #[test]
    fn hidden_layers_are_not_drawn() {
        let mut set = set();
        set.set_background(solid(10, 10, Rgba::WHITE));
        let e = set
            .add_drawing_entry(solid(2, 2, RED), Point::ORIGIN)
            .unwrap();
        set.set_layer_visible(e, false).unwrap();
        let out = set.composite(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        assert_eq!(out.pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn clear_color_fills_uncovered_pixels() {
        let mut set = set();
        set.set_config(CompositorConfig {
            clear_color: BLUE,
            ..CompositorConfig::default()
        });
        set.add_drawing_entry(solid(2, 2, RED), Point::ORIGIN);
        let out = set.composite(Rect::new(0.0, 0.0, 4.0, 4.0)).unwrap();
        assert_eq!(out.pixel(0, 0), Some(RED));
        assert_eq!(out.pixel(3, 3), Some(BLUE));
    }

    #[test]
    fn culling_does_not_change_pixels() {
        let build = |occlusion_culling| {
            let mut set = set();
            set.set_config(CompositorConfig {
                occlusion_culling,
                ..CompositorConfig::default()
            });
            set.set_background(solid(30, 30, Rgba::WHITE));
            set.add_drawing_entry(solid(5, 5, RED), Point::new(5.0, 5.0));
            set.add_cast_layer(&cast(1, 0.0, 0.0, 20.0), Some(solid(20, 20, GREEN)));
            set.cast_layer_mut(CastId(1)).unwrap().set_opaque(true);
            set.add_text_layer(&text(1, 25.0, 25.0), Some(solid(5, 5, BLUE)));
            set.composite(Rect::new(0.0, 0.0, 30.0, 30.0)).unwrap().clone()
        };
        assert_eq!(build(true), build(false));
    }

    #[test]
    fn clear_dirty_region_clears_full_dirty() {
        let mut set = set();
        set.add_dirty_region(Rect::new(0.0, 0.0, 5.0, 5.0));
        assert!(set.is_full_dirty(), "new sets start fully dirty");

        set.clear_dirty_region();
        assert!(!set.is_full_dirty());
        assert!(set.dirty_region().is_empty());
    }

    #[test]
    fn imageless_opaque_layer_does_not_cull() {
        let build = |occlusion_culling| {
            let mut set = set();
            set.set_config(CompositorConfig {
                occlusion_culling,
                ..CompositorConfig::default()
            });
            set.add_drawing_entry(solid(4, 4, RED), Point::ORIGIN);
            set.add_cast_layer(&cast(1, 0.0, 0.0, 10.0), None);
            set.cast_layer_mut(CastId(1)).unwrap().set_opaque(true);
            set.composite(Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap().clone()
        };
        let culled = build(true);
        assert_eq!(culled.pixel(1, 1), Some(RED), "source has not arrived yet");
        assert_eq!(culled, build(false));
    }

    #[test]
    fn invalidate_all_leaves_texts_awaiting_render() {
        let mut set = set();
        let t = set.add_text_layer(&text(1, 0.0, 0.0), Some(solid(4, 4, BLUE)));
        assert!(!set.text_layer(t).unwrap().needs_render());

        set.invalidate_all();
        assert!(set.text_layer(t).unwrap().needs_render());
        assert!(set.is_full_dirty());

        set.text_layer_mut(t).unwrap().set_image(solid(4, 4, BLUE));
        assert!(!set.text_layer(t).unwrap().needs_render());
    }

    #[cfg(feature = "trace")]
    #[test]
    fn composite_reports_culled_layers() {
        use scenery_core::trace::TraceSink;

        #[derive(Default)]
        struct Last(Option<CompositeEvent>);
        impl TraceSink for Last {
            fn on_composite(&mut self, e: &CompositeEvent) {
                self.0 = Some(*e);
            }
        }

        let mut set = set();
        set.set_background(solid(30, 30, Rgba::WHITE));
        set.add_drawing_entry(solid(5, 5, RED), Point::new(5.0, 5.0));
        set.add_cast_layer(&cast(1, 0.0, 0.0, 20.0), Some(solid(20, 20, GREEN)));
        set.cast_layer_mut(CastId(1)).unwrap().set_opaque(true);
        set.add_drawing_entry(solid(5, 5, RED), Point::new(100.0, 100.0));

        let mut sink = Last::default();
        set.composite_traced(Rect::new(0.0, 0.0, 30.0, 30.0), &mut Tracer::new(&mut sink));
        let e = sink.0.unwrap();
        assert!(!e.reused);
        assert_eq!((e.drawn, e.culled, e.clipped), (2, 1, 1));

        set.composite_traced(Rect::new(0.0, 0.0, 30.0, 30.0), &mut Tracer::new(&mut sink));
        assert!(sink.0.unwrap().reused);
    }
}

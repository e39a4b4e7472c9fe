// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for scene drawing and compositing.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! scene graph and the layer compositor call at each stage. All method bodies
//! default to no-ops, so implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`LayerChange`] and [`DamageRect`]
//!   events plus the corresponding `TraceSink` methods.

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which property of a compositor layer changed.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerField {
    /// The layer was added to its set.
    Added,
    /// The layer was removed from its set.
    Removed,
    /// Bounds moved or resized.
    Bounds,
    /// Visibility flag.
    Visibility,
    /// Cached image dropped or replaced.
    Image,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a scene graph rebuilds its cached paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaintOrderEvent {
    /// Total number of nodes sorted.
    pub node_count: u32,
    /// How many of them carry a z-path.
    pub zpath_nodes: u32,
}

/// Emitted after a scene graph draw pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneDrawEvent {
    /// Nodes drawn.
    pub drawn: u32,
    /// Nodes skipped because they (or an ancestor) are hidden, or have no image.
    pub skipped: u32,
    /// Whether the paint order had to be re-sorted for this pass.
    pub resorted: bool,
}

/// Emitted after a layer set composite call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositeEvent {
    /// The picture surface that was composited.
    pub surface: u32,
    /// Requested visible rectangle `[x0, y0, x1, y1]`.
    pub visible_rect: [f64; 4],
    /// `true` if the cached buffer was returned without repainting.
    pub reused: bool,
    /// Layers drawn into the buffer.
    pub drawn: u32,
    /// Layers skipped because an opaque upper layer covers them.
    pub culled: u32,
    /// Layers skipped because they are hidden or outside the visible rectangle.
    pub clipped: u32,
}

/// A per-frame layer change record.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayerChange {
    /// Raw id of the layer that changed.
    pub layer_id: u64,
    /// Which field changed.
    pub field: LayerField,
}

/// An axis-aligned damage rectangle.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

#[cfg(feature = "trace-rich")]
impl DamageRect {
    /// Converts a [`kurbo::Rect`], rounding outwards to whole pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "damage is reported in pixel coordinates"
    )]
    pub fn from_rect(rect: kurbo::Rect) -> Self {
        let r = rect.expand();
        Self {
            x: r.x0 as i32,
            y: r.y0 as i32,
            width: r.width().max(0.0) as u32,
            height: r.height().max(0.0) as u32,
        }
    }
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from drawing and compositing.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a scene graph re-sorts its paint order.
    fn on_paint_order_rebuilt(&mut self, e: &PaintOrderEvent) {
        _ = e;
    }

    /// Called after a scene graph draw pass.
    fn on_scene_drawn(&mut self, e: &SceneDrawEvent) {
        _ = e;
    }

    /// Called after a layer set composite.
    fn on_composite(&mut self, e: &CompositeEvent) {
        _ = e;
    }

    /// Called with layer changes of one surface (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_layer_changes(&mut self, surface: u32, changes: &[LayerChange]) {
        _ = (surface, changes);
    }

    /// Called with the dirty region consumed by a composite (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_damage_rects(&mut self, surface: u32, rects: &[DamageRect]) {
        _ = (surface, rects);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PaintOrderEvent`].
    #[inline]
    pub fn paint_order_rebuilt(&mut self, e: &PaintOrderEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_paint_order_rebuilt(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SceneDrawEvent`].
    #[inline]
    pub fn scene_drawn(&mut self, e: &SceneDrawEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_scene_drawn(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`CompositeEvent`].
    #[inline]
    pub fn composite(&mut self, e: &CompositeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_composite(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits layer changes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn layer_changes(&mut self, surface: u32, changes: &[LayerChange]) {
        if let Some(s) = &mut self.sink {
            s.on_layer_changes(surface, changes);
        }
    }

    /// Emits damage rectangles (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn damage_rects(&mut self, surface: u32, rects: &[DamageRect]) {
        if let Some(s) = &mut self.sink {
            s.on_damage_rects(surface, rects);
        }
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-picture layer compositing for scenery.
//!
//! `scenery_compose` is the second half of the renderer: every drawable a
//! picture receives (background, freeform drawing, casts, text) becomes a
//! layer in that picture's [`PictureLayerSet`], stacked in strict operation
//! order, and [`PictureLayerSet::composite`] paints the stack into a cached
//! buffer only when something changed.
//!
//! # Architecture
//!
//! ```text
//!   LayerManager ──► PictureLayerSet ──► composite() ──► ImageBuffer
//!        │              (layers, DirtyRegion, cull)
//!        └─────────► WindowLayerSet ──► present() ──► screen Canvas
//! ```
//!
//! **[`layer`]**: The five layer kinds, their shared [`LayerBase`] record,
//! and the [`Layer`] trait the compositor works through.
//!
//! **[`set`]**: Insertion with one z-order counter per picture, removal with
//! dirty-region bookkeeping, and the composite pass.
//!
//! **[`cull`]**: Occlusion culling and visibility clipping predicates.
//!
//! **[`manager`]**: Lock-guarded registry of sets and windows, sharing one
//! layer id allocator.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Forwards `Tracer` events from composite
//!   passes (enables `scenery_core/trace`).
//! - `trace-rich` (disabled by default, implies `trace`): Also reports layer
//!   changes and damage rectangles.

pub mod config;
pub mod cull;
pub mod damage;
pub mod error;
mod geometry;
pub mod id;
pub mod layer;
pub mod manager;
pub mod set;
pub mod window;

#[cfg(test)]
mod test_image;

pub use config::{CompositorConfig, LayerLimits};
pub use cull::{is_layer_visible, should_skip_layer, visible_region};
pub use damage::DirtyRegion;
pub use error::ComposeError;
pub use id::{CastId, LayerId, LayerIdAllocator, PictureId, WindowId};
pub use layer::{
    BackgroundLayer, CastLayer, CastRecord, DrawingEntry, DrawingLayer, Layer, LayerBase,
    LayerKind, TextLayer, TextRecord,
};
pub use manager::{LayerManager, SharedPictureLayerSet, SharedWindowLayerSet};
pub use set::PictureLayerSet;
pub use window::{WindowLayerSet, WindowSpec};

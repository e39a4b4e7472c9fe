// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor configuration.

use scenery_core::Rgba;

use crate::layer::LayerKind;

/// Per-set compositing options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompositorConfig {
    /// Skip layers fully covered by an opaque, visible layer above them.
    ///
    /// Turning this off never changes the final pixels, only the work done.
    pub occlusion_culling: bool,
    /// Colour the composite buffer is cleared to before painting.
    pub clear_color: Rgba,
}

impl CompositorConfig {
    /// Default configuration: culling on, transparent clear.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            occlusion_culling: true,
            clear_color: Rgba::TRANSPARENT,
        }
    }
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Optional per-kind caps on the number of layers in one picture.
///
/// The caps are policy for the code that creates casts, texts, and drawing
/// operations. Layer sets never refuse an insertion; creators consult
/// [`LayerManager::ensure_capacity`](crate::LayerManager::ensure_capacity)
/// first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerLimits {
    /// Maximum cast layers per picture.
    pub max_casts: Option<usize>,
    /// Maximum text layers per picture.
    pub max_texts: Option<usize>,
    /// Maximum drawing entries per picture.
    pub max_drawing_entries: Option<usize>,
}

impl LayerLimits {
    /// No caps at all.
    pub const UNLIMITED: Self = Self {
        max_casts: None,
        max_texts: None,
        max_drawing_entries: None,
    };

    /// The cap for a layer kind. Background and drawing layers are singletons
    /// and never capped.
    #[must_use]
    pub fn limit_for(&self, kind: LayerKind) -> Option<usize> {
        match kind {
            LayerKind::Cast => self.max_casts,
            LayerKind::Text => self.max_texts,
            LayerKind::DrawingEntry => self.max_drawing_entries,
            LayerKind::Background | LayerKind::Drawing => None,
        }
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Registry of picture layer sets and windows.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use scenery_core::trace::Tracer;
use scenery_core::{Canvas, ImageBuffer};

use crate::config::{CompositorConfig, LayerLimits};
use crate::error::ComposeError;
use crate::id::{LayerId, LayerIdAllocator, PictureId, WindowId};
use crate::layer::LayerKind;
use crate::set::PictureLayerSet;
use crate::window::{WindowLayerSet, WindowSpec};

/// A layer set shared between the manager and its users.
pub type SharedPictureLayerSet<I> = Arc<RwLock<PictureLayerSet<I>>>;

/// A window record shared between the manager and its users.
pub type SharedWindowLayerSet = Arc<RwLock<WindowLayerSet>>;

/// Owns every [`PictureLayerSet`] and [`WindowLayerSet`], keyed by id.
///
/// Sets are created lazily on first access and live until deleted. Each map
/// and each set has its own reader/writer lock, so producer threads can edit
/// one picture while the render thread composites another. Map locks are
/// never held while a set lock is taken.
///
/// All sets of one manager draw layer ids from one allocator, which
/// [`clear`](Self::clear) does not reset.
#[derive(Debug)]
pub struct LayerManager<I> {
    pictures: RwLock<HashMap<PictureId, SharedPictureLayerSet<I>>>,
    windows: RwLock<HashMap<WindowId, SharedWindowLayerSet>>,
    ids: LayerIdAllocator,
    config: CompositorConfig,
    limits: LayerLimits,
}

impl<I> Default for LayerManager<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> LayerManager<I> {
    /// Creates an empty manager with default configuration and no caps.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(CompositorConfig::default(), LayerLimits::UNLIMITED)
    }

    /// Creates an empty manager. `config` applies to every set it creates.
    #[must_use]
    pub fn with_config(config: CompositorConfig, limits: LayerLimits) -> Self {
        Self {
            pictures: RwLock::new(HashMap::new()),
            windows: RwLock::new(HashMap::new()),
            ids: LayerIdAllocator::new(),
            config,
            limits,
        }
    }

    /// Configuration applied to new sets.
    #[must_use]
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Per-kind layer caps.
    #[must_use]
    pub fn limits(&self) -> &LayerLimits {
        &self.limits
    }

    /// Hands out a fresh layer id from the shared allocator.
    pub fn next_layer_id(&self) -> LayerId {
        self.ids.next()
    }

    // -- Pictures --

    /// Returns the set for `picture`, creating an empty one if needed.
    ///
    /// Concurrent first calls for the same id all get the same set.
    pub fn get_or_create_picture(&self, picture: PictureId) -> SharedPictureLayerSet<I> {
        let existing = read(&self.pictures).get(&picture).cloned();
        if let Some(set) = existing {
            return set;
        }
        let mut pictures = write(&self.pictures);
        let set = pictures.entry(picture).or_insert_with(|| {
            log::debug!("creating layer set for {picture:?}");
            Arc::new(RwLock::new(PictureLayerSet::new(
                picture,
                self.ids.clone(),
                self.config,
            )))
        });
        Arc::clone(set)
    }

    /// The set for `picture`, if one exists.
    #[must_use]
    pub fn picture(&self, picture: PictureId) -> Option<SharedPictureLayerSet<I>> {
        read(&self.pictures).get(&picture).cloned()
    }

    /// Removes the set for `picture` along with all its layers.
    ///
    /// Handles obtained earlier stay usable but are no longer registered.
    pub fn delete_picture(&self, picture: PictureId) -> bool {
        let removed = write(&self.pictures).remove(&picture).is_some();
        if removed {
            log::debug!("deleted layer set for {picture:?}");
        }
        removed
    }

    /// Registered picture ids, ascending.
    #[must_use]
    pub fn picture_ids(&self) -> Vec<PictureId> {
        let mut ids: Vec<PictureId> = read(&self.pictures).keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    // -- Windows --

    /// Returns the window `id`, creating it from `spec` if needed.
    ///
    /// First writer wins: once the window exists `spec` is ignored.
    pub fn get_or_create_window(&self, id: WindowId, spec: &WindowSpec) -> SharedWindowLayerSet {
        let existing = read(&self.windows).get(&id).cloned();
        if let Some(window) = existing {
            return window;
        }
        let mut windows = write(&self.windows);
        let window = windows.entry(id).or_insert_with(|| {
            log::debug!("creating {id:?} showing {:?}", spec.picture);
            Arc::new(RwLock::new(WindowLayerSet::new(id, spec)))
        });
        Arc::clone(window)
    }

    /// The window `id`, if it exists.
    #[must_use]
    pub fn window(&self, id: WindowId) -> Option<SharedWindowLayerSet> {
        read(&self.windows).get(&id).cloned()
    }

    /// Removes a window.
    pub fn delete_window(&self, id: WindowId) -> bool {
        let removed = write(&self.windows).remove(&id).is_some();
        if removed {
            log::debug!("deleted {id:?}");
        }
        removed
    }

    /// Registered window ids, ascending.
    #[must_use]
    pub fn window_ids(&self) -> Vec<WindowId> {
        let mut ids: Vec<WindowId> = read(&self.windows).keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Window ids back to front, by `(z_order, id)`.
    #[must_use]
    pub fn windows_in_z_order(&self) -> Vec<WindowId> {
        let windows: Vec<SharedWindowLayerSet> = read(&self.windows).values().cloned().collect();
        let mut keyed: Vec<(i32, WindowId)> = windows
            .iter()
            .map(|w| {
                let w = read(w);
                (w.z_order(), w.id())
            })
            .collect();
        keyed.sort_unstable();
        keyed.into_iter().map(|(_, id)| id).collect()
    }

    /// Checks whether one more layer of `kind` fits in `picture` under the
    /// configured [`LayerLimits`].
    ///
    /// Layer sets never refuse insertions themselves; code that creates casts,
    /// texts, or drawing operations calls this first. A picture without a set
    /// counts as empty.
    pub fn ensure_capacity(&self, picture: PictureId, kind: LayerKind) -> Result<(), ComposeError> {
        let Some(limit) = self.limits.limit_for(kind) else {
            return Ok(());
        };
        let count = self
            .picture(picture)
            .map_or(0, |set| read(&set).count(kind));
        if count >= limit {
            log::debug!("{picture:?}: {kind:?} limit of {limit} reached");
            return Err(ComposeError::ResourceExhausted { kind, limit });
        }
        Ok(())
    }

    /// Forgets every picture set and window.
    ///
    /// The layer id allocator is kept, so ids handed out afterwards never
    /// repeat earlier ones.
    pub fn clear(&self) {
        let pictures = std::mem::take(&mut *write(&self.pictures));
        let windows = std::mem::take(&mut *write(&self.windows));
        log::debug!(
            "cleared {} layer sets and {} windows",
            pictures.len(),
            windows.len()
        );
    }
}

impl<I: ImageBuffer> LayerManager<I> {
    /// Composites the picture bound to `window` over the window's view
    /// rectangle and hands the buffer to `f`.
    ///
    /// Returns `Ok(None)` if no buffer could be allocated.
    pub fn composite_window<R>(
        &self,
        window: WindowId,
        f: impl FnOnce(&I) -> R,
    ) -> Result<Option<R>, ComposeError> {
        self.composite_window_traced(window, &mut Tracer::none(), f)
    }

    /// Like [`composite_window`](Self::composite_window), reporting to `tracer`.
    pub fn composite_window_traced<R>(
        &self,
        window: WindowId,
        tracer: &mut Tracer<'_>,
        f: impl FnOnce(&I) -> R,
    ) -> Result<Option<R>, ComposeError> {
        let shared = self
            .window(window)
            .ok_or(ComposeError::WindowNotFound(window))?;
        let (picture, view) = {
            let w = read(&shared);
            (w.picture(), w.picture_view_rect())
        };
        let set = self
            .picture(picture)
            .ok_or(ComposeError::PictureNotFound(picture))?;
        let result = write(&set).composite_traced(view, tracer).map(f);
        write(&shared).clear_dirty();
        Ok(result)
    }

    /// Draws every visible window onto `screen`, back to front.
    ///
    /// Each window's rectangle is first filled with its background colour,
    /// then the composite of its picture is drawn at the window's origin.
    /// Windows whose picture has no layer set are skipped. Returns the
    /// number of windows drawn.
    pub fn present<C: Canvas<I>>(&self, screen: &mut C) -> usize {
        let mut presented = 0;
        for id in self.windows_in_z_order() {
            let Some(shared) = self.window(id) else {
                continue;
            };
            let (visible, rect, background) = {
                let w = read(&shared);
                (w.is_visible(), w.rect(), w.background())
            };
            if !visible {
                continue;
            }
            if background.a > 0 {
                let size = rect.size();
                if let Some(mut fill) = I::blank(
                    crate::geometry::pixel_extent(size.width),
                    crate::geometry::pixel_extent(size.height),
                ) {
                    fill.fill(background);
                    screen.draw_image(&fill, rect.origin(), 1.0);
                }
            }
            let drawn =
                self.composite_window(id, |image| screen.draw_image(image, rect.origin(), 1.0));
            match drawn {
                Ok(_) => presented += 1,
                Err(err) => log::debug!("skipping {id:?}: {err}"),
            }
        }
        presented
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

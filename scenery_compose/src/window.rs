// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! On-screen windows that present a picture.

use kurbo::{Rect, Vec2};
use scenery_core::Rgba;

use crate::id::{PictureId, WindowId};

/// Construction arguments for a [`WindowLayerSet`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowSpec {
    /// The picture shown in the window.
    pub picture: PictureId,
    /// Window rectangle in screen coordinates.
    pub rect: Rect,
    /// Colour behind the picture.
    pub background: Rgba,
    /// Stacking position among windows.
    pub z_order: i32,
}

/// A window showing part of a picture.
///
/// The window shows the picture's [`picture_view_rect`](Self::picture_view_rect):
/// a rectangle the size of the window, starting at the scroll
/// [`offset`](Self::offset) inside the picture.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowLayerSet {
    id: WindowId,
    picture: PictureId,
    rect: Rect,
    offset: Vec2,
    background: Rgba,
    z_order: i32,
    visible: bool,
    dirty: bool,
}

impl WindowLayerSet {
    /// Creates a visible, dirty window.
    #[must_use]
    pub fn new(id: WindowId, spec: &WindowSpec) -> Self {
        Self {
            id,
            picture: spec.picture,
            rect: spec.rect.abs(),
            offset: Vec2::ZERO,
            background: spec.background,
            z_order: spec.z_order,
            visible: true,
            dirty: true,
        }
    }

    /// The window's id.
    #[must_use]
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The picture shown.
    #[must_use]
    pub fn picture(&self) -> PictureId {
        self.picture
    }

    /// Screen rectangle.
    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Scroll origin inside the picture.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Colour behind the picture.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Stacking position among windows.
    #[must_use]
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// Visibility flag.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the window must be presented again.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The part of the picture the window shows.
    #[must_use]
    pub fn picture_view_rect(&self) -> Rect {
        Rect::from_origin_size(self.offset.to_point(), self.rect.size())
    }

    /// Moves or resizes the window.
    pub fn set_rect(&mut self, rect: Rect) -> bool {
        self.update(|w| &mut w.rect, rect.abs())
    }

    /// Scrolls the picture inside the window.
    pub fn set_offset(&mut self, offset: Vec2) -> bool {
        self.update(|w| &mut w.offset, offset)
    }

    /// Shows or hides the window.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.update(|w| &mut w.visible, visible)
    }

    /// Changes the colour behind the picture.
    pub fn set_background(&mut self, background: Rgba) -> bool {
        self.update(|w| &mut w.background, background)
    }

    /// Changes the stacking position.
    pub fn set_z_order(&mut self, z_order: i32) -> bool {
        self.update(|w| &mut w.z_order, z_order)
    }

    /// Binds a different picture.
    pub fn set_picture(&mut self, picture: PictureId) -> bool {
        self.update(|w| &mut w.picture, picture)
    }

    /// Marks the window as presented.
    pub fn clear_dirty(&mut self) {
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

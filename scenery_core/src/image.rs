// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Image and canvas primitives supplied by the host.
//!
//! Scenery never touches pixels. Decoding, blending, scaling, and colour-key
//! substitution are provided by the host's image type through these traits;
//! this crate only decides *what* is drawn, *where*, and in *which order*.

use kurbo::{Point, Rect, Size};

/// A straight-alpha RGBA colour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Creates a colour from its channels.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque colour.
    #[inline]
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// A read-only bitmap owned by the host's bitmap subsystem.
pub trait Image {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Size in pixels as a [`Size`].
    fn size(&self) -> Size {
        Size::new(f64::from(self.width()), f64::from(self.height()))
    }

    /// Copies the pixels inside `rect` into a new image.
    ///
    /// Returns `None` when `rect` does not overlap the image.
    fn sub_image(&self, rect: Rect) -> Option<Self>
    where
        Self: Sized;

    /// Returns a copy in which every pixel equal to `key` is fully transparent.
    fn with_color_key(&self, key: Rgba) -> Self
    where
        Self: Sized;
}

/// Something images can be drawn onto.
pub trait Canvas<I: ?Sized> {
    /// Draws `image` with its top-left corner at `at`, scaling its alpha by `alpha`.
    fn draw_image(&mut self, image: &I, at: Point, alpha: f32);
}

/// An owned, writable image used as a composite buffer.
pub trait ImageBuffer: Image + Canvas<Self> + Sized {
    /// Allocates a buffer of the given size.
    ///
    /// Returns `None` for zero-sized requests.
    fn blank(width: u32, height: u32) -> Option<Self>;

    /// Fills the whole buffer with `color`.
    fn fill(&mut self, color: Rgba);
}

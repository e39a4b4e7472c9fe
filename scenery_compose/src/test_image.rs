// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A tiny in-memory image for compositor tests.

use kurbo::{Point, Rect};
use scenery_core::{Canvas, Image, ImageBuffer, Rgba};

/// A solid-colour pixel grid. Drawing copies every non-transparent source
/// pixel, so tests can check which layer won at a given pixel.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PixelImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl PixelImage {
    pub(crate) fn solid(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    pub(crate) fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
    }

    pub(crate) fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1)) = self.clip(rect) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let i = self.index(x, y);
                self.pixels[i] = color;
            }
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "test images are small"
    )]
    fn clip(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        let full = Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height));
        let r = rect.abs().intersect(full).round();
        if r.is_zero_area() {
            return None;
        }
        Some((r.x0 as u32, r.y0 as u32, r.x1 as u32, r.y1 as u32))
    }
}

impl Image for PixelImage {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn sub_image(&self, rect: Rect) -> Option<Self> {
        let (x0, y0, x1, y1) = self.clip(rect)?;
        let mut pixels = Vec::new();
        for y in y0..y1 {
            for x in x0..x1 {
                pixels.push(self.pixels[self.index(x, y)]);
            }
        }
        Some(Self {
            width: x1 - x0,
            height: y1 - y0,
            pixels,
        })
    }

    fn with_color_key(&self, key: Rgba) -> Self {
        let mut out = self.clone();
        for p in &mut out.pixels {
            if *p == key {
                *p = Rgba::TRANSPARENT;
            }
        }
        out
    }
}

impl Canvas<Self> for PixelImage {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "test images are small"
    )]
    fn draw_image(&mut self, image: &Self, at: Point, alpha: f32) {
        if alpha <= 0.0 {
            return;
        }
        let (ox, oy) = (at.x.round() as i64, at.y.round() as i64);
        for sy in 0..image.height {
            for sx in 0..image.width {
                let src = image.pixels[image.index(sx, sy)];
                if src.a == 0 {
                    continue;
                }
                let (dx, dy) = (ox + i64::from(sx), oy + i64::from(sy));
                if let (Ok(dx), Ok(dy)) = (u32::try_from(dx), u32::try_from(dy)) {
                    if dx < self.width && dy < self.height {
                        let i = self.index(dx, dy);
                        self.pixels[i] = src;
                    }
                }
            }
        }
    }
}

impl ImageBuffer for PixelImage {
    fn blank(width: u32, height: u32) -> Option<Self> {
        (width > 0 && height > 0).then(|| Self::solid(width, height, Rgba::TRANSPARENT))
    }

    fn fill(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer, picture, window, and cast identity types.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// A handle to a layer in a [`PictureLayerSet`](crate::PictureLayerSet).
///
/// Ids come from a [`LayerIdAllocator`] shared by every set of one
/// [`LayerManager`](crate::LayerManager), so they are unique across pictures
/// and never reused, even after a clear.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LayerId(pub(crate) u64);

impl LayerId {
    /// Returns the raw id value (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerId({})", self.0)
    }
}

/// Identifies a picture (an off-screen drawing surface).
///
/// Pictures are created and numbered by the host's picture manager.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PictureId(pub u32);

impl fmt::Debug for PictureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PictureId({})", self.0)
    }
}

/// Identifies an on-screen window.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct WindowId(pub u32);

impl fmt::Debug for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowId({})", self.0)
    }
}

/// The host's key for a cast (sprite instance).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct CastId(pub u32);

impl fmt::Debug for CastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastId({})", self.0)
    }
}

/// Shared monotonic source of [`LayerId`]s.
///
/// Clones share one counter. The first id handed out is 1.
#[derive(Clone, Debug, Default)]
pub struct LayerIdAllocator {
    next: Arc<AtomicU64>,
}

impl LayerIdAllocator {
    /// Creates an allocator with its own counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn next(&self) -> LayerId {
        LayerId(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_counter() {
        let a = LayerIdAllocator::new();
        let b = a.clone();
        assert_eq!(a.next(), LayerId(1));
        assert_eq!(b.next(), LayerId(2));
        assert_eq!(a.next(), LayerId(3));
    }

    #[test]
    fn independent_allocators_do_not_interfere() {
        let a = LayerIdAllocator::new();
        let b = LayerIdAllocator::new();
        assert_eq!(a.next(), LayerId(1));
        assert_eq!(b.next(), LayerId(1));
    }
}

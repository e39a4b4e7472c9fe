// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical paint-order addresses.
//!
//! A [`ZPath`] is the sequence of local z-orders from a root down to a node.
//! Comparing two paths lexicographically yields the pre-order traversal of the
//! scene tree: an ancestor paints before all of its descendants, and siblings
//! paint in ascending local z-order.
//!
//! ```text
//!   [5]          window root
//!   [5, 0]       first child
//!   [5, 0, 3]    grandchild
//!   [5, 1]       second child
//!   [6]          next window root
//! ```

use core::cmp::Ordering;
use core::fmt;

use smallvec::SmallVec;

/// Inline capacity for path segments. Scenes rarely nest deeper than this.
const INLINE_DEPTH: usize = 4;

/// Position of a node in the scene tree, as a sequence of local z-orders.
///
/// Paths are immutable values: every "mutation" returns a new path.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct ZPath {
    segments: SmallVec<[i32; INLINE_DEPTH]>,
}

impl ZPath {
    /// Creates a path from explicit segments.
    #[must_use]
    pub fn new(segments: &[i32]) -> Self {
        Self {
            segments: SmallVec::from_slice(segments),
        }
    }

    /// Creates a single-segment path, as used for window roots.
    #[must_use]
    pub fn root(local_z_order: i32) -> Self {
        Self::new(&[local_z_order])
    }

    /// Appends `local_z_order` to a copy of `parent`.
    ///
    /// With no parent the result is `[local_z_order]`.
    #[must_use]
    pub fn from_parent(parent: Option<&Self>, local_z_order: i32) -> Self {
        let mut segments = parent.map(|p| p.segments.clone()).unwrap_or_default();
        segments.push(local_z_order);
        Self { segments }
    }

    /// Returns the path segments, root first.
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[i32] {
        &self.segments
    }

    /// Number of segments.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the empty path.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The node's rank among its siblings (the last segment).
    #[inline]
    #[must_use]
    pub fn local_z_order(&self) -> Option<i32> {
        self.segments.last().copied()
    }

    /// Returns `true` if `self` is a (not necessarily strict) prefix of `other`.
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Returns the path without its last segment.
    #[must_use]
    pub fn parent_prefix(&self) -> Self {
        let end = self.segments.len().saturating_sub(1);
        Self::new(&self.segments[..end])
    }

    /// Returns a copy with the last segment replaced by `local_z_order`.
    ///
    /// The empty path becomes `[local_z_order]`.
    #[must_use]
    pub fn with_local_z_order(&self, local_z_order: i32) -> Self {
        let mut segments = self.segments.clone();
        match segments.last_mut() {
            Some(last) => *last = local_z_order,
            None => segments.push(local_z_order),
        }
        Self { segments }
    }

    /// Substitutes the ancestor prefix `old` with `new`, keeping the suffix.
    ///
    /// Returns `None` if `old` is not a prefix of `self`.
    #[must_use]
    pub fn rebase(&self, old: &Self, new: &Self) -> Option<Self> {
        if !old.is_prefix_of(self) {
            return None;
        }
        let mut segments = new.segments.clone();
        segments.extend_from_slice(&self.segments[old.depth()..]);
        Some(Self { segments })
    }
}

impl Ord for ZPath {
    fn cmp(&self, other: &Self) -> Ordering {
        // Slice ordering is lexicographic with a proper prefix ordered first,
        // which is exactly pre-order.
        self.segments.as_slice().cmp(other.segments.as_slice())
    }
}

impl PartialOrd for ZPath {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for ZPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZPath{self}")
    }
}

impl fmt::Display for ZPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.segments.iter()).finish()
    }
}

impl From<&[i32]> for ZPath {
    fn from(segments: &[i32]) -> Self {
        Self::new(segments)
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene nodes.

use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::{Point, Size};

use super::id::NodeId;
use crate::zpath::ZPath;

/// A drawable node in a [`SceneGraph`](super::SceneGraph).
///
/// Nodes only hold local state. Anything inherited from ancestors (absolute
/// position, effective alpha, effective visibility) is resolved through the
/// owning graph, because the parent link is a [`NodeId`] rather than a
/// reference.
///
/// Every setter returns whether the value changed, and only a change marks the
/// node dirty.
#[derive(Debug)]
pub struct SceneNode<I> {
    pub(crate) id: NodeId,
    pub(crate) image: Option<Arc<I>>,
    pub(crate) size: Option<Size>,
    pub(crate) position: Point,
    pub(crate) zpath: Option<ZPath>,
    pub(crate) z_order: i32,
    pub(crate) visible: bool,
    pub(crate) alpha: f32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) dirty: bool,
}

impl<I> SceneNode<I> {
    pub(crate) fn new(id: NodeId, image: Option<Arc<I>>) -> Self {
        Self {
            id,
            image,
            size: None,
            position: Point::ORIGIN,
            zpath: None,
            z_order: 0,
            visible: true,
            alpha: 1.0,
            parent: None,
            children: Vec::new(),
            dirty: true,
        }
    }

    /// The node's id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The attached image, if any.
    #[inline]
    #[must_use]
    pub fn image(&self) -> Option<&Arc<I>> {
        self.image.as_ref()
    }

    /// Explicit size for image-less sprites created with a size.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Position relative to the parent.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// The node's z-path, if it has been placed in the tree.
    #[inline]
    #[must_use]
    pub fn zpath(&self) -> Option<&ZPath> {
        self.zpath.as_ref()
    }

    /// Legacy flat z-order, used only for nodes without a z-path.
    #[inline]
    #[must_use]
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// The node's own visibility flag (ignores ancestors).
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The node's own alpha (ignores ancestors).
    #[inline]
    #[must_use]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// The parent node, if any.
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in insertion order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node changed since it was last drawn.
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Sets the position relative to the parent.
    pub fn set_position(&mut self, position: Point) -> bool {
        self.update(|n| &mut n.position, position)
    }

    /// Sets the node's own visibility flag.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        self.update(|n| &mut n.visible, visible)
    }

    /// Sets the node's own alpha, clamped to `[0, 1]`.
    ///
    /// NaN is treated as fully transparent.
    pub fn set_alpha(&mut self, alpha: f32) -> bool {
        let alpha = if alpha.is_nan() {
            0.0
        } else {
            alpha.clamp(0.0, 1.0)
        };
        self.update(|n| &mut n.alpha, alpha)
    }

    pub(crate) fn set_z_order(&mut self, z_order: i32) -> bool {
        self.update(|n| &mut n.z_order, z_order)
    }

    /// Replaces the attached image.
    pub fn set_image(&mut self, image: Option<Arc<I>>) -> bool {
        let same = match (&self.image, &image) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        self.image = image;
        self.dirty = true;
        true
    }

    /// Appends `child` to the child list. Already-present children are ignored.
    ///
    /// This only edits the list; the child's parent link is the graph's job.
    pub fn add_child(&mut self, child: NodeId) {
        if child != self.id && !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Removes `child` from the child list, keeping the others in order.
    ///
    /// Returns `false` if `child` was not in the list.
    pub fn remove_child(&mut self, child: NodeId) -> bool {
        let Some(pos) = self.children.iter().position(|&c| c == child) else {
            return false;
        };
        self.children.remove(pos);
        true
    }

    pub(crate) fn set_zpath(&mut self, zpath: Option<ZPath>) -> bool {
        self.update(|n| &mut n.zpath, zpath)
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

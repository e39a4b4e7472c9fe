// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage, topology, and z-path management.

use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Point, Size, Vec2};

use super::id::NodeId;
use super::node::SceneNode;
use crate::counter::{ZOrderCounter, ZScope};
use crate::error::SceneError;
use crate::zpath::ZPath;

/// Owner of every [`SceneNode`] in a scene.
///
/// Nodes are addressed by [`NodeId`]. The parent link of a node is an id, and
/// each node's child list holds ids; the graph's map is the only owner.
///
/// The paint order is cached and only re-sorted after
/// [`mark_need_sort`](Self::mark_need_sort). Every structural or z-path
/// mutation made through the graph calls it.
#[derive(Debug)]
pub struct SceneGraph<I> {
    pub(crate) nodes: HashMap<NodeId, SceneNode<I>>,
    next_id: u32,
    pub(crate) counter: ZOrderCounter,

    // -- Paint order cache --
    pub(crate) paint_order: Vec<NodeId>,
    pub(crate) sort_dirty: bool,
}

impl<I> Default for SceneGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> SceneGraph<I> {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_id: 1,
            counter: ZOrderCounter::new(),
            paint_order: Vec::new(),
            sort_dirty: false,
        }
    }

    // -- Creation API --

    /// Creates a visible top-level sprite showing `image`.
    pub fn create_sprite(&mut self, image: Arc<I>) -> NodeId {
        let node = SceneNode::new(self.alloc_id(), Some(image));
        self.insert(node)
    }

    /// Creates an image-less sprite of the given size.
    ///
    /// Returns `None` if either dimension is not positive.
    pub fn create_sprite_with_size(&mut self, width: i32, height: i32) -> Option<NodeId> {
        if width <= 0 || height <= 0 {
            return None;
        }
        let mut node = SceneNode::new(self.alloc_id(), None);
        node.size = Some(Size::new(f64::from(width), f64::from(height)));
        Some(self.insert(node))
    }

    /// Creates a sprite that starts hidden.
    ///
    /// Callers finish configuring the z-path and parent before making it
    /// visible, so no draw pass sees it half-built.
    pub fn create_sprite_hidden(&mut self, image: Arc<I>) -> NodeId {
        let mut node = SceneNode::new(self.alloc_id(), Some(image));
        node.visible = false;
        self.insert(node)
    }

    /// Creates a window root sprite whose z-path is exactly `[window_z_order]`.
    pub fn create_root_sprite(&mut self, image: Option<Arc<I>>, window_z_order: i32) -> NodeId {
        let mut node = SceneNode::new(self.alloc_id(), image);
        node.zpath = Some(ZPath::root(window_z_order));
        self.counter.observe(ZScope::Root, window_z_order);
        self.insert(node)
    }

    /// Creates a sprite placed under `parent` (or at the top level).
    ///
    /// Its local z-order is the next value of the parent's scope, so it paints
    /// above every sibling created before it.
    pub fn create_sprite_with_zpath(
        &mut self,
        image: Option<Arc<I>>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let id = self.create_sprite_with_zpath_hidden(image, parent)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visible = true;
        }
        Ok(id)
    }

    /// Like [`create_sprite_with_zpath`](Self::create_sprite_with_zpath), but
    /// leaves the sprite hidden.
    pub fn create_sprite_with_zpath_hidden(
        &mut self,
        image: Option<Arc<I>>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let parent_path = match parent {
            Some(p) => self.node(p)?.zpath.clone(),
            None => None,
        };
        let local = self.counter.next(ZScope::from(parent));

        let mut node = SceneNode::new(self.alloc_id(), image);
        node.visible = false;
        node.zpath = Some(ZPath::from_parent(parent_path.as_ref(), local));
        node.parent = parent;
        let id = self.insert(node);

        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.add_child(id);
        }
        Ok(id)
    }

    // -- Lookup API --

    /// Returns the node with the given id.
    #[must_use]
    pub fn sprite(&self, id: NodeId) -> Option<&SceneNode<I>> {
        self.nodes.get(&id)
    }

    /// Returns the node with the given id for local (non-structural) edits.
    #[must_use]
    pub fn sprite_mut(&mut self, id: NodeId) -> Option<&mut SceneNode<I>> {
        self.nodes.get_mut(&id)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &SceneNode<I>> {
        self.nodes.values()
    }

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Returns the children of a node in insertion order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Option<&[NodeId]> {
        self.nodes.get(&id).map(|n| n.children.as_slice())
    }

    /// Returns the ids of top-level nodes, ascending.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<_> = self
            .nodes
            .values()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect();
        roots.sort_unstable();
        roots
    }

    // -- Removal API --

    /// Removes a node together with its whole subtree.
    ///
    /// Returns `false` if the node does not exist.
    pub fn remove_sprite(&mut self, id: NodeId) -> bool {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            return false;
        };
        if let Some(p) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            p.remove_child(id);
        }

        let subtree = self.subtree(id);
        for removed in &subtree {
            self.nodes.remove(removed);
            self.counter.forget(*removed);
        }
        log::trace!("removed sprite {id:?} ({} nodes)", subtree.len());
        self.mark_need_sort();
        true
    }

    /// Removes every node.
    ///
    /// Ids and the top-level z-order counter keep counting from where they
    /// were, so handles from before the clear never alias new nodes.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.counter.forget_parents();
        self.paint_order.clear();
        self.sort_dirty = false;
    }

    // -- Mutation API --

    /// Sets a node's position relative to its parent.
    pub fn set_position(&mut self, id: NodeId, position: Point) -> Result<bool, SceneError> {
        Ok(self.node_mut(id)?.set_position(position))
    }

    /// Sets a node's own visibility flag.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<bool, SceneError> {
        Ok(self.node_mut(id)?.set_visible(visible))
    }

    /// Sets a node's own alpha (clamped to `[0, 1]`).
    pub fn set_alpha(&mut self, id: NodeId, alpha: f32) -> Result<bool, SceneError> {
        Ok(self.node_mut(id)?.set_alpha(alpha))
    }

    /// Replaces a node's image.
    pub fn set_image(&mut self, id: NodeId, image: Option<Arc<I>>) -> Result<bool, SceneError> {
        Ok(self.node_mut(id)?.set_image(image))
    }

    /// Sets the legacy flat z-order used by nodes without a z-path.
    pub fn set_z_order(&mut self, id: NodeId, z_order: i32) -> Result<bool, SceneError> {
        let changed = self.node_mut(id)?.set_z_order(z_order);
        if changed {
            self.mark_need_sort();
        }
        Ok(changed)
    }

    /// Assigns a z-path directly.
    ///
    /// The node's scope counter is raised past the new local z-order so later
    /// siblings still land above it.
    pub fn set_zpath(&mut self, id: NodeId, zpath: Option<ZPath>) -> Result<bool, SceneError> {
        let node = self.node_mut(id)?;
        let scope = ZScope::from(node.parent);
        let local = zpath.as_ref().and_then(ZPath::local_z_order);
        let changed = node.set_zpath(zpath);
        if let Some(local) = local {
            self.counter.observe(scope, local);
        }
        if changed {
            self.mark_need_sort();
        }
        Ok(changed)
    }

    /// Moves `child` under `parent` (or to the top level).
    ///
    /// The child is detached from its previous parent's list and appended to
    /// the new one. Its z-path is left untouched; callers assign a new one if
    /// the paint position should follow the new parent.
    pub fn set_parent(&mut self, child: NodeId, parent: Option<NodeId>) -> Result<(), SceneError> {
        let old_parent = self.node(child)?.parent;
        if let Some(p) = parent {
            let _ = self.node(p)?;
            if self.is_ancestor_or_self(child, p) {
                return Err(SceneError::Cycle { child, parent: p });
            }
        }
        if old_parent == parent {
            return Ok(());
        }

        if let Some(old) = old_parent.and_then(|p| self.nodes.get_mut(&p)) {
            old.remove_child(child);
        }
        if let Some(new) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            new.add_child(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = parent;
            node.dirty = true;
        }
        self.mark_need_sort();
        Ok(())
    }

    // -- Reordering API --

    /// Raises a node above all of its current siblings.
    ///
    /// The node gets a fresh local z-order from its parent's scope, and every
    /// descendant's z-path is rewritten onto the new prefix while keeping its
    /// own depth and local z-order.
    pub fn bring_to_front(&mut self, id: NodeId) -> Result<(), SceneError> {
        let scope = ZScope::from(self.node(id)?.parent);
        let ceiling = self
            .sibling_locals(id)
            .max()
            .map_or(i32::MIN, |m| m.saturating_add(1));
        let local = self.counter.next(scope).max(ceiling);
        self.counter.observe(scope, local);
        self.relocate(id, local)
    }

    /// Lowers a node below all of its current siblings.
    ///
    /// The new local z-order is one less than the smallest sibling's, and may
    /// be negative. A node without z-path siblings keeps its position.
    pub fn send_to_back(&mut self, id: NodeId) -> Result<(), SceneError> {
        let _ = self.node(id)?;
        let Some(min) = self.sibling_locals(id).min() else {
            return Ok(());
        };
        self.relocate(id, min.saturating_sub(1))
    }

    // -- Inherited properties --

    /// Own position plus every ancestor's position.
    #[must_use]
    pub fn absolute_position(&self, id: NodeId) -> Option<Point> {
        let mut offset = Vec2::ZERO;
        for node in self.ancestry(id) {
            offset += node.position.to_vec2();
        }
        self.nodes.contains_key(&id).then(|| offset.to_point())
    }

    /// Own alpha multiplied by every ancestor's alpha.
    #[must_use]
    pub fn effective_alpha(&self, id: NodeId) -> Option<f32> {
        self.nodes.contains_key(&id).then(|| {
            self.ancestry(id)
                .fold(1.0_f32, |alpha, node| alpha * node.alpha)
        })
    }

    /// `true` if the node and all its ancestors are visible.
    ///
    /// Unknown nodes are not visible.
    #[must_use]
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id) && self.ancestry(id).all(|node| node.visible)
    }

    // -- Paint order --

    /// Invalidates the cached paint order.
    pub fn mark_need_sort(&mut self) {
        self.sort_dirty = true;
    }

    /// Returns `true` if the next draw will re-sort.
    #[must_use]
    pub fn needs_sort(&self) -> bool {
        self.sort_dirty
    }

    // -- Internal helpers --

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn insert(&mut self, node: SceneNode<I>) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        self.mark_need_sort();
        id
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&SceneNode<I>, SceneError> {
        self.nodes.get(&id).ok_or(SceneError::NotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode<I>, SceneError> {
        self.nodes.get_mut(&id).ok_or(SceneError::NotFound(id))
    }

    /// Iterates from `id` up to its root, `id` first.
    fn ancestry(&self, id: NodeId) -> impl Iterator<Item = &SceneNode<I>> {
        let mut current = self.nodes.get(&id);
        core::iter::from_fn(move || {
            let node = current?;
            current = node.parent.and_then(|p| self.nodes.get(&p));
            Some(node)
        })
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestry(id).any(|n| n.id == ancestor)
    }

    /// Pre-order ids of the subtree rooted at `id` (including `id`).
    fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = alloc::vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.nodes.get(&next) else {
                continue;
            };
            out.push(next);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Local z-orders of the z-path siblings of `id`, excluding `id` itself.
    fn sibling_locals(&self, id: NodeId) -> impl Iterator<Item = i32> {
        let parent = self.nodes.get(&id).and_then(|n| n.parent);
        let siblings: Vec<NodeId> = match parent.and_then(|p| self.nodes.get(&p)) {
            Some(p) => p.children.clone(),
            None => self.roots(),
        };
        siblings
            .into_iter()
            .filter(move |&s| s != id)
            .filter_map(|s| self.nodes.get(&s)?.zpath.as_ref()?.local_z_order())
    }

    /// Gives `id` the local z-order `local` and rewrites its descendants.
    fn relocate(&mut self, id: NodeId, local: i32) -> Result<(), SceneError> {
        let node = self.node(id)?;
        let old_path = node.zpath.clone();
        let new_path = match &old_path {
            Some(path) => path.with_local_z_order(local),
            None => {
                let parent_path = node
                    .parent
                    .and_then(|p| self.nodes.get(&p))
                    .and_then(|p| p.zpath.clone());
                ZPath::from_parent(parent_path.as_ref(), local)
            }
        };
        if old_path.as_ref() == Some(&new_path) {
            return Ok(());
        }

        if let Some(old_path) = &old_path {
            for descendant in self.subtree(id).into_iter().skip(1) {
                if let Some(d) = self.nodes.get_mut(&descendant) {
                    let rebased = d.zpath.as_ref().and_then(|p| p.rebase(old_path, &new_path));
                    if let Some(rebased) = rebased {
                        d.set_zpath(Some(rebased));
                    }
                }
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_zpath(Some(new_path));
        }
        self.mark_need_sort();
        Ok(())
    }
}

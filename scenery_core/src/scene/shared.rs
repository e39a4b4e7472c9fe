// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Lock-guarded scene graph for hosts that mutate the scene from more than one thread.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::graph::SceneGraph;
use super::id::NodeId;
use crate::error::SceneError;
use crate::image::Canvas;

/// A [`SceneGraph`] behind a reader/writer lock.
///
/// The render thread drives [`draw`](Self::draw); producer threads may create,
/// move, or reorder sprites between frames. Every method takes the lock for
/// its whole duration, so each one is atomic with respect to a draw pass.
/// Use [`write`](Self::write) to batch several edits under one lock.
///
/// A poisoned lock is recovered rather than propagated: the graph holds no
/// invariants a panicking writer could leave half-applied across calls.
#[derive(Debug)]
pub struct SharedSceneGraph<I> {
    inner: RwLock<SceneGraph<I>>,
}

impl<I> Default for SharedSceneGraph<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> SharedSceneGraph<I> {
    /// Creates an empty shared graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SceneGraph::new()),
        }
    }

    /// Locks the graph for reading.
    pub fn read(&self) -> RwLockReadGuard<'_, SceneGraph<I>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the graph for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, SceneGraph<I>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates a sprite under `parent`, atomically with respect to draws.
    ///
    /// The node is built hidden, given its z-path, and only then shown, all
    /// under one write lock.
    pub fn create_sprite_with_zpath(
        &self,
        image: Option<Arc<I>>,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        self.write().create_sprite_with_zpath(image, parent)
    }

    /// Creates a window root sprite.
    pub fn create_root_sprite(&self, image: Option<Arc<I>>, window_z_order: i32) -> NodeId {
        self.write().create_root_sprite(image, window_z_order)
    }

    /// Removes a sprite and its subtree.
    pub fn remove_sprite(&self, id: NodeId) -> bool {
        self.write().remove_sprite(id)
    }

    /// Raises a sprite above its siblings.
    pub fn bring_to_front(&self, id: NodeId) -> Result<(), SceneError> {
        self.write().bring_to_front(id)
    }

    /// Lowers a sprite below its siblings.
    pub fn send_to_back(&self, id: NodeId) -> Result<(), SceneError> {
        self.write().send_to_back(id)
    }

    /// Draws the scene. Takes the write lock because the paint-order cache may be rebuilt.
    pub fn draw<C: Canvas<I>>(&self, canvas: &mut C) -> usize {
        self.write().draw(canvas)
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::vec::Vec;

    use super::*;

    #[test]
    fn producers_and_renderer_interleave() {
        let graph = Arc::new(SharedSceneGraph::<u8>::new());
        let root = graph.create_root_sprite(None, 0);

        let producers: Vec<_> = (0..4)
            .map(|i| {
                let graph = Arc::clone(&graph);
                thread::spawn(move || {
                    for _ in 0..25 {
                        graph
                            .create_sprite_with_zpath(Some(Arc::new(i)), Some(root))
                            .unwrap();
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        assert_eq!(graph.len(), 101);
        let read = graph.read();
        let mut locals: Vec<i32> = read
            .children(root)
            .unwrap()
            .iter()
            .filter_map(|&c| read.sprite(c)?.zpath()?.local_z_order())
            .collect();
        locals.sort_unstable();
        locals.dedup();
        assert_eq!(locals.len(), 100, "every sibling got a distinct local z-order");
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order sorting and drawing.
//!
//! Drawing follows a sort-then-walk pattern:
//!
//! 1. **Sort**: only when the cache was invalidated. Nodes without a z-path
//!    come first, ordered by `(z_order, id)`; z-path nodes follow in z-path
//!    order (pre-order of the tree), ties broken by id.
//! 2. **Walk**: every node in cached order is drawn at its absolute position
//!    with its effective alpha, unless it or an ancestor is hidden.

use alloc::vec::Vec;
use core::cmp::Ordering;

use super::graph::SceneGraph;
use super::id::NodeId;
use super::node::SceneNode;
use crate::image::Canvas;
use crate::trace::{PaintOrderEvent, SceneDrawEvent, Tracer};

impl<I> SceneGraph<I> {
    /// Returns the paint order, re-sorting first if it was invalidated.
    pub fn paint_order(&mut self) -> &[NodeId] {
        self.paint_order_traced(&mut Tracer::none())
    }

    /// Like [`paint_order`](Self::paint_order), reporting re-sorts to `tracer`.
    pub fn paint_order_traced(&mut self, tracer: &mut Tracer<'_>) -> &[NodeId] {
        if self.sort_dirty {
            self.rebuild_paint_order(tracer);
        }
        &self.paint_order
    }

    /// Draws every effectively visible node onto `canvas`, back to front.
    ///
    /// Returns the number of nodes drawn.
    pub fn draw<C: Canvas<I>>(&mut self, canvas: &mut C) -> usize {
        self.draw_traced(canvas, &mut Tracer::none())
    }

    /// Like [`draw`](Self::draw), reporting to `tracer`.
    pub fn draw_traced<C: Canvas<I>>(&mut self, canvas: &mut C, tracer: &mut Tracer<'_>) -> usize {
        let resorted = self.sort_dirty;
        if resorted {
            self.rebuild_paint_order(tracer);
        }

        let mut drawn = Vec::new();
        let mut skipped = 0_u32;
        for &id in &self.paint_order {
            let Some(image) = self.nodes.get(&id).and_then(|n| n.image.as_ref()) else {
                skipped += 1;
                continue;
            };
            if !self.is_effectively_visible(id) {
                skipped += 1;
                continue;
            }
            let (Some(at), Some(alpha)) = (self.absolute_position(id), self.effective_alpha(id))
            else {
                skipped += 1;
                continue;
            };
            if alpha <= 0.0 {
                skipped += 1;
                continue;
            }
            canvas.draw_image(image, at, alpha);
            drawn.push(id);
        }

        for id in &drawn {
            if let Some(node) = self.nodes.get_mut(id) {
                node.clear_dirty();
            }
        }

        tracer.scene_drawn(&SceneDrawEvent {
            drawn: saturating_u32(drawn.len()),
            skipped,
            resorted,
        });
        drawn.len()
    }

    fn rebuild_paint_order(&mut self, tracer: &mut Tracer<'_>) {
        let mut order: Vec<&SceneNode<I>> = self.nodes.values().collect();
        order.sort_by(|a, b| paint_cmp(a, b));
        let zpath_nodes = order.iter().filter(|n| n.zpath.is_some()).count();

        self.paint_order.clear();
        self.paint_order.extend(order.iter().map(|n| n.id));
        self.sort_dirty = false;

        log::trace!("paint order rebuilt for {} nodes", self.paint_order.len());
        tracer.paint_order_rebuilt(&PaintOrderEvent {
            node_count: saturating_u32(self.paint_order.len()),
            zpath_nodes: saturating_u32(zpath_nodes),
        });
    }
}

/// Total order used for painting.
fn paint_cmp<I>(a: &SceneNode<I>, b: &SceneNode<I>) -> Ordering {
    match (&a.zpath, &b.zpath) {
        (None, None) => a.z_order.cmp(&b.z_order).then(a.id.cmp(&b.id)),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(pa), Some(pb)) => pa.cmp(pb).then(a.id.cmp(&b.id)),
    }
}

fn saturating_u32(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use alloc::sync::Arc;
    use alloc::vec;

    use kurbo::Point;

    use super::*;
    use crate::zpath::ZPath;

    /// Records `(image tag, position, alpha)` for every draw call.
    #[derive(Default)]
    struct RecordingCanvas {
        calls: Vec<(u8, Point, f32)>,
    }

    impl Canvas<u8> for RecordingCanvas {
        fn draw_image(&mut self, image: &u8, at: Point, alpha: f32) {
            self.calls.push((*image, at, alpha));
        }
    }

    impl RecordingCanvas {
        fn tags(&self) -> Vec<u8> {
            self.calls.iter().map(|c| c.0).collect()
        }
    }

    #[test]
    fn ancestors_paint_before_descendants() {
        let mut graph = SceneGraph::new();
        let root = graph.create_root_sprite(Some(Arc::new(1)), 5);
        let a = graph
            .create_sprite_with_zpath(Some(Arc::new(2)), Some(root))
            .unwrap();
        let _b = graph
            .create_sprite_with_zpath(Some(Arc::new(3)), Some(root))
            .unwrap();
        let _a1 = graph
            .create_sprite_with_zpath(Some(Arc::new(4)), Some(a))
            .unwrap();

        let mut canvas = RecordingCanvas::default();
        assert_eq!(graph.draw(&mut canvas), 4);
        assert_eq!(canvas.tags(), vec![1, 2, 4, 3]);
    }

    #[test]
    fn legacy_nodes_paint_first() {
        let mut graph = SceneGraph::new();
        let _root = graph.create_root_sprite(Some(Arc::new(10)), 0);
        let late = graph.create_sprite(Arc::new(20));
        let early = graph.create_sprite(Arc::new(30));
        graph.set_z_order(late, 5).unwrap();
        graph.set_z_order(early, 1).unwrap();

        let mut canvas = RecordingCanvas::default();
        graph.draw(&mut canvas);
        assert_eq!(canvas.tags(), vec![30, 20, 10]);
    }

    #[test]
    fn legacy_ties_break_by_id() {
        let mut graph = SceneGraph::new();
        let a = graph.create_sprite(Arc::new(1));
        let b = graph.create_sprite(Arc::new(2));
        assert_eq!(graph.paint_order(), &[a, b]);
    }

    #[test]
    fn hidden_ancestor_hides_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_root_sprite(Some(Arc::new(1)), 0);
        let child = graph
            .create_sprite_with_zpath(Some(Arc::new(2)), Some(root))
            .unwrap();
        let _leaf = graph
            .create_sprite_with_zpath(Some(Arc::new(3)), Some(child))
            .unwrap();
        graph.set_visible(child, false).unwrap();

        let mut canvas = RecordingCanvas::default();
        graph.draw(&mut canvas);
        assert_eq!(canvas.tags(), vec![1]);
    }

    #[test]
    fn draws_at_absolute_position_with_effective_alpha() {
        let mut graph = SceneGraph::new();
        let root = graph.create_root_sprite(None, 0);
        let child = graph
            .create_sprite_with_zpath(Some(Arc::new(9)), Some(root))
            .unwrap();
        graph.set_position(root, Point::new(100.0, 50.0)).unwrap();
        graph.set_position(child, Point::new(5.0, 5.0)).unwrap();
        graph.set_alpha(root, 0.5).unwrap();

        let mut canvas = RecordingCanvas::default();
        assert_eq!(graph.draw(&mut canvas), 1, "image-less root is skipped");
        assert_eq!(canvas.calls, vec![(9, Point::new(105.0, 55.0), 0.5)]);
    }

    #[test]
    fn sort_is_cached_until_invalidated() {
        let mut graph = SceneGraph::new();
        let root = graph.create_root_sprite(Some(Arc::new(1)), 0);
        let _ = graph.paint_order();
        assert!(!graph.needs_sort());

        graph.set_position(root, Point::new(1.0, 1.0)).unwrap();
        assert!(!graph.needs_sort(), "position does not affect order");

        graph.set_zpath(root, Some(ZPath::root(4))).unwrap();
        assert!(graph.needs_sort());
    }

    #[test]
    fn bring_to_front_changes_draw_order() {
        let mut graph = SceneGraph::new();
        let root = graph.create_root_sprite(None, 5);
        let first = graph
            .create_sprite_with_zpath(Some(Arc::new(1)), Some(root))
            .unwrap();
        let _second = graph
            .create_sprite_with_zpath(Some(Arc::new(2)), Some(root))
            .unwrap();
        let _first_child = graph
            .create_sprite_with_zpath(Some(Arc::new(3)), Some(first))
            .unwrap();

        let mut canvas = RecordingCanvas::default();
        graph.draw(&mut canvas);
        assert_eq!(canvas.tags(), vec![1, 3, 2]);

        graph.bring_to_front(first).unwrap();
        let mut canvas = RecordingCanvas::default();
        graph.draw(&mut canvas);
        assert_eq!(canvas.tags(), vec![2, 1, 3]);

        graph.send_to_back(first).unwrap();
        let mut canvas = RecordingCanvas::default();
        graph.draw(&mut canvas);
        assert_eq!(canvas.tags(), vec![1, 3, 2]);
    }

    #[test]
    fn draw_clears_dirty_of_drawn_nodes() {
        let mut graph = SceneGraph::new();
        let shown = graph.create_sprite(Arc::new(1));
        let hidden = graph.create_sprite_hidden(Arc::new(2));
        graph.draw(&mut RecordingCanvas::default());
        assert!(!graph.sprite(shown).unwrap().is_dirty());
        assert!(graph.sprite(hidden).unwrap().is_dirty());
    }
}

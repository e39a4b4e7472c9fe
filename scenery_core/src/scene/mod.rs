// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene tree data model.
//!
//! A *sprite* is a node in the scene tree. Each node has:
//!
//! - An identity ([`NodeId`]), allocated by its graph and never reused.
//! - Topology: a parent id and an ordered child list. The parent link is an id,
//!   not a reference; the [`SceneGraph`] owns every node.
//! - **Local properties** set by the caller: position, visibility, alpha,
//!   image, and a [`ZPath`](crate::ZPath).
//! - **Inherited properties** resolved through the graph:
//!   [`absolute_position`](SceneGraph::absolute_position),
//!   [`effective_alpha`](SceneGraph::effective_alpha), and
//!   [`is_effectively_visible`](SceneGraph::is_effectively_visible).
//!
//! # Paint order
//!
//! Nodes paint in z-path order, which is a pre-order walk of the tree. The
//! sorted order is cached; structural and z-path mutations invalidate it.
//!
//! # Construction order
//!
//! A sprite that becomes visible before its z-path is final can be observed by
//! a concurrent draw at the wrong depth. Create such sprites hidden, assign the
//! z-path and parent, then make them visible.
//! [`create_sprite_with_zpath`](SceneGraph::create_sprite_with_zpath) does
//! this internally.

mod graph;
mod id;
mod node;
mod order;
#[cfg(feature = "std")]
mod shared;

pub use graph::SceneGraph;
pub use id::NodeId;
pub use node::SceneNode;
#[cfg(feature = "std")]
pub use shared::SharedSceneGraph;

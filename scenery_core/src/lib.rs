// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Z-path scene graph and paint-order core for layered 2D scenes.
//!
//! `scenery_core` provides the ordering half of a legacy-style multimedia
//! renderer: every drawable sits in a tree, addressed by a [`ZPath`], and the
//! tree is drawn back to front onto a host-supplied [`Canvas`]. It is
//! `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   ZOrderCounter ──► ZPath ──► SceneNode ──► SceneGraph::draw() ──► Canvas
//!        (per-scope locals)      (owned by the graph, linked by NodeId)
//! ```
//!
//! **[`zpath`]**: Immutable integer-sequence addresses. Lexicographic order
//! is pre-order traversal: ancestors before descendants, siblings by local
//! z-order.
//!
//! **[`counter`]**: Monotonic per-scope allocation of local z-orders.
//!
//! **[`scene`]**: Nodes, the owning graph, cached paint order, and
//! bring-to-front / send-to-back.
//!
//! **[`image`]**: The [`Image`], [`Canvas`], and [`ImageBuffer`] traits
//! the host implements. Pixel work never happens here.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! draw and composite instrumentation, with zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies and
//!   the lock-guarded `SharedSceneGraph`.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-layer
//!   change and damage-rect events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod counter;
pub mod error;
pub mod image;
pub mod scene;
pub mod trace;
pub mod zpath;

pub use counter::{ZOrderCounter, ZScope};
pub use error::SceneError;
pub use image::{Canvas, Image, ImageBuffer, Rgba};
pub use kurbo;
pub use scene::{NodeId, SceneGraph, SceneNode};
#[cfg(feature = "std")]
pub use scene::SharedSceneGraph;
pub use zpath::ZPath;

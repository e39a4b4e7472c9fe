// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene graph errors.

use crate::scene::NodeId;

/// Errors returned by [`SceneGraph`](crate::scene::SceneGraph) operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// The node does not exist (never created or already removed).
    #[error("no sprite with id {0:?}")]
    NotFound(NodeId),
    /// Re-parenting would make a node its own ancestor.
    #[error("{child:?} cannot be parented under its own descendant {parent:?}")]
    Cycle {
        /// The node being moved.
        child: NodeId,
        /// The requested parent.
        parent: NodeId,
    },
}

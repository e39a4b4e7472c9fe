// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor errors.

use crate::id::{CastId, LayerId, PictureId, WindowId};
use crate::layer::LayerKind;

/// Errors returned by layer sets and the [`LayerManager`](crate::LayerManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ComposeError {
    /// No layer set is registered for the picture.
    #[error("no layer set for {0:?}")]
    PictureNotFound(PictureId),
    /// No window is registered under the id.
    #[error("no window {0:?}")]
    WindowNotFound(WindowId),
    /// The layer does not exist in the set.
    #[error("no layer {0:?}")]
    LayerNotFound(LayerId),
    /// No cast layer mirrors the cast.
    #[error("no layer for {0:?}")]
    CastNotFound(CastId),
    /// A configured per-kind cap would be exceeded.
    #[error("{kind:?} layer limit of {limit} reached")]
    ResourceExhausted {
        /// The kind of layer being created.
        kind: LayerKind,
        /// The configured cap.
        limit: usize,
    },
}

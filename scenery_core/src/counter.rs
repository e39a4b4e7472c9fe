// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-scope monotonic z-order allocation.

use hashbrown::HashMap;

use crate::scene::NodeId;

/// The sibling scope a local z-order is allocated in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ZScope {
    /// Top-level nodes with no parent.
    Root,
    /// Children of the given node.
    Parent(NodeId),
}

impl From<Option<NodeId>> for ZScope {
    fn from(parent: Option<NodeId>) -> Self {
        parent.map_or(Self::Root, Self::Parent)
    }
}

/// Hands out strictly increasing local z-orders per [`ZScope`].
///
/// A scope starts at 0. Values are never handed out twice for the same scope,
/// which is what lets "bring to front" simply ask for the next value: every
/// current sibling was allocated from the same counter and is therefore
/// smaller.
#[derive(Clone, Debug, Default)]
pub struct ZOrderCounter {
    next: HashMap<ZScope, i32>,
}

impl ZOrderCounter {
    /// Creates a counter with no allocated scopes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next value for `scope` and advances it.
    pub fn next(&mut self, scope: ZScope) -> i32 {
        let slot = self.next.entry(scope).or_insert(0);
        let value = *slot;
        *slot = slot.saturating_add(1);
        value
    }

    /// Returns the value the next call to [`next`](Self::next) would yield.
    #[must_use]
    pub fn peek(&self, scope: ZScope) -> i32 {
        self.next.get(&scope).copied().unwrap_or(0)
    }

    /// Raises the scope's next value so it exceeds `value`.
    ///
    /// Used when a caller assigns a z-path directly, so later allocations in
    /// the same scope still land above it.
    pub fn observe(&mut self, scope: ZScope, value: i32) {
        let slot = self.next.entry(scope).or_insert(0);
        if value >= *slot {
            *slot = value.saturating_add(1);
        }
    }

    /// Forgets a parent scope whose node no longer exists.
    ///
    /// Node ids are never reused, so the scope can never be asked for again.
    pub fn forget(&mut self, parent: NodeId) {
        self.next.remove(&ZScope::Parent(parent));
    }

    /// Forgets every parent scope, keeping the root scope's position.
    pub fn forget_parents(&mut self) {
        self.next.retain(|scope, _| *scope == ZScope::Root);
    }
}

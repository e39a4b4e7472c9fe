// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and JSON export for scenery diagnostics.
//!
//! This crate provides [`TraceSink`](scenery_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export_json`]: writes recorded bytes as a JSON array of events.

pub mod json;
pub mod pretty;
pub mod recorder;

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter.
//!
//! [`export_json`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array
//! with one object per event, in recording order. Each object carries a
//! `seq` index and a `type` name plus the event's fields.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
pub fn export_json(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes)
        .enumerate()
        .map(|(seq, event)| event_to_json(seq, &event))
        .collect();
    serde_json::to_writer_pretty(&mut *writer, &events).map_err(io::Error::other)?;
    writeln!(writer)
}

fn event_to_json(seq: usize, event: &RecordedEvent) -> Value {
    match event {
        RecordedEvent::PaintOrder(e) => json!({
            "seq": seq,
            "type": "PaintOrder",
            "node_count": e.node_count,
            "zpath_nodes": e.zpath_nodes,
        }),
        RecordedEvent::SceneDraw(e) => json!({
            "seq": seq,
            "type": "SceneDraw",
            "drawn": e.drawn,
            "skipped": e.skipped,
            "resorted": e.resorted,
        }),
        RecordedEvent::Composite(e) => json!({
            "seq": seq,
            "type": "Composite",
            "surface": e.surface,
            "visible_rect": e.visible_rect,
            "reused": e.reused,
            "drawn": e.drawn,
            "culled": e.culled,
            "clipped": e.clipped,
        }),
        RecordedEvent::LayerChangesCount { surface, count } => json!({
            "seq": seq,
            "type": "LayerChanges",
            "surface": surface,
            "count": count,
        }),
        RecordedEvent::DamageRectsCount { surface, count } => json!({
            "seq": seq,
            "type": "DamageRects",
            "surface": surface,
            "count": count,
        }),
    }
}

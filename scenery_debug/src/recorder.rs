// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`].
//!
//! Rich events ([`on_layer_changes`](TraceSink::on_layer_changes),
//! [`on_damage_rects`](TraceSink::on_damage_rects)) store only the count.

use scenery_core::trace::{
    CompositeEvent, DamageRect, LayerChange, PaintOrderEvent, SceneDrawEvent, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PAINT_ORDER: u8 = 1;
const TAG_SCENE_DRAW: u8 = 2;
const TAG_COMPOSITE: u8 = 3;
const TAG_LAYER_CHANGES_COUNT: u8 = 4;
const TAG_DAMAGE_RECTS_COUNT: u8 = 5;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything recorded so far.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, n: usize) {
        self.write_u32(u32::try_from(n).unwrap_or(u32::MAX));
    }
}

impl TraceSink for RecorderSink {
    fn on_paint_order_rebuilt(&mut self, e: &PaintOrderEvent) {
        self.write_u8(TAG_PAINT_ORDER);
        self.write_u32(e.node_count);
        self.write_u32(e.zpath_nodes);
    }

    fn on_scene_drawn(&mut self, e: &SceneDrawEvent) {
        self.write_u8(TAG_SCENE_DRAW);
        self.write_u32(e.drawn);
        self.write_u32(e.skipped);
        self.write_u8(u8::from(e.resorted));
    }

    fn on_composite(&mut self, e: &CompositeEvent) {
        self.write_u8(TAG_COMPOSITE);
        self.write_u32(e.surface);
        for v in e.visible_rect {
            self.write_f64(v);
        }
        self.write_u8(u8::from(e.reused));
        self.write_u32(e.drawn);
        self.write_u32(e.culled);
        self.write_u32(e.clipped);
    }

    fn on_layer_changes(&mut self, surface: u32, changes: &[LayerChange]) {
        self.write_u8(TAG_LAYER_CHANGES_COUNT);
        self.write_u32(surface);
        self.write_count(changes.len());
    }

    fn on_damage_rects(&mut self, surface: u32, rects: &[DamageRect]) {
        self.write_u8(TAG_DAMAGE_RECTS_COUNT);
        self.write_u32(surface);
        self.write_count(rects.len());
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`PaintOrderEvent`].
    PaintOrder(PaintOrderEvent),
    /// A [`SceneDrawEvent`].
    SceneDraw(SceneDrawEvent),
    /// A [`CompositeEvent`].
    Composite(CompositeEvent),
    /// Layer-change count for a composite.
    LayerChangesCount {
        /// Picture surface.
        surface: u32,
        /// Number of layer changes.
        count: u32,
    },
    /// Damage-rect count for a composite.
    DamageRectsCount {
        /// Picture surface.
        surface: u32,
        /// Number of damage rects.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Decoding stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|b| b != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn decode_paint_order(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PaintOrder(PaintOrderEvent {
            node_count: self.read_u32()?,
            zpath_nodes: self.read_u32()?,
        }))
    }

    fn decode_scene_draw(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::SceneDraw(SceneDrawEvent {
            drawn: self.read_u32()?,
            skipped: self.read_u32()?,
            resorted: self.read_bool()?,
        }))
    }

    fn decode_composite(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Composite(CompositeEvent {
            surface: self.read_u32()?,
            visible_rect: [
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
            ],
            reused: self.read_bool()?,
            drawn: self.read_u32()?,
            culled: self.read_u32()?,
            clipped: self.read_u32()?,
        }))
    }

    fn decode_count(&mut self, tag: u8) -> Option<RecordedEvent> {
        let surface = self.read_u32()?;
        let count = self.read_u32()?;
        Some(if tag == TAG_LAYER_CHANGES_COUNT {
            RecordedEvent::LayerChangesCount { surface, count }
        } else {
            RecordedEvent::DamageRectsCount { surface, count }
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PAINT_ORDER => self.decode_paint_order(),
            TAG_SCENE_DRAW => self.decode_scene_draw(),
            TAG_COMPOSITE => self.decode_composite(),
            TAG_LAYER_CHANGES_COUNT | TAG_DAMAGE_RECTS_COUNT => self.decode_count(tag),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use scenery_core::trace::LayerField;

    use super::*;

    fn composite() -> CompositeEvent {
        CompositeEvent {
            surface: 7,
            visible_rect: [0.0, 0.0, 320.5, 200.0],
            reused: false,
            drawn: 5,
            culled: 2,
            clipped: 1,
        }
    }

    #[test]
    fn records_and_decodes_a_frame() {
        let mut sink = RecorderSink::new();
        sink.on_paint_order_rebuilt(&PaintOrderEvent {
            node_count: 12,
            zpath_nodes: 10,
        });
        sink.on_scene_drawn(&SceneDrawEvent {
            drawn: 9,
            skipped: 3,
            resorted: true,
        });
        sink.on_layer_changes(
            7,
            &[LayerChange {
                layer_id: 4,
                field: LayerField::Added,
            }],
        );
        sink.on_damage_rects(7, &[]);
        sink.on_composite(&composite());

        let events: Vec<RecordedEvent> = decode(sink.as_bytes()).collect();
        assert_eq!(events.len(), 5);
        assert_eq!(
            events[1],
            RecordedEvent::SceneDraw(SceneDrawEvent {
                drawn: 9,
                skipped: 3,
                resorted: true,
            })
        );
        assert_eq!(
            events[2],
            RecordedEvent::LayerChangesCount {
                surface: 7,
                count: 1
            }
        );
        assert_eq!(
            events[3],
            RecordedEvent::DamageRectsCount {
                surface: 7,
                count: 0
            }
        );
        assert_eq!(events[4], RecordedEvent::Composite(composite()));
    }

    #[test]
    fn truncated_input_stops_cleanly() {
        let mut sink = RecorderSink::new();
        sink.on_composite(&composite());
        let bytes = sink.into_bytes();
        assert_eq!(decode(&bytes[..bytes.len() - 1]).count(), 0);
        assert_eq!(decode(&[]).count(), 0);
        assert_eq!(decode(&[0xFF, 1, 2]).count(), 0, "unknown tag");
    }

    #[test]
    fn clear_discards_events() {
        let mut sink = RecorderSink::new();
        sink.on_composite(&composite());
        sink.clear();
        assert!(sink.as_bytes().is_empty());
    }
}

// Copyright 2026 the Scenery Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use scenery_core::trace::{
    CompositeEvent, DamageRect, LayerChange, PaintOrderEvent, SceneDrawEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_paint_order_rebuilt(&mut self, e: &PaintOrderEvent) {
        let _ = writeln!(
            self.writer,
            "[sort] nodes={} zpath={}",
            e.node_count, e.zpath_nodes,
        );
    }

    fn on_scene_drawn(&mut self, e: &SceneDrawEvent) {
        let resorted = if e.resorted { " resorted" } else { "" };
        let _ = writeln!(
            self.writer,
            "[draw] drawn={} skipped={}{resorted}",
            e.drawn, e.skipped,
        );
    }

    fn on_composite(&mut self, e: &CompositeEvent) {
        let [x0, y0, x1, y1] = e.visible_rect;
        if e.reused {
            let _ = writeln!(
                self.writer,
                "[composite] surface={} rect=({x0},{y0})-({x1},{y1}) reused",
                e.surface,
            );
            return;
        }
        let _ = writeln!(
            self.writer,
            "[composite] surface={} rect=({x0},{y0})-({x1},{y1}) drawn={} culled={} clipped={}",
            e.surface, e.drawn, e.culled, e.clipped,
        );
    }

    fn on_layer_changes(&mut self, surface: u32, changes: &[LayerChange]) {
        let _ = writeln!(
            self.writer,
            "[layers] surface={surface} changes={}",
            changes.len(),
        );
    }

    fn on_damage_rects(&mut self, surface: u32, rects: &[DamageRect]) {
        let _ = write!(self.writer, "[damage] surface={surface} rects={}", rects.len());
        for r in rects {
            let _ = write!(self.writer, " {}x{}@({},{})", r.width, r.height, r.x, r.y);
        }
        let _ = writeln!(self.writer);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner()).unwrap()
    }

    #[test]
    fn pretty_print_composite() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_composite(&CompositeEvent {
            surface: 2,
            visible_rect: [0.0, 0.0, 640.0, 480.0],
            reused: false,
            drawn: 3,
            culled: 1,
            clipped: 0,
        });
        let output = output(sink);
        assert!(output.contains("[composite]"), "got: {output}");
        assert!(output.contains("surface=2"), "got: {output}");
        assert!(output.contains("culled=1"), "got: {output}");
    }

    #[test]
    fn pretty_print_damage_lists_rects() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_damage_rects(
            0,
            &[DamageRect {
                x: 1,
                y: 2,
                width: 30,
                height: 40,
            }],
        );
        let output = output(sink);
        assert_eq!(output, "[damage] surface=0 rects=1 30x40@(1,2)\n");
    }

    #[test]
    fn pretty_print_draw() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_scene_drawn(&SceneDrawEvent {
            drawn: 4,
            skipped: 1,
            resorted: true,
        });
        assert_eq!(output(sink), "[draw] drawn=4 skipped=1 resorted\n");
    }
}

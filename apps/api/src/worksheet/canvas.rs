//! Per-page display list. Drawing functions record into a `PageCanvas`; the PDF writer
//! replays the list into a content stream.

/// Stroke width of cell borders and guide lines.
pub const STROKE_WIDTH: f32 = 0.8;

/// Dash pattern for the interior guide lines: 3pt on, 3pt off.
pub const GUIDE_DASH: [f32; 2] = [3.0, 3.0];

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Stroked rectangle with its lower-left corner at (x, y).
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    /// Horizontal or vertical stroke.
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        dashed: bool,
    },
    /// Single-line text with its baseline origin at (x, y).
    Text {
        x: f32,
        y: f32,
        size: f32,
        text: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCanvas {
    ops: Vec<DrawOp>,
}

impl PageCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
        });
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, dashed: bool) {
        self.ops.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            dashed,
        });
    }

    pub fn text(&mut self, x: f32, y: f32, size: f32, text: impl Into<String>) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            text: text.into(),
        });
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

/// Display-list queries used by layout assertions.
#[cfg(test)]
impl PageCanvas {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn rect_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Rect { .. }))
            .count()
    }

    /// Returns (solid, dashed) line counts.
    pub fn line_counts(&self) -> (usize, usize) {
        self.ops.iter().fold((0, 0), |(solid, dashed), op| match op {
            DrawOp::Line { dashed: true, .. } => (solid, dashed + 1),
            DrawOp::Line { .. } => (solid + 1, dashed),
            _ => (solid, dashed),
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

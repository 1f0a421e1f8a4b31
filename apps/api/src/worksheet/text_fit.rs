//! Shrink-to-fit for single-line cell text.

use crate::worksheet::font_resolver::FontHandle;

/// Text sized and positioned for one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    /// Text as it will be drawn (non-ASCII replaced by `?` for Latin-only fonts).
    pub text: String,
    pub font_size: f32,
    /// Offset of the text origin from the cell's left edge.
    pub x_offset: f32,
    /// Width at `font_size`; may exceed the box when `min_size` was reached.
    pub width: f32,
}

/// Replaces everything outside printable ASCII with `?`, one per character.
pub fn to_printable_ascii(text: &str) -> String {
    text.chars()
        .map(|c| if (' '..='~').contains(&c) { c } else { '?' })
        .collect()
}

/// Picks the largest size in `[min_size, preferred_size]`, stepping down by 1pt, at which
/// `text` fits in `max_width`, and centers it inside a cell of `max_width + 2 * padding`.
///
/// Returns `None` for empty text: nothing should be drawn.
pub fn fit_text(
    font: &FontHandle,
    text: &str,
    preferred_size: f32,
    min_size: f32,
    max_width: f32,
    padding: f32,
) -> Option<FittedText> {
    if text.is_empty() {
        return None;
    }

    let text = if font.supports_wide_glyphs() {
        text.to_string()
    } else {
        to_printable_ascii(text)
    };

    // width scales linearly with size, so measure once
    let units = font.measure_units(&text);
    let width_at = |size: f32| units * size / 1000.0;

    let mut size = preferred_size.max(min_size);
    while width_at(size) > max_width && size > min_size {
        size = (size - 1.0).max(min_size);
    }

    let width = width_at(size);
    let cell_width = max_width + padding * 2.0;
    let x_offset = ((cell_width - width.min(max_width)) / 2.0).max(padding);

    Some(FittedText {
        text,
        font_size: size,
        x_offset,
        width,
    })
}

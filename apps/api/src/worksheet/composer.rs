//! Document composition — walks the shuffled words into the paginated grid.
//!
//! Each word takes one logical column: a prompt cell on the left, a practice cell on the
//! right. Three logical columns make a row. The page-break check runs only when a new row
//! starts; a row that would cross the bottom margin goes to a fresh page.

use crate::models::word::WordRecord;
use crate::worksheet::canvas::PageCanvas;
use crate::worksheet::cell::{draw_cell, draw_cell_text};
use crate::worksheet::font_resolver::FontHandle;
use crate::worksheet::layout::{LayoutConfig, PaginationCursor};
use crate::worksheet::request::DictationMode;
use crate::worksheet::text_fit::fit_text;

// ────────────────────────────────────────────────────────────────────────────
// Composed document
// ────────────────────────────────────────────────────────────────────────────

/// Where one word ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub word_id: i64,
    pub page_index: usize,
    pub column: usize,
    /// Top edge of the row.
    pub row_top: f32,
}

/// A laid-out worksheet, one display list per page. Always has at least one page.
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub pages: Vec<PageCanvas>,
    pub placements: Vec<Placement>,
}

impl Worksheet {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn word_count(&self) -> usize {
        self.placements.len()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pagination walk
// ────────────────────────────────────────────────────────────────────────────

pub fn compose_worksheet(
    words: &[WordRecord],
    mode: DictationMode,
    font: &FontHandle,
    config: &LayoutConfig,
) -> Worksheet {
    let expected_pages = words.len().div_ceil(config.words_per_page().max(1)).max(1);
    let mut pages = Vec::with_capacity(expected_pages);
    let mut page = PageCanvas::new();
    let mut placements = Vec::with_capacity(words.len());
    let mut cursor = PaginationCursor::new(config);

    let cell_width = config.cell_width();
    let cell_height = config.row_height;
    let guided = mode.practice_cell_guided();
    let preferred_size = mode.preferred_font_size();

    for word in words {
        if cursor.at_row_start() && cursor.page_full(config) {
            pages.push(std::mem::take(&mut page));
            cursor.next_page(config);
        }

        let left_x = config.column_x(cursor.column);
        let right_x = left_x + cell_width + config.inner_gutter;
        let bottom = cursor.y - cell_height;

        draw_cell(&mut page, left_x, bottom, cell_width, cell_height, false);
        draw_cell(&mut page, right_x, bottom, cell_width, cell_height, guided);

        let prompt = mode.prompt_text(&word.english, &word.chinese);
        if let Some(fitted) = fit_text(
            font,
            &prompt,
            preferred_size,
            config.min_font_size,
            config.text_max_width(),
            config.cell_padding,
        ) {
            draw_cell_text(&mut page, left_x, bottom, cell_height, &fitted);
        }

        placements.push(Placement {
            word_id: word.id,
            page_index: cursor.page_index,
            column: cursor.column,
            row_top: cursor.y,
        });

        cursor.advance_column(config);
    }

    pages.push(page);
    Worksheet { pages, placements }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

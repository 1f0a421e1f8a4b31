//! Fixed worksheet geometry (A4 portrait, points) and the pagination cursor.

/// Page and grid constants. Not request-configurable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub page_width: f32,
    pub page_height: f32,
    /// Blank border around the page so printers don't clip.
    pub margin: f32,
    /// Horizontal gap between logical columns.
    pub column_gutter: f32,
    /// Gap between the prompt cell and the practice cell inside a logical column.
    pub inner_gutter: f32,
    pub num_columns: usize,
    pub row_height: f32,
    pub row_gap: f32,
    pub cell_padding: f32,
    pub min_font_size: f32,
}

pub const A4_LAYOUT: LayoutConfig = LayoutConfig {
    page_width: 595.28,
    page_height: 841.89,
    margin: 36.0,
    column_gutter: 12.0,
    inner_gutter: 4.0,
    num_columns: 3,
    row_height: 50.0,
    row_gap: 10.0,
    cell_padding: 6.0,
    min_font_size: 10.0,
};

impl Default for LayoutConfig {
    fn default() -> Self {
        A4_LAYOUT
    }
}

impl LayoutConfig {
    pub fn usable_width(&self) -> f32 {
        self.page_width - self.margin * 2.0
    }

    pub fn column_width(&self) -> f32 {
        let gutters = self.column_gutter * (self.num_columns as f32 - 1.0);
        (self.usable_width() - gutters) / self.num_columns as f32
    }

    /// Width of one of the two cells in a logical column.
    pub fn cell_width(&self) -> f32 {
        (self.column_width() - self.inner_gutter) / 2.0
    }

    /// Left edge of logical column `index`.
    pub fn column_x(&self, index: usize) -> f32 {
        self.margin + index as f32 * (self.column_width() + self.column_gutter)
    }

    /// Vertical position of the first row's top edge.
    pub fn first_row_top(&self) -> f32 {
        self.page_height - self.margin
    }

    pub fn row_pitch(&self) -> f32 {
        self.row_height + self.row_gap
    }

    /// Widest text run that fits inside a cell's padding.
    pub fn text_max_width(&self) -> f32 {
        (self.cell_width() - self.cell_padding * 2.0).max(1.0)
    }

    /// Rows that fit between the top and bottom margins.
    pub fn rows_per_page(&self) -> usize {
        ((self.page_height - 2.0 * self.margin) / self.row_pitch()).floor() as usize
    }

    pub fn words_per_page(&self) -> usize {
        self.num_columns * self.rows_per_page()
    }
}

/// Where the next cell pair goes. Created per document, reset per page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaginationCursor {
    pub page_index: usize,
    /// Top edge of the current row.
    pub y: f32,
    pub column: usize,
}

impl PaginationCursor {
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            page_index: 0,
            y: config.first_row_top(),
            column: 0,
        }
    }

    pub fn at_row_start(&self) -> bool {
        self.column == 0
    }

    /// True when a new row starting at the cursor would cross the bottom margin.
    pub fn page_full(&self, config: &LayoutConfig) -> bool {
        self.y - config.row_height < config.margin
    }

    pub fn next_page(&mut self, config: &LayoutConfig) {
        self.page_index += 1;
        self.y = config.first_row_top();
        self.column = 0;
    }

    /// Moves one logical column right, wrapping to the next row.
    pub fn advance_column(&mut self, config: &LayoutConfig) {
        self.column += 1;
        if self.column >= config.num_columns {
            self.column = 0;
            self.y -= config.row_pitch();
        }
    }
}

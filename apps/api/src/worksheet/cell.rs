//! One worksheet cell: border, optional four-line guide, optional text.

use crate::worksheet::canvas::PageCanvas;
use crate::worksheet::text_fit::FittedText;

/// Draws a cell with its lower-left corner at (x, y).
///
/// With `guide_lines`, the height is split into three equal bands by four horizontal
/// rules: top and bottom solid, the two interior rules dashed.
pub fn draw_cell(
    canvas: &mut PageCanvas,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    guide_lines: bool,
) {
    canvas.stroke_rect(x, y, width, height);

    if !guide_lines {
        return;
    }

    let step = height / 3.0;
    let right = x + width;
    canvas.line(x, y + height, right, y + height, false);
    canvas.line(x, y, right, y, false);
    canvas.line(x, y + step, right, y + step, true);
    canvas.line(x, y + step * 2.0, right, y + step * 2.0, true);
}

/// Places fitted text inside the cell at (x, y, _, height), vertically centered on the
/// font size.
pub fn draw_cell_text(canvas: &mut PageCanvas, x: f32, y: f32, height: f32, fitted: &FittedText) {
    let baseline = y + (height - fitted.font_size) / 2.0 + 2.0;
    canvas.text(x + fitted.x_offset, baseline, fitted.font_size, fitted.text.clone());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::worksheet::canvas::DrawOp;

    #[test]
    fn test_guided_cell_has_rect_and_four_lines() {
        let mut page = PageCanvas::new();
        draw_cell(&mut page, 10.0, 20.0, 80.0, 50.0, true);
        assert_eq!(page.rect_count(), 1);
        assert_eq!(page.line_counts(), (2, 2));
    }

    #[test]
    fn test_plain_cell_has_only_rect() {
        let mut page = PageCanvas::new();
        draw_cell(&mut page, 10.0, 20.0, 80.0, 50.0, false);
        assert_eq!(page.rect_count(), 1);
        assert_eq!(page.line_counts(), (0, 0));
    }

    #[test]
    fn test_guide_lines_split_height_in_three() {
        let mut page = PageCanvas::new();
        draw_cell(&mut page, 0.0, 0.0, 60.0, 30.0, true);
        let mut dashed_ys: Vec<f32> = page
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Line {
                    y1, dashed: true, ..
                } => Some(*y1),
                _ => None,
            })
            .collect();
        dashed_ys.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(dashed_ys, vec![10.0, 20.0]);
    }

    #[test]
    fn test_text_baseline_and_offset() {
        let mut page = PageCanvas::new();
        let fitted = FittedText {
            text: "cat".to_string(),
            font_size: 14.0,
            x_offset: 30.0,
            width: 18.7,
        };
        draw_cell_text(&mut page, 100.0, 200.0, 50.0, &fitted);
        assert_eq!(
            page.ops()[0],
            DrawOp::Text {
                x: 130.0,
                y: 200.0 + 18.0 + 2.0,
                size: 14.0,
                text: "cat".to_string(),
            }
        );
    }
}

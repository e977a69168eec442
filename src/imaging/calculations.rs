//! Pure layout math for the caption bar and the photo crop.
//!
//! Nothing here touches pixels or fonts directly, so every formula is unit
//! tested with plain numbers.

use super::fonts::CaptionFont;
use super::layout::LayoutResult;
use super::params::RenderParams;
use serde::Serialize;

/// Measured to get a line height covering both ascenders and descenders.
pub const LINE_HEIGHT_PROBE: &str = "gh";

/// Bar height adds this many paddings to the text block.
pub const BAR_PADDING_MULTIPLIER: f64 = 1.65;

/// Vertical metrics of one caption bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BarGeometry {
    pub line_height: u32,
    pub line_spacing: u32,
    pub text_block_height: u32,
    pub padding: u32,
    /// Total bar height in pixels, rounded down.
    pub bar_height: u32,
    /// Offset of the first line from the top of the bar.
    pub text_top: u32,
}

impl BarGeometry {
    /// Distance between the tops of consecutive lines.
    pub fn line_pitch(&self) -> u32 {
        self.line_height + self.line_spacing
    }
}

/// Compute bar geometry from a line count and line height.
///
/// ```text
/// spacing = floor(line_height * spacing_ratio)
/// block   = lines * line_height + max(0, lines - 1) * spacing
/// padding = floor(line_height * padding_factor)
/// bar     = block + 1.65 * padding
/// top     = (bar - block) / 2
/// ```
pub fn compute_geometry(
    line_count: usize,
    line_height: u32,
    line_spacing_ratio: f64,
    padding_scaling_factor: f64,
) -> BarGeometry {
    let line_spacing = (line_height as f64 * line_spacing_ratio) as u32;
    let lines = line_count as u32;
    let text_block_height = lines * line_height + lines.saturating_sub(1) * line_spacing;
    let padding = (line_height as f64 * padding_scaling_factor) as u32;

    let exact_bar = text_block_height as f64 + BAR_PADDING_MULTIPLIER * padding as f64;
    let text_top = ((exact_bar - text_block_height as f64) / 2.0) as u32;

    BarGeometry {
        line_height,
        line_spacing,
        text_block_height,
        padding,
        bar_height: exact_bar as u32,
        text_top,
    }
}

/// Measure the probe string in `font` and compute the bar for `layout`.
pub fn measure_geometry<F: CaptionFont>(
    layout: &LayoutResult,
    font: &F,
    params: &RenderParams,
) -> BarGeometry {
    let line_height = font.text_bbox(LINE_HEIGHT_PROBE).height();
    compute_geometry(
        layout.lines.len(),
        line_height,
        params.line_spacing_ratio,
        params.padding_scaling_factor,
    )
}

/// Centered square crop as `(x, y, side)`.
///
/// Returns the full image when it is already square.
pub fn square_crop_rect(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    ((width - side) / 2, (height - side) / 2, side)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::fonts::tests::MonoFont;
    use crate::imaging::layout::LayoutMode;

    #[test]
    fn single_line_geometry() {
        let g = compute_geometry(1, 20, 0.4, 1.0);
        assert_eq!(g.line_spacing, 8);
        assert_eq!(g.text_block_height, 20);
        assert_eq!(g.padding, 20);
        // 20 + 1.65 * 20 = 53
        assert_eq!(g.bar_height, 53);
        assert_eq!(g.text_top, 16);
    }

    #[test]
    fn three_line_geometry() {
        let g = compute_geometry(3, 20, 0.4, 1.0);
        assert_eq!(g.text_block_height, 3 * 20 + 2 * 8);
        assert_eq!(g.bar_height, 76 + 33);
        assert_eq!(g.line_pitch(), 28);
    }

    #[test]
    fn spacing_and_padding_truncate() {
        let g = compute_geometry(2, 37, 0.4, 0.5);
        // 37 * 0.4 = 14.8, 37 * 0.5 = 18.5
        assert_eq!(g.line_spacing, 14);
        assert_eq!(g.padding, 18);
        // 88 + 1.65 * 18 = 117.7
        assert_eq!(g.text_block_height, 88);
        assert_eq!(g.bar_height, 117);
        assert_eq!(g.text_top, 14);
    }

    #[test]
    fn zero_lines_is_padding_only() {
        let g = compute_geometry(0, 20, 0.4, 1.0);
        assert_eq!(g.text_block_height, 0);
        assert_eq!(g.bar_height, 33);
    }

    #[test]
    fn bar_height_non_decreasing_in_line_count() {
        for line_height in [1, 12, 37, 64] {
            let mut previous = 0;
            for lines in 0..12 {
                let g = compute_geometry(lines, line_height, 0.4, 1.0);
                assert!(g.bar_height >= previous);
                previous = g.bar_height;
            }
        }
    }

    #[test]
    fn text_block_is_vertically_centered() {
        let g = compute_geometry(4, 30, 0.4, 1.0);
        let below = g.bar_height - g.text_top - g.text_block_height;
        assert!(g.text_top.abs_diff(below) <= 1);
    }

    #[test]
    fn measure_uses_probe_height() {
        let layout = LayoutResult {
            lines: vec!["one".into(), "two".into()],
            font_size: 30,
            mode: LayoutMode::Normal,
        };
        let g = measure_geometry(&layout, &MonoFont { size: 30 }, &RenderParams::default());
        assert_eq!(g.line_height, 30);
        assert_eq!(g.line_spacing, 12);
        assert_eq!(g.text_block_height, 72);
    }

    #[test]
    fn square_crop_landscape() {
        assert_eq!(square_crop_rect(1600, 900), (350, 0, 900));
    }

    #[test]
    fn square_crop_portrait() {
        assert_eq!(square_crop_rect(600, 800), (0, 100, 600));
    }

    #[test]
    fn square_crop_already_square() {
        assert_eq!(square_crop_rect(500, 500), (0, 0, 500));
    }

    #[test]
    fn square_crop_odd_difference_rounds_down() {
        assert_eq!(square_crop_rect(101, 100), (0, 0, 100));
    }
}

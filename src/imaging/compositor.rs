//! Final image assembly.
//!
//! ```text
//! ┌──────────────────────┐  ─┐
//! │  caption line 1      │   │ bar_height (background fill)
//! │  caption line 2      │   │
//! ├──────────────────────┤  ─┘
//! │                      │
//! │   square-cropped,    │   target height
//! │   resized photo      │
//! │                      │
//! └──────────────────────┘
//! ```
//!
//! Lines are left-aligned at `margin_x` and the text block is vertically
//! centered in the bar.

use super::calculations::{BarGeometry, measure_geometry, square_crop_rect};
use super::fonts::{CaptionFont, FontSource};
use super::layout::{LayoutResult, solve};
use super::params::RenderParams;
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbImage};

/// A rendered caption image and how its caption was laid out.
#[derive(Debug)]
pub struct Captioned {
    pub image: RgbImage,
    pub layout: LayoutResult,
    pub geometry: BarGeometry,
    /// Name of the font the caption was drawn with.
    pub font_name: String,
}

/// Center-crop to a square, then resize to the target canvas.
pub fn prepare_photo(source: &DynamicImage, target: (u32, u32)) -> RgbImage {
    let (x, y, side) = square_crop_rect(source.width(), source.height());
    let square = if side == source.width() && side == source.height() {
        source.to_rgb8()
    } else {
        source.crop_imm(x, y, side, side).to_rgb8()
    };
    if square.dimensions() == target {
        return square;
    }
    imageops::resize(&square, target.0, target.1, FilterType::Lanczos3)
}

/// Stack a caption bar on top of `photo` and draw the layout into it.
pub fn composite<F: CaptionFont>(
    photo: &RgbImage,
    layout: &LayoutResult,
    geometry: &BarGeometry,
    font: &F,
    params: &RenderParams,
) -> RgbImage {
    let (width, height) = photo.dimensions();
    let bar_height = geometry.bar_height;
    let mut canvas = RgbImage::from_pixel(width, height + bar_height, params.background);
    imageops::replace(&mut canvas, photo, 0, bar_height as i64);

    let x = params.margin_x as i32;
    let mut y = geometry.text_top as i32;
    for line in &layout.lines {
        font.draw_text(&mut canvas, x, y, line, params.text_color);
        y += geometry.line_pitch() as i32;
    }
    canvas
}

/// Crop, lay out, measure and composite one caption onto one photo.
pub fn caption_image<S: FontSource>(
    source: &DynamicImage,
    caption: &str,
    fonts: &S,
    params: &RenderParams,
) -> Captioned {
    let photo = prepare_photo(source, params.target);
    let solution = solve(caption, fonts, params);
    let geometry = measure_geometry(&solution.layout, &solution.font, params);
    let image = composite(&photo, &solution.layout, &geometry, &solution.font, params);

    Captioned {
        image,
        font_name: solution.font.name().to_string(),
        layout: solution.layout,
        geometry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::fonts::tests::{MonoFont, MonoFonts};
    use crate::imaging::layout::LayoutMode;
    use image::Rgb;

    const RED: Rgb<u8> = Rgb([200, 0, 0]);
    const GREEN: Rgb<u8> = Rgb([0, 200, 0]);
    const BLUE: Rgb<u8> = Rgb([0, 0, 200]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

    fn small_params() -> RenderParams {
        RenderParams {
            target: (200, 200),
            start_font_size: 10,
            max_text_width: 180,
            margin_x: 10,
            font_candidates: vec!["mono.ttf".to_string()],
            ..RenderParams::default()
        }
    }

    fn striped(width: u32, height: u32) -> DynamicImage {
        // red | green | blue with the green band centered
        let band = width.min(height);
        let left = (width - band) / 2;
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            if x < left {
                RED
            } else if x < left + band {
                GREEN
            } else {
                BLUE
            }
        }))
    }

    #[test]
    fn prepare_crops_center_square() {
        let photo = prepare_photo(&striped(300, 100), (100, 100));
        assert_eq!(photo.dimensions(), (100, 100));
        assert!(photo.pixels().all(|p| *p == GREEN));
    }

    #[test]
    fn prepare_resizes_to_target() {
        let photo = prepare_photo(&striped(400, 200), (50, 50));
        assert_eq!(photo.dimensions(), (50, 50));
        assert_eq!(*photo.get_pixel(25, 25), GREEN);
    }

    #[test]
    fn prepare_portrait_source() {
        let source = DynamicImage::ImageRgb8(RgbImage::from_pixel(60, 90, GREEN));
        assert_eq!(prepare_photo(&source, (120, 120)).dimensions(), (120, 120));
    }

    #[test]
    fn composite_dimensions_and_paste_offset() {
        let params = small_params();
        let photo = RgbImage::from_pixel(200, 200, GREEN);
        let layout = LayoutResult {
            lines: vec!["hello".into(), "world".into()],
            font_size: 10,
            mode: LayoutMode::Normal,
        };
        let font = MonoFont { size: 10 };
        let geometry = measure_geometry(&layout, &font, &params);
        let canvas = composite(&photo, &layout, &geometry, &font, &params);

        assert_eq!(canvas.width(), 200);
        assert_eq!(canvas.height(), 200 + geometry.bar_height);
        assert_eq!(*canvas.get_pixel(0, geometry.bar_height), GREEN);
        assert_eq!(*canvas.get_pixel(199, canvas.height() - 1), GREEN);
        assert_eq!(*canvas.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn text_is_left_aligned_inside_bar() {
        let params = small_params();
        let photo = RgbImage::from_pixel(200, 200, GREEN);
        let layout = LayoutResult {
            lines: vec!["abc".into(), "de".into()],
            font_size: 10,
            mode: LayoutMode::Normal,
        };
        let font = MonoFont { size: 10 };
        let geometry = measure_geometry(&layout, &font, &params);
        let canvas = composite(&photo, &layout, &geometry, &font, &params);

        let ink: Vec<(u32, u32)> = canvas
            .enumerate_pixels()
            .filter(|(_, _, p)| **p == BLACK)
            .map(|(x, y, _)| (x, y))
            .collect();
        assert!(!ink.is_empty());
        assert!(ink.iter().all(|(x, _)| *x >= params.margin_x));
        assert!(ink.iter().all(|(_, y)| *y < geometry.bar_height));
        // first line starts at text_top, second one pitch lower
        assert_eq!(ink.iter().map(|(_, y)| *y).min(), Some(geometry.text_top));
        assert_eq!(
            ink.iter().map(|(_, y)| *y).max(),
            Some(geometry.text_top + geometry.line_pitch() + 9)
        );
    }

    #[test]
    fn custom_colors_are_used() {
        let params = RenderParams {
            background: BLUE,
            text_color: RED,
            ..small_params()
        };
        let photo = RgbImage::from_pixel(200, 200, GREEN);
        let layout = LayoutResult {
            lines: vec!["x".into()],
            font_size: 10,
            mode: LayoutMode::Normal,
        };
        let font = MonoFont { size: 10 };
        let geometry = measure_geometry(&layout, &font, &params);
        let canvas = composite(&photo, &layout, &geometry, &font, &params);

        assert_eq!(*canvas.get_pixel(199, 0), BLUE);
        assert_eq!(
            *canvas.get_pixel(params.margin_x, geometry.text_top),
            RED
        );
    }

    #[test]
    fn caption_image_end_to_end() {
        let fonts = MonoFonts::with_available(&["mono.ttf"]);
        let params = small_params();
        let result = caption_image(&striped(400, 300), "keep going", &fonts, &params);

        assert_eq!(result.layout.mode, LayoutMode::Normal);
        assert_eq!(result.font_name, "mono.ttf");
        assert_eq!(result.image.width(), 200);
        assert_eq!(result.image.height(), 200 + result.geometry.bar_height);
    }

    #[test]
    fn caption_image_is_deterministic() {
        let fonts = MonoFonts::with_available(&["mono.ttf"]);
        let params = small_params();
        let source = striped(300, 300);
        let a = caption_image(&source, "the hottest fire", &fonts, &params);
        let b = caption_image(&source, "the hottest fire", &fonts, &params);

        assert_eq!(a.layout, b.layout);
        assert_eq!(a.geometry, b.geometry);
        assert_eq!(a.image, b.image);
    }

    #[test]
    fn degraded_caption_still_composites() {
        let fonts = MonoFonts::with_available(&["mono.ttf"]);
        let params = RenderParams {
            max_text_width: 20,
            ..small_params()
        };
        let caption = "z".repeat(60);
        let result = caption_image(&striped(200, 200), &caption, &fonts, &params);

        assert_eq!(result.layout.mode, LayoutMode::Degraded);
        assert_eq!(result.layout.lines.len(), 1);
        assert_eq!(result.image.width(), 200);
    }
}

//! Concrete pixel parameters derived from [`CaptionConfig`].
//!
//! Ratios in the config are resolved against the target canvas once, so the
//! solver, geometry and compositor all work in integer pixels.

use crate::config::{CaptionConfig, ConfigError, parse_hex_color};
use image::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    /// Photo area `(width, height)` after square-crop and resize.
    pub target: (u32, u32),
    /// First font size the solver tries.
    pub start_font_size: u32,
    /// Widest a wrapped line may render.
    pub max_text_width: u32,
    pub line_spacing_ratio: f64,
    pub padding_scaling_factor: f64,
    /// Left text origin in pixels.
    pub margin_x: u32,
    pub degraded_font_size: u32,
    pub font_candidates: Vec<String>,
    pub background: Rgb<u8>,
    pub text_color: Rgb<u8>,
}

impl RenderParams {
    pub fn from_config(config: &CaptionConfig) -> Result<Self, ConfigError> {
        let [width, height] = config.canvas.size;
        let text = &config.text;
        let color = |value: &str| {
            parse_hex_color(value)
                .map(Rgb)
                .map_err(ConfigError::Validation)
        };

        Ok(Self {
            target: (width, height),
            start_font_size: width / text.font_size_ratio.max(1),
            max_text_width: (width as f64 * text.max_text_width_ratio) as u32,
            line_spacing_ratio: text.line_spacing_ratio,
            padding_scaling_factor: text.padding_scaling_factor,
            margin_x: (width as f64 * text.margin_ratio) as u32,
            degraded_font_size: text.degraded_font_size,
            font_candidates: config.fonts.candidates.clone(),
            background: color(&config.colors.background)?,
            text_color: color(&config.colors.text)?,
        })
    }
}

impl Default for RenderParams {
    fn default() -> Self {
        Self::from_config(&CaptionConfig::default()).expect("default config must resolve")
    }
}

//! Render configuration.
//!
//! Every tunable the caption renderer consumes lives in [`CaptionConfig`]. The
//! value is loaded once and threaded explicitly into each component call, so
//! tests can vary ratios per case without touching global state.
//!
//! ## Config File Location
//!
//! The CLI reads `caption-bar.toml` from the working directory when present, or
//! the file passed with `--config`. Both are optional.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [canvas]
//! size = [1000, 1000]           # Photo area (width, height) after square-crop
//!
//! [text]
//! font_size_ratio = 20          # Start font size = canvas width / ratio
//! line_spacing_ratio = 0.4      # Gap between lines, fraction of line height
//! max_text_width_ratio = 0.9    # Wrap width, fraction of canvas width
//! padding_scaling_factor = 1.0  # Bar padding, fraction of line height
//! margin_ratio = 0.05           # Left text origin, fraction of canvas width
//! degraded_font_size = 10       # Font size when no wrap fits
//!
//! [fonts]
//! candidates = ["Montserrat-VariableFont_wght.ttf", "montserrat.ttf", "arial.ttf", "DejaVuSans.ttf"]
//! search_dirs = []              # Searched before the platform font directories
//!
//! [colors]
//! background = "#ffffff"
//! text = "#000000"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [text]
//! font_size_ratio = 16
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "caption-bar.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Caption renderer configuration.
///
/// All fields have defaults matching the stock renderer. User config files
/// need only specify the values they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionConfig {
    /// Target size of the photo portion of every output.
    pub canvas: CanvasConfig,
    /// Font sizing and layout ratios.
    pub text: TextConfig,
    /// Font candidates and where to look for them.
    pub fonts: FontsConfig,
    /// Bar and text colors.
    pub colors: ColorConfig,
}

impl CaptionConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let [width, height] = self.canvas.size;
        if width == 0 || height == 0 {
            return Err(ConfigError::Validation(
                "canvas.size values must be non-zero".into(),
            ));
        }
        if self.text.font_size_ratio == 0 {
            return Err(ConfigError::Validation(
                "text.font_size_ratio must be non-zero".into(),
            ));
        }
        for (key, value) in [
            ("text.line_spacing_ratio", self.text.line_spacing_ratio),
            ("text.padding_scaling_factor", self.text.padding_scaling_factor),
            ("text.margin_ratio", self.text.margin_ratio),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a non-negative number"
                )));
            }
        }
        let max_width = self.text.max_text_width_ratio;
        if !max_width.is_finite() || max_width <= 0.0 || max_width > 1.0 {
            return Err(ConfigError::Validation(
                "text.max_text_width_ratio must be in (0, 1]".into(),
            ));
        }
        if self.text.margin_ratio >= 1.0 {
            return Err(ConfigError::Validation(
                "text.margin_ratio must be less than 1".into(),
            ));
        }
        if self.text.degraded_font_size == 0 {
            return Err(ConfigError::Validation(
                "text.degraded_font_size must be non-zero".into(),
            ));
        }
        parse_hex_color(&self.colors.background)
            .map_err(|e| ConfigError::Validation(format!("colors.background: {e}")))?;
        parse_hex_color(&self.colors.text)
            .map_err(|e| ConfigError::Validation(format!("colors.text: {e}")))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// `[width, height]` of the resized photo in pixels.
    pub size: [u32; 2],
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { size: [1000, 1000] }
    }
}

/// Font sizing and layout ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TextConfig {
    /// Start font size is the canvas width divided by this value.
    pub font_size_ratio: u32,
    /// Inter-line spacing as a fraction of line height.
    pub line_spacing_ratio: f64,
    /// Maximum rendered line width as a fraction of canvas width.
    pub max_text_width_ratio: f64,
    /// Bar padding as a fraction of line height.
    pub padding_scaling_factor: f64,
    /// Left text origin as a fraction of canvas width.
    pub margin_ratio: f64,
    /// Point size of the fallback font when no wrap fits.
    pub degraded_font_size: u32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size_ratio: 20,
            line_spacing_ratio: 0.4,
            max_text_width_ratio: 0.9,
            padding_scaling_factor: 1.0,
            margin_ratio: 0.05,
            degraded_font_size: 10,
        }
    }
}

/// Font candidates, tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontsConfig {
    /// Font file names or paths in priority order.
    pub candidates: Vec<String>,
    /// Extra directories searched (recursively) before the platform font dirs.
    pub search_dirs: Vec<PathBuf>,
}

impl Default for FontsConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "Montserrat-VariableFont_wght.ttf".to_string(),
                "montserrat.ttf".to_string(),
                "arial.ttf".to_string(),
                "DejaVuSans.ttf".to_string(),
            ],
            search_dirs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Caption bar fill.
    pub background: String,
    /// Caption text.
    pub text: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#000000".to_string(),
        }
    }
}

/// Parse `#RGB` or `#RRGGBB` into an RGB triple.
pub fn parse_hex_color(hex: &str) -> Result<[u8; 3], String> {
    let digits = hex
        .strip_prefix('#')
        .ok_or_else(|| format!("color must start with '#', got {hex:?}"))?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex digit in {hex:?}"));
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|e| e.to_string());
    match digits.len() {
        3 => Ok([
            channel(&digits[0..1])? * 17,
            channel(&digits[1..2])? * 17,
            channel(&digits[2..3])? * 17,
        ]),
        6 => Ok([
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        ]),
        n => Err(format!("color must be #RGB or #RRGGBB, got {n} digits")),
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CaptionConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CaptionConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CaptionConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load an explicit config file. The file must exist.
pub fn load_config(path: &Path) -> Result<CaptionConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `caption-bar.toml` from `dir` if present, stock defaults otherwise.
pub fn load_config_or_default(dir: &Path) -> Result<CaptionConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return resolve_config(None);
    }
    load_config(&path)
}

/// Returns a fully-commented stock config file with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# caption-bar configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Canvas
# ---------------------------------------------------------------------------
[canvas]
# Photos are square-cropped, then resized to [width, height]. The caption bar
# is added on top, so outputs are width x (height + bar height).
size = [1000, 1000]

# ---------------------------------------------------------------------------
# Text layout
# ---------------------------------------------------------------------------
[text]
# The font size search starts at canvas width / font_size_ratio and steps down
# by 2 until every word fits.
font_size_ratio = 20

# Space between wrapped lines, as a fraction of the line height.
line_spacing_ratio = 0.4

# Lines wrap at this fraction of the canvas width.
max_text_width_ratio = 0.9

# Vertical bar padding, as a fraction of the line height.
padding_scaling_factor = 1.0

# Text is left-aligned at this fraction of the canvas width.
margin_ratio = 0.05

# When no size lets the caption wrap, it is drawn unwrapped at this size.
degraded_font_size = 10

# ---------------------------------------------------------------------------
# Fonts
# ---------------------------------------------------------------------------
[fonts]
# Tried in order; the first one that loads wins. Names containing
# "VariableFont" are pinned to their Regular weight. When none load, a
# built-in bitmap font is used.
candidates = ["Montserrat-VariableFont_wght.ttf", "montserrat.ttf", "arial.ttf", "DejaVuSans.ttf"]

# Directories searched (recursively) before the platform font directories.
search_dirs = []

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
background = "#ffffff"
text = "#000000"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_stock_renderer() {
        let config = CaptionConfig::default();
        assert_eq!(config.canvas.size, [1000, 1000]);
        assert_eq!(config.text.font_size_ratio, 20);
        assert_eq!(config.text.line_spacing_ratio, 0.4);
        assert_eq!(config.text.max_text_width_ratio, 0.9);
        assert_eq!(config.text.padding_scaling_factor, 1.0);
        assert_eq!(config.text.degraded_font_size, 10);
        assert_eq!(config.fonts.candidates.len(), 4);
        assert!(config.fonts.candidates[0].contains("VariableFont"));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(CaptionConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let value: toml::Value = toml::from_str(
            r#"
            [text]
            font_size_ratio = 16
            "#,
        )
        .unwrap();
        let config = resolve_config(Some(value)).unwrap();
        assert_eq!(config.text.font_size_ratio, 16);
        // untouched keys keep their defaults
        assert_eq!(config.text.line_spacing_ratio, 0.4);
        assert_eq!(config.canvas.size, [1000, 1000]);
    }

    #[test]
    fn unknown_key_rejected() {
        let value: toml::Value = toml::from_str(
            r#"
            [text]
            font_size_ration = 16
            "#,
        )
        .unwrap();
        assert!(matches!(resolve_config(Some(value)), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let value: toml::Value = toml::from_str("[watermark]\ntext = \"x\"").unwrap();
        assert!(resolve_config(Some(value)).is_err());
    }

    #[test]
    fn validate_zero_canvas() {
        let mut config = CaptionConfig::default();
        config.canvas.size = [0, 1000];
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_font_size_ratio() {
        let mut config = CaptionConfig::default();
        config.text.font_size_ratio = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_max_width_ratio_bounds() {
        let mut config = CaptionConfig::default();
        config.text.max_text_width_ratio = 1.0;
        assert!(config.validate().is_ok());
        config.text.max_text_width_ratio = 1.2;
        assert!(config.validate().is_err());
        config.text.max_text_width_ratio = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_negative_spacing() {
        let mut config = CaptionConfig::default();
        config.text.line_spacing_ratio = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_bad_color() {
        let mut config = CaptionConfig::default();
        config.colors.text = "black".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("colors.text"));
    }

    #[test]
    fn hex_color_short_and_long() {
        assert_eq!(parse_hex_color("#fff").unwrap(), [255, 255, 255]);
        assert_eq!(parse_hex_color("#FF8000").unwrap(), [255, 128, 0]);
        assert!(parse_hex_color("#12345").is_err());
        assert!(parse_hex_color("#gg0000").is_err());
        assert!(parse_hex_color("000000").is_err());
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[text]\na = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[text]\nb = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["text"]["a"].as_integer(), Some(1));
        assert_eq!(merged["text"]["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_array_replaced_not_appended() {
        let base: toml::Value = toml::from_str("candidates = [\"a\", \"b\"]").unwrap();
        let overlay: toml::Value = toml::from_str("candidates = [\"c\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["candidates"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn load_config_or_default_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config_or_default(tmp.path()).unwrap();
        assert_eq!(config, CaptionConfig::default());
    }

    #[test]
    fn load_config_or_default_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[canvas]\nsize = [600, 600]\n[fonts]\ncandidates = []\n",
        )
        .unwrap();
        let config = load_config_or_default(tmp.path()).unwrap();
        assert_eq!(config.canvas.size, [600, 600]);
        assert!(config.fonts.candidates.is_empty());
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "[canvas\nsize = 1").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("c.toml");
        fs::write(&path, "[text]\ndegraded_font_size = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(Some(value)).unwrap();
        assert_eq!(config, CaptionConfig::default());
    }
}

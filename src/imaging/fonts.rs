//! Font capability probing and fallback.
//!
//! Font loading is an explicit probe: a [`FontSource`] answers "can this
//! candidate be loaded at this size" with a `Result`, and [`resolve_font`]
//! walks the prioritized candidate list, taking the first success. When every
//! candidate fails the built-in bitmap font is used instead, so resolution
//! itself never fails.
//!
//! The production source is [`SystemFonts`](super::outline::SystemFonts).
//! Tests use a fixed-advance mock so layout behavior can be asserted exactly.

use super::builtin_font::BuiltinFont;
use image::{Rgb, RgbImage};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum FontError {
    #[error("font not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Pixel bounding box of rendered text, relative to the draw origin.
///
/// Coordinates follow the "top-left of the ascender line" convention: text
/// drawn at `(0, 0)` has its first line's ascent starting at `y = 0`, so `top`
/// is usually slightly positive and descenders push `bottom` past the ascent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    /// Smallest box containing both.
    pub fn union(self, other: TextBox) -> TextBox {
        TextBox {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// A font loaded at a specific size.
pub trait CaptionFont {
    /// Inked bounds of `text` drawn at the origin.
    fn text_bbox(&self, text: &str) -> TextBox;

    /// Draw `text` with its ascender line at `(x, y)`.
    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>);
}

/// Capability probe over named font resources.
pub trait FontSource {
    type Font: CaptionFont;

    /// Load `name` at `size` pixels per em, or report why it can't be loaded.
    fn probe(&self, name: &str, size: u32) -> Result<Self::Font, FontError>;
}

/// The font a layout was solved with.
#[derive(Debug, Clone)]
pub enum ResolvedFont<F> {
    /// A candidate from the list loaded successfully.
    Candidate { name: String, size: u32, font: F },
    /// No candidate loaded; the fixed-size built-in font is in use.
    Builtin(BuiltinFont),
}

impl<F> ResolvedFont<F> {
    /// The built-in font ignores the requested size.
    pub fn is_fixed_size(&self) -> bool {
        matches!(self, ResolvedFont::Builtin(_))
    }

    /// Pixel size the text is actually drawn at.
    pub fn pixel_size(&self) -> u32 {
        match self {
            ResolvedFont::Candidate { size, .. } => *size,
            ResolvedFont::Builtin(_) => BuiltinFont::PIXEL_SIZE,
        }
    }

    /// Display name for logs and reports.
    pub fn name(&self) -> &str {
        match self {
            ResolvedFont::Candidate { name, .. } => name,
            ResolvedFont::Builtin(_) => "builtin",
        }
    }
}

impl<F: CaptionFont> CaptionFont for ResolvedFont<F> {
    fn text_bbox(&self, text: &str) -> TextBox {
        match self {
            ResolvedFont::Candidate { font, .. } => font.text_bbox(text),
            ResolvedFont::Builtin(font) => font.text_bbox(text),
        }
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        match self {
            ResolvedFont::Candidate { font, .. } => font.draw_text(canvas, x, y, text, color),
            ResolvedFont::Builtin(font) => font.draw_text(canvas, x, y, text, color),
        }
    }
}

/// Probe `candidates` in order at `size`; first success wins, else built-in.
pub fn resolve_font<S: FontSource>(
    source: &S,
    candidates: &[String],
    size: u32,
) -> ResolvedFont<S::Font> {
    for name in candidates {
        match source.probe(name, size) {
            Ok(font) => {
                return ResolvedFont::Candidate {
                    name: name.clone(),
                    size,
                    font,
                };
            }
            Err(e) => debug!(candidate = %name, size, error = %e, "font candidate unavailable"),
        }
    }
    warn!(size, "no font candidate loaded, using builtin font");
    ResolvedFont::Builtin(BuiltinFont::new())
}

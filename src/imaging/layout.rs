//! Caption layout: greedy word-wrap with font-size backoff.
//!
//! Starting at [`RenderParams::start_font_size`], each attempt resolves a font
//! at the current size and greedily packs whitespace-separated words into
//! lines no wider than [`RenderParams::max_text_width`]. If any single word is
//! wider than that on its own, the attempt is abandoned and the next one runs
//! two sizes smaller, rewrapping from scratch.
//!
//! When no positive size works the caption is returned as one unwrapped line
//! at [`RenderParams::degraded_font_size`] and marked [`LayoutMode::Degraded`].
//! Overflowing the canvas is preferred to failing the render; callers surface
//! the degraded mode as a warning.
//!
//! The built-in fallback font has a single size, so the search stops after
//! the first attempt that had to use it. The reported `font_size` is always
//! the size the glyphs are drawn at, which for the built-in font is its fixed
//! pixel height rather than the size that was requested.

use super::fonts::{CaptionFont, FontSource, ResolvedFont, resolve_font};
use super::params::RenderParams;
use serde::Serialize;
use tracing::debug;

/// Sizes shrink by this much per retry.
const SIZE_STEP: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Every line fits within the maximum width.
    Normal,
    /// Nothing fit; the caption is a single unwrapped line.
    Degraded,
}

/// Wrapped caption lines and the size they were wrapped at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutResult {
    pub lines: Vec<String>,
    pub font_size: u32,
    pub mode: LayoutMode,
}

impl LayoutResult {
    pub fn is_degraded(&self) -> bool {
        self.mode == LayoutMode::Degraded
    }
}

/// A layout together with the font it was measured in.
#[derive(Debug)]
pub struct Solution<F> {
    pub layout: LayoutResult,
    pub font: ResolvedFont<F>,
}

/// Find the largest size at which `caption` wraps within the max width.
///
/// Always terminates and always returns a layout.
pub fn solve<S: FontSource>(
    caption: &str,
    source: &S,
    params: &RenderParams,
) -> Solution<S::Font> {
    let sizes = std::iter::successors(Some(params.start_font_size), |s| {
        s.checked_sub(SIZE_STEP)
    })
    .take_while(|s| *s > 0);

    for size in sizes {
        let font = resolve_font(source, &params.font_candidates, size);
        match wrap_words(caption, &font, params.max_text_width) {
            Some(lines) => {
                debug!(size, font = font.name(), lines = lines.len(), "caption wrapped");
                return Solution {
                    layout: LayoutResult {
                        lines,
                        font_size: font.pixel_size(),
                        mode: LayoutMode::Normal,
                    },
                    font,
                };
            }
            None if font.is_fixed_size() => break,
            None => debug!(size, "word wider than max text width, shrinking"),
        }
    }

    degrade(caption, source, params)
}

/// Greedily pack words into lines of at most `max_width` pixels.
///
/// Returns `None` as soon as a single word is wider than `max_width`.
pub fn wrap_words<F: CaptionFont>(caption: &str, font: &F, max_width: u32) -> Option<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in caption.split_whitespace() {
        if font.text_bbox(word).width() > max_width {
            return None;
        }
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.text_bbox(&candidate).width() <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Some(lines)
}

fn degrade<S: FontSource>(caption: &str, source: &S, params: &RenderParams) -> Solution<S::Font> {
    let size = params.degraded_font_size;
    let font = resolve_font(source, &params.font_candidates, size);
    debug!(size, font = font.name(), "no size fits, using unwrapped caption");
    Solution {
        layout: LayoutResult {
            lines: vec![caption.to_string()],
            font_size: font.pixel_size(),
            mode: LayoutMode::Degraded,
        },
        font,
    }
}

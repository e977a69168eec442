//! TrueType/OpenType fonts via `ab_glyph`.
//!
//! | Concern | How |
//! |---|---|
//! | Locate | direct path, then configured dirs, then platform font dirs (`walkdir`) |
//! | Parse | `ab_glyph::FontVec::try_from_vec` |
//! | Variable fonts | names containing `VariableFont` pinned to `wght = 400` (Regular) |
//! | Size | requested size is pixels per em, converted to `PxScale` via units-per-em |
//! | Measure / draw | glyph run laid out on a baseline at `ascent`, coverage blended onto RGB |

use super::fonts::{CaptionFont, FontError, FontSource, TextBox};
use ab_glyph::{Font, FontVec, GlyphId, OutlinedGlyph, PxScale, ScaleFont, VariableFont, point};
use image::{Rgb, RgbImage};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Marker in a font file name identifying a variable-weight font.
const VARIABLE_FONT_MARKER: &str = "VariableFont";
/// `wght` axis value of the Regular named instance.
const REGULAR_WEIGHT: f32 = 400.0;

/// A parsed outline font at one pixel size.
pub struct OutlineFont {
    font: FontVec,
    scale: PxScale,
}

impl fmt::Debug for OutlineFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutlineFont")
            .field("scale", &self.scale)
            .finish()
    }
}

impl OutlineFont {
    /// Parse font bytes and scale to `size` pixels per em.
    pub fn from_bytes(name: &str, data: Vec<u8>, size: u32) -> Result<Self, FontError> {
        let mut font = FontVec::try_from_vec(data).map_err(|e| FontError::Invalid {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        if name.contains(VARIABLE_FONT_MARKER) && !font.set_variation(b"wght", REGULAR_WEIGHT) {
            debug!(font = name, "variable font has no wght axis, using default instance");
        }
        let units_per_em = font.units_per_em().unwrap_or(1000.0);
        let scale = PxScale::from(size as f32 * font.height_unscaled() / units_per_em);
        Ok(Self { font, scale })
    }

    fn outlined_glyphs(&self, text: &str) -> Vec<OutlinedGlyph> {
        let scaled = self.font.as_scaled(self.scale);
        let mut caret = point(0.0, scaled.ascent());
        let mut prev: Option<GlyphId> = None;
        let mut glyphs = Vec::new();

        for c in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(c);
            if let Some(prev) = prev {
                caret.x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, caret);
            caret.x += scaled.h_advance(id);
            prev = Some(id);

            if let Some(outlined) = self.font.outline_glyph(glyph) {
                glyphs.push(outlined);
            }
        }
        glyphs
    }
}

impl CaptionFont for OutlineFont {
    fn text_bbox(&self, text: &str) -> TextBox {
        self.outlined_glyphs(text)
            .iter()
            .map(|g| {
                let b = g.px_bounds();
                TextBox {
                    left: b.min.x.floor() as i32,
                    top: b.min.y.floor() as i32,
                    right: b.max.x.ceil() as i32,
                    bottom: b.max.y.ceil() as i32,
                }
            })
            .reduce(TextBox::union)
            .unwrap_or_default()
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>) {
        let (w, h) = canvas.dimensions();
        for glyph in self.outlined_glyphs(text) {
            let bounds = glyph.px_bounds();
            let origin_x = x + bounds.min.x as i32;
            let origin_y = y + bounds.min.y as i32;
            glyph.draw(|gx, gy, coverage| {
                let px = origin_x + gx as i32;
                let py = origin_y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= w || py as u32 >= h {
                    return;
                }
                let coverage = coverage.clamp(0.0, 1.0);
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                for (dst, src) in pixel.0.iter_mut().zip(color.0) {
                    *dst = (*dst as f32 * (1.0 - coverage) + src as f32 * coverage).round() as u8;
                }
            });
        }
    }
}

/// Font files resolved by name from the host's font directories.
pub struct SystemFonts {
    search_dirs: Vec<PathBuf>,
    located: RefCell<HashMap<String, Option<PathBuf>>>,
}

impl SystemFonts {
    /// Search `extra_dirs` first, then the platform font directories.
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        let mut search_dirs = extra_dirs.to_vec();
        search_dirs.extend(platform_font_dirs());
        Self::with_dirs(search_dirs)
    }

    /// Search only `search_dirs`.
    pub fn with_dirs(search_dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs,
            located: RefCell::new(HashMap::new()),
        }
    }

    /// Find the file for `name`. Lookups are memoized per instance.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        if let Some(hit) = self.located.borrow().get(name) {
            return hit.clone();
        }
        let found = self.search(name);
        self.located
            .borrow_mut()
            .insert(name.to_string(), found.clone());
        found
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        let direct = Path::new(name);
        if direct.is_file() {
            return Some(direct.to_path_buf());
        }
        self.search_dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .find_map(|dir| {
                WalkDir::new(dir)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .find(|e| e.file_type().is_file() && e.file_name() == name)
                    .map(|e| e.into_path())
            })
    }
}

impl FontSource for SystemFonts {
    type Font = OutlineFont;

    fn probe(&self, name: &str, size: u32) -> Result<OutlineFont, FontError> {
        let path = self
            .locate(name)
            .ok_or_else(|| FontError::NotFound(name.to_string()))?;
        let data = std::fs::read(&path)?;
        OutlineFont::from_bytes(name, data, size)
    }
}

/// Conventional font directories for the current platform.
pub fn platform_font_dirs() -> Vec<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let mut dirs = Vec::new();

    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/System/Library/Fonts"));
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.extend(home.map(|h| h.join("Library/Fonts")));
    } else if cfg!(target_os = "windows") {
        let windir = std::env::var_os("WINDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
        dirs.push(windir.join("Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
        if let Some(h) = home {
            dirs.push(h.join(".fonts"));
            dirs.push(h.join(".local/share/fonts"));
        }
    }
    dirs
}

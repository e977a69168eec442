//! Caption rendering in pure Rust, no system imaging libraries.
//!
//! | Step | Module | Crate / function |
//! |---|---|---|
//! | **Font probe** | [`fonts`], [`outline`] | `ab_glyph::FontVec`, `walkdir` |
//! | **Fallback font** | [`builtin_font`] | 5x7 bitmap |
//! | **Word-wrap + size backoff** | [`layout`] | greedy, 2px steps |
//! | **Bar geometry** | [`calculations`] | pure math |
//! | **Crop, resize, composite** | [`compositor`] | `image::imageops` (Lanczos3) |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Pixel values resolved from the config
//! - **Fonts**: [`FontSource`] capability probe + [`SystemFonts`]
//! - **Compositor**: High-level function combining layout, geometry and drawing

pub mod builtin_font;
pub mod calculations;
pub mod compositor;
pub mod fonts;
pub mod layout;
pub mod outline;
mod params;

pub use calculations::BarGeometry;
pub use compositor::{Captioned, caption_image};
pub use fonts::{CaptionFont, FontError, FontSource, ResolvedFont, TextBox};
pub use layout::{LayoutMode, LayoutResult};
pub use outline::SystemFonts;
pub use params::RenderParams;

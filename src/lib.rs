//! # Caption Bar
//!
//! Batch-captions photos: each image is center-cropped to a square, resized
//! to a fixed canvas, and stacked under a bar holding its caption, wrapped to
//! fit.
//!
//! # Architecture: One Sequential Pipeline
//!
//! ```text
//! images/  ──catalog──▶  shuffled assets ─┐
//!                                         ├─ pair by position ─▶ layout ─▶ geometry ─▶ composite ─▶ output/batch-NNN/
//! captions.txt ─────────▶  captions ──────┘
//! ```
//!
//! Every stage is a plain function taking explicit inputs. There is no global
//! state: configuration is loaded once into a [`config::CaptionConfig`],
//! resolved into [`imaging::RenderParams`], and passed down.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Eligible image discovery, shuffle, dimension probing |
//! | [`captions`] | Caption lists from text files |
//! | [`imaging`] | Fonts, word-wrap solver, bar geometry, compositing |
//! | [`render`] | Pairs images with captions, writes outputs, reports overflow |
//! | [`config`] | `caption-bar.toml` loading, merging with defaults, validation |
//! | [`naming`] | `captioned_` output names and `batch-NNN` directories |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fonts Are Probed, Not Assumed
//!
//! Candidate fonts are tried in order through a [`imaging::FontSource`]. When
//! none can be loaded the caption is drawn with a small built-in bitmap font,
//! so rendering never fails for lack of fonts. Tests swap the source for a
//! fixed-advance mock and never touch the system font directories.
//!
//! ## Overflow Is a Warning
//!
//! A caption that cannot be wrapped at any size is drawn as one line at a
//! small fixed size and reported. It may run off the canvas; the batch keeps
//! going.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and encoding use the `image` crate; glyph
//! outlines come from `ab_glyph`. No system libraries are required.

pub mod captions;
pub mod catalog;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod render;

#[cfg(test)]
pub(crate) mod test_helpers;

//! Source image discovery.
//!
//! A catalog is the list of images eligible for captioning in one flat
//! directory: regular files whose name ends in `.jpg`, `.jpeg` or `.png`.
//! The suffix match is case-sensitive, so `IMG_01.JPG` is ignored.
//!
//! Entries are sorted by name, shuffled, truncated to the number of captions,
//! and only then identified. Sorting first makes a seeded RNG reproduce the
//! same order on every filesystem; production callers pass `thread_rng()`.
//!
//! The suffix only decides eligibility. Decoders are chosen from the file's
//! leading bytes, so a PNG saved as `photo.jpg` still opens.

use image::{DynamicImage, ImageReader, ImageResult};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Accepted file name suffixes.
pub const SUPPORTED_SUFFIXES: &[&str] = &[".jpg", ".jpeg", ".png"];

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No .jpg, .jpeg or .png images found in {0}")]
    EmptyCatalog(PathBuf),
    #[error("Cannot read image {path}: {source}")]
    Identify {
        path: PathBuf,
        source: image::ImageError,
    },
    #[error("Found {found} eligible images, need at least {needed}")]
    NotEnoughImages { found: usize, needed: usize },
}

/// A source image selected for captioning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageAsset {
    pub path: PathBuf,
    /// File name, reused for the output name.
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl ImageAsset {
    /// Read dimensions from the image header.
    pub fn identify(path: &Path) -> Result<Self, CatalogError> {
        let (width, height) =
            read_dimensions(path).map_err(|source| CatalogError::Identify {
                path: path.to_path_buf(),
                source,
            })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            width,
            height,
        })
    }
}

fn sniffed_reader(path: &Path) -> ImageResult<ImageReader<BufReader<File>>> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

/// Dimensions from the image header, format detected from content.
pub fn read_dimensions(path: &Path) -> ImageResult<(u32, u32)> {
    sniffed_reader(path)?.into_dimensions()
}

/// Decode a full image, format detected from content.
pub fn decode_image(path: &Path) -> ImageResult<DynamicImage> {
    sniffed_reader(path)?.decode()
}

/// Whether a file name has a supported image suffix.
pub fn is_supported_name(name: &str) -> bool {
    SUPPORTED_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Eligible image paths in `dir`, sorted by file name.
pub fn list_eligible(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    if !dir.is_dir() {
        return Err(CatalogError::NotADirectory(dir.to_path_buf()));
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_supported_name)
        })
        .collect();
    paths.sort();
    Ok(paths)
}

/// Shuffle the eligible images in `dir` and keep the first `limit`.
///
/// Fails with [`CatalogError::EmptyCatalog`] when nothing is eligible.
pub fn build_catalog<R: Rng + ?Sized>(
    dir: &Path,
    limit: usize,
    rng: &mut R,
) -> Result<Vec<ImageAsset>, CatalogError> {
    let mut paths = list_eligible(dir)?;
    if paths.is_empty() {
        return Err(CatalogError::EmptyCatalog(dir.to_path_buf()));
    }
    paths.shuffle(rng);
    paths.truncate(limit);
    paths.iter().map(|p| ImageAsset::identify(p)).collect()
}

/// Check upfront that `dir` holds at least `needed` eligible images.
pub fn ensure_enough_images(dir: &Path, needed: usize) -> Result<usize, CatalogError> {
    let found = list_eligible(dir)?.len();
    if found == 0 {
        return Err(CatalogError::EmptyCatalog(dir.to_path_buf()));
    }
    if found < needed {
        return Err(CatalogError::NotEnoughImages { found, needed });
    }
    Ok(found)
}

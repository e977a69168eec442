//! Shared test utilities: synthetic source images on disk.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::Path;

/// Gradient so crops and resizes are visible in the pixels.
pub fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(gradient(width, height))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
}

pub fn create_test_png(path: &Path, width: u32, height: u32) {
    DynamicImage::ImageRgb8(gradient(width, height))
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

/// Fill `dir` with `count` PNGs named `photo-N.png`.
pub fn create_photo_dir(dir: &Path, count: usize, width: u32, height: u32) {
    std::fs::create_dir_all(dir).unwrap();
    for i in 0..count {
        create_test_png(&dir.join(format!("photo-{i}.png")), width, height);
    }
}

//! Shared test utilities for the gallerie test suite.
//!
//! Tests that need photos on disk write small synthetic ones with a
//! deterministic gradient rather than shipping binary fixtures.

use std::path::Path;

use image::RgbImage;

/// Write a `width` x `height` PNG with a per-pixel gradient.
///
/// The gradient makes every pixel distinct, so resize and decode tests can
/// tell corners apart.
pub fn write_test_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([
            (x % 256) as u8,
            (y % 256) as u8,
            ((x + y) % 256) as u8,
        ])
    });
    img.save(path).unwrap();
}

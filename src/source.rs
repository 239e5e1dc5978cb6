//! Source image import and normalization.
//!
//! A [`SourceImage`] is the immutable starting point of an edit session:
//! decoded once, flattened to a canonical opaque RGB8 layout, never mutated.
//! Every pipeline recompute reads from it directly — never from a previous
//! pipeline output — so adjustments cannot compound decode or rounding error.
//!
//! The aspect ratio is computed here, once per import, and reused by the
//! viewport fitter for the whole session even though rotation and cropping
//! may change the computed image's dimensions slightly.

use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unrecognized image extension: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Extensions we are willing to import, paired with the decoder that must be
/// compiled in for them to count.
///
/// AVIF is listed as a candidate but its decoder is not part of our `image`
/// feature set, so `reading_enabled()` drops it and the extension is simply
/// omitted from import and browsing — a missing optional decoder must never
/// be a global failure.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
    ("bmp", ImageFormat::Bmp),
    ("gif", ImageFormat::Gif),
    ("avif", ImageFormat::Avif),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// The set of image file extensions with working decoders compiled in.
pub fn supported_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether a path carries an extension we can decode.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        })
}

/// Flatten any alpha channel onto an opaque white background.
///
/// This is the single normalization rule shared by import and export: the
/// exporter applies the identical compositing when a transparency-incapable
/// format receives an alpha-carrying buffer, which is what makes the
/// import → export round trip idempotent.
pub fn flatten_onto_white(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (src, dst) in rgba.pixels().zip(out.pixels_mut()) {
        let a = src.0[3] as u32;
        dst.0 = [
            composite_over_white(src.0[0], a),
            composite_over_white(src.0[1], a),
            composite_over_white(src.0[2], a),
        ];
    }
    out
}

/// `c` over white at coverage `a`, rounded: (c*a + 255*(255-a)) / 255.
#[inline]
fn composite_over_white(c: u8, a: u32) -> u8 {
    ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Immutable decoded pixel buffer for one edit session.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbImage,
    ratio: f64,
}

impl SourceImage {
    /// Import an image file: decode, flatten alpha onto white, fix the
    /// session aspect ratio.
    pub fn open(path: &Path) -> Result<Self, DecodeError> {
        if !is_supported(path) {
            return Err(DecodeError::UnsupportedFormat(path.to_path_buf()));
        }
        let decoded = ImageReader::open(path)
            .map_err(DecodeError::Io)?
            .decode()
            .map_err(|source| DecodeError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_decoded(decoded))
    }

    /// Wrap an already-decoded image. Used by tests and in-memory callers.
    pub fn from_decoded(img: DynamicImage) -> Self {
        let pixels = flatten_onto_white(img);
        let ratio = pixels.width() as f64 / pixels.height() as f64;
        Self { pixels, ratio }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Aspect ratio `width / height`, fixed at import time.
    pub fn ratio(&self) -> f64 {
        self.ratio
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}

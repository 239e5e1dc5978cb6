//! Image export — serialize a computed image into the photos directory.
//!
//! The photos directory is created on demand. Writing to an existing name
//! overwrites it silently; collision handling belongs to the calling UI
//! layer if anyone ever wants it.
//!
//! Formats without transparency support get the same white-flatten
//! normalization that import applies, so importing an already-flattened
//! image and re-exporting it to the same format is byte-idempotent.

use crate::pipeline::ComputedImage;
use crate::source::flatten_onto_white;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("unsupported export format: {0}")]
    UnsupportedFormat(String),
    #[error("encoding {path} failed: {source}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Closed set of writable output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Jpeg,
    Png,
    Tiff,
    Webp,
    Bmp,
    Gif,
}

impl ExportFormat {
    /// Resolve a user-supplied extension. `None` for anything we can't write.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::Webp),
            "bmp" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Tiff => "tiff",
            Self::Webp => "webp",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
        }
    }

    /// Whether the encoded file can carry an alpha channel. Buffers headed
    /// for a format that can't are flattened onto white first.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, Self::Jpeg | Self::Bmp)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::Tiff => ImageFormat::Tiff,
            Self::Webp => ImageFormat::WebP,
            Self::Bmp => ImageFormat::Bmp,
            Self::Gif => ImageFormat::Gif,
        }
    }
}

/// Write any decoded image to `path` in the given format, applying the
/// format's transparency normalization.
pub fn write_image(
    img: &DynamicImage,
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    // Same rule as import: alpha flattens onto opaque white.
    let normalized: DynamicImage = if img.color().has_alpha() && !format.supports_alpha() {
        DynamicImage::ImageRgb8(flatten_onto_white(img.clone()))
    } else {
        img.clone()
    };

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    normalized
        .write_to(&mut writer, format.image_format())
        .map_err(|source| ExportError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

/// Export a computed image as `<photos_dir>/<base_name>.<ext>`, creating the
/// directory if absent. Returns the written path.
pub fn export(
    image: &ComputedImage,
    photos_dir: &Path,
    base_name: &str,
    format: ExportFormat,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(photos_dir)?;
    let path = photos_dir.join(format!("{}.{}", base_name, format.extension()));
    write_image(
        &DynamicImage::ImageRgb8(image.pixels().clone()),
        &path,
        format,
    )?;
    Ok(path)
}

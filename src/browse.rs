//! Photo directory browsing.
//!
//! The gallery collaborator at the core's boundary: enumerate the photos
//! directory, render aspect-preserved thumbnails and previews through the
//! viewport fitter, and delete files. "Open for edit" re-enters the core
//! through [`crate::session::EditSession::open`].
//!
//! Listing is tolerant of bad files: one corrupt image is skipped and
//! enumeration continues, so a single broken download never blanks the
//! whole gallery.

use crate::source::{self, DecodeError, SourceImage};
use crate::viewport::{self, PREVIEW_BOX, THUMBNAIL_BOX};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrowseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// One listable photo with the metadata the gallery grid needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

/// List image files in the photos directory, sorted by file name.
///
/// Filters by the import extension registry. Entries whose header cannot be
/// read (corrupt or truncated files) are skipped, not fatal. A directory
/// that does not exist yet lists as empty — it is created lazily by the
/// first export.
pub fn list_photos(dir: &Path) -> Result<Vec<PhotoEntry>, BrowseError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    if !dir.is_dir() {
        return Err(BrowseError::NotADirectory(dir.to_path_buf()));
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() || !source::is_supported(&path) {
            continue;
        }
        // Per-item partial failure: unreadable header, skip and keep going
        let Ok((width, height)) = image::image_dimensions(&path) else {
            continue;
        };
        let file_name = entry.file_name().to_string_lossy().into_owned();
        entries.push(PhotoEntry {
            path,
            file_name,
            width,
            height,
        });
    }
    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(entries)
}

/// Decode and scale a photo into the thumbnail bounding box.
pub fn render_thumbnail(path: &Path) -> Result<RgbImage, DecodeError> {
    scaled_to_box(path, THUMBNAIL_BOX)
}

/// Decode and scale a photo into the preview bounding box.
pub fn render_preview(path: &Path) -> Result<RgbImage, DecodeError> {
    scaled_to_box(path, PREVIEW_BOX)
}

fn scaled_to_box(path: &Path, bounds: (u32, u32)) -> Result<RgbImage, DecodeError> {
    let src = SourceImage::open(path)?;
    let (w, h) = viewport::fit_box(src.width(), src.height(), bounds);
    if (w, h) == (src.width(), src.height()) {
        return Ok(src.pixels().clone());
    }
    Ok(imageops::resize(src.pixels(), w, h, FilterType::Lanczos3))
}

/// Remove a photo from disk.
pub fn delete_photo(path: &Path) -> Result<(), BrowseError> {
    fs::remove_file(path)?;
    Ok(())
}

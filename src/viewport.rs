//! Aspect-ratio-preserving viewport fitting.
//!
//! Pure dimension math, testable without any I/O or pixels. The fitter maps
//! a computed image onto a resizable display surface: whichever viewport
//! dimension is relatively tighter pins the draw size, the other follows the
//! image's aspect ratio, and the result is anchored at the viewport center.
//!
//! The session feeds [`fit_ratio`] the aspect ratio captured once at import
//! — not the computed image's current dimensions — so a rotation or crop
//! does not subtly re-letterbox the preview mid-edit.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error(
        "cannot fit image (aspect ratio {ratio}) into a {viewport_width}x{viewport_height} viewport"
    )]
    DegenerateViewport {
        viewport_width: u32,
        viewport_height: u32,
        ratio: f64,
    },
}

/// Bounding box for gallery thumbnails.
pub const THUMBNAIL_BOX: (u32, u32) = (200, 200);

/// Bounding box for full gallery previews.
pub const PREVIEW_BOX: (u32, u32) = (640, 640);

/// Placement of an image on a display surface.
///
/// Derived data: recomputed on every resize or recompute event, never
/// persisted or shared across invocations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub draw_width: u32,
    pub draw_height: u32,
    /// Center-anchored placement: the image's center goes here.
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Fit an image of the given dimensions into a viewport.
pub fn fit(
    image_width: u32,
    image_height: u32,
    viewport_width: u32,
    viewport_height: u32,
) -> Result<ViewportGeometry, ViewportError> {
    if image_width == 0 || image_height == 0 {
        return Err(ViewportError::DegenerateViewport {
            viewport_width,
            viewport_height,
            ratio: image_width as f64 / image_height as f64,
        });
    }
    fit_ratio(
        image_width as f64 / image_height as f64,
        viewport_width,
        viewport_height,
    )
}

/// Fit by a precomputed aspect ratio (`width / height`).
pub fn fit_ratio(
    ratio: f64,
    viewport_width: u32,
    viewport_height: u32,
) -> Result<ViewportGeometry, ViewportError> {
    if viewport_width == 0 || viewport_height == 0 || !ratio.is_finite() || ratio <= 0.0 {
        return Err(ViewportError::DegenerateViewport {
            viewport_width,
            viewport_height,
            ratio,
        });
    }

    let viewport_ratio = viewport_width as f64 / viewport_height as f64;
    let (draw_width, draw_height) = if viewport_ratio > ratio {
        // Viewport is relatively wider: height pins, width follows the ratio
        let h = viewport_height;
        ((h as f64 * ratio).round() as u32, h)
    } else {
        // Viewport is relatively taller (or equal): width pins
        let w = viewport_width;
        (w, (w as f64 / ratio).round() as u32)
    };

    Ok(ViewportGeometry {
        draw_width,
        draw_height,
        offset_x: viewport_width as f64 / 2.0,
        offset_y: viewport_height as f64 / 2.0,
    })
}

/// Scale dimensions down to fit inside a bounding box, preserving aspect
/// ratio. Images already inside the box keep their size — gallery thumbnails
/// are never upscaled.
pub fn fit_box(width: u32, height: u32, bounds: (u32, u32)) -> (u32, u32) {
    let (bw, bh) = bounds;
    if width <= bw && height <= bh {
        return (width, height);
    }
    match fit(width, height, bw, bh) {
        Ok(g) => (g.draw_width.max(1), g.draw_height.max(1)),
        // Degenerate inputs cannot reach here: bounds are nonzero constants
        // and width/height were checked above.
        Err(_) => (width, height),
    }
}

//! The non-destructive transform pipeline.
//!
//! [`compute`] is a pure function from `(SourceImage, ParameterSet)` to a
//! fresh [`ComputedImage`]. Stages run in a fixed order, each consuming the
//! previous stage's output; a stage whose parameter sits at its default is
//! skipped outright (at the default its math is the identity anyway):
//!
//! ```text
//! rotate → zoom (crop) → flip → brightness → vibrance
//!        → grayscale → invert → blur → contrast (sharpen) → effect
//! ```
//!
//! Geometry runs before color so the color math is independent of image
//! dimensions; brightness/vibrance run before grayscale/invert so the
//! multiplicative adjustments see real color; blur/sharpen/effect run last
//! so the most destructive filters see the otherwise-finished composition.
//!
//! The pipeline never chains against its own output. Every parameter change
//! recomputes the whole sequence from the untouched source, which keeps the
//! parameters independent of edit history and internally ordered only with
//! respect to each other.

use crate::params::{Effect, Flip, ParamError, ParameterSet};
use crate::source::SourceImage;
use image::{Rgb, RgbImage, imageops};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("crop border of {border}px leaves nothing of a {width}x{height} image")]
    Geometry {
        border: u32,
        width: u32,
        height: u32,
    },
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// Output of one pipeline invocation.
///
/// Ephemeral by design: owned by the caller, rebuilt from scratch on every
/// parameter change, never cached or diffed.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedImage {
    pixels: RgbImage,
}

impl ComputedImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> RgbImage {
        self.pixels
    }
}

/// Unsharp-mask threshold for the contrast stage (minimum brightness delta
/// that gets sharpened).
const SHARPEN_THRESHOLD: i32 = 3;

/// Run the full pipeline against an untouched source.
///
/// Deterministic and side-effect-free; total over every in-domain
/// `ParameterSet`. With all parameters at their defaults the result is a
/// pixel-for-pixel copy of the source.
pub fn compute(
    source: &SourceImage,
    params: &ParameterSet,
) -> Result<ComputedImage, PipelineError> {
    // Defend against sets that bypassed ParameterSet::apply.
    params.validate()?;

    let mut img = source.pixels().clone();

    if params.rotate != 0.0 {
        img = rotate_ccw(&img, params.rotate);
    }

    if params.zoom != 0.0 {
        img = crop_border(&img, params.zoom.round() as u32)?;
    }

    match params.flip {
        Flip::None => {}
        Flip::X => img = imageops::flip_horizontal(&img),
        Flip::Y => img = imageops::flip_vertical(&img),
        Flip::Both => {
            img = imageops::flip_horizontal(&img);
            img = imageops::flip_vertical(&img);
        }
    }

    if params.brightness != 1.0 {
        scale_brightness(&mut img, params.brightness);
    }

    if params.vibrance != 1.0 {
        scale_saturation(&mut img, params.vibrance);
    }

    if params.grayscale {
        to_grayscale(&mut img);
    }

    if params.invert {
        for p in img.pixels_mut() {
            p.0 = p.0.map(|v| 255 - v);
        }
    }

    if params.blur != 0.0 {
        img = imageops::blur(&img, params.blur);
    }

    if params.contrast != 0.0 {
        img = imageops::unsharpen(&img, params.contrast, SHARPEN_THRESHOLD);
    }

    if params.effect != Effect::None {
        img = apply_effect(&img, params.effect);
    }

    Ok(ComputedImage { pixels: img })
}

// ============================================================================
// Geometry stages
// ============================================================================

/// Rotate counter-clockwise about the center onto an expanded canvas.
///
/// The output canvas is the rotated image's bounding box — rotation is never
/// cropped back to the original bounds, so downstream stages (the zoom crop
/// in particular) operate on the grown dimensions. Right angles take the
/// exact-copy paths; arbitrary angles use inverse-mapped nearest-neighbor
/// sampling with black fill for points outside the source.
fn rotate_ccw(img: &RgbImage, degrees: f32) -> RgbImage {
    // Exact right angles: 90° CCW is 270° CW and vice versa.
    if degrees == 90.0 {
        return imageops::rotate270(img);
    } else if degrees == 180.0 {
        return imageops::rotate180(img);
    } else if degrees == 270.0 {
        return imageops::rotate90(img);
    }

    let (w, h) = (img.width(), img.height());
    let theta = degrees.to_radians();
    let (sin, cos) = theta.sin_cos();

    let new_w = (w as f32 * cos.abs() + h as f32 * sin.abs()).ceil() as u32;
    let new_h = (w as f32 * sin.abs() + h as f32 * cos.abs()).ceil() as u32;

    let src_cx = w as f32 / 2.0;
    let src_cy = h as f32 / 2.0;
    let dst_cx = new_w as f32 / 2.0;
    let dst_cy = new_h as f32 / 2.0;

    let mut out = RgbImage::new(new_w, new_h);
    for (x, y, p) in out.enumerate_pixels_mut() {
        let dx = x as f32 + 0.5 - dst_cx;
        let dy = y as f32 + 0.5 - dst_cy;
        // Inverse of a visually-CCW rotation in y-down screen coordinates.
        let sx = dx * cos - dy * sin + src_cx;
        let sy = dx * sin + dy * cos + src_cy;
        if sx >= 0.0 && sy >= 0.0 {
            let (ix, iy) = (sx as u32, sy as u32);
            if ix < w && iy < h {
                *p = *img.get_pixel(ix, iy);
            }
        }
    }
    out
}

/// Remove a uniform border from all four edges.
fn crop_border(img: &RgbImage, border: u32) -> Result<RgbImage, PipelineError> {
    let (w, h) = (img.width(), img.height());
    if 2 * border >= w || 2 * border >= h {
        return Err(PipelineError::Geometry {
            border,
            width: w,
            height: h,
        });
    }
    Ok(imageops::crop_imm(img, border, border, w - 2 * border, h - 2 * border).to_image())
}

// ============================================================================
// Color stages
// ============================================================================

/// Rec.601 luminance of one pixel.
#[inline]
fn luma(p: &Rgb<u8>) -> f32 {
    0.299 * p.0[0] as f32 + 0.587 * p.0[1] as f32 + 0.114 * p.0[2] as f32
}

/// Multiplicative brightness: 0 is black, 1 is identity, >1 brightens.
/// LUT-based — one table lookup per channel.
fn scale_brightness(img: &mut RgbImage, factor: f32) {
    let mut lut = [0u8; 256];
    for (i, item) in lut.iter_mut().enumerate() {
        *item = (i as f32 * factor).round().clamp(0.0, 255.0) as u8;
    }
    for p in img.pixels_mut() {
        p.0 = p.0.map(|v| lut[v as usize]);
    }
}

/// Saturation scale: blend each pixel between its grayscale equivalent and
/// itself. 0 yields the grayscale-equivalent image, 1 is identity, >1
/// oversaturates.
fn scale_saturation(img: &mut RgbImage, factor: f32) {
    for p in img.pixels_mut() {
        let l = luma(p);
        p.0 = p
            .0
            .map(|v| (l + factor * (v as f32 - l)).round().clamp(0.0, 255.0) as u8);
    }
}

/// Replace every channel with the pixel's Rec.601 luminance.
fn to_grayscale(img: &mut RgbImage) {
    for p in img.pixels_mut() {
        let l = luma(p).round().clamp(0.0, 255.0) as u8;
        p.0 = [l, l, l];
    }
}

// ============================================================================
// Effect stage
// ============================================================================

/// 3×3 convolution spec: `out = dot(weights, neighborhood) / scale + offset`.
struct Kernel {
    weights: [i32; 9],
    scale: i32,
    offset: i32,
}

/// The classic filter kernels behind each categorical effect.
fn effect_kernel(effect: Effect) -> Kernel {
    match effect {
        Effect::Emboss => Kernel {
            weights: [-1, 0, 0, 0, 1, 0, 0, 0, 0],
            scale: 1,
            offset: 128,
        },
        Effect::FindEdges => Kernel {
            weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
            scale: 1,
            offset: 0,
        },
        // Contour is edge detection pushed to a white background: same
        // kernel as FindEdges, offset 255 flips the response.
        Effect::Contour => Kernel {
            weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
            scale: 1,
            offset: 255,
        },
        Effect::EdgeEnhance => Kernel {
            weights: [-1, -1, -1, -1, 9, -1, -1, -1, -1],
            scale: 1,
            offset: 0,
        },
        Effect::None => unreachable!("None is skipped before dispatch"),
    }
}

/// Convolve with the effect's kernel, replicating edge pixels at the border.
fn apply_effect(img: &RgbImage, effect: Effect) -> RgbImage {
    let kernel = effect_kernel(effect);
    let (w, h) = (img.width() as i64, img.height() as i64);
    let mut out = RgbImage::new(img.width(), img.height());

    for (x, y, p) in out.enumerate_pixels_mut() {
        let mut acc = [0i32; 3];
        for ky in 0..3i64 {
            for kx in 0..3i64 {
                let sx = (x as i64 + kx - 1).clamp(0, w - 1) as u32;
                let sy = (y as i64 + ky - 1).clamp(0, h - 1) as u32;
                let weight = kernel.weights[(ky * 3 + kx) as usize];
                let sample = img.get_pixel(sx, sy).0;
                for c in 0..3 {
                    acc[c] += weight * sample[c] as i32;
                }
            }
        }
        p.0 = acc.map(|v| (v / kernel.scale + kernel.offset).clamp(0, 255) as u8);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamChange;
    use image::DynamicImage;

    /// Deterministic color gradient source.
    fn gradient_source(w: u32, h: u32) -> SourceImage {
        let img = RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) % 256) as u8])
        });
        SourceImage::from_decoded(DynamicImage::ImageRgb8(img))
    }

    fn with(changes: &[ParamChange]) -> ParameterSet {
        let mut p = ParameterSet::default();
        for &c in changes {
            p.apply(c).unwrap();
        }
        p
    }

    #[test]
    fn defaults_are_the_identity() {
        let src = gradient_source(40, 30);
        let out = compute(&src, &ParameterSet::default()).unwrap();
        assert_eq!(out.pixels(), src.pixels());
    }

    #[test]
    fn rotate_90_is_exact() {
        let src = gradient_source(40, 20);
        let out = compute(&src, &with(&[ParamChange::Rotate(90.0)])).unwrap();
        // Counter-clockwise quarter turn swaps dimensions
        assert_eq!((out.width(), out.height()), (20, 40));
        assert_eq!(out.pixels(), &imageops::rotate270(src.pixels()));
    }

    #[test]
    fn rotate_90_with_color_defaults_changes_no_color() {
        // Geometry-only edit: every output pixel exists verbatim in the source.
        let src = gradient_source(8, 8);
        let out = compute(&src, &with(&[ParamChange::Rotate(90.0)])).unwrap();
        let src_w = src.width();
        for (x, y, p) in out.pixels().enumerate_pixels() {
            // CCW quarter turn: out(x, y) = src(w - 1 - y, x)
            assert_eq!(
                p,
                src.pixels().get_pixel(src_w - 1 - y, x),
                "pixel moved incorrectly at {x},{y}"
            );
        }
    }

    #[test]
    fn rotate_45_grows_canvas() {
        let src = gradient_source(100, 100);
        let out = compute(&src, &with(&[ParamChange::Rotate(45.0)])).unwrap();
        // Bounding box of a rotated 100x100 square is ~142x142
        assert!(out.width() > 100 && out.height() > 100);
        assert!(out.width() <= 143 && out.height() <= 143);
    }

    #[test]
    fn rotate_180_twice_dimensions_stable() {
        let src = gradient_source(30, 20);
        let out = compute(&src, &with(&[ParamChange::Rotate(180.0)])).unwrap();
        assert_eq!((out.width(), out.height()), (30, 20));
        assert_eq!(out.pixels(), &imageops::rotate180(src.pixels()));
    }

    #[test]
    fn zoom_shrinks_by_twice_the_border() {
        let src = gradient_source(100, 80);
        let out = compute(&src, &with(&[ParamChange::Zoom(10.0)])).unwrap();
        assert_eq!((out.width(), out.height()), (80, 60));
        // Interior pixels are untouched
        assert_eq!(
            out.pixels().get_pixel(0, 0),
            src.pixels().get_pixel(10, 10)
        );
    }

    #[test]
    fn zoom_collapsing_the_image_is_a_geometry_error() {
        let src = gradient_source(30, 30);
        let err = compute(&src, &with(&[ParamChange::Zoom(15.0)])).unwrap_err();
        assert!(matches!(err, PipelineError::Geometry { border: 15, .. }));
    }

    #[test]
    fn zoom_crop_operates_on_the_grown_rotated_canvas() {
        // 20x20 rotated 45° grows to ~29x29, which survives a border of 12
        // that would have collapsed the original 20x20.
        let src = gradient_source(20, 20);
        let params = with(&[ParamChange::Rotate(45.0), ParamChange::Zoom(12.0)]);
        let out = compute(&src, &params).unwrap();
        assert!(out.width() >= 1 && out.height() >= 1);
    }

    #[test]
    fn flip_is_an_involution() {
        // Two independent computes: flip the source, then flip the flipped
        // source. Never chains the pipeline against its own output.
        let src = gradient_source(17, 11);
        let params = with(&[ParamChange::Flip(Flip::X)]);

        let once = compute(&src, &params).unwrap();
        let mirrored = SourceImage::from_decoded(DynamicImage::ImageRgb8(once.into_pixels()));
        let twice = compute(&mirrored, &params).unwrap();

        assert_eq!(twice.pixels(), src.pixels());
    }

    #[test]
    fn flip_both_equals_x_then_y() {
        let src = gradient_source(9, 7);
        let both = compute(&src, &with(&[ParamChange::Flip(Flip::Both)])).unwrap();
        let expected =
            imageops::flip_vertical(&imageops::flip_horizontal(src.pixels()));
        assert_eq!(both.pixels(), &expected);
    }

    #[test]
    fn brightness_zero_is_black_with_unchanged_dimensions() {
        let src = gradient_source(25, 15);
        let out = compute(&src, &with(&[ParamChange::Brightness(0.0)])).unwrap();
        assert_eq!((out.width(), out.height()), (25, 15));
        assert!(out.pixels().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn brightness_scales_and_clamps() {
        let img = RgbImage::from_pixel(1, 1, Rgb([100, 200, 10]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Brightness(2.0)])).unwrap();
        assert_eq!(out.pixels().get_pixel(0, 0).0, [200, 255, 20]);
    }

    #[test]
    fn vibrance_zero_equals_grayscale_stage() {
        let src = gradient_source(12, 12);
        let desaturated = compute(&src, &with(&[ParamChange::Vibrance(0.0)])).unwrap();
        let grayed = compute(&src, &with(&[ParamChange::Grayscale(true)])).unwrap();
        assert_eq!(desaturated.pixels(), grayed.pixels());
    }

    #[test]
    fn grayscale_output_has_equal_channels() {
        let src = gradient_source(10, 10);
        let out = compute(&src, &with(&[ParamChange::Grayscale(true)])).unwrap();
        assert!(
            out.pixels()
                .pixels()
                .all(|p| p.0[0] == p.0[1] && p.0[1] == p.0[2])
        );
    }

    #[test]
    fn invert_complements_every_channel() {
        let img = RgbImage::from_pixel(2, 2, Rgb([0, 128, 255]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Invert(true)])).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [255, 127, 0]));
    }

    #[test]
    fn blur_preserves_dimensions_and_flattens_contrast() {
        let img = RgbImage::from_fn(20, 20, |x, _| {
            if x % 2 == 0 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Blur(3.0)])).unwrap();
        assert_eq!((out.width(), out.height()), (20, 20));
        let center = out.pixels().get_pixel(10, 10).0[0];
        assert!(center > 40 && center < 215, "expected midtones, got {center}");
    }

    #[test]
    fn emboss_on_a_flat_image_is_neutral_gray() {
        // Kernel weights sum to zero, so a featureless image lands on the
        // 128 offset everywhere.
        let img = RgbImage::from_pixel(10, 10, Rgb([70, 70, 70]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Effect(Effect::Emboss)])).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [128, 128, 128]));
    }

    #[test]
    fn find_edges_on_a_flat_image_is_black() {
        let img = RgbImage::from_pixel(10, 10, Rgb([70, 70, 70]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Effect(Effect::FindEdges)])).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[test]
    fn contour_on_a_flat_image_is_white() {
        let img = RgbImage::from_pixel(10, 10, Rgb([70, 70, 70]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Effect(Effect::Contour)])).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [255, 255, 255]));
    }

    #[test]
    fn edge_enhance_keeps_a_flat_image_flat() {
        // Weights sum to one with no offset: flat stays flat.
        let img = RgbImage::from_pixel(10, 10, Rgb([70, 70, 70]));
        let src = SourceImage::from_decoded(DynamicImage::ImageRgb8(img));
        let out = compute(&src, &with(&[ParamChange::Effect(Effect::EdgeEnhance)])).unwrap();
        assert!(out.pixels().pixels().all(|p| p.0 == [70, 70, 70]));
    }

    #[test]
    fn out_of_domain_set_is_rejected_before_any_stage() {
        let src = gradient_source(10, 10);
        let bad = ParameterSet {
            blur: 99.0,
            ..ParameterSet::default()
        };
        let err = compute(&src, &bad).unwrap_err();
        assert!(matches!(err, PipelineError::Param(_)));
    }

    #[test]
    fn source_is_never_mutated() {
        let src = gradient_source(16, 16);
        let before = src.pixels().clone();
        let _ = compute(&src, &with(&[ParamChange::Invert(true), ParamChange::Blur(2.0)])).unwrap();
        assert_eq!(src.pixels(), &before);
    }
}

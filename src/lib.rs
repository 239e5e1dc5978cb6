//! # Gallerie
//!
//! Non-destructive photo adjustment with a gallery CLI. A photo is opened
//! once, adjustments live in a small parameter set, and every output frame
//! is recomputed from the untouched original — changing your mind about an
//! earlier adjustment never costs quality.
//!
//! # Architecture: Recompute from the Source
//!
//! ```text
//! SourceImage ──► TransformPipeline(ParameterSet) ──► ComputedImage
//!      │                                                   │
//!      │ aspect ratio (fixed at import)                    ├─► viewport fit
//!      ▼                                                   ▼
//!  ViewportGeometry                                     Exporter
//! ```
//!
//! The pipeline runs its stages in a fixed order (rotate, zoom, flip,
//! brightness, vibrance, grayscale, invert, blur, sharpen, effect) and skips
//! any stage whose parameter sits at its default, so the common case — a
//! handful of adjustments — stays cheap.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`params`] | `ParameterSet`, per-parameter domains, change events |
//! | [`source`] | Decoding, format support probing, alpha flattening |
//! | [`pipeline`] | The fixed-order transform stages |
//! | [`viewport`] | Aspect-preserving fit and centering math |
//! | [`export`] | Encoding the computed image into the photos directory |
//! | [`browse`] | Gallery listing, thumbnails, previews, deletion |
//! | [`session`] | Ties source + params + pipeline into an edit loop |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## RGB Everywhere
//!
//! Sources are flattened onto white at import, so the pipeline only ever
//! sees 8-bit RGB. Exporting to an alpha-capable format and re-importing is
//! a no-op, and formats without alpha never need a second flattening rule.
//!
//! ## Parameters Are the Document
//!
//! An edit is fully described by its [`params::ParameterSet`] — ten scalar
//! fields, serializable as JSON. Saving, restoring, or inspecting an edit
//! never touches pixel data.

pub mod browse;
pub mod export;
pub mod output;
pub mod params;
pub mod pipeline;
pub mod session;
pub mod source;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_helpers;

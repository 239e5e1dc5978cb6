//! The edit session — owner of the source, the live parameters, and the
//! last good computed image.
//!
//! The session is the single, explicit dispatch target for parameter change
//! events: the UI layer calls [`EditSession::on_parameter_changed`] and
//! nothing else watches the parameters. Holding the session is the
//! subscription; dropping it revokes it.
//!
//! Every accepted change recomputes the full pipeline from the untouched
//! source. When a recompute fails (a zoom that collapses the image, say) the
//! previous computed image stays current and the error is handed back for
//! per-event reporting — one bad slider position never crashes a session or
//! loses the preview.

use crate::export::{self, ExportError, ExportFormat};
use crate::params::{ParamChange, ParameterSet};
use crate::pipeline::{self, ComputedImage, PipelineError};
use crate::source::{DecodeError, SourceImage};
use crate::viewport::{self, ViewportError, ViewportGeometry};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// One image being edited: immutable source, live parameters, last good
/// output. Single-threaded and synchronous — every call runs to completion
/// before the next event is handled.
pub struct EditSession {
    source: SourceImage,
    params: ParameterSet,
    current: ComputedImage,
}

impl EditSession {
    /// Import a file and start a session with default (identity) parameters.
    pub fn open(path: &Path) -> Result<Self, EditError> {
        Self::from_source(SourceImage::open(path)?)
    }

    /// Start a session from an already-imported source.
    pub fn from_source(source: SourceImage) -> Result<Self, EditError> {
        let params = ParameterSet::default();
        let current = pipeline::compute(&source, &params)?;
        Ok(Self {
            source,
            params,
            current,
        })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    /// The last successfully computed image.
    pub fn current(&self) -> &ComputedImage {
        &self.current
    }

    /// Handle one `(parameter, new value)` event: validate, store, and
    /// recompute the whole pipeline against the source.
    ///
    /// An out-of-domain value is rejected before it touches the parameter
    /// set. An in-domain value that still fails the pipeline keeps its new
    /// parameter value (the slider stays where the user put it) while the
    /// previous computed image remains current.
    pub fn on_parameter_changed(
        &mut self,
        change: ParamChange,
    ) -> Result<&ComputedImage, EditError> {
        self.params.apply(change).map_err(PipelineError::from)?;
        self.recompute()
    }

    /// Replace the whole parameter set (saved-parameters file) and recompute.
    pub fn replace_params(&mut self, params: ParameterSet) -> Result<&ComputedImage, EditError> {
        params.validate().map_err(PipelineError::from)?;
        self.params = params;
        self.recompute()
    }

    fn recompute(&mut self) -> Result<&ComputedImage, EditError> {
        // On failure `current` is left untouched — the previous image stays
        // displayed while the event is reported.
        let next = pipeline::compute(&self.source, &self.params)?;
        self.current = next;
        Ok(&self.current)
    }

    /// Place the current image on a display surface.
    ///
    /// Uses the aspect ratio captured at import: the letterbox does not
    /// re-fit as rotation or cropping nudges the computed dimensions.
    pub fn fit(
        &self,
        viewport_width: u32,
        viewport_height: u32,
    ) -> Result<ViewportGeometry, ViewportError> {
        viewport::fit_ratio(self.source.ratio(), viewport_width, viewport_height)
    }

    /// Export the current image as `<photos_dir>/<base_name>.<ext>`.
    pub fn export(
        &self,
        photos_dir: &Path,
        base_name: &str,
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError> {
        export::export(&self.current, photos_dir, base_name, format)
    }
}

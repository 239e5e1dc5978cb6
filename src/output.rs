//! CLI output formatting.
//!
//! Each surface has a pure `format_*` function returning `Vec<String>`
//! (testable, no I/O) and a `print_*` wrapper that writes to stdout.

use crate::browse::PhotoEntry;
use crate::params::ParameterSet;
use std::path::Path;

/// Gallery listing: one header line, then one indented line per photo with
/// its dimensions.
///
/// ```text
/// 3 photos in photos
///     beach.jpg (4000x3000)
///     dawn.png (1200x800)
///     pier.webp (2048x1365)
/// ```
pub fn format_photo_list(dir: &Path, entries: &[PhotoEntry]) -> Vec<String> {
    let mut lines = vec![match entries.len() {
        1 => format!("1 photo in {}", dir.display()),
        n => format!("{} photos in {}", n, dir.display()),
    }];
    for e in entries {
        lines.push(format!("    {} ({}x{})", e.file_name, e.width, e.height));
    }
    lines
}

pub fn print_photo_list(dir: &Path, entries: &[PhotoEntry]) {
    for line in format_photo_list(dir, entries) {
        println!("{line}");
    }
}

/// Edit summary: the written file, output dimensions, and only the
/// adjustments that differ from their defaults (the ones the pipeline
/// actually ran).
///
/// ```text
/// Exported photos/sunset.jpg (580x420)
///     rotate: 90
///     zoom: 10
///     grayscale: on
/// ```
pub fn format_edit_summary(
    output: &Path,
    dimensions: (u32, u32),
    params: &ParameterSet,
) -> Vec<String> {
    let mut lines = vec![format!(
        "Exported {} ({}x{})",
        output.display(),
        dimensions.0,
        dimensions.1
    )];

    let defaults = ParameterSet::default();
    let mut adj = |name: &str, value: String| lines.push(format!("    {name}: {value}"));

    if params.rotate != defaults.rotate {
        adj("rotate", format!("{}", params.rotate));
    }
    if params.zoom != defaults.zoom {
        adj("zoom", format!("{}", params.zoom));
    }
    if params.flip != defaults.flip {
        adj("flip", format!("{:?}", params.flip));
    }
    if params.brightness != defaults.brightness {
        adj("brightness", format!("{}", params.brightness));
    }
    if params.vibrance != defaults.vibrance {
        adj("vibrance", format!("{}", params.vibrance));
    }
    if params.grayscale {
        adj("grayscale", "on".into());
    }
    if params.invert {
        adj("invert", "on".into());
    }
    if params.blur != defaults.blur {
        adj("blur", format!("{}", params.blur));
    }
    if params.contrast != defaults.contrast {
        adj("contrast", format!("{}", params.contrast));
    }
    if params.effect != defaults.effect {
        adj("effect", format!("{:?}", params.effect));
    }

    if lines.len() == 1 {
        lines.push("    (no adjustments)".to_string());
    }
    lines
}

pub fn print_edit_summary(output: &Path, dimensions: (u32, u32), params: &ParameterSet) {
    for line in format_edit_summary(output, dimensions, params) {
        println!("{line}");
    }
}

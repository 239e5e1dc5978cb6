use clap::{Parser, Subcommand};
use gallerie::export::ExportFormat;
use gallerie::params::{Effect, Flip, ParamChange, ParameterSet};
use gallerie::session::EditSession;
use gallerie::{browse, export, output, source};
use rayon::prelude::*;
use std::path::PathBuf;

/// Adjustment flags for the edit command. Flags not given keep their
/// defaults, and default-valued stages are skipped by the pipeline.
#[derive(clap::Args, Clone)]
struct AdjustArgs {
    /// Counter-clockwise rotation in degrees [0, 360)
    #[arg(long)]
    rotate: Option<f32>,

    /// Border crop in pixels [0, 200]
    #[arg(long)]
    zoom: Option<f32>,

    /// Mirror axis
    #[arg(long, value_enum)]
    flip: Option<Flip>,

    /// Brightness multiplier [0, 5]; 1 is unchanged
    #[arg(long)]
    brightness: Option<f32>,

    /// Saturation blend [0, 5]; 0 is grayscale, 1 is unchanged
    #[arg(long)]
    vibrance: Option<f32>,

    /// Convert to grayscale
    #[arg(long)]
    grayscale: bool,

    /// Invert all channels
    #[arg(long)]
    invert: bool,

    /// Gaussian blur radius [0, 30]
    #[arg(long)]
    blur: Option<f32>,

    /// Unsharp-mask strength [0, 10]
    #[arg(long)]
    contrast: Option<f32>,

    /// Convolution effect
    #[arg(long, value_enum)]
    effect: Option<Effect>,
}

impl AdjustArgs {
    /// Explode the given flags into the change events the session consumes.
    fn changes(&self) -> Vec<ParamChange> {
        let mut changes = Vec::new();
        if let Some(v) = self.rotate {
            changes.push(ParamChange::Rotate(v));
        }
        if let Some(v) = self.zoom {
            changes.push(ParamChange::Zoom(v));
        }
        if let Some(v) = self.flip {
            changes.push(ParamChange::Flip(v));
        }
        if let Some(v) = self.brightness {
            changes.push(ParamChange::Brightness(v));
        }
        if let Some(v) = self.vibrance {
            changes.push(ParamChange::Vibrance(v));
        }
        if self.grayscale {
            changes.push(ParamChange::Grayscale(true));
        }
        if self.invert {
            changes.push(ParamChange::Invert(true));
        }
        if let Some(v) = self.blur {
            changes.push(ParamChange::Blur(v));
        }
        if let Some(v) = self.contrast {
            changes.push(ParamChange::Contrast(v));
        }
        if let Some(v) = self.effect {
            changes.push(ParamChange::Effect(v));
        }
        changes
    }
}

#[derive(Parser)]
#[command(name = "gallerie")]
#[command(about = "Non-destructive photo adjustments and a gallery to keep them in")]
#[command(long_about = "\
Non-destructive photo adjustments and a gallery to keep them in

An edit opens the original photo once and recomputes every output from it,
so adjustments never compound quality loss. The adjustments themselves are
ten scalar parameters you can save and restore as JSON (see 'gallerie
schema').

Exports land in the photos directory, which the list/thumbs/delete
commands treat as your gallery.")]
#[command(version)]
struct Cli {
    /// Gallery directory exports are written to and listed from
    #[arg(long, default_value = "photos", global = true)]
    photos_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply adjustments to a photo and export the result
    Edit {
        /// Photo to open
        input: PathBuf,

        #[command(flatten)]
        adjust: AdjustArgs,

        /// JSON parameter file to start from (flags apply on top)
        #[arg(long)]
        params: Option<PathBuf>,

        /// Output name without extension; defaults to the input file stem
        #[arg(long)]
        name: Option<String>,

        /// Output format extension (jpg, png, tiff, webp, bmp, gif)
        #[arg(long, default_value = "jpg")]
        format: String,
    },
    /// List the photos in the gallery
    List,
    /// Render 200x200 thumbnails for every photo in the gallery
    Thumbs {
        /// Directory the thumbnails are written to
        #[arg(long, default_value = "thumbs")]
        out: PathBuf,
    },
    /// Remove a photo from the gallery
    Delete {
        /// File name inside the photos directory
        file: String,
    },
    /// Print the parameter JSON schema with every default
    Schema,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Edit {
            input,
            adjust,
            params,
            name,
            format,
        } => {
            let format = ExportFormat::from_extension(&format)
                .ok_or_else(|| format!("unsupported export format: {format}"))?;

            let mut session = EditSession::open(&input)?;
            if let Some(params_path) = params {
                let json = std::fs::read_to_string(&params_path)?;
                let saved: ParameterSet = serde_json::from_str(&json)?;
                session.replace_params(saved)?;
            }
            for change in adjust.changes() {
                session.on_parameter_changed(change)?;
            }

            let base_name = match name {
                Some(name) => name,
                None => input
                    .file_stem()
                    .ok_or_else(|| format!("no file name in {}", input.display()))?
                    .to_string_lossy()
                    .into_owned(),
            };
            let written = session.export(&cli.photos_dir, &base_name, format)?;
            let dimensions = (session.current().width(), session.current().height());
            output::print_edit_summary(&written, dimensions, session.params());
        }
        Command::List => {
            let photos = browse::list_photos(&cli.photos_dir)?;
            output::print_photo_list(&cli.photos_dir, &photos);
        }
        Command::Thumbs { out } => {
            let photos = browse::list_photos(&cli.photos_dir)?;
            std::fs::create_dir_all(&out)?;

            let written: usize = photos
                .par_iter()
                .map(|photo| {
                    let thumb = match browse::render_thumbnail(&photo.path) {
                        Ok(thumb) => thumb,
                        Err(err) => {
                            eprintln!("skipping {}: {}", photo.file_name, err);
                            return 0;
                        }
                    };
                    let path = out.join(format!(
                        "{}.png",
                        photo.path.file_stem().unwrap_or_default().to_string_lossy()
                    ));
                    match export::write_image(
                        &image::DynamicImage::ImageRgb8(thumb),
                        &path,
                        ExportFormat::Png,
                    ) {
                        Ok(()) => 1,
                        Err(err) => {
                            eprintln!("skipping {}: {}", photo.file_name, err);
                            0
                        }
                    }
                })
                .sum();
            println!("{} thumbnails in {}", written, out.display());
        }
        Command::Delete { file } => {
            let path = cli.photos_dir.join(&file);
            browse::delete_photo(&path)?;
            println!("Deleted {}", path.display());
        }
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&ParameterSet::default())?);
            eprintln!(
                "readable photo formats: {}",
                source::supported_extensions().join(", ")
            );
        }
    }

    Ok(())
}

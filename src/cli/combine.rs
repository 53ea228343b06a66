//! Combine command implementation.

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use walkdir::WalkDir;

use crate::combine::Combiner;
use crate::config::{CombineSection, ProjectConfig, RunMetadata};
use crate::error::{AbstraktError, Result};
use crate::output::{display_path, format_bytes, format_elapsed, plural, Printer};
use crate::render::{read_image, write_png, Canvas};

use super::prepare_output;

/// Output file when neither flags nor config name one.
pub const DEFAULT_OUTPUT: &str = "composite.png";

/// Combine images into a grid, layered, split or mosaic composite
#[derive(Args, Debug, Default)]
pub struct CombineArgs {
    /// Input PNG files or directories of PNGs
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Composition type: grid, layered, split or mosaic
    #[arg(long = "type", short = 't')]
    pub kind: Option<String>,

    /// Blend mode for layered: normal, multiply, screen or overlay
    #[arg(long)]
    pub blend: Option<String>,

    /// Layer opacity for layered (0-1, default: 0.5)
    #[arg(long)]
    pub opacity: Option<f32>,

    /// Split mode: horizontal, vertical, diagonal or radial
    #[arg(long)]
    pub split: Option<String>,

    /// Number of split regions (default depends on the split mode)
    #[arg(long)]
    pub regions: Option<u32>,

    /// Grid columns (default: ceil(sqrt(n)))
    #[arg(long)]
    pub columns: Option<u32>,

    /// Gap between grid cells in pixels (default: 10)
    #[arg(long)]
    pub spacing: Option<u32>,

    /// Grid cell size as WxH (default: smallest input)
    #[arg(long)]
    pub cell_size: Option<String>,

    /// Mosaic tile side in pixels (default: 50)
    #[arg(long)]
    pub tile_size: Option<u32>,

    /// Mosaic tile assignment: sequential or random
    #[arg(long)]
    pub tile_policy: Option<String>,

    /// Output width (resizes inputs)
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Output height (resizes inputs)
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Grid background as hex colour (default: #FFFFFF)
    #[arg(long)]
    pub background: Option<String>,

    /// Gaussian smoothing radius applied to the result
    #[arg(long)]
    pub smooth: Option<f32>,

    /// Random seed for the random tile policy
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output PNG file (default: composite.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file (default: ./abstrakt.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON metadata sidecar next to the image
    #[arg(long)]
    pub metadata: bool,
}

impl CombineArgs {
    /// Flags as a config section; unset flags stay `None`.
    pub fn to_section(&self) -> CombineSection {
        CombineSection {
            kind: self.kind.clone(),
            blend: self.blend.clone(),
            opacity: self.opacity,
            split: self.split.clone(),
            regions: self.regions,
            columns: self.columns,
            spacing: self.spacing,
            cell_size: self.cell_size.clone(),
            tile_size: self.tile_size,
            tile_policy: self.tile_policy.clone(),
            width: self.width,
            height: self.height,
            background: self.background.clone(),
            smooth: self.smooth,
            seed: self.seed,
            output: self.output.clone(),
            metadata: self.metadata.then_some(true),
        }
    }
}

/// Expand inputs: files are kept as given, directories contribute the PNG
/// files directly inside them in name order.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && is_png(path) {
                    files.push(path.to_path_buf());
                }
            }
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(AbstraktError::UnreadableImage {
                path: input.clone(),
                message: "No such file or directory".to_string(),
            });
        }
    }

    Ok(files)
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

pub fn run(args: CombineArgs, printer: &Printer) -> Result<()> {
    let file = ProjectConfig::discover(args.config.as_deref())?;
    let section = file.combine.merged(&args.to_section());
    let combiner = Combiner::new(section.to_spec()?)?;
    let output = section
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let inputs = collect_inputs(&args.inputs)?;
    printer.status(
        "Loading",
        &plural(inputs.len(), "input image", "input images"),
    );
    let images = inputs
        .iter()
        .map(|p| read_image(p))
        .collect::<Result<Vec<Canvas>>>()?;

    printer.status("Combining", &format!("{} composite", combiner.spec().kind));
    let start = Instant::now();
    let canvas = combiner.combine(&images)?;

    prepare_output(&output)?;
    write_png(&canvas, &output)?;

    if section.metadata.unwrap_or(false) {
        let sidecar = RunMetadata::sidecar_path(&output);
        RunMetadata::for_composite(&combiner, canvas.size(), &inputs).write(&sidecar)?;
        printer.info("Metadata", &display_path(&sidecar));
    }

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    printer.success(
        "Finished",
        &format!(
            "{} {}x{} ({}) in {}",
            printer.cyan(&display_path(&output)),
            canvas.width(),
            canvas.height(),
            format_bytes(size),
            format_elapsed(start.elapsed())
        ),
    );

    Ok(())
}

//! Generate command implementation.
//!
//! Resolves flags over abstrakt.yaml, renders one artwork and writes it as
//! a PNG (plus an optional JSON sidecar).

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;

use crate::config::{GenerateSection, ProjectConfig, RunMetadata};
use crate::error::Result;
use crate::output::{display_path, format_bytes, format_elapsed, plural, Printer};
use crate::render::write_png;
use crate::synth::generate;
use crate::types::Style;

use super::prepare_output;

/// Output file when neither flags nor config name one.
pub const DEFAULT_OUTPUT: &str = "artwork.png";

/// Generate an expressionist or surrealist artwork
#[derive(Args, Debug, Default)]
pub struct GenerateArgs {
    /// Art style: expressionist or surrealist
    #[arg(long, short)]
    pub style: Option<String>,

    /// Output PNG file (default: artwork.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Image width in pixels (default: 1024)
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels (default: 1024)
    #[arg(long)]
    pub height: Option<u32>,

    /// Random seed for reproducible results
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of brush strokes (expressionist; default: random 20-40)
    #[arg(long)]
    pub strokes: Option<usize>,

    /// Number of organic shapes (surrealist; default: 8)
    #[arg(long)]
    pub shapes: Option<usize>,

    /// Length of flow-field vectors
    #[arg(long)]
    pub flow_strength: Option<f32>,

    /// How strongly strokes follow the flow field (0-1)
    #[arg(long)]
    pub flow_blend: Option<f32>,

    /// Pixel displacement of the surrealist warp
    #[arg(long)]
    pub distortion: Option<f32>,

    /// Blur radius applied to each surrealist shape
    #[arg(long)]
    pub soften: Option<f32>,

    /// Skip the surrealist post-effects
    #[arg(long)]
    pub no_effects: bool,

    /// Custom palette as comma-separated hex colours
    #[arg(long, value_delimiter = ',')]
    pub palette: Option<Vec<String>>,

    /// Config file (default: ./abstrakt.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON metadata sidecar next to the image
    #[arg(long)]
    pub metadata: bool,
}

impl GenerateArgs {
    /// Flags as a config section; unset flags stay `None`.
    pub fn to_section(&self) -> GenerateSection {
        GenerateSection {
            style: self.style.clone(),
            width: self.width,
            height: self.height,
            seed: self.seed,
            strokes: self.strokes,
            shapes: self.shapes,
            flow_strength: self.flow_strength,
            flow_blend: self.flow_blend,
            distortion: self.distortion,
            soften: self.soften,
            effects: self.no_effects.then_some(false),
            palette: self.palette.clone(),
            output: self.output.clone(),
            metadata: self.metadata.then_some(true),
        }
    }
}

pub fn run(args: GenerateArgs, printer: &Printer) -> Result<()> {
    let file = ProjectConfig::discover(args.config.as_deref())?;
    let section = file.generate.merged(&args.to_section());
    let config = section.to_config()?;
    let output = section
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    printer.status(
        "Generating",
        &format!("{} artwork ({}x{})", config.style, config.width, config.height),
    );
    let start = Instant::now();
    let art = generate(&config)?;

    let drawn = match art.style {
        Style::Expressionist => plural(art.count, "stroke", "strokes"),
        Style::Surrealist => plural(art.count, "shape", "shapes"),
    };
    let mut detail = format!("{}, seed {}", drawn, art.seed);
    if !art.effects.is_empty() {
        let names: Vec<String> = art.effects.iter().map(|e| e.to_string()).collect();
        detail.push_str(&format!(", effects: {}", names.join(" ")));
    }
    printer.info("Rendered", &printer.dim(&detail));

    prepare_output(&output)?;
    write_png(&art.canvas, &output)?;

    if section.metadata.unwrap_or(false) {
        let sidecar = RunMetadata::sidecar_path(&output);
        RunMetadata::for_artwork(&art).write(&sidecar)?;
        printer.info("Metadata", &display_path(&sidecar));
    }

    let size = std::fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    printer.success(
        "Finished",
        &format!(
            "{} ({}) in {}",
            printer.cyan(&display_path(&output)),
            format_bytes(size),
            format_elapsed(start.elapsed())
        ),
    );

    Ok(())
}

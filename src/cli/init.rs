//! Init command implementation.
//!
//! Writes a commented starter `abstrakt.yaml`.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::CONFIG_FILENAME;
use crate::error::{AbstraktError, Result};
use crate::output::{display_path, Printer};

/// Starter config. Every key is optional; commented keys show defaults.
pub const STARTER_CONFIG: &str = r##"# abstrakt project config. Command-line flags override these values.

generate:
  style: surrealist
  width: 1024
  height: 1024
  # seed: 42
  # strokes: 30          # expressionist, random 20-40 when unset
  shapes: 8              # surrealist
  flow_strength: 1.0
  flow_blend: 0.3
  distortion: 6.0
  soften: 0.0
  effects: true
  # palette: ["#E63946", "#F1FAEE", "#A8DADC", "#457B9D", "#1D3557"]
  output: artwork.png
  metadata: false

combine:
  type: grid
  columns: 2
  spacing: 10
  background: "#FFFFFF"
  blend: normal          # layered: normal, multiply, screen, overlay
  opacity: 0.5
  split: vertical        # horizontal, vertical, diagonal, radial
  tile_size: 50
  tile_policy: sequential
  smooth: 0.0
  output: composite.png
"##;

/// Initialize a project (writes abstrakt.yaml)
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing abstrakt.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(AbstraktError::config(
            format!("{} already exists", CONFIG_FILENAME),
            Some("Use --force to overwrite"),
        ));
    }

    fs::create_dir_all(&args.path).map_err(|e| AbstraktError::Io {
        path: args.path.clone(),
        message: format!("Failed to create directory: {}", e),
    })?;
    fs::write(&config_path, STARTER_CONFIG).map_err(|e| AbstraktError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.success("Created", &display_path(&config_path));

    Ok(())
}

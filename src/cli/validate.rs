//! Validate command implementation.
//!
//! Parses a config file and resolves each section the way `generate` and
//! `combine` would, without rendering anything.

use std::path::PathBuf;

use clap::Args;

use crate::config::{CombineSection, GenerateSection, ProjectConfig, CONFIG_FILENAME};
use crate::error::Result;
use crate::output::{display_path, Printer};

/// Check a config file without rendering
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Config file to check (default: abstrakt.yaml)
    #[arg(default_value = CONFIG_FILENAME)]
    pub config: PathBuf,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    printer.status("Checking", &display_path(&args.config));
    let config = ProjectConfig::load(&args.config)?;

    if config.generate == GenerateSection::default() {
        printer.warning("Skipping", "no generate section");
    } else {
        let generate = config.generate.to_config()?;
        printer.info(
            "Generate",
            &format!("{} {}x{}", generate.style, generate.width, generate.height),
        );
    }

    if config.combine == CombineSection::default() {
        printer.warning("Skipping", "no combine section");
    } else {
        let spec = config.combine.to_spec()?;
        printer.info("Combine", &spec.kind.to_string());
    }

    printer.success("Valid", &display_path(&args.config));
    Ok(())
}

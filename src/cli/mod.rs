pub mod combine;
pub mod completions;
pub mod generate;
pub mod init;
pub mod palette;
pub mod validate;

use clap::{Parser, Subcommand};

/// abstrakt - Procedural abstract art generator and image combiner
#[derive(Parser, Debug)]
#[command(name = "abstrakt")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate an expressionist or surrealist artwork
    Generate(generate::GenerateArgs),

    /// Combine images into a grid, layered, split or mosaic composite
    Combine(combine::CombineArgs),

    /// Print a style's palette as hex colours
    Palette(palette::PaletteArgs),

    /// Initialize a project (writes abstrakt.yaml)
    Init(init::InitArgs),

    /// Check a config file without rendering
    Validate(validate::ValidateArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Create the parent directory of an output file if it is missing.
pub(crate) fn prepare_output(path: &std::path::Path) -> crate::error::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| crate::error::AbstraktError::Io {
                path: dir.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}

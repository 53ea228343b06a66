use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for abstrakt operations
#[derive(Error, Diagnostic, Debug)]
pub enum AbstraktError {
    #[error("Unknown style: {name}")]
    #[diagnostic(
        code(abstrakt::style),
        help("Available styles: expressionist, surrealist")
    )]
    InvalidStyle { name: String },

    #[error("Invalid dimensions: {width}x{height}")]
    #[diagnostic(
        code(abstrakt::dimensions),
        help("Width and height must both be positive")
    )]
    InvalidDimensions { width: u32, height: u32 },

    #[error(
        "Dimension mismatch: expected {}x{}, found {}x{}",
        expected.0, expected.1, found.0, found.1
    )]
    #[diagnostic(code(abstrakt::dimensions))]
    DimensionMismatch {
        expected: (u32, u32),
        found: (u32, u32),
        #[help]
        help: Option<String>,
    },

    #[error("'{kind}' composition needs at least {required} image(s), got {found}")]
    #[diagnostic(code(abstrakt::inputs))]
    InsufficientInputs {
        kind: String,
        required: usize,
        found: usize,
    },

    #[error("Invalid tile size: {tile_size}")]
    #[diagnostic(
        code(abstrakt::tile_size),
        help("Tile size must be between 1 and the smaller canvas side")
    )]
    InvalidTileSize {
        tile_size: u32,
        width: u32,
        height: u32,
    },

    #[error("Could not read image {path}: {message}")]
    #[diagnostic(code(abstrakt::io::read))]
    UnreadableImage { path: PathBuf, message: String },

    #[error("Could not write {path}: {message}")]
    #[diagnostic(code(abstrakt::io::write))]
    WriteFailure { path: PathBuf, message: String },

    #[error("Unknown blend mode: {name}")]
    #[diagnostic(
        code(abstrakt::blend_mode),
        help("Available blend modes: normal, multiply, screen, overlay")
    )]
    InvalidBlendMode { name: String },

    #[error("Unknown split mode: {name}")]
    #[diagnostic(
        code(abstrakt::split_mode),
        help("Available split modes: horizontal, vertical, diagonal, radial")
    )]
    InvalidSplitMode { name: String },

    #[error("Unknown composition type: {name}")]
    #[diagnostic(
        code(abstrakt::composition),
        help("Available types: grid, layered, split, mosaic")
    )]
    InvalidCompositionType { name: String },

    #[error("Unknown tile policy: {name}")]
    #[diagnostic(
        code(abstrakt::tile_policy),
        help("Available policies: sequential, random")
    )]
    InvalidTilePolicy { name: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(abstrakt::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(abstrakt::io))]
    Io { path: PathBuf, message: String },
}

impl AbstraktError {
    /// Shorthand for a configuration error with optional help text.
    pub fn config(message: impl Into<String>, help: Option<&str>) -> Self {
        Self::Config {
            message: message.into(),
            help: help.map(str::to_string),
        }
    }

    /// Shorthand for a dimension mismatch between two buffers.
    pub fn mismatch(expected: (u32, u32), found: (u32, u32)) -> Self {
        Self::DimensionMismatch {
            expected,
            found,
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AbstraktError>;

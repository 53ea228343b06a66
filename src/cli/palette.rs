use clap::Args;

use crate::error::Result;
use crate::output::{plural, Printer};
use crate::synth::{style_palette, SeedStream};
use crate::types::{Palette, Style};

/// Print a style's palette as hex colours
#[derive(Args, Debug)]
pub struct PaletteArgs {
    /// Style whose palette to print
    pub style: String,

    /// Print the jittered palette `generate --seed` would paint with
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Palette lines in `style-N: #RRGGBB` form, numbered from 1.
pub fn palette_lines(style: Style, palette: &Palette) -> Vec<String> {
    palette
        .colours()
        .iter()
        .enumerate()
        .map(|(i, colour)| format!("{}-{}: {}", style, i + 1, colour))
        .collect()
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<()> {
    let style: Style = args.style.parse()?;
    let palette = match args.seed {
        Some(seed) => style_palette(style, &mut SeedStream::new(Some(seed))),
        None => Palette::for_style(style),
    };

    let source = match args.seed {
        Some(seed) => format!("{} (seed {})", style, seed),
        None => style.to_string(),
    };
    printer.status(
        "Palette",
        &format!("{} for {}", plural(palette.len(), "colour", "colours"), source),
    );

    // Palette lines go to stdout
    for line in palette_lines(style, &palette) {
        println!("{}", line);
    }

    Ok(())
}

use clap::Parser;
use miette::Result;
use abstrakt::cli::{Cli, Commands};
use abstrakt::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => abstrakt::cli::generate::run(args, &printer)?,
        Commands::Combine(args) => abstrakt::cli::combine::run(args, &printer)?,
        Commands::Palette(args) => abstrakt::cli::palette::run(args, &printer)?,
        Commands::Init(args) => abstrakt::cli::init::run(args, &printer)?,
        Commands::Validate(args) => abstrakt::cli::validate::run(args, &printer)?,
        Commands::Completions(args) => abstrakt::cli::completions::run(args)?,
    }

    Ok(())
}

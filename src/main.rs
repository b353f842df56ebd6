//! dyncomp - resolve prefixed glob imports from the command line.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use dyncomp::{Resolver, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = cli::common::load_config(&cli.config)?;
    let resolver = Resolver::new(config)?;

    match &cli.command {
        Commands::Resolve { args } => cli::resolve::run_resolve(args, &resolver),
        Commands::Scan { args } => cli::scan::run_scan(args, &resolver),
    }
}

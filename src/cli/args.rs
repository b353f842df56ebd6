//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Resolve prefixed glob imports into dynamic component modules
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = "dyncomp.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve a single specifier and print its module identity
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Find every prefixed import in source files and resolve them all
    #[command(visible_alias = "s")]
    Scan {
        #[command(flatten)]
        args: ScanArgs,
    },
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Full specifier, e.g. `dynamic:load:./buttons/*.vue`
    #[arg(value_name = "SPECIFIER")]
    pub specifier: String,

    /// Module the specifier is imported from (needed for relative patterns)
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub importer: Option<PathBuf>,

    /// Print the synthesized module source after the identity
    #[arg(short, long)]
    pub print: bool,
}

/// Scan command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Files or directories to scan. If omitted, scans the source directory.
    /// Use `-` to read paths from stdin (one per line).
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
    pub paths: Vec<PathBuf>,

    /// Print every synthesized module source
    #[arg(short, long)]
    pub print: bool,

    /// Write the resolution report as JSON to stdout
    #[arg(short, long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pub pretty: bool,

    /// Treat failed resolutions as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolve() {
        let cli = Cli::parse_from([
            "dyncomp",
            "resolve",
            "dynamic:load:./buttons/*.vue",
            "--importer",
            "src/pages/index.astro",
            "--print",
        ]);
        let Commands::Resolve { args } = cli.command else {
            unreachable!()
        };
        assert_eq!(args.specifier, "dynamic:load:./buttons/*.vue");
        assert_eq!(args.importer, Some(PathBuf::from("src/pages/index.astro")));
        assert!(args.print);
    }

    #[test]
    fn test_parse_scan_with_globals() {
        let cli = Cli::parse_from(["dyncomp", "s", "src/pages", "-j", "-V", "-C", "cfg/dyncomp.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("cfg/dyncomp.toml"));
        let Commands::Scan { args } = cli.command else {
            unreachable!()
        };
        assert_eq!(args.paths, vec![PathBuf::from("src/pages")]);
        assert!(args.json);
        assert!(!args.pretty);
    }

    #[test]
    fn test_pretty_requires_json() {
        assert!(Cli::try_parse_from(["dyncomp", "scan", "--pretty"]).is_err());
    }
}

//! Resolve command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use dyncomp::resolver::{CacheOutcome, Resolver};
use dyncomp::utils::path::normalize_path;
use dyncomp::{debug, log};

use crate::cli::args::ResolveArgs;

/// Execute resolve command
pub fn run_resolve(args: &ResolveArgs, resolver: &Resolver) -> Result<()> {
    let importer = args.importer.as_deref().map(absolute).transpose()?;

    let resolution = resolver
        .resolve(&args.specifier, importer.as_deref())?
        .ok_or_else(|| {
            anyhow!(
                "`{}` does not start with `{}`",
                args.specifier,
                resolver.config().resolver.prefix
            )
        })?;

    let module = &resolution.module;
    log!("resolve"; "{} component(s) for `{}`", module.components.len(), module.pattern);
    for component in &module.components {
        debug!("resolve"; "{} -> {}", component.display_name, component.absolute_path.display());
    }
    if resolution.outcome == CacheOutcome::Hit {
        debug!("resolve"; "served from cache");
    }

    println!("{}", resolution.id);
    if args.print {
        print!("{}", module.source);
    }
    Ok(())
}

/// Absolute form of a CLI path, relative to the current directory.
fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(normalize_path(path));
    }
    Ok(normalize_path(&std::env::current_dir()?.join(path)))
}

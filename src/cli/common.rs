//! Common utilities shared across CLI commands.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dyncomp::config::ResolverConfig;
use dyncomp::debug;
use dyncomp::utils::path::normalize_path;
use jwalk::WalkDir;

/// Extensions of files that may contain prefixed imports.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "astro", "md", "mdx", "js", "jsx", "mjs", "ts", "tsx", "mts", "vue", "svelte",
];

/// Load configuration from the `--config` argument.
///
/// A bare file name is searched upward from the current directory; when
/// nothing is found the defaults apply, rooted at the current directory. An
/// explicit path must exist.
pub fn load_config(path: &Path) -> Result<ResolverConfig> {
    if path.is_file() {
        return ResolverConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()));
    }

    let is_bare_name = path.components().count() == 1;
    if !is_bare_name {
        anyhow::bail!("config file not found: {}", path.display());
    }

    let config = ResolverConfig::discover(path)?;
    if config.config_path.as_os_str().is_empty() {
        debug!("config"; "no {} found, using defaults", path.display());
    } else {
        debug!("config"; "using {}", config.config_path.display());
    }
    Ok(config)
}

/// Collect source files from CLI paths, defaulting to `default_dir`.
pub fn collect_source_files(paths: &[PathBuf], default_dir: &Path) -> Result<Vec<PathBuf>> {
    // Handle stdin case: read paths from stdin when `-` is passed
    let paths: Vec<PathBuf> = if paths.len() == 1 && paths[0].as_os_str() == "-" {
        read_paths_from_stdin()?
    } else {
        paths.to_vec()
    };

    if paths.is_empty() {
        return Ok(collect_all_files(default_dir));
    }

    let mut all_files = Vec::new();
    for path in &paths {
        let resolved = normalize_path(path);

        if resolved.is_file() {
            if is_source_file(&resolved) {
                all_files.push(resolved);
            } else {
                anyhow::bail!("Not a supported source file: {}", path.display());
            }
        } else if resolved.is_dir() {
            all_files.extend(collect_all_files(&resolved));
        } else {
            anyhow::bail!("Path not found: {}", path.display());
        }
    }

    all_files.sort();
    all_files.dedup();
    Ok(all_files)
}

/// All source files under `dir`, skipping hidden entries and `node_modules`.
pub fn collect_all_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .skip_hidden(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| is_source_file(p) && !in_node_modules(p, dir))
        .collect();
    files.sort();
    files
}

/// Read file paths from stdin, one per line
pub fn read_paths_from_stdin() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    let mut paths = Vec::new();

    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            paths.push(PathBuf::from(trimmed));
        }
    }

    Ok(paths)
}

fn in_node_modules(path: &Path, base: &Path) -> bool {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str() == "node_modules")
}

pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

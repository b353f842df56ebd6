//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find a file by searching upward from `start`
///
/// Walks up parent directories until finding `name`.
/// Returns the absolute path to the file if found
///
/// # Example
/// ```text
/// /home/user/app/src/pages/  ← start
/// /home/user/app/dyncomp.toml ← found!
/// ```
pub fn find_upward(start: &Path, name: &Path) -> Option<PathBuf> {
    // Absolute names are taken as-is
    if name.is_absolute() {
        return name.exists().then(|| name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Find config file by searching upward from current directory
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_upward(&cwd, config_name)
}

// ============================================================================
// tests
// ============================================================================

//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `clean_path` - lexical `.`/`..` folding, no filesystem access
//! - `relative_to` - relative path between two absolute locations
//! - `to_slash` - forward-slash rendering for generated source

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Lexically cleaned path if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            clean_path(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| clean_path(path), |cwd| clean_path(&cwd.join(path)))
        }
    })
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root is dropped; leading `..` of a relative path is kept.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Compute the path of `target` relative to the directory `base`.
///
/// Both paths are expected to be absolute and already cleaned. Returns `None`
/// when they live on different roots (e.g. different Windows drives).
///
/// # Example
/// ```ignore
/// relative_to(Path::new("/p/src/a/B.vue"), Path::new("/p/src/.dynamic"))
///     -> Some("../a/B.vue")
/// ```
pub fn relative_to(target: &Path, base: &Path) -> Option<PathBuf> {
    let target: Vec<_> = target.components().collect();
    let base: Vec<_> = base.components().collect();

    if target.first() != base.first() {
        return None;
    }

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..base.len() {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component.as_os_str());
    }
    Some(rel)
}

/// Render a path with forward slashes regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let rendered = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rendered.into_owned()
    } else {
        rendered.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Turn a relative path into an import specifier (`./x` or `../x`).
pub fn to_import_specifier(rel: &Path) -> String {
    let slashed = to_slash(rel);
    if slashed.starts_with("../") || slashed.starts_with("./") {
        slashed
    } else {
        format!("./{slashed}")
    }
}

//! tsconfig-style path mapping (`compilerOptions.paths`).
//!
//! Only `key/*` style mappings are meaningful here: the trailing `/*` is
//! stripped from both key and first target, and a path starting with the key
//! has that prefix replaced by the target, resolved against the base
//! directory (`baseUrl`, or the directory of the file declaring `paths`).
//!
//! Files are read as JSONC (comments and trailing commas allowed), and
//! `extends` chains are followed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::find_upward;
use crate::utils::path::clean_path;

/// Files looked for when no explicit mapping file is configured.
pub const MAPPING_FILES: [&str; 2] = ["tsconfig.json", "jsconfig.json"];

/// Longest `extends` chain followed.
const MAX_EXTENDS_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum PathMappingError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{0}`")]
    Json(PathBuf, #[source] json5::Error),

    #[error("`{from}` extends `{target}`, which was not found")]
    ExtendsNotFound { from: PathBuf, target: String },

    #[error("`extends` chain starting at `{0}` is too deep (cycle?)")]
    ExtendsTooDeep(PathBuf),
}

/// A normalized `key -> target` mapping (first target only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAlias {
    pub key: String,
    pub target: String,
}

/// Path mappings of one resolved config file.
#[derive(Debug, Clone)]
pub struct PathMapping {
    /// The file the mapping was loaded from.
    pub file: PathBuf,
    /// Directory targets are resolved against.
    pub base_dir: PathBuf,
    /// Mappings in declaration order.
    pub aliases: Vec<PathAlias>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    #[serde(default)]
    extends: Option<Value>,
    #[serde(default)]
    compiler_options: RawCompilerOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCompilerOptions {
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    paths: Option<Map<String, Value>>,
}

/// Settings gathered along an `extends` chain.
#[derive(Debug, Default)]
struct Resolved {
    /// Absolute `baseUrl`.
    base_url: Option<PathBuf>,
    /// `paths` and the directory of the file that declared them.
    paths: Option<(Map<String, Value>, PathBuf)>,
}

impl PathMapping {
    /// Find and load the nearest mapping file above `cwd`.
    ///
    /// Returns `Ok(None)` when there is no such file.
    pub fn discover(cwd: &Path) -> Result<Option<Self>, PathMappingError> {
        for dir in cwd.ancestors() {
            for name in MAPPING_FILES {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Self::load(&candidate).map(Some);
                }
            }
        }
        Ok(None)
    }

    /// Load a mapping file, following `extends`.
    pub fn load(file: &Path) -> Result<Self, PathMappingError> {
        let resolved = resolve_chain(file, 0)?;
        let file_dir = parent_dir(file);

        let (paths, paths_dir) = resolved
            .paths
            .unwrap_or_else(|| (Map::new(), file_dir.clone()));
        let base_dir = resolved.base_url.unwrap_or(paths_dir);

        let aliases = paths
            .iter()
            .filter_map(|(key, targets)| {
                let target = targets.as_array()?.first()?.as_str()?;
                Some(PathAlias {
                    key: strip_wildcard(key).to_string(),
                    target: strip_wildcard(target).to_string(),
                })
            })
            .collect();

        Ok(Self {
            file: file.to_path_buf(),
            base_dir,
            aliases,
        })
    }

    /// Resolve an aliased path, or `None` when no key is a leading segment
    /// of it.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        self.aliases.iter().find_map(|alias| {
            let rest = path.strip_prefix(alias.key.as_str())?;
            if !(rest.is_empty() || rest.starts_with('/')) {
                return None;
            }
            let replaced = format!("{}{rest}", alias.target);
            Some(clean_path(&self.base_dir.join(replaced)))
        })
    }
}

/// Strip a trailing `/*` (or a lone `*`).
fn strip_wildcard(s: &str) -> &str {
    s.strip_suffix("/*")
        .or_else(|| s.strip_suffix('*'))
        .unwrap_or(s)
}

fn parent_dir(file: &Path) -> PathBuf {
    file.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Read `file` and its `extends` ancestors; children override parents.
fn resolve_chain(file: &Path, depth: usize) -> Result<Resolved, PathMappingError> {
    if depth > MAX_EXTENDS_DEPTH {
        return Err(PathMappingError::ExtendsTooDeep(file.to_path_buf()));
    }

    let raw = read_config(file)?;
    let dir = parent_dir(file);

    let mut resolved = Resolved::default();
    for target in extends_targets(raw.extends.as_ref()) {
        let parent_file = locate_extends(&dir, &target).ok_or_else(|| {
            PathMappingError::ExtendsNotFound {
                from: file.to_path_buf(),
                target: target.clone(),
            }
        })?;
        let parent = resolve_chain(&parent_file, depth + 1)?;
        if parent.base_url.is_some() {
            resolved.base_url = parent.base_url;
        }
        if parent.paths.is_some() {
            resolved.paths = parent.paths;
        }
    }

    let options = raw.compiler_options;
    if let Some(base_url) = options.base_url {
        resolved.base_url = Some(clean_path(&dir.join(base_url)));
    }
    if let Some(paths) = options.paths {
        resolved.paths = Some((paths, dir));
    }

    Ok(resolved)
}

fn read_config(file: &Path) -> Result<RawConfig, PathMappingError> {
    let text =
        fs::read_to_string(file).map_err(|err| PathMappingError::Io(file.to_path_buf(), err))?;
    json5::from_str(&text).map_err(|err| PathMappingError::Json(file.to_path_buf(), err))
}

/// `extends` may be a string or an array of strings.
fn extends_targets(extends: Option<&Value>) -> Vec<String> {
    match extends {
        Some(Value::String(s)) => vec![s.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Locate an `extends` target: relative paths from `dir`, package paths in
/// `node_modules` above `dir`. A missing `.json` extension is tolerated.
fn locate_extends(dir: &Path, target: &str) -> Option<PathBuf> {
    let with_json = |path: PathBuf| -> Option<PathBuf> {
        if path.is_file() {
            return Some(path);
        }
        let mut alt = path.into_os_string();
        alt.push(".json");
        let alt = PathBuf::from(alt);
        alt.is_file().then_some(alt)
    };

    if target.starts_with('.') || Path::new(target).is_absolute() {
        return with_json(clean_path(&dir.join(target)));
    }

    find_upward(dir, &Path::new("node_modules").join(target))
        .or_else(|| {
            let mut name = target.to_string();
            name.push_str(".json");
            find_upward(dir, &Path::new("node_modules").join(name))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_paths_with_base_url() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(
            &file,
            r#"{
  "compilerOptions": {
    "baseUrl": ".",
    // aliases
    "paths": {
      "@components/*": ["src/components/*", "fallback/*"],
      "@/*": ["src/*"],
    },
  },
}"#,
        )
        .unwrap();

        let mapping = PathMapping::load(&file).unwrap();
        assert_eq!(mapping.base_dir, dir.path());
        assert_eq!(
            mapping.aliases,
            vec![
                PathAlias {
                    key: "@components".into(),
                    target: "src/components".into()
                },
                PathAlias {
                    key: "@".into(),
                    target: "src".into()
                },
            ]
        );
        assert_eq!(
            mapping.resolve("@components/buttons"),
            Some(dir.path().join("src/components/buttons"))
        );
        assert_eq!(
            mapping.resolve("@/layouts"),
            Some(dir.path().join("src/layouts"))
        );
        assert_eq!(mapping.resolve("~/layouts"), None);
        assert_eq!(mapping.resolve("@scope/layouts"), None);
    }

    #[test]
    fn test_paths_without_base_url_resolve_from_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let file = dir.path().join("config/tsconfig.json");
        fs::write(&file, r#"{"compilerOptions":{"paths":{"~/*":["../src/*"]}}}"#).unwrap();

        let mapping = PathMapping::load(&file).unwrap();
        assert_eq!(mapping.resolve("~/ui"), Some(dir.path().join("src/ui")));
    }

    #[test]
    fn test_extends_chain() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base.json"),
            r##"{"compilerOptions":{"baseUrl":"./lib","paths":{"#/*":["x/*"]}}}"##,
        )
        .unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(&file, r#"{"extends":"./base","compilerOptions":{}}"#).unwrap();

        let mapping = PathMapping::load(&file).unwrap();
        assert_eq!(mapping.base_dir, dir.path().join("lib"));
        assert_eq!(mapping.resolve("#/a"), Some(dir.path().join("lib/x/a")));
    }

    #[test]
    fn test_extends_child_overrides_paths() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("base.json"),
            r##"{"compilerOptions":{"paths":{"#/*":["x/*"]}}}"##,
        )
        .unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(
            &file,
            r#"{"extends":"./base.json","compilerOptions":{"paths":{"@/*":["src/*"]}}}"#,
        )
        .unwrap();

        let mapping = PathMapping::load(&file).unwrap();
        assert_eq!(mapping.aliases.len(), 1);
        assert_eq!(mapping.resolve("#/a"), None);
        assert_eq!(mapping.resolve("@/a"), Some(dir.path().join("src/a")));
    }

    #[test]
    fn test_extends_missing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(&file, r#"{"extends":"./nope.json"}"#).unwrap();
        assert!(matches!(
            PathMapping::load(&file),
            Err(PathMappingError::ExtendsNotFound { .. })
        ));
    }

    #[test]
    fn test_extends_cycle() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(&file, r#"{"extends":"./tsconfig.json"}"#).unwrap();
        assert!(matches!(
            PathMapping::load(&file),
            Err(PathMappingError::ExtendsTooDeep(_))
        ));
    }

    #[test]
    fn test_discover() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src/pages");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("jsconfig.json"), r#"{"compilerOptions":{}}"#).unwrap();

        let mapping = PathMapping::discover(&nested).unwrap().unwrap();
        assert_eq!(mapping.file, dir.path().join("jsconfig.json"));
        assert!(mapping.aliases.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("tsconfig.json");
        fs::write(&file, "{ nope").unwrap();
        assert!(matches!(
            PathMapping::load(&file),
            Err(PathMappingError::Json(..))
        ));
    }
}

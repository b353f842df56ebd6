//! Alias resolution for alias-rooted glob patterns.
//!
//! Two independent sources, consulted in order:
//!
//! 1. the build-tool alias table (`[[alias]]` in config)
//! 2. the path-mapping file (`compilerOptions.paths` of tsconfig/jsconfig)
//!
//! The first tier that matches wins. Relative results of the alias table are
//! resolved against the project root.

mod path_mapping;
mod table;

pub use path_mapping::{MAPPING_FILES, PathAlias, PathMapping, PathMappingError};
pub use table::{AliasEntry, AliasFind, AliasTable};

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::ResolverConfig;
use crate::utils::path::clean_path;
use crate::{debug, log};

/// Which source produced a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasTier {
    Table,
    PathMapping,
}

impl fmt::Display for AliasTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("alias table"),
            Self::PathMapping => f.write_str("path mapping"),
        }
    }
}

/// Maps an aliased directory prefix to an absolute directory.
#[derive(Debug, Clone, Default)]
pub struct AliasResolver {
    root: PathBuf,
    table: AliasTable,
    mapping: Option<PathMapping>,
}

impl AliasResolver {
    pub fn new(root: impl Into<PathBuf>, table: AliasTable, mapping: Option<PathMapping>) -> Self {
        Self {
            root: root.into(),
            table,
            mapping,
        }
    }

    /// Build both tiers from configuration.
    ///
    /// A broken or missing path-mapping file only disables the second tier.
    pub fn from_config(config: &ResolverConfig) -> Result<Self, regex::Error> {
        let table = AliasTable::from_config(&config.aliases)?;
        let mapping = Self::load_mapping(config);
        Ok(Self::new(config.get_root(), table, mapping))
    }

    fn load_mapping(config: &ResolverConfig) -> Option<PathMapping> {
        if !config.path_mapping.enabled {
            return None;
        }

        let loaded = match &config.path_mapping.file {
            Some(file) => PathMapping::load(&config.root_join(file)).map(Some),
            None => PathMapping::discover(config.get_root()),
        };

        match loaded {
            Ok(Some(mapping)) => {
                debug!("alias"; "path mapping from {} ({} entries)", mapping.file.display(), mapping.aliases.len());
                Some(mapping)
            }
            Ok(None) => None,
            Err(err) => {
                log!("warn"; "path mapping disabled: {}", err);
                None
            }
        }
    }

    /// The loaded path-mapping file, if any.
    pub fn mapping(&self) -> Option<&PathMapping> {
        self.mapping.as_ref()
    }

    /// Resolve `prefix` (e.g. `@/components`) to an absolute directory.
    pub fn resolve(&self, prefix: &str) -> Option<PathBuf> {
        self.resolve_with_tier(prefix).map(|(path, _)| path)
    }

    /// Like [`resolve`](Self::resolve), also reporting which tier matched.
    pub fn resolve_with_tier(&self, prefix: &str) -> Option<(PathBuf, AliasTier)> {
        if let Some(replaced) = self.table.apply(prefix) {
            return Some((self.absolutize(&replaced), AliasTier::Table));
        }

        self.mapping
            .as_ref()
            .and_then(|mapping| mapping.resolve(prefix))
            .map(|path| (path, AliasTier::PathMapping))
    }

    fn absolutize(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            clean_path(path)
        } else {
            clean_path(&self.root.join(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_table_tier() {
        let resolver = AliasResolver::new(
            "/project",
            AliasTable::new(vec![AliasEntry::literal("@", "/project/src")]),
            None,
        );
        assert_eq!(
            resolver.resolve_with_tier("@/components"),
            Some((PathBuf::from("/project/src/components"), AliasTier::Table))
        );
        assert_eq!(resolver.resolve("~/components"), None);
    }

    #[test]
    fn test_relative_replacement_uses_root() {
        let resolver = AliasResolver::new(
            "/project",
            AliasTable::new(vec![AliasEntry::literal("~", "./src/../lib")]),
            None,
        );
        assert_eq!(
            resolver.resolve("~/ui"),
            Some(PathBuf::from("/project/lib/ui"))
        );
    }

    #[test]
    fn test_table_wins_over_mapping() {
        let mapping = PathMapping {
            file: PathBuf::from("/project/tsconfig.json"),
            base_dir: PathBuf::from("/project"),
            aliases: vec![
                PathAlias {
                    key: "@".into(),
                    target: "mapped".into(),
                },
                PathAlias {
                    key: "#".into(),
                    target: "lib".into(),
                },
            ],
        };
        let resolver = AliasResolver::new(
            "/project",
            AliasTable::new(vec![AliasEntry::literal("@", "/project/src")]),
            Some(mapping),
        );

        assert_eq!(
            resolver.resolve_with_tier("@/a"),
            Some((PathBuf::from("/project/src/a"), AliasTier::Table))
        );
        assert_eq!(
            resolver.resolve_with_tier("#/b"),
            Some((PathBuf::from("/project/lib/b"), AliasTier::PathMapping))
        );
        assert_eq!(resolver.resolve("$/c"), None);
    }

    #[test]
    fn test_from_config_discovers_mapping() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{"compilerOptions":{"baseUrl":".","paths":{"@/*":["src/*"]}}}"#,
        )
        .unwrap();

        let config = ResolverConfig::for_root(dir.path());
        let resolver = AliasResolver::from_config(&config).unwrap();
        assert!(resolver.mapping().is_some());
        assert_eq!(
            resolver.resolve("@/components"),
            Some(config.get_root().join("src/components"))
        );
    }

    #[test]
    fn test_from_config_mapping_disabled() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("tsconfig.json"),
            r#"{"compilerOptions":{"paths":{"@/*":["src/*"]}}}"#,
        )
        .unwrap();

        let mut config = ResolverConfig::for_root(dir.path());
        config.path_mapping.enabled = false;
        let resolver = AliasResolver::from_config(&config).unwrap();
        assert!(resolver.mapping().is_none());
        assert_eq!(resolver.resolve("@/components"), None);
    }

    #[test]
    fn test_broken_mapping_only_disables_tier() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("tsconfig.json"), "{ broken").unwrap();

        let mut config = ResolverConfig::for_root(dir.path());
        config.aliases.push(crate::config::AliasConfig {
            find: "@".into(),
            replacement: "./src".into(),
            regex: false,
        });
        let resolver = AliasResolver::from_config(&config).unwrap();
        assert!(resolver.mapping().is_none());
        assert_eq!(
            resolver.resolve("@/x"),
            Some(config.get_root().join("src/x"))
        );
    }
}

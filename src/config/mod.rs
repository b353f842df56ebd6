//! Resolver configuration management for `dyncomp.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── resolver   # [resolver]
//! │   ├── alias      # [[alias]]
//! │   └── path_mapping # [path_mapping]
//! ├── error          # ConfigError, ConfigDiagnostics
//! ├── util           # Config file discovery
//! └── mod.rs         # ResolverConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section          | Purpose                                          |
//! |------------------|--------------------------------------------------|
//! | `[resolver]`     | Prefix, default directive, naming, source root   |
//! | `[[alias]]`      | Build-tool alias table (first tier)              |
//! | `[path_mapping]` | tsconfig `paths` fallback (second tier)          |

mod error;
pub mod section;
mod util;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use section::{AliasConfig, PathMappingConfig, ResolverSection};
pub use util::{find_config_file, find_upward};

use crate::log;
use crate::utils::path::{clean_path, normalize_path};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "dyncomp.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing dyncomp.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Absolute path to the config file, empty when built in code
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file
    #[serde(skip)]
    pub root: PathBuf,

    /// Resolver settings
    #[serde(default)]
    pub resolver: ResolverSection,

    /// Build-tool alias table, in lookup order
    #[serde(default, rename = "alias")]
    pub aliases: Vec<AliasConfig>,

    /// Path-mapping file settings
    #[serde(default)]
    pub path_mapping: PathMappingConfig,
}

impl ResolverConfig {
    /// Default configuration for a project rooted at `root`.
    pub fn for_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
            ..Self::default()
        }
    }

    /// Load and validate configuration from a file.
    ///
    /// The project root is the config file's parent directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config_path = normalize_path(path);
        let content = fs::read_to_string(&config_path)
            .map_err(|err| ConfigError::Io(config_path.clone(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, &config_path);
        }

        config.root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.config_path = config_path;
        config.validate()?;

        Ok(config)
    }

    /// Load the nearest config file above the current directory, or fall
    /// back to defaults rooted at the current directory.
    pub fn discover(name: &Path) -> Result<Self, ConfigError> {
        match find_config_file(name) {
            Some(path) => Self::load(&path),
            None => {
                let cwd = std::env::current_dir()
                    .map_err(|err| ConfigError::Io(PathBuf::from("."), err))?;
                Ok(Self::for_root(cwd))
            }
        }
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} are ignored: {}", display_path, fields.join(", "));
    }

    /// Validate all sections, reporting every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        self.resolver.validate(&mut diag);
        for (index, alias) in self.aliases.iter().enumerate() {
            alias.validate(index, &mut diag);
        }

        diag.into_result().map_err(ConfigError::Diagnostics)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        clean_path(&self.root.join(path))
    }

    /// Absolute project source root.
    pub fn src_dir(&self) -> PathBuf {
        self.root_join(&self.resolver.src_dir)
    }

    /// Absolute directory virtual modules are placed in.
    pub fn virtual_dir(&self) -> PathBuf {
        self.src_dir().join(&self.resolver.virtual_dir)
    }
}

/// Parse a test config, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ResolverConfig {
    let (parsed, ignored) = ResolverConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

//! `[path_mapping]` section: the tsconfig-style fallback alias source.
//!
//! # Example
//!
//! ```toml
//! [path_mapping]
//! enabled = true
//! file = "tsconfig.app.json"   # Optional, discovered from the project root otherwise
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathMappingConfig {
    /// Consult `compilerOptions.paths` when the alias table has no match.
    pub enabled: bool,

    /// Explicit mapping file, relative to the project root.
    pub file: Option<PathBuf>,
}

impl Default for PathMappingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            file: None,
        }
    }
}

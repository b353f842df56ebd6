//! `[[alias]]` entries: the build-tool alias table.
//!
//! Entries are consulted in order, the first match wins.
//!
//! # Example
//!
//! ```toml
//! [[alias]]
//! find = "@"
//! replacement = "./src"
//!
//! [[alias]]
//! find = "^~ui/(.*)$"
//! replacement = "./src/ui/$1"
//! regex = true
//! ```

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;

/// One alias table entry as written in config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Literal prefix, or a regular expression when `regex` is set.
    pub find: String,

    /// Substitute for the matched part. Relative values resolve against the
    /// project root.
    pub replacement: String,

    #[serde(default)]
    pub regex: bool,
}

impl AliasConfig {
    pub fn validate(&self, index: usize, diag: &mut ConfigDiagnostics) {
        let field = format!("alias[{index}].find");
        if self.find.is_empty() {
            diag.error(field, "must not be empty");
        } else if self.regex
            && let Err(err) = regex::Regex::new(&self.find)
        {
            diag.error(field, format!("invalid regex: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_alias_entries_in_order() {
        let config = test_parse_config(
            r#"
[[alias]]
find = "@"
replacement = "./src"

[[alias]]
find = "^~(.*)$"
replacement = "./lib$1"
regex = true
"#,
        );
        assert_eq!(config.aliases.len(), 2);
        assert_eq!(config.aliases[0].find, "@");
        assert!(!config.aliases[0].regex);
        assert!(config.aliases[1].regex);
    }

    #[test]
    fn test_alias_validation() {
        let mut diag = ConfigDiagnostics::new();
        AliasConfig {
            find: "(".into(),
            replacement: "x".into(),
            regex: true,
        }
        .validate(0, &mut diag);
        AliasConfig {
            find: String::new(),
            replacement: "x".into(),
            regex: false,
        }
        .validate(1, &mut diag);
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.errors()[0].field, "alias[0].find");
    }
}

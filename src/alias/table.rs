//! Build-tool alias table.

use regex::Regex;

use crate::config::AliasConfig;

/// How an entry recognizes an aliased path.
#[derive(Debug, Clone)]
pub enum AliasFind {
    /// Literal prefix.
    Literal(String),
    /// Regular expression; its first match is replaced.
    Pattern(Regex),
}

/// One `(find, replacement)` pair.
#[derive(Debug, Clone)]
pub struct AliasEntry {
    pub find: AliasFind,
    pub replacement: String,
}

impl AliasEntry {
    pub fn literal(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            find: AliasFind::Literal(find.into()),
            replacement: replacement.into(),
        }
    }

    pub fn pattern(find: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            find: AliasFind::Pattern(Regex::new(find)?),
            replacement: replacement.into(),
        })
    }

    /// Build from a config entry.
    pub fn from_config(config: &AliasConfig) -> Result<Self, regex::Error> {
        if config.regex {
            Self::pattern(&config.find, config.replacement.clone())
        } else {
            Ok(Self::literal(config.find.clone(), config.replacement.clone()))
        }
    }

    /// Substitute the matched part of `path`, or `None` when it doesn't match.
    ///
    /// ```ignore
    /// AliasEntry::literal("@", "/project/src").apply("@/components") -> Some("/project/src/components")
    /// ```
    pub fn apply(&self, path: &str) -> Option<String> {
        match &self.find {
            AliasFind::Literal(find) => {
                // Whole segments only: `@` matches `@/ui` but not `@scope/ui`
                let rest = path.strip_prefix(find.as_str())?;
                (rest.is_empty() || rest.starts_with('/') || find.ends_with('/'))
                    .then(|| format!("{}{rest}", self.replacement))
            }
            AliasFind::Pattern(re) => re
                .is_match(path)
                .then(|| re.replacen(path, 1, self.replacement.as_str()).into_owned()),
        }
    }
}

/// Ordered alias table; the first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

impl AliasTable {
    pub fn new(entries: Vec<AliasEntry>) -> Self {
        Self { entries }
    }

    pub fn from_config(configs: &[AliasConfig]) -> Result<Self, regex::Error> {
        configs
            .iter()
            .map(AliasEntry::from_config)
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Apply the first matching entry.
    pub fn apply(&self, path: &str) -> Option<String> {
        self.entries.iter().find_map(|entry| entry.apply(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_prefix() {
        let entry = AliasEntry::literal("@", "/project/src");
        assert_eq!(
            entry.apply("@/components").as_deref(),
            Some("/project/src/components")
        );
        assert_eq!(entry.apply("~/components"), None);
        assert_eq!(entry.apply("@scope/components"), None);
        assert_eq!(entry.apply("@").as_deref(), Some("/project/src"));
    }

    #[test]
    fn test_pattern_replaces_first_match() {
        let entry = AliasEntry::pattern("^~ui/(.*)$", "./src/ui/$1").unwrap();
        assert_eq!(entry.apply("~ui/forms").as_deref(), Some("./src/ui/forms"));
        assert_eq!(entry.apply("@/forms"), None);
    }

    #[test]
    fn test_first_entry_wins() {
        let table = AliasTable::new(vec![
            AliasEntry::literal("@/components", "/a"),
            AliasEntry::literal("@", "/b"),
        ]);
        assert_eq!(table.apply("@/components/x").as_deref(), Some("/a/x"));
        assert_eq!(table.apply("@/layouts").as_deref(), Some("/b/layouts"));
        assert_eq!(table.apply("lib/x"), None);
    }

    #[test]
    fn test_from_config() {
        let configs = vec![
            AliasConfig {
                find: "@".into(),
                replacement: "./src".into(),
                regex: false,
            },
            AliasConfig {
                find: "^#(.+)$".into(),
                replacement: "./lib/$1".into(),
                regex: true,
            },
        ];
        let table = AliasTable::from_config(&configs).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.apply("#ui").as_deref(), Some("./lib/ui"));
    }
}

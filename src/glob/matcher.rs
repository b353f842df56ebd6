//! File matching for glob patterns.

use std::path::{Path, PathBuf};

use ::glob::{MatchOptions, Pattern, PatternError};
use jwalk::WalkDir;
use thiserror::Error;

use super::expand_braces;
use crate::utils::path::to_slash;

/// `*` and `?` never cross `/`; dotfiles need an explicit leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("invalid glob `{pattern}`")]
    Pattern {
        pattern: String,
        #[source]
        source: PatternError,
    },
}

/// Expands a glob below a literal base directory into the files it matches.
///
/// `base` is taken verbatim (glob characters in it are not special) and
/// `pattern` is relative to it. Implementations return absolute file paths
/// (no directories), sorted, with anything matching one of `exclude` removed.
pub trait FileMatcher: Send + Sync {
    fn match_files(
        &self,
        base: &Path,
        pattern: &str,
        exclude: &[String],
    ) -> Result<Vec<PathBuf>, MatchError>;
}

/// Directory walker backed matcher.
///
/// Walks the base with `jwalk` and tests each file's base-relative path
/// against the (brace-expanded) pattern. Exclude patterns are tested against
/// the same relative path.
#[derive(Debug, Default, Clone, Copy)]
pub struct WalkMatcher;

impl FileMatcher for WalkMatcher {
    fn match_files(
        &self,
        base: &Path,
        pattern: &str,
        exclude: &[String],
    ) -> Result<Vec<PathBuf>, MatchError> {
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let includes = compile(expand_braces(pattern))?;
        let excludes = compile(exclude.iter().flat_map(|p| expand_braces(p)))?;
        let max_depth = walk_depth(&includes);

        let mut files: Vec<PathBuf> = WalkDir::new(base)
            .skip_hidden(true)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path())
            .filter(|path| {
                let Ok(rel) = path.strip_prefix(base) else {
                    return false;
                };
                let rel = to_slash(rel);
                includes.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS))
                    && !excludes.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS))
            })
            .collect();

        files.sort();
        files.dedup();
        Ok(files)
    }
}

fn compile(patterns: impl IntoIterator<Item = String>) -> Result<Vec<Pattern>, MatchError> {
    patterns
        .into_iter()
        .map(|pattern| {
            Pattern::new(&pattern).map_err(|source| MatchError::Pattern { pattern, source })
        })
        .collect()
}

/// Deepest level any include pattern can reach, unbounded with `**`.
fn walk_depth(includes: &[Pattern]) -> usize {
    includes
        .iter()
        .map(|p| {
            let p = p.as_str();
            if p.contains("**") {
                usize::MAX
            } else {
                p.matches('/').count() + 1
            }
        })
        .max()
        .unwrap_or(1)
}

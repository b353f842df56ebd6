//! Glob pattern helpers.
//!
//! - [`glob_base`]: longest literal directory prefix of a pattern
//! - [`glob_suffix`]: the part of the pattern below that base
//! - [`expand_braces`]: `{a,b}` alternatives, expanded before matching
//! - [`FileMatcher`]: the "match files for pattern" capability

mod matcher;

pub use matcher::{FileMatcher, MatchError, WalkMatcher};

/// Characters that start a glob construct.
pub const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Longest non-glob directory prefix of `pattern`.
///
/// Everything before the first glob metacharacter is literal; of that, the
/// part up to (excluding) the last `/` is returned. Without any separator
/// the base is the current directory, `.`.
///
/// # Example
/// ```ignore
/// glob_base("./a/b/*.vue")          -> "./a/b"
/// glob_base("@/components/**/*.vue") -> "@/components"
/// glob_base("*.vue")                 -> "."
/// glob_base("/*.vue")                -> "/"
/// ```
pub fn glob_base(pattern: &str) -> &str {
    let literal_end = pattern.find(GLOB_META).unwrap_or(pattern.len());
    match pattern[..literal_end].rfind('/') {
        Some(0) => "/",
        Some(idx) => &pattern[..idx],
        None => ".",
    }
}

/// The part of `pattern` below [`glob_base`], without the joining `/`.
pub fn glob_suffix(pattern: &str) -> &str {
    let literal_end = pattern.find(GLOB_META).unwrap_or(pattern.len());
    match pattern[..literal_end].rfind('/') {
        Some(idx) => &pattern[idx + 1..],
        None => pattern,
    }
}

/// Expand `{a,b}` alternatives into separate patterns.
///
/// Groups may nest (`{a,b{c,d}}`). An unbalanced `{` is left as is and ends
/// up matching literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_string()];
    };

    let head = &pattern[..open];
    let tail = &pattern[close + 1..];

    split_alternatives(&pattern[open + 1..close])
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{head}{alt}{tail}")))
        .collect()
}

/// Byte offsets of the first balanced `{ ... }` group.
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let open = pattern.find('{')?;
    let mut depth = 0usize;

    for (idx, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((open, open + idx));
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a brace body on commas that are not inside a nested group.
fn split_alternatives(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}

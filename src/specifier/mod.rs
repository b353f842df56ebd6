//! Import specifier grammar.
//!
//! ```text
//! <prefix><directive>:<pattern>     dynamic:load:./buttons/*.vue
//! <prefix>:<pattern>                dynamic::./static/*.astro   (static-only)
//! <prefix><pattern>                 dynamic:@/components/*.vue  (default directive)
//! ```
//!
//! The directive segment ends at the first `:` that is immediately followed
//! by something a pattern can start with: `./`, `../`, `/`, a letter or `@`.
//! Colons anywhere else (e.g. inside `media=(max-width: 40em)`) belong to the
//! directive.

mod directive;

pub use directive::{DIRECTIVE_NAMESPACE, Directive};

use thiserror::Error;

/// Specifier grammar errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("specifier `{0}` does not start with the expected prefix")]
    MissingPrefix(String),

    #[error("specifier has no glob pattern")]
    EmptyPattern,

    #[error("invalid directive name `{0}`")]
    InvalidDirectiveName(String),

    #[error("directive `{key}=` has no value")]
    EmptyDirectiveValue { key: String },

    #[error("directive `{key}` value must not contain `\"`")]
    QuoteInDirectiveValue { key: String },
}

/// A parsed specifier: what to match and how to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDirective {
    /// Glob pattern, possibly alias-rooted.
    pub pattern: String,
    /// Hydration directive, `None` for static-only rendering.
    pub directive: Option<Directive>,
}

impl ImportDirective {
    /// Formatted directive attribute, if any.
    pub fn attribute(&self) -> Option<String> {
        self.directive.as_ref().map(Directive::attribute)
    }

    /// Whether the pattern is relative to the importer (or absolute).
    ///
    /// Everything else is treated as alias-rooted.
    pub fn is_relative(&self) -> bool {
        is_relative_pattern(&self.pattern)
    }
}

/// Parse a full specifier (prefix included).
///
/// `default` is applied when the specifier carries no directive segment at
/// all; an explicitly empty segment always yields static-only rendering.
pub fn parse(
    specifier: &str,
    prefix: &str,
    default: Option<&Directive>,
) -> Result<ImportDirective, ParseError> {
    let rest = specifier
        .strip_prefix(prefix)
        .ok_or_else(|| ParseError::MissingPrefix(specifier.to_string()))?;

    let (directive, pattern) = match find_boundary(rest) {
        Some(idx) => (Directive::parse(&rest[..idx])?, &rest[idx + 1..]),
        None => (default.cloned(), rest),
    };

    if pattern.is_empty() {
        return Err(ParseError::EmptyPattern);
    }

    Ok(ImportDirective {
        pattern: pattern.to_string(),
        directive,
    })
}

/// Index of the colon separating directive from pattern.
fn find_boundary(rest: &str) -> Option<usize> {
    rest.match_indices(':')
        .map(|(idx, _)| idx)
        .find(|&idx| starts_pattern(&rest[idx + 1..]))
}

/// Whether `s` begins like a pattern (path marker, letter or scope `@`).
fn starts_pattern(s: &str) -> bool {
    s.starts_with("./")
        || s.starts_with("../")
        || s.starts_with('/')
        || s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '@')
}

/// Relative (`./`, `../`) or absolute (`/`) patterns resolve from the importer.
pub fn is_relative_pattern(pattern: &str) -> bool {
    pattern.starts_with("./") || pattern.starts_with("../") || pattern.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "dynamic:";

    fn load() -> Directive {
        Directive::Keyword("load".into())
    }

    #[test]
    fn test_explicit_keyword() {
        let parsed = parse("dynamic:load:./buttons/*.vue", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "./buttons/*.vue");
        assert_eq!(parsed.attribute().as_deref(), Some("client:load"));
        assert!(parsed.is_relative());
    }

    #[test]
    fn test_empty_directive_is_static_only() {
        let parsed = parse("dynamic::./x/*.astro", PREFIX, Some(&load())).unwrap();
        assert_eq!(parsed.pattern, "./x/*.astro");
        assert_eq!(parsed.directive, None);
    }

    #[test]
    fn test_missing_directive_uses_default() {
        let parsed = parse("dynamic:./x/*.vue", PREFIX, Some(&load())).unwrap();
        assert_eq!(parsed.pattern, "./x/*.vue");
        assert_eq!(parsed.directive, Some(load()));

        let idle = Directive::Keyword("idle".into());
        let parsed = parse("dynamic:@/components/*.vue", PREFIX, Some(&idle)).unwrap();
        assert_eq!(parsed.pattern, "@/components/*.vue");
        assert_eq!(parsed.directive, Some(idle));
        assert!(!parsed.is_relative());
    }

    #[test]
    fn test_boundary_classes() {
        let parsed = parse("dynamic:idle:../shared/*.jsx", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "../shared/*.jsx");

        let parsed = parse("dynamic:visible:/abs/*.vue", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "/abs/*.vue");

        let parsed = parse("dynamic:load:@/ui/*.tsx", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "@/ui/*.tsx");

        let parsed = parse("dynamic:load:components/*.tsx", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "components/*.tsx");
    }

    #[test]
    fn test_tilde_is_not_a_boundary() {
        let parsed = parse("dynamic:load:~/ui/*.vue", PREFIX, Some(&load())).unwrap();
        assert_eq!(parsed.pattern, "load:~/ui/*.vue");
        assert_eq!(parsed.directive, Some(load()));

        let parsed = parse("dynamic:~/ui/*.vue", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "~/ui/*.vue");
        assert_eq!(parsed.directive, None);
    }

    #[test]
    fn test_colon_inside_value() {
        let parsed = parse("dynamic:media=(max-width: 40em):./x/*.vue", PREFIX, None).unwrap();
        assert_eq!(parsed.pattern, "./x/*.vue");
        assert_eq!(
            parsed.attribute().as_deref(),
            Some(r#"client:media="(max-width: 40em)""#)
        );
    }

    #[test]
    fn test_key_value_without_value_rejected() {
        let err = parse("dynamic:only=:./x/*.vue", PREFIX, None).unwrap_err();
        assert_eq!(err, ParseError::EmptyDirectiveValue { key: "only".into() });
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("other:./x/*.vue", PREFIX, None),
            Err(ParseError::MissingPrefix(_))
        ));
        assert_eq!(parse("dynamic:", PREFIX, None), Err(ParseError::EmptyPattern));
    }
}

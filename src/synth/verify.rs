//! Syntax check of synthesized modules.
//!
//! The frontmatter is parsed as TypeScript and the template body as TSX
//! (wrapped in a fragment). Parsing only: no scoping or type checking, so
//! host globals such as `Astro` are fine.

use oxc::allocator::Allocator;
use oxc::parser::Parser;
use oxc::span::SourceType;
use thiserror::Error;

/// Frontmatter fence of the host template format.
pub const FENCE: &str = "---";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("generated module has no frontmatter fence")]
    MissingFrontmatter,

    #[error("generated frontmatter does not parse: {0}")]
    Frontmatter(String),

    #[error("generated template does not parse: {0}")]
    Template(String),
}

/// Split a module into `(frontmatter, body)`.
pub fn split_module(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix(FENCE)?.strip_prefix('\n')?;
    let close = format!("\n{FENCE}\n");
    let end = rest.find(&close)?;
    Some((&rest[..end], &rest[end + close.len()..]))
}

/// Parse both halves of a synthesized module.
pub fn verify(source: &str) -> Result<(), SynthError> {
    let (frontmatter, body) = split_module(source).ok_or(SynthError::MissingFrontmatter)?;

    parse_errors(frontmatter, SourceType::ts()).map_err(SynthError::Frontmatter)?;

    let template = format!("<>\n{body}</>;\n");
    parse_errors(&template, SourceType::tsx()).map_err(SynthError::Template)
}

fn parse_errors(source: &str, source_type: SourceType) -> Result<(), String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();

    if ret.panicked || !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(ToString::to_string).collect();
        return Err(if messages.is_empty() {
            "parser gave up".to_string()
        } else {
            messages.join("; ")
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_module() {
        let (front, body) = split_module("---\nconst a = 1;\n---\n<p />\n").unwrap();
        assert_eq!(front, "const a = 1;");
        assert_eq!(body, "<p />\n");
        assert!(split_module("const a = 1;").is_none());
    }

    #[test]
    fn test_verify_ok() {
        let source = "---\nimport A from \"./A.vue\";\nconst { component, ...props } = Astro.props;\n---\n{component === \"A\" && <A {...props} client:load />}\n";
        assert_eq!(verify(source), Ok(()));
    }

    #[test]
    fn test_verify_bad_frontmatter() {
        let source = "---\nimport from;\n---\n";
        assert!(matches!(verify(source), Err(SynthError::Frontmatter(_))));
    }

    #[test]
    fn test_verify_bad_template() {
        let source = "---\nconst a = 1;\n---\n{a && <A client:load>}\n";
        assert!(matches!(verify(source), Err(SynthError::Template(_))));
    }

    #[test]
    fn test_verify_missing_fence() {
        assert_eq!(verify("<A />"), Err(SynthError::MissingFrontmatter));
    }
}

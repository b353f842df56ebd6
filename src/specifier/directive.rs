//! Client directive segment of a specifier.

use std::fmt;

use super::ParseError;

/// Attribute namespace of hydration directives in the host template language.
pub const DIRECTIVE_NAMESPACE: &str = "client";

/// A hydration directive attached to every dynamic (non-native) component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Bare keyword, rendered as `client:load`.
    Keyword(String),
    /// Key/value pair, rendered as `client:media="(max-width: 40em)"`.
    KeyValue { key: String, value: String },
}

impl Directive {
    /// Parse a directive segment.
    ///
    /// Returns `Ok(None)` for an empty segment, which means static-only
    /// rendering: no directive attribute is emitted.
    pub fn parse(segment: &str) -> Result<Option<Self>, ParseError> {
        if segment.is_empty() {
            return Ok(None);
        }

        let Some((key, value)) = segment.split_once('=') else {
            validate_name(segment)?;
            return Ok(Some(Self::Keyword(segment.to_string())));
        };

        validate_name(key)?;
        if value.is_empty() {
            return Err(ParseError::EmptyDirectiveValue {
                key: key.to_string(),
            });
        }
        if value.contains('"') {
            return Err(ParseError::QuoteInDirectiveValue {
                key: key.to_string(),
            });
        }

        Ok(Some(Self::KeyValue {
            key: key.to_string(),
            value: value.to_string(),
        }))
    }

    /// The directive name (`load`, `media`, ...).
    pub fn name(&self) -> &str {
        match self {
            Self::Keyword(name) => name,
            Self::KeyValue { key, .. } => key,
        }
    }

    /// Formatted attribute, ready to be placed on a component tag.
    pub fn attribute(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(name) => write!(f, "{DIRECTIVE_NAMESPACE}:{name}"),
            Self::KeyValue { key, value } => write!(f, "{DIRECTIVE_NAMESPACE}:{key}=\"{value}\""),
        }
    }
}

/// Directive keywords and keys must be valid attribute name parts.
fn validate_name(name: &str) -> Result<(), ParseError> {
    let mut chars = name.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ParseError::InvalidDirectiveName(name.to_string()))
    }
}

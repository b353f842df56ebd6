//! `[resolver]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! prefix = "dynamic:"                 # Recognized specifier prefix
//! default_client_directive = "load"   # Used when a specifier names none ("" = static-only)
//! selector_prop = "component"         # Prop that selects the rendered component
//! src_dir = "src"                     # Source root, relative to project root
//! virtual_dir = ".dynamic"            # Virtual module directory inside src_dir
//! exclude = ["**/node_modules/**"]    # Never matched
//! digest_width = 8                    # Hex chars in generated names
//! hash_directive = true               # Directive is part of the module identity
//! verify_output = true                # Parse generated modules before caching
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigDiagnostics;
use crate::specifier::Directive;
use crate::utils::hash::{BINDING_PREFIX, DEFAULT_DIGEST_WIDTH, MAX_DIGEST_WIDTH};

/// Narrowest digest accepted in config.
const MIN_DIGEST_WIDTH: usize = 4;

/// Names the generated frontmatter already binds.
const GENERATED_NAMES: &[&str] = &["props", "Props", "Astro", "ComponentName"];

/// JavaScript reserved words (strict mode), plus `await` for module code.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval",
];

/// Resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSection {
    /// Literal prefix that marks a dynamic component import.
    pub prefix: String,

    /// Directive applied when a specifier has no directive segment.
    pub default_client_directive: String,

    /// Name of the prop carrying the display name at runtime.
    pub selector_prop: String,

    /// Project source root.
    pub src_dir: PathBuf,

    /// Directory (inside `src_dir`) that virtual modules pretend to live in.
    pub virtual_dir: String,

    /// Glob patterns excluded from matching.
    pub exclude: Vec<String>,

    /// Hex characters of digests in module identities and binding names.
    pub digest_width: usize,

    /// Fold the directive into the module identity.
    /// - `true` (default): same glob with different directives gives two modules
    /// - `false`: identity depends on the file list only
    pub hash_directive: bool,

    /// Parse generated modules with oxc before caching them.
    pub verify_output: bool,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self {
            prefix: "dynamic:".into(),
            default_client_directive: "load".into(),
            selector_prop: "component".into(),
            src_dir: PathBuf::from("src"),
            virtual_dir: ".dynamic".into(),
            exclude: vec!["**/node_modules/**".into()],
            digest_width: DEFAULT_DIGEST_WIDTH,
            hash_directive: true,
            verify_output: true,
        }
    }
}

impl ResolverSection {
    /// The default directive, parsed.
    ///
    /// An empty string means static-only rendering by default.
    pub fn default_directive(&self) -> Option<Directive> {
        Directive::parse(&self.default_client_directive).ok().flatten()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.prefix.is_empty() {
            diag.error("resolver.prefix", "must not be empty");
        }

        if let Err(err) = Directive::parse(&self.default_client_directive) {
            diag.error_with_hint(
                "resolver.default_client_directive",
                err.to_string(),
                "use a keyword such as `load`, a `key=value` pair, or \"\" for static-only",
            );
        }

        let selector = self.selector_prop.as_str();
        if !is_identifier(selector) {
            diag.error(
                "resolver.selector_prop",
                format!("`{selector}` is not a valid identifier"),
            );
        } else if RESERVED_WORDS.contains(&selector) {
            diag.error(
                "resolver.selector_prop",
                format!("`{selector}` is a reserved word"),
            );
        } else if GENERATED_NAMES.contains(&selector) || selector.starts_with(BINDING_PREFIX) {
            diag.error_with_hint(
                "resolver.selector_prop",
                format!("`{selector}` clashes with a name in the generated module"),
                format!("pick another name; {} and `{BINDING_PREFIX}*` are taken", GENERATED_NAMES.join(", ")),
            );
        }

        if self.virtual_dir.is_empty()
            || self.virtual_dir.contains(['/', '\\'])
            || self.virtual_dir == ".."
            || self.virtual_dir == "."
        {
            diag.error_with_hint(
                "resolver.virtual_dir",
                format!("`{}` must be a single directory name", self.virtual_dir),
                "e.g. \".dynamic\"",
            );
        }

        if !(MIN_DIGEST_WIDTH..=MAX_DIGEST_WIDTH).contains(&self.digest_width) {
            diag.error(
                "resolver.digest_width",
                format!("must be between {MIN_DIGEST_WIDTH} and {MAX_DIGEST_WIDTH}"),
            );
        }
    }
}

/// ASCII JavaScript identifier.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

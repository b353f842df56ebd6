//! Virtual module synthesis.
//!
//! Turns a component list into the source of a native template module:
//!
//! ```text
//! ---
//! import DC_1a2b3c4d from "../components/buttons/Primary.vue";
//! export type ComponentName = "Primary";
//! export interface Props { component: ComponentName; [prop: string]: unknown; }
//! const { component, ...props } = Astro.props as Props;
//! ---
//! {component === "Primary" && <DC_1a2b3c4d {...props} client:load />}
//! ```
//!
//! Synthesis is a pure function of its inputs; nothing here touches the
//! filesystem.

mod verify;

pub use verify::{FENCE, SynthError, split_module, verify};

use std::path::{Path, PathBuf};

use crate::component::ComponentDescriptor;
use crate::specifier::Directive;
use crate::utils::path::{relative_to, to_import_specifier, to_slash};

/// How generated import statements point at matched files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOrigin {
    /// Alias pattern: keep the alias so downstream tooling resolves it again.
    Alias {
        /// Directory part of the specifier pattern, e.g. `@/components`.
        pattern_base: String,
        /// What that directory resolved to.
        alias_base: PathBuf,
    },
    /// Relative pattern: import relative to the virtual module's directory.
    Relative { module_dir: PathBuf },
}

impl ImportOrigin {
    /// Import specifier for `file`.
    pub fn import_path(&self, file: &Path) -> String {
        match self {
            Self::Alias {
                pattern_base,
                alias_base,
            } => {
                let rel = file
                    .strip_prefix(alias_base)
                    .map(to_slash)
                    .unwrap_or_else(|_| to_slash(file));
                if pattern_base == "." {
                    rel
                } else {
                    format!("{}/{rel}", pattern_base.trim_end_matches('/'))
                }
            }
            Self::Relative { module_dir } => relative_to(file, module_dir)
                .map(|rel| to_import_specifier(&rel))
                .unwrap_or_else(|| to_slash(file)),
        }
    }
}

/// Everything a module is synthesized from.
#[derive(Debug, Clone, Copy)]
pub struct ModuleSpec<'a> {
    /// Glob pattern as written (for the header comment).
    pub pattern: &'a str,
    /// Directive for framework components, `None` renders everything statically.
    pub directive: Option<&'a Directive>,
    pub components: &'a [ComponentDescriptor],
    pub origin: &'a ImportOrigin,
    /// Name of the selector prop.
    pub selector: &'a str,
}

/// Render the module source.
pub fn synthesize(spec: &ModuleSpec<'_>) -> String {
    let attribute = spec.directive.map(Directive::attribute);
    let selector = spec.selector;

    let mut out = String::new();
    out.push_str(&format!(
        "{FENCE}\n// Generated for `{}`. Do not edit.\n",
        single_line(spec.pattern)
    ));

    for component in spec.components {
        out.push_str(&format!(
            "import {} from {};\n",
            component.binding,
            string_literal(&spec.origin.import_path(&component.absolute_path))
        ));
    }

    out.push_str(&format!(
        r#"
export type ComponentName = {names};

export interface Props {{
  {selector}: ComponentName;
  [prop: string]: unknown;
}}

const {{ {selector}, ...props }} = Astro.props as Props;
{FENCE}
"#,
        names = name_union(spec.components),
    ));

    for component in spec.components {
        let directive = match &attribute {
            Some(attr) if !component.is_static_only() => format!(" {attr}"),
            _ => String::new(),
        };
        out.push_str(&format!(
            "{{{selector} === {} && <{} {{...props}}{directive} />}}\n",
            string_literal(&component.display_name),
            component.binding,
        ));
    }

    out
}

/// Closed union of display names, `never` when empty.
fn name_union(components: &[ComponentDescriptor]) -> String {
    if components.is_empty() {
        return "never".to_string();
    }
    components
        .iter()
        .map(|c| string_literal(&c.display_name))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// JSON string literals are valid JS/TS string literals.
fn string_literal(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ")
}

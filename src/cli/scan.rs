//! Scan command implementation.
//!
//! Finds prefixed imports in source files with a regex (no full parse) and
//! resolves them in parallel through one shared resolver, the way a build
//! would.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use dyncomp::resolver::Resolver;
use dyncomp::utils::path::to_slash;
use dyncomp::utils::plural_count;
use dyncomp::{debug, log};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use super::common::collect_source_files;
use crate::cli::args::ScanArgs;

/// A prefixed import found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRef {
    /// 1-based line of the specifier.
    pub line: usize,
    pub specifier: String,
}

/// Outcome of resolving one import.
#[derive(Debug, Serialize)]
pub struct ScanEntry {
    pub file: String,
    pub line: usize,
    pub specifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Matches static `from "..."`, bare `import "..."` and dynamic
/// `import("...")` specifiers that start with `prefix`.
pub fn import_pattern(prefix: &str) -> Result<Regex, regex::Error> {
    let prefix = regex::escape(prefix);
    Regex::new(&format!(
        r#"\b(?:from|import)\s*\(?\s*(?:"({prefix}[^"\r\n]*)"|'({prefix}[^'\r\n]*)')"#
    ))
}

/// All prefixed imports in `source`, in order of appearance.
pub fn extract_imports(source: &str, pattern: &Regex) -> Vec<ImportRef> {
    pattern
        .captures_iter(source)
        .filter_map(|caps| {
            let m = caps.get(1).or_else(|| caps.get(2))?;
            Some(ImportRef {
                line: source[..m.start()].matches('\n').count() + 1,
                specifier: m.as_str().to_string(),
            })
        })
        .collect()
}

/// Execute scan command
pub fn run_scan(args: &ScanArgs, resolver: &Resolver) -> Result<()> {
    let config = resolver.config();
    let files = collect_source_files(&args.paths, &config.src_dir())?;
    let pattern = import_pattern(&config.resolver.prefix)?;

    log!("scan"; "scanning {}", plural_count(files.len(), "file"));

    let entries = scan_files(&files, &pattern, resolver, config.get_root());
    let failed = entries.iter().filter(|e| e.error.is_some()).count();

    for entry in entries.iter().filter(|e| e.error.is_some()) {
        let level = if args.warn_only { "warn" } else { "error" };
        log!(level; "{}:{}: {}", entry.file, entry.line, entry.error.as_deref().unwrap_or_default());
    }

    let stats = resolver.stats();
    log!(
        "scan";
        "{} resolved into {} ({} failed)",
        plural_count(entries.len(), "import"),
        plural_count(stats.modules, "module"),
        failed
    );

    if args.print {
        print_modules(&entries, resolver);
    }
    if args.json {
        let json = if args.pretty {
            serde_json::to_string_pretty(&entries)?
        } else {
            serde_json::to_string(&entries)?
        };
        println!("{json}");
    }

    if failed > 0 && !args.warn_only {
        anyhow::bail!("{} failed to resolve", plural_count(failed, "import"));
    }
    Ok(())
}

/// Resolve every import of every file, sorted by file then line.
fn scan_files(files: &[PathBuf], pattern: &Regex, resolver: &Resolver, root: &Path) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = files
        .par_iter()
        .flat_map_iter(|file| scan_file(file, pattern, resolver, root))
        .collect();
    entries.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    entries
}

fn scan_file(file: &Path, pattern: &Regex, resolver: &Resolver, root: &Path) -> Vec<ScanEntry> {
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(e) => {
            log!("warn"; "failed to read {}: {}", file.display(), e);
            return Vec::new();
        }
    };

    let imports = extract_imports(&source, pattern);
    if !imports.is_empty() {
        debug!("scan"; "{}: {}", file.display(), plural_count(imports.len(), "import"));
    }

    let display = to_slash(file.strip_prefix(root).unwrap_or(file));
    imports
        .into_iter()
        .map(|import| {
            let mut entry = ScanEntry {
                file: display.clone(),
                line: import.line,
                specifier: import.specifier,
                id: None,
                components: Vec::new(),
                error: None,
            };
            match resolver.resolve(&entry.specifier, Some(file)) {
                Ok(Some(resolution)) => {
                    entry.components = resolution
                        .module
                        .components
                        .iter()
                        .map(|c| c.display_name.clone())
                        .collect();
                    entry.id = Some(resolution.id);
                }
                // The regex only yields prefixed specifiers
                Ok(None) => {}
                Err(err) => entry.error = Some(format!("{:#}", anyhow::Error::new(err))),
            }
            entry
        })
        .collect()
}

/// Print each distinct module once, in report order.
fn print_modules(entries: &[ScanEntry], resolver: &Resolver) {
    let mut printed = rustc_hash::FxHashSet::default();
    for id in entries.iter().filter_map(|e| e.id.as_deref()) {
        if !printed.insert(id) {
            continue;
        }
        if let Some(module) = resolver.module(id) {
            println!("// {id}");
            print!("{}", module.source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dyncomp::config::ResolverConfig;
    use tempfile::TempDir;

    #[test]
    fn test_extract_imports() {
        let pattern = import_pattern("dynamic:").unwrap();
        let source = r#"---
import Dyn from "dynamic:load:./buttons/*.vue";
import Other from './Other.astro';
import Cards from 'dynamic::@/cards/*.astro';
const Lazy = await import("dynamic:idle:../lazy/*.jsx");
---
<p>dynamic:not-an-import</p>
"#;
        let imports = extract_imports(source, &pattern);
        assert_eq!(
            imports,
            vec![
                ImportRef {
                    line: 2,
                    specifier: "dynamic:load:./buttons/*.vue".into()
                },
                ImportRef {
                    line: 4,
                    specifier: "dynamic::@/cards/*.astro".into()
                },
                ImportRef {
                    line: 5,
                    specifier: "dynamic:idle:../lazy/*.jsx".into()
                },
            ]
        );
    }

    #[test]
    fn test_prefix_is_escaped() {
        let pattern = import_pattern("dc.").unwrap();
        let imports = extract_imports(r#"import A from "dcx./a/*.vue";"#, &pattern);
        assert!(imports.is_empty());
    }

    #[test]
    fn test_scan_files_reports_failures() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("components")).unwrap();
        fs::create_dir_all(src.join("pages")).unwrap();
        fs::write(src.join("components/A.vue"), "").unwrap();
        fs::write(src.join("components/B.vue"), "").unwrap();
        fs::write(
            src.join("pages/index.astro"),
            "---\nimport D from \"dynamic:load:../components/*.vue\";\nimport E from \"dynamic:load:../missing/*.vue\";\n---\n",
        )
        .unwrap();

        let config = ResolverConfig::for_root(dir.path());
        let root = config.get_root().to_path_buf();
        let resolver = Resolver::new(config).unwrap();
        let files = vec![root.join("src/pages/index.astro")];
        let pattern = import_pattern("dynamic:").unwrap();

        let entries = scan_files(&files, &pattern, &resolver, &root);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].file, "src/pages/index.astro");
        assert_eq!(entries[0].components, vec!["A", "B"]);
        assert!(entries[0].id.is_some());
        assert!(entries[1].id.is_none());
        assert!(entries[1].error.as_deref().unwrap().contains("no files match"));
    }
}

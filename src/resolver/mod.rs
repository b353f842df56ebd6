//! Module resolution for prefixed glob imports.
//!
//! # Flow
//!
//! ```text
//! specifier ──► parse ──► base (importer dir | alias) ──► match files
//!                                                            │
//!      identity ◄── cache (key = digest of match set) ◄── describe
//!                         │
//!                         └─ miss: synthesize + verify
//! ```
//!
//! The host calls [`Resolver::resolve_id`] for every import it sees and
//! [`Resolver::load`] for every module it wants the source of. Both decline
//! (`None`) for anything that isn't theirs. Failures inside the resolver are
//! logged and also decline, so one bad import never aborts a build.

mod cache;

pub use cache::{CacheOutcome, ModuleCache, VirtualModule};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::alias::AliasResolver;
use crate::component::{NATIVE_EXTENSION, describe_all};
use crate::config::{ConfigError, ResolverConfig};
use crate::glob::{FileMatcher, MatchError, WalkMatcher, glob_base, glob_suffix};
use crate::specifier::{Directive, ImportDirective, ParseError};
use crate::synth::{ImportOrigin, ModuleSpec, SynthError, synthesize, verify};
use crate::utils::hash::file_set_digest;
use crate::utils::path::{clean_path, relative_to, to_slash};
use crate::{debug, log};

/// File name prefix of every synthesized module.
pub const VIRTUAL_PREFIX: &str = "_virtual_dc_";

// ============================================================================
// errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("`{specifier}` needs an importing module to resolve against")]
    MissingImporter { specifier: String },

    #[error("invalid specifier `{specifier}`")]
    InvalidSpecifier {
        specifier: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot resolve alias `{alias}` in `{specifier}`")]
    UnresolvableAlias { specifier: String, alias: String },

    #[error("no files match `{pattern}` (from `{specifier}`)")]
    NoMatchFound { specifier: String, pattern: String },

    #[error("cannot match files for `{specifier}`")]
    Match {
        specifier: String,
        #[source]
        source: MatchError,
    },

    #[error("synthesized module for `{specifier}` is invalid")]
    Synthesis {
        specifier: String,
        #[source]
        source: SynthError,
    },
}

impl ResolveError {
    /// The specifier that failed.
    pub fn specifier(&self) -> &str {
        match self {
            Self::MissingImporter { specifier }
            | Self::InvalidSpecifier { specifier, .. }
            | Self::UnresolvableAlias { specifier, .. }
            | Self::NoMatchFound { specifier, .. }
            | Self::Match { specifier, .. }
            | Self::Synthesis { specifier, .. } => specifier,
        }
    }
}

/// `error: cause: cause` on one line.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

// ============================================================================
// resolver
// ============================================================================

/// A successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub id: String,
    pub module: Arc<VirtualModule>,
    pub outcome: CacheOutcome,
}

/// Counters for the current build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolverStats {
    /// Distinct virtual modules in the cache.
    pub modules: usize,
    /// Times a module was synthesized (cache misses that succeeded).
    pub synthesized: usize,
}

/// Where matched files are looked up and how they are imported.
struct PatternBase {
    /// Literal directory the glob is matched under; display names are
    /// relative to it.
    dir: PathBuf,
    /// Glob below `dir`.
    suffix: String,
    origin: ImportOrigin,
}

impl PatternBase {
    /// Absolute pattern, for messages.
    fn display(&self) -> String {
        format!("{}/{}", to_slash(&self.dir).trim_end_matches('/'), self.suffix)
    }
}

/// Resolves prefixed specifiers to virtual modules and serves their source.
///
/// Safe to share across threads; concurrent resolutions of the same match set
/// synthesize once.
pub struct Resolver {
    config: ResolverConfig,
    default_directive: Option<Directive>,
    aliases: AliasResolver,
    matcher: Box<dyn FileMatcher>,
    cache: ModuleCache,
    src_dir: PathBuf,
    virtual_dir: PathBuf,
}

impl Resolver {
    /// Build a resolver from validated configuration, matching on disk.
    pub fn new(config: ResolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let aliases = AliasResolver::from_config(&config)
            .map_err(|err| ConfigError::Validation(format!("alias pattern: {err}")))?;
        Ok(Self::with_parts(config, aliases, Box::new(WalkMatcher)))
    }

    /// Assemble a resolver from already-built parts.
    pub fn with_parts(
        config: ResolverConfig,
        aliases: AliasResolver,
        matcher: Box<dyn FileMatcher>,
    ) -> Self {
        let default_directive = config.resolver.default_directive();
        let src_dir = config.src_dir();
        let virtual_dir = config.virtual_dir();
        Self {
            config,
            default_directive,
            aliases,
            matcher,
            cache: ModuleCache::new(),
            src_dir,
            virtual_dir,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Whether `specifier` carries the import prefix.
    #[inline]
    pub fn handles(&self, specifier: &str) -> bool {
        specifier.starts_with(&self.config.resolver.prefix)
    }

    /// Whether `id` names a module this resolver synthesizes.
    ///
    /// Checks the shape of the identity only, not whether it has been
    /// synthesized yet.
    pub fn is_virtual(&self, id: &str) -> bool {
        let path = Path::new(strip_query(id));
        path.parent() == Some(self.virtual_dir.as_path())
            && path.extension() == Some(OsStr::new(NATIVE_EXTENSION))
            && path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.strip_prefix(VIRTUAL_PREFIX))
                .is_some_and(|key| !key.is_empty() && key.chars().all(|c| c.is_ascii_hexdigit()))
    }

    /// Host-facing resolution hook.
    ///
    /// Returns the module identity, or `None` when the specifier isn't ours
    /// or resolution failed (the failure is logged).
    pub fn resolve_id(&self, specifier: &str, importer: Option<&str>) -> Option<String> {
        let importer = importer.map(|raw| PathBuf::from(strip_query(raw)));
        match self.resolve(specifier, importer.as_deref()) {
            Ok(resolution) => resolution.map(|r| r.id),
            Err(err) => {
                log!("warn"; "{}", error_chain(&err));
                None
            }
        }
    }

    /// Host-facing load hook: the source of a previously resolved module.
    pub fn load(&self, id: &str) -> Option<Arc<str>> {
        if !self.is_virtual(id) {
            return None;
        }
        match self.cache.get(strip_query(id)) {
            Some(module) => Some(Arc::clone(&module.source)),
            None => {
                log!("warn"; "unknown virtual module `{}`", id);
                None
            }
        }
    }

    /// Cached module by identity.
    pub fn module(&self, id: &str) -> Option<Arc<VirtualModule>> {
        self.cache.get(strip_query(id))
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            modules: self.cache.len(),
            synthesized: self.cache.synthesized(),
        }
    }

    /// Resolve a specifier.
    ///
    /// `Ok(None)` means the specifier lacks the prefix and belongs to someone
    /// else.
    pub fn resolve(
        &self,
        specifier: &str,
        importer: Option<&Path>,
    ) -> Result<Option<Resolution>, ResolveError> {
        if !self.handles(specifier) {
            return Ok(None);
        }

        let parsed = crate::specifier::parse(
            specifier,
            &self.config.resolver.prefix,
            self.default_directive.as_ref(),
        )
        .map_err(|source| ResolveError::InvalidSpecifier {
            specifier: specifier.to_string(),
            source,
        })?;

        let base = self.pattern_base(specifier, &parsed, importer)?;

        let files = self
            .matcher
            .match_files(&base.dir, &base.suffix, &self.config.resolver.exclude)
            .map_err(|source| ResolveError::Match {
                specifier: specifier.to_string(),
                source,
            })?;
        if files.is_empty() {
            return Err(ResolveError::NoMatchFound {
                specifier: specifier.to_string(),
                pattern: base.display(),
            });
        }

        let key = self.cache_key(&files, &base.dir, parsed.directive.as_ref());
        let id = self.identity(&key);

        let (module, outcome) = self.cache.get_or_try_insert(&key, || {
            self.build_module(&parsed, &base, &files, &key, &id)
                .map_err(|source| ResolveError::Synthesis {
                    specifier: specifier.to_string(),
                    source,
                })
        })?;

        match outcome {
            CacheOutcome::Hit => debug!("resolve"; "{} -> {} (cached)", specifier, id),
            CacheOutcome::Synthesized => {
                debug!("resolve"; "{} -> {} ({} components)", specifier, id, module.components.len())
            }
        }

        Ok(Some(Resolution {
            id,
            module,
            outcome,
        }))
    }

    /// Absolute pattern and import style for a parsed specifier.
    fn pattern_base(
        &self,
        specifier: &str,
        parsed: &ImportDirective,
        importer: Option<&Path>,
    ) -> Result<PatternBase, ResolveError> {
        if parsed.is_relative() {
            let importer = importer.ok_or_else(|| ResolveError::MissingImporter {
                specifier: specifier.to_string(),
            })?;
            let importer = if importer.is_absolute() {
                importer.to_path_buf()
            } else {
                self.config.root_join(importer)
            };
            let importer_dir = importer.parent().unwrap_or(Path::new("/"));

            // Only the glob base goes through the path join; the importer's
            // directory may itself contain glob characters (`[lang]`).
            let dir = clean_path(&importer_dir.join(glob_base(&parsed.pattern)));
            return Ok(PatternBase {
                dir,
                suffix: glob_suffix(&parsed.pattern).to_string(),
                origin: ImportOrigin::Relative {
                    module_dir: self.virtual_dir.clone(),
                },
            });
        }

        let pattern_base = glob_base(&parsed.pattern);
        let alias_base = self.aliases.resolve(pattern_base).ok_or_else(|| {
            ResolveError::UnresolvableAlias {
                specifier: specifier.to_string(),
                alias: pattern_base.to_string(),
            }
        })?;

        Ok(PatternBase {
            dir: alias_base.clone(),
            suffix: glob_suffix(&parsed.pattern).to_string(),
            origin: ImportOrigin::Alias {
                pattern_base: pattern_base.to_string(),
                alias_base,
            },
        })
    }

    /// Digest of the match set.
    ///
    /// Paths are taken relative to the source root. The glob base is always
    /// folded in since display names depend on it; the directive only when
    /// `hash_directive` is set.
    fn cache_key(&self, files: &[PathBuf], base_dir: &Path, directive: Option<&Directive>) -> String {
        let paths: Vec<String> = files.iter().map(|f| self.src_relative(f)).collect();

        let directive = if self.config.resolver.hash_directive {
            directive.map(Directive::attribute).unwrap_or_default()
        } else {
            String::new()
        };
        let salt = format!("{}|{directive}", self.src_relative(base_dir));

        file_set_digest(&paths, Some(salt.as_str()), self.config.resolver.digest_width)
    }

    fn src_relative(&self, path: &Path) -> String {
        relative_to(path, &self.src_dir)
            .map(|rel| to_slash(&rel))
            .unwrap_or_else(|| to_slash(path))
    }

    fn identity(&self, key: &str) -> String {
        to_slash(
            &self
                .virtual_dir
                .join(format!("{VIRTUAL_PREFIX}{key}.{NATIVE_EXTENSION}")),
        )
    }

    fn build_module(
        &self,
        parsed: &ImportDirective,
        base: &PatternBase,
        files: &[PathBuf],
        key: &str,
        id: &str,
    ) -> Result<VirtualModule, SynthError> {
        let components = describe_all(files, &base.dir, self.config.resolver.digest_width);
        let source = synthesize(&ModuleSpec {
            pattern: &parsed.pattern,
            directive: parsed.directive.as_ref(),
            components: &components,
            origin: &base.origin,
            selector: &self.config.resolver.selector_prop,
        });

        if self.config.resolver.verify_output {
            verify(&source)?;
        }

        Ok(VirtualModule {
            id: id.to_string(),
            key: key.to_string(),
            pattern: parsed.pattern.clone(),
            directive: parsed.directive.clone(),
            source: Arc::from(source),
            components,
        })
    }
}

/// Drop a `?query` suffix hosts append to module ids.
fn strip_query(id: &str) -> &str {
    id.split_once('?').map_or(id, |(path, _)| path)
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("prefix", &self.config.resolver.prefix)
            .field("src_dir", &self.src_dir)
            .field("virtual_dir", &self.virtual_dir)
            .field("modules", &self.cache.len())
            .finish_non_exhaustive()
    }
}

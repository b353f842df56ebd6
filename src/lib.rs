//! dyncomp - glob imports that become one component with a runtime switch.
//!
//! An import such as
//!
//! ```text
//! import Button from "dynamic:load:./buttons/*.vue";
//! ```
//!
//! resolves to a synthesized `.astro` module that imports every matching
//! file and renders the one named by its `component` prop. The host build
//! tool drives two hooks on [`Resolver`]: `resolve_id` and `load`.
//!
//! # Module Structure
//!
//! ```text
//! specifier  # prefix / directive / pattern grammar
//! glob       # glob base, brace expansion, file matching
//! alias      # alias table + tsconfig path mapping
//! component  # per-file descriptors (binding, display name, kind)
//! synth      # module source generation and syntax check
//! resolver   # orchestration and the module cache
//! config     # dyncomp.toml
//! ```

pub mod alias;
pub mod component;
pub mod config;
pub mod glob;
pub mod logger;
pub mod resolver;
pub mod specifier;
pub mod synth;
pub mod utils;

pub use config::ResolverConfig;
pub use resolver::{ResolveError, Resolver, VirtualModule};

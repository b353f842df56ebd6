//! Configuration section definitions.

mod alias;
mod path_mapping;
mod resolver;

pub use alias::AliasConfig;
pub use path_mapping::PathMappingConfig;
pub use resolver::ResolverSection;

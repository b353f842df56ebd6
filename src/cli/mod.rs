//! Command-line interface module.

mod args;
pub mod common;
pub mod resolve;
pub mod scan;

pub use args::{Cli, Commands, ResolveArgs, ScanArgs};

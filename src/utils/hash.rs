//! Short content digests for generated names.
//!
//! Uses blake3 truncated to a fixed number of hex characters:
//! - Deterministic across processes and platforms
//! - Wide enough (8 hex chars by default) for typical project file counts
//!
//! # Usage
//!
//! ```ignore
//! use crate::utils::hash;
//!
//! let d = hash::digest("buttons/Primary.vue", 8);   // -> "1f0c9a3e"
//! let name = hash::binding_name("buttons/Primary.vue", 8); // -> "DC_1f0c9a3e"
//! ```

/// Default digest width in hex characters.
pub const DEFAULT_DIGEST_WIDTH: usize = 8;

/// Widest digest available (full blake3 output).
pub const MAX_DIGEST_WIDTH: usize = 64;

/// Prefix of per-component import bindings.
///
/// Upper-case so the binding is rendered as a component, not an HTML tag.
pub const BINDING_PREFIX: &str = "DC_";

/// Compute a hex digest of `data`, truncated to `width` characters.
#[inline]
pub fn digest<T: AsRef<[u8]> + ?Sized>(data: &T, width: usize) -> String {
    let width = width.clamp(1, MAX_DIGEST_WIDTH);
    let mut hex = hex::encode(blake3::hash(data.as_ref()).as_bytes());
    hex.truncate(width);
    hex
}

/// Binding identifier for one component, derived from its glob-relative path.
#[inline]
pub fn binding_name(relative_path: &str, width: usize) -> String {
    format!("{BINDING_PREFIX}{}", digest(relative_path, width))
}

/// Digest of a file set, independent of listing order.
///
/// Paths are sorted then comma-joined. When `salt` is given it is prepended
/// (`salt|a,b,c`), which lets callers fold extra identity such as the
/// rendering directive into the key.
pub fn file_set_digest<S: AsRef<str>>(paths: &[S], salt: Option<&str>, width: usize) -> String {
    let mut sorted: Vec<&str> = paths.iter().map(AsRef::as_ref).collect();
    sorted.sort_unstable();
    let joined = sorted.join(",");

    match salt {
        Some(salt) => digest(&format!("{salt}|{joined}"), width),
        None => digest(&joined, width),
    }
}

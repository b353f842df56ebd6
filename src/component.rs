//! Component descriptors: one per matched file.

use std::path::{Path, PathBuf};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::utils::hash::binding_name;
use crate::utils::path::{relative_to, to_slash};

/// Extension of the host's native template format.
pub const NATIVE_EXTENSION: &str = "astro";

/// Kind of component file, determines whether a directive may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Native template (.astro) - always rendered statically
    Native,
    /// Framework component (.vue, .jsx, .svelte, ...) - hydrated per directive
    Framework,
}

impl ComponentKind {
    /// Detect component kind from file extension.
    pub fn from_extension(ext: &str) -> Self {
        if ext.eq_ignore_ascii_case(NATIVE_EXTENSION) {
            Self::Native
        } else {
            Self::Framework
        }
    }

    /// Detect component kind from file path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map_or(Self::Framework, Self::from_extension)
    }

    /// Native files never carry a hydration directive.
    #[inline]
    pub const fn is_static_only(self) -> bool {
        matches!(self, Self::Native)
    }
}

/// One matched file as seen by the synthesized module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentDescriptor {
    /// Identifier the file is imported as.
    pub binding: String,
    /// Runtime selector value (glob-relative path, no extension, `/` separated).
    pub display_name: String,
    /// Glob-relative path with extension, `/` separated.
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub kind: ComponentKind,
}

impl ComponentDescriptor {
    /// Describe `absolute_path`, matched by a glob whose base is `glob_base`.
    pub fn new(absolute_path: &Path, glob_base: &Path, digest_width: usize) -> Self {
        let rel = absolute_path
            .strip_prefix(glob_base)
            .map(Path::to_path_buf)
            .ok()
            .or_else(|| relative_to(absolute_path, glob_base))
            .unwrap_or_else(|| absolute_path.to_path_buf());

        let relative_path = to_slash(&rel);
        Self {
            binding: binding_name(&relative_path, digest_width),
            display_name: to_slash(&rel.with_extension("")),
            relative_path,
            absolute_path: absolute_path.to_path_buf(),
            kind: ComponentKind::from_path(absolute_path),
        }
    }

    #[inline]
    pub const fn is_static_only(&self) -> bool {
        self.kind.is_static_only()
    }
}

/// Describe every file of a match set, keeping its order.
///
/// Files differing only by extension (`Card.astro`, `Card.vue`) would share
/// a display name; those keep their extension so every display name selects
/// exactly one component. Falling back can clash again (`Card.vue` next to
/// `Card.vue.jsx`), so this repeats until names are unique; relative paths
/// always are.
pub fn describe_all(
    files: &[PathBuf],
    glob_base: &Path,
    digest_width: usize,
) -> Vec<ComponentDescriptor> {
    let mut descs: Vec<_> = files
        .iter()
        .map(|file| ComponentDescriptor::new(file, glob_base, digest_width))
        .collect();

    loop {
        let clashing = clashing_names(&descs);
        let mut changed = false;
        for desc in &mut descs {
            if clashing.contains(&desc.display_name) && desc.display_name != desc.relative_path {
                desc.display_name = desc.relative_path.clone();
                changed = true;
            }
        }
        if !changed {
            return descs;
        }
    }
}

/// Display names held by more than one descriptor.
fn clashing_names(descs: &[ComponentDescriptor]) -> FxHashSet<String> {
    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
    for desc in descs {
        *seen.entry(desc.display_name.as_str()).or_default() += 1;
    }
    seen.into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(name, _)| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_path() {
        assert_eq!(ComponentKind::from_path(Path::new("/a/Card.astro")), ComponentKind::Native);
        assert_eq!(ComponentKind::from_path(Path::new("/a/Card.ASTRO")), ComponentKind::Native);
        assert_eq!(ComponentKind::from_path(Path::new("/a/Card.vue")), ComponentKind::Framework);
        assert_eq!(ComponentKind::from_path(Path::new("/a/Card")), ComponentKind::Framework);
        assert!(ComponentKind::Native.is_static_only());
        assert!(!ComponentKind::Framework.is_static_only());
    }

    #[test]
    fn test_descriptor_names() {
        let desc = ComponentDescriptor::new(
            Path::new("/p/src/components/buttons/PrimaryButton.vue"),
            Path::new("/p/src/components/buttons"),
            8,
        );
        assert_eq!(desc.display_name, "PrimaryButton");
        assert_eq!(desc.relative_path, "PrimaryButton.vue");
        assert!(desc.binding.starts_with("DC_"));
        assert_eq!(desc.binding.len(), 3 + 8);
        assert!(!desc.is_static_only());
    }

    #[test]
    fn test_nested_display_name() {
        let desc = ComponentDescriptor::new(
            Path::new("/p/icons/arrows/Left.icon.svelte"),
            Path::new("/p/icons"),
            8,
        );
        assert_eq!(desc.display_name, "arrows/Left.icon");
    }

    #[test]
    fn test_clashing_display_names_keep_extension() {
        let files = vec![
            PathBuf::from("/p/ui/Card.astro"),
            PathBuf::from("/p/ui/Card.vue"),
            PathBuf::from("/p/ui/nested/Card.vue"),
        ];
        let descs = describe_all(&files, Path::new("/p/ui"), 8);
        let bindings: FxHashSet<_> = descs.iter().map(|d| d.binding.as_str()).collect();
        assert_eq!(bindings.len(), 3);
        assert_eq!(descs[0].display_name, "Card.astro");
        assert_eq!(descs[1].display_name, "Card.vue");
        assert_eq!(descs[2].display_name, "nested/Card");
        assert!(descs[0].is_static_only());
    }

    #[test]
    fn test_fallback_names_clashing_again() {
        let files = vec![
            PathBuf::from("/p/ui/Card.jsx"),
            PathBuf::from("/p/ui/Card.vue"),
            PathBuf::from("/p/ui/Card.vue.jsx"),
        ];
        let descs = describe_all(&files, Path::new("/p/ui"), 8);
        let names: Vec<_> = descs.iter().map(|d| d.display_name.as_str()).collect();
        assert_eq!(names, vec!["Card.jsx", "Card.vue", "Card.vue.jsx"]);
    }

    #[test]
    fn test_binding_is_stable() {
        let a = ComponentDescriptor::new(Path::new("/x/a/B.vue"), Path::new("/x/a"), 8);
        let b = ComponentDescriptor::new(Path::new("/y/a/B.vue"), Path::new("/y/a"), 8);
        // Binding only depends on the glob-relative path
        assert_eq!(a.binding, b.binding);
    }
}

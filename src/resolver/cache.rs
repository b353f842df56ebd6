//! Virtual module cache.
//!
//! Modules are keyed twice: by cache key (digest of the match set) while
//! resolving, and by identity when the host loads them. Each cache key owns a
//! slot that is locked for the duration of synthesis, so concurrent
//! resolutions of the same key wait for the first one instead of
//! synthesizing again.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::component::ComponentDescriptor;
use crate::specifier::Directive;

/// One synthesized module.
#[derive(Debug, Clone)]
pub struct VirtualModule {
    /// Synthetic absolute path the host addresses the module by.
    pub id: String,
    /// Cache key (digest) embedded in the identity.
    pub key: String,
    /// Pattern of the specifier that first produced the module.
    pub pattern: String,
    pub directive: Option<Directive>,
    pub source: Arc<str>,
    pub components: Vec<ComponentDescriptor>,
}

/// Whether a lookup reused an existing module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Synthesized,
}

type Slot = Arc<Mutex<Option<Arc<VirtualModule>>>>;

/// Build-lifetime module cache. No eviction, no persistence.
#[derive(Debug, Default)]
pub struct ModuleCache {
    slots: DashMap<String, Slot>,
    modules: DashMap<String, Arc<VirtualModule>>,
    synthesized: AtomicUsize,
}

impl ModuleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the module cached under `key`, or build and cache it.
    ///
    /// `build` runs at most once per key unless it fails; a failure leaves
    /// the key empty so a later resolution may try again.
    pub fn get_or_try_insert<E>(
        &self,
        key: &str,
        build: impl FnOnce() -> Result<VirtualModule, E>,
    ) -> Result<(Arc<VirtualModule>, CacheOutcome), E> {
        // Clone the slot out so the map shard isn't held while building
        let slot: Slot = Arc::clone(&self.slots.entry(key.to_string()).or_default());
        let mut guard = slot.lock();

        if let Some(module) = guard.as_ref() {
            return Ok((Arc::clone(module), CacheOutcome::Hit));
        }

        let module = Arc::new(build()?);
        self.synthesized.fetch_add(1, Ordering::Relaxed);
        self.modules.insert(module.id.clone(), Arc::clone(&module));
        *guard = Some(Arc::clone(&module));

        Ok((module, CacheOutcome::Synthesized))
    }

    /// Look a module up by identity.
    pub fn get(&self, id: &str) -> Option<Arc<VirtualModule>> {
        self.modules.get(id).map(|m| Arc::clone(&m))
    }

    /// Number of cached modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// How many times a module was synthesized.
    pub fn synthesized(&self) -> usize {
        self.synthesized.load(Ordering::Relaxed)
    }
}

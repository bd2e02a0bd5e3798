//! Ability cache.
//!
//! Holds the current [`AbilitySet`] behind a single `Arc`. Readers take a
//! snapshot (one `Arc` clone) and keep using it even if a reload swaps in a new
//! set mid-execution; reload replaces the whole set in one write.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::ability::{Ability, AbilitySet};

/// The live set of compiled abilities.
#[derive(Default)]
pub struct AbilityCache {
    current: RwLock<Arc<AbilitySet>>,
}

impl AbilityCache {
    pub fn new(set: AbilitySet) -> Self {
        Self {
            current: RwLock::new(Arc::new(set)),
        }
    }

    /// The current set. Never torn by a concurrent reload.
    pub fn snapshot(&self) -> Arc<AbilitySet> {
        Arc::clone(&self.current.read())
    }

    /// Replace the whole set, returning the previous one.
    pub fn reload(&self, set: AbilitySet) -> Arc<AbilitySet> {
        let count = set.len();
        let previous = std::mem::replace(&mut *self.current.write(), Arc::new(set));
        tracing::info!("Reloaded ability cache: {} abilities", count);
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<Ability>> {
        self.current.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.current.read().contains(name)
    }

    /// Ability names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.current.read().names()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }
}

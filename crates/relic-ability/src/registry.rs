//! Function registry.
//!
//! Holds every keyword and condition the compiler can resolve. The registry is
//! populated once at start-up through `&mut self` and then shared read-only as
//! `Arc<FunctionRegistry>`:
//!
//! ```text
//! FunctionRegistry::with_builtins()?   // or new() + register_*()
//!         │
//!         ▼
//! Arc<FunctionRegistry> ──▶ AbilityCompiler ──▶ ActiveKeyword { Arc<dyn Keyword> }
//! ```
//!
//! Names are case-insensitive and unique within their namespace. Keywords and
//! conditions use separate namespaces.

use std::collections::HashMap;
use std::sync::Arc;

use crate::builtin;
use crate::condition::Condition;
use crate::error::RegistryError;
use crate::keyword::Keyword;

/// Registry of keywords and conditions by lowercase name.
#[derive(Default)]
pub struct FunctionRegistry {
    keywords: HashMap<String, Arc<dyn Keyword>>,
    conditions: HashMap<String, Arc<dyn Condition>>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in keywords and conditions.
    pub fn with_builtins() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        builtin::register(&mut registry)?;
        tracing::debug!(
            "Built-in keywords: {:?}, conditions: {:?}",
            registry.identifiers(),
            registry.condition_identifiers()
        );
        Ok(registry)
    }

    /// Register a keyword.
    ///
    /// Returns an error if a keyword with the same name already exists.
    pub fn register_keyword(&mut self, keyword: Arc<dyn Keyword>) -> Result<(), RegistryError> {
        let id = keyword.identifier().to_ascii_lowercase();
        if self.keywords.contains_key(&id) {
            return Err(RegistryError::DuplicateKeyword(id));
        }
        tracing::info!("Registered keyword: {}", id);
        self.keywords.insert(id, keyword);
        Ok(())
    }

    /// Register a condition.
    ///
    /// Returns an error if a condition with the same name already exists.
    pub fn register_condition(
        &mut self,
        condition: Arc<dyn Condition>,
    ) -> Result<(), RegistryError> {
        let id = condition.identifier().to_ascii_lowercase();
        if self.conditions.contains_key(&id) {
            return Err(RegistryError::DuplicateCondition(id));
        }
        tracing::info!("Registered condition: {}", id);
        self.conditions.insert(id, condition);
        Ok(())
    }

    /// Look up a keyword by name (case-insensitive).
    pub fn keyword(&self, name: &str) -> Option<Arc<dyn Keyword>> {
        self.keywords.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Look up a condition by name (case-insensitive).
    pub fn condition(&self, name: &str) -> Option<Arc<dyn Condition>> {
        self.conditions.get(&name.to_ascii_lowercase()).cloned()
    }

    /// Check if a keyword with the given name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.keywords.contains_key(&name.to_ascii_lowercase())
    }

    pub fn contains_condition(&self, name: &str) -> bool {
        self.conditions.contains_key(&name.to_ascii_lowercase())
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    pub fn condition_count(&self) -> usize {
        self.conditions.len()
    }

    /// Registered keyword names, sorted.
    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.keywords.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Registered condition names, sorted.
    pub fn condition_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.conditions.keys().cloned().collect();
        ids.sort();
        ids
    }
}

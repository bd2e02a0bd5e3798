//! Keywords: named, schema-typed effects.
//!
//! A [`Keyword`] is registered once and shared behind an `Arc`. Compilation pairs
//! it with resolved [`Arguments`] to form an [`ActiveKeyword`], the unit the
//! engine executes.

use std::fmt;
use std::sync::Arc;

use crate::arguments::{ArgumentSchema, Arguments};
use crate::context::RuntimeContext;
use crate::targeter::Capabilities;

/// A named effect callable from ability definitions.
///
/// Implementations must not fail: when a target cannot be resolved in the
/// given context the effect is skipped.
pub trait Keyword: Send + Sync {
    /// Registered name, e.g. "damage". Matched case-insensitively.
    fn identifier(&self) -> &str;

    /// Positional argument schema.
    fn arguments(&self) -> &[ArgumentSchema];

    /// Whether the effect runs on the worker pool instead of the primary thread.
    fn is_async(&self) -> bool {
        false
    }

    /// Apply the effect.
    fn call(&self, arguments: &Arguments, context: &RuntimeContext);
}

/// A keyword bound to its compiled arguments.
#[derive(Clone)]
pub struct ActiveKeyword {
    keyword: Arc<dyn Keyword>,
    arguments: Arguments,
}

impl ActiveKeyword {
    pub fn new(keyword: Arc<dyn Keyword>, arguments: Arguments) -> Self {
        Self { keyword, arguments }
    }

    pub fn keyword(&self) -> &Arc<dyn Keyword> {
        &self.keyword
    }

    pub fn identifier(&self) -> &str {
        self.keyword.identifier()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn is_async(&self) -> bool {
        self.keyword.is_async()
    }

    /// Targeter modes this call refers to.
    pub fn targeters(&self) -> Capabilities {
        self.arguments.targeters()
    }

    pub fn call(&self, context: &RuntimeContext) {
        self.keyword.call(&self.arguments, context);
    }
}

impl PartialEq for ActiveKeyword {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier() && self.arguments == other.arguments
    }
}

impl fmt::Debug for ActiveKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveKeyword")
            .field("keyword", &self.identifier())
            .field("async", &self.is_async())
            .field("arguments", &self.arguments)
            .finish()
    }
}

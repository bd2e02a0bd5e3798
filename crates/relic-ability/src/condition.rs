//! Conditions: boolean gates evaluated before an ability runs.

use std::fmt;
use std::sync::Arc;

use crate::arguments::{ArgumentSchema, Arguments};
use crate::context::RuntimeContext;
use crate::targeter::Capabilities;

/// A named predicate callable from the `conditions` list of a definition.
///
/// Conditions share the keyword call grammar and argument schema but live in a
/// separate namespace. They are always evaluated on the invoking thread.
pub trait Condition: Send + Sync {
    fn identifier(&self) -> &str;

    fn arguments(&self) -> &[ArgumentSchema];

    /// Evaluate the predicate. An unresolvable target evaluates to `false`.
    fn test(&self, arguments: &Arguments, context: &RuntimeContext) -> bool;
}

/// A condition bound to its compiled arguments.
#[derive(Clone)]
pub struct ActiveCondition {
    condition: Arc<dyn Condition>,
    arguments: Arguments,
}

impl ActiveCondition {
    pub fn new(condition: Arc<dyn Condition>, arguments: Arguments) -> Self {
        Self {
            condition,
            arguments,
        }
    }

    pub fn identifier(&self) -> &str {
        self.condition.identifier()
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn targeters(&self) -> Capabilities {
        self.arguments.targeters()
    }

    pub fn test(&self, context: &RuntimeContext) -> bool {
        self.condition.test(&self.arguments, context)
    }
}

impl PartialEq for ActiveCondition {
    fn eq(&self, other: &Self) -> bool {
        self.identifier() == other.identifier() && self.arguments == other.arguments
    }
}

impl fmt::Debug for ActiveCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveCondition")
            .field("condition", &self.identifier())
            .field("arguments", &self.arguments)
            .finish()
    }
}

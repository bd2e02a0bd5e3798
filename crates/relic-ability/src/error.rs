//! Error and diagnostic types.
//!
//! Nothing here is fatal to the host. Compile diagnostics drop a single line,
//! compile errors drop a single ability, refusals skip a single execution.

use std::fmt;

use thiserror::Error;

use crate::targeter::Capabilities;
use crate::trigger::AbilityTrigger;

/// An ability could not be compiled at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("Unknown trigger '{trigger}' on ability '{ability}'")]
    UnknownTrigger { ability: String, trigger: String },

    #[error("Ability '{ability}' uses the timer trigger without a positive timer period")]
    MissingTimer { ability: String },
}

impl CompileError {
    pub fn ability(&self) -> &str {
        match self {
            CompileError::UnknownTrigger { ability, .. } | CompileError::MissingTimer { ability } => {
                ability
            }
        }
    }
}

/// A raw argument token failed to resolve against its schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    /// The token could not be converted to the expected type.
    #[error("argument {position}: '{raw}' is not a valid {expected}")]
    Invalid {
        position: usize,
        raw: String,
        expected: String,
    },

    /// The token converted, but the schema's validator rejected the value.
    #[error("argument {position}: {expected} '{raw}' is out of range")]
    Rejected {
        position: usize,
        raw: String,
        expected: String,
    },
}

impl ArgumentError {
    pub fn position(&self) -> usize {
        match self {
            ArgumentError::Invalid { position, .. } | ArgumentError::Rejected { position, .. } => {
                *position
            }
        }
    }
}

/// Which list of an ability definition a line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Keywords,
    Conditions,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Keywords => f.write_str("keyword"),
            Section::Conditions => f.write_str("condition"),
        }
    }
}

/// Reason a single line was dropped during compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("malformed call '{0}', expected name(arg, ...)")]
    MalformedCall(String),

    #[error("unknown keyword '{0}'")]
    UnknownKeyword(String),

    #[error("unknown condition '{0}'")]
    UnknownCondition(String),

    #[error("'{function}' expects {expected} argument(s) but got {found}")]
    ArgumentCount {
        function: String,
        expected: usize,
        found: usize,
    },

    #[error("'{function}' {error}")]
    InvalidArgument {
        function: String,
        error: ArgumentError,
    },
}

/// A located, line-local compile problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Ability being compiled.
    pub ability: String,

    /// Keyword or condition list.
    pub section: Section,

    /// 0-based index of the line within its section.
    pub line: usize,

    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ability '{}', {} line {}: {}",
            self.ability, self.section, self.line, self.kind
        )
    }
}

/// Errors raised while populating the function registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Keyword '{0}' already exists")]
    DuplicateKeyword(String),

    #[error("Condition '{0}' already exists")]
    DuplicateCondition(String),
}

/// Why the engine refused to run an ability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Refusal {
    #[error("Ability '{ability}' is bound to '{expected}' but was fired by '{actual}'")]
    TriggerMismatch {
        ability: String,
        expected: AbilityTrigger,
        actual: AbilityTrigger,
    },

    #[error("Context for ability '{ability}' lacks {missing:?} declared by trigger '{trigger}'")]
    MissingCapability {
        ability: String,
        trigger: AbilityTrigger,
        missing: Capabilities,
    },

    #[error("Ability '{ability}' targets {unsupported:?}, which trigger '{trigger}' cannot supply")]
    UnsupportedTargeter {
        ability: String,
        trigger: AbilityTrigger,
        unsupported: Capabilities,
    },

    #[error("Condition '{condition}' failed for ability '{ability}'")]
    ConditionFailed { ability: String, condition: String },

    #[error("Ability '{0}' not found")]
    AbilityNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            ability: "fireball".to_string(),
            section: Section::Keywords,
            line: 1,
            kind: DiagnosticKind::InvalidArgument {
                function: "heal".to_string(),
                error: ArgumentError::Invalid {
                    position: 1,
                    raw: "bogus".to_string(),
                    expected: "health".to_string(),
                },
            },
        };

        insta::assert_snapshot!(
            diagnostic.to_string(),
            @"ability 'fireball', keyword line 1: 'heal' argument 1: 'bogus' is not a valid health"
        );
    }

    #[test]
    fn test_argument_count_display() {
        let kind = DiagnosticKind::ArgumentCount {
            function: "damage".to_string(),
            expected: 2,
            found: 3,
        };
        insta::assert_snapshot!(kind.to_string(), @"'damage' expects 2 argument(s) but got 3");
    }
}

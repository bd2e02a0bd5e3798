//! Ability compiler and execution engine for Relic.
//!
//! This crate turns designer-authored ability text into typed effect sequences
//! and runs them against live game state:
//! - Argument schemas, targeters and triggers
//! - Keyword/condition traits and the function registry
//! - The ability compiler with line-level diagnostics
//! - The execution engine, strict-mode checks and the scheduler seam
//! - Ability cache, event listener and timer schedule
//! - Built-in keywords and conditions

pub mod ability;
pub mod arguments;
pub mod builtin;
pub mod cache;
pub mod compiler;
pub mod condition;
pub mod context;
pub mod engine;
pub mod error;
pub mod keyword;
pub mod listener;
pub mod registry;
pub mod targeter;
pub mod timer;
pub mod trigger;

// Re-export commonly used types
pub use ability::{Ability, AbilitySet};
pub use arguments::{
    ArgumentEnum, ArgumentSchema, Arguments, EnumValue, PrimitiveKind, Value,
};
pub use cache::AbilityCache;
pub use compiler::{AbilityCompiler, Compilation, CompileReport};
pub use condition::{ActiveCondition, Condition};
pub use context::{ContextKind, RuntimeContext};
pub use engine::{AbilityEngine, Execution, InlineScheduler, Scheduler, Task};
pub use error::{
    ArgumentError, CompileError, Diagnostic, DiagnosticKind, Refusal, RegistryError, Section,
};
pub use keyword::{ActiveKeyword, Keyword};
pub use listener::{AbilityListener, GameEvent};
pub use registry::FunctionRegistry;
pub use targeter::{Capabilities, Targeter};
pub use timer::TimerTable;
pub use trigger::AbilityTrigger;

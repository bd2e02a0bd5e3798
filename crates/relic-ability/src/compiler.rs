//! Ability compiler.
//!
//! Turns the raw text lines of an ability definition into an [`Ability`]:
//!
//! ```text
//! "damage(?entity, 5)"
//!     │  call grammar      name = "damage", tokens = ["?entity", "5"]
//!     ▼
//! registry lookup          Arc<dyn Keyword>
//!     │
//!     ▼
//! schema resolution        [Targeter(Entity), Double(5.0)]
//!     │
//!     ▼
//! ActiveKeyword
//! ```
//!
//! Every line compiles independently. A line that fails any stage is dropped
//! and reported as a [`Diagnostic`]; the rest of the ability still compiles.
//! Only an unknown trigger (or a timer ability without a period) rejects the
//! whole ability.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use relic_core::{AbilityDefinition, AbilityFile};

use crate::ability::{Ability, AbilitySet};
use crate::arguments::{ArgumentSchema, Arguments};
use crate::condition::ActiveCondition;
use crate::error::{CompileError, Diagnostic, DiagnosticKind, Section};
use crate::keyword::ActiveKeyword;
use crate::registry::FunctionRegistry;
use crate::trigger::AbilityTrigger;

/// `name(arg, arg, ...)`, with no nested parentheses.
static CALL_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*\(([^()]*)\)\s*$").expect("call grammar is a valid pattern")
});

/// A compiled ability and the lines that were dropped on the way.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub ability: Ability,
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of compiling a whole definitions file.
#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    /// Every ability that compiled.
    pub abilities: AbilitySet,

    /// Dropped lines across all abilities.
    pub diagnostics: Vec<Diagnostic>,

    /// Abilities that were rejected outright.
    pub errors: Vec<CompileError>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.errors.is_empty()
    }
}

/// Compiles ability text against a function registry.
#[derive(Clone)]
pub struct AbilityCompiler {
    registry: Arc<FunctionRegistry>,
}

impl AbilityCompiler {
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Compile keyword lines bound to `trigger`.
    pub fn compile<S: AsRef<str>>(
        &self,
        lines: &[S],
        trigger: &str,
        ability: &str,
    ) -> Result<Compilation, CompileError> {
        let trigger = resolve_trigger(trigger, ability)?;
        let mut diagnostics = Vec::new();
        let keywords = self.compile_keywords(ability, lines, &mut diagnostics);

        Ok(Compilation {
            ability: Ability::new(ability, trigger, keywords, Vec::new()),
            diagnostics,
        })
    }

    /// Compile a full definition: keywords, conditions and timer period.
    pub fn compile_definition(
        &self,
        name: &str,
        definition: &AbilityDefinition,
    ) -> Result<Compilation, CompileError> {
        let trigger = resolve_trigger(&definition.trigger, name)?;

        let period = match (trigger, definition.timer) {
            (AbilityTrigger::Timer, Some(period)) if period > 0 => Some(period),
            (AbilityTrigger::Timer, _) => {
                tracing::warn!("Timer ability {} has no positive timer period", name);
                return Err(CompileError::MissingTimer {
                    ability: name.to_string(),
                });
            }
            (_, Some(_)) => {
                tracing::warn!(
                    "Ignoring timer period on ability {} with trigger {}",
                    name,
                    trigger
                );
                None
            }
            (_, None) => None,
        };

        let mut diagnostics = Vec::new();
        let keywords = self.compile_keywords(name, &definition.keywords, &mut diagnostics);
        let conditions = self.compile_conditions(name, &definition.conditions, &mut diagnostics);

        let mut ability = Ability::new(name, trigger, keywords, conditions);
        if let Some(period) = period {
            ability = ability.with_timer(period);
        }

        Ok(Compilation {
            ability,
            diagnostics,
        })
    }

    /// Compile every ability in a definitions file.
    pub fn compile_all(&self, file: &AbilityFile) -> CompileReport {
        let mut report = CompileReport::default();

        for (name, definition) in &file.abilities {
            match self.compile_definition(name, definition) {
                Ok(compilation) => {
                    report.diagnostics.extend(compilation.diagnostics);
                    report.abilities.insert(compilation.ability);
                }
                Err(e) => report.errors.push(e),
            }
        }

        tracing::info!(
            "Compiled {} abilities ({} rejected, {} lines dropped)",
            report.abilities.len(),
            report.errors.len(),
            report.diagnostics.len()
        );
        report
    }

    fn compile_keywords<S: AsRef<str>>(
        &self,
        ability: &str,
        lines: &[S],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ActiveKeyword> {
        let mut keywords = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let compiled = parse_call(line.as_ref()).and_then(|(name, tokens)| {
                let keyword = self
                    .registry
                    .keyword(name)
                    .ok_or_else(|| DiagnosticKind::UnknownKeyword(name.to_string()))?;
                let arguments = resolve_arguments(name, keyword.arguments(), &tokens)?;
                Ok(ActiveKeyword::new(keyword, arguments))
            });

            match compiled {
                Ok(keyword) => keywords.push(keyword),
                Err(kind) => diagnostics.push(report(ability, Section::Keywords, index, kind)),
            }
        }

        keywords
    }

    fn compile_conditions<S: AsRef<str>>(
        &self,
        ability: &str,
        lines: &[S],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<ActiveCondition> {
        let mut conditions = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            let compiled = parse_call(line.as_ref()).and_then(|(name, tokens)| {
                let condition = self
                    .registry
                    .condition(name)
                    .ok_or_else(|| DiagnosticKind::UnknownCondition(name.to_string()))?;
                let arguments = resolve_arguments(name, condition.arguments(), &tokens)?;
                Ok(ActiveCondition::new(condition, arguments))
            });

            match compiled {
                Ok(condition) => conditions.push(condition),
                Err(kind) => diagnostics.push(report(ability, Section::Conditions, index, kind)),
            }
        }

        conditions
    }
}

fn resolve_trigger(raw: &str, ability: &str) -> Result<AbilityTrigger, CompileError> {
    AbilityTrigger::from_identifier(raw).ok_or_else(|| {
        tracing::warn!("Unknown trigger '{}' on ability {}", raw, ability);
        CompileError::UnknownTrigger {
            ability: ability.to_string(),
            trigger: raw.to_string(),
        }
    })
}

/// Split a call into its name and trimmed argument tokens. Empty parentheses
/// yield no tokens.
fn parse_call(line: &str) -> Result<(&str, Vec<&str>), DiagnosticKind> {
    let malformed = || DiagnosticKind::MalformedCall(line.trim().to_string());
    let captures = CALL_GRAMMAR.captures(line).ok_or_else(malformed)?;
    let name = captures.get(1).ok_or_else(malformed)?.as_str();
    let body = captures.get(2).map_or("", |m| m.as_str()).trim();

    let tokens = if body.is_empty() {
        Vec::new()
    } else {
        body.split(',').map(str::trim).collect()
    };
    Ok((name, tokens))
}

fn resolve_arguments(
    function: &str,
    schema: &[ArgumentSchema],
    tokens: &[&str],
) -> Result<Arguments, DiagnosticKind> {
    if schema.len() != tokens.len() {
        return Err(DiagnosticKind::ArgumentCount {
            function: function.to_string(),
            expected: schema.len(),
            found: tokens.len(),
        });
    }

    schema
        .iter()
        .zip(tokens)
        .enumerate()
        .map(|(position, (schema, raw))| {
            schema
                .resolve(raw, position)
                .map_err(|error| DiagnosticKind::InvalidArgument {
                    function: function.to_string(),
                    error,
                })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Arguments::new)
}

fn report(ability: &str, section: Section, line: usize, kind: DiagnosticKind) -> Diagnostic {
    let diagnostic = Diagnostic {
        ability: ability.to_string(),
        section,
        line,
        kind,
    };
    tracing::warn!("Error parsing {}", diagnostic);
    diagnostic
}

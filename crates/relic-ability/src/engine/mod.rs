//! Execution Engine
//!
//! The AbilityEngine runs compiled abilities against runtime contexts.
//!
//! ## Execution Flow
//!
//! ```text
//! Ability + RuntimeContext
//!        │
//!        ▼
//! ┌────────────────────┐
//! │ Compatibility check │  trigger, capabilities, strict mode
//! └─────────┬──────────┘
//!           │ refused ──▶ Refusal (no side effects)
//!           ▼
//! ┌────────────────────┐
//! │ Condition gate      │  every condition, in order, on the caller
//! └─────────┬──────────┘
//!           │ false ──▶ Refusal::ConditionFailed
//!           ▼
//! For each keyword, in compiled order:
//!     async ──▶ Scheduler::spawn_async (fire and continue)
//!     sync  ──▶ inline on primary, else Scheduler::run_on_primary (blocks)
//! ```
//!
//! ## Strict Mode
//!
//! | Check | Lenient | Strict |
//! |-------|---------|--------|
//! | context supplies one of the trigger's modes | yes | yes |
//! | context supplies every one of the trigger's modes | no | yes |
//! | ability only references the trigger's modes | no | yes |
//!
//! In lenient mode a keyword whose target cannot be resolved is a no-op.

use std::sync::Arc;

use relic_core::{EngineConfig, Entity, World};

use crate::ability::Ability;
use crate::cache::AbilityCache;
use crate::context::RuntimeContext;
use crate::error::Refusal;
use crate::trigger::AbilityTrigger;

mod scheduler;

#[cfg(test)]
pub use scheduler::MockScheduler;
pub use scheduler::{InlineScheduler, Scheduler, Task};

/// Summary of a completed execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    /// Ability that ran.
    pub ability: String,

    /// Keywords that ran to completion on the primary thread.
    pub completed: usize,

    /// Keywords handed to the worker pool.
    pub dispatched: usize,
}

// =============================================================================
// Ability Engine
// =============================================================================

/// Runs abilities.
///
/// Holds no per-execution state, so one engine can serve every event source.
#[derive(Clone)]
pub struct AbilityEngine {
    config: EngineConfig,
    scheduler: Arc<dyn Scheduler>,
}

impl AbilityEngine {
    pub fn new(config: EngineConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        Self { config, scheduler }
    }

    /// An engine that runs everything on the calling thread.
    pub fn inline(config: EngineConfig) -> Self {
        Self::new(config, Arc::new(InlineScheduler))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_strict(&self) -> bool {
        self.config.strict
    }

    pub fn scheduler(&self) -> &Arc<dyn Scheduler> {
        &self.scheduler
    }

    /// Execute an ability, returning whether its keyword sequence ran to the end.
    pub fn execute(&self, ability: &Ability, context: RuntimeContext) -> bool {
        match self.try_execute(ability, context) {
            Ok(_) => true,
            Err(refusal) => {
                tracing::debug!("Refused execution: {}", refusal);
                false
            }
        }
    }

    /// Execute an ability fired by an event.
    ///
    /// The context's trigger must be the ability's trigger.
    pub fn try_execute(
        &self,
        ability: &Ability,
        context: RuntimeContext,
    ) -> Result<Execution, Refusal> {
        if context.trigger() != ability.trigger() {
            return Err(Refusal::TriggerMismatch {
                ability: ability.name().to_string(),
                expected: ability.trigger(),
                actual: context.trigger(),
            });
        }
        self.run(ability, context)
    }

    /// Execute an ability by name with a base context, regardless of its trigger.
    ///
    /// Capability and strict-mode checks still apply, so an ability that needs a
    /// second subject is refused under strict mode.
    pub fn execute_by_name(
        &self,
        cache: &AbilityCache,
        name: &str,
        player: Arc<Entity>,
        world: Arc<World>,
    ) -> Result<Execution, Refusal> {
        let ability = cache
            .get(name)
            .ok_or_else(|| Refusal::AbilityNotFound(name.to_string()))?;
        let context = RuntimeContext::new(name, AbilityTrigger::None, player, world);
        self.run(&ability, context)
    }

    fn run(&self, ability: &Ability, context: RuntimeContext) -> Result<Execution, Refusal> {
        self.check_compatibility(ability, &context)?;

        for condition in ability.conditions() {
            if !condition.test(&context) {
                return Err(Refusal::ConditionFailed {
                    ability: ability.name().to_string(),
                    condition: condition.identifier().to_string(),
                });
            }
        }

        Ok(self.dispatch(ability, Arc::new(context)))
    }

    fn check_compatibility(
        &self,
        ability: &Ability,
        context: &RuntimeContext,
    ) -> Result<(), Refusal> {
        let declared = ability.trigger().targeters();
        let supplied = context.capabilities();

        if !supplied.intersects(declared) {
            return Err(Refusal::MissingCapability {
                ability: ability.name().to_string(),
                trigger: ability.trigger(),
                missing: declared,
            });
        }

        if !self.config.strict {
            return Ok(());
        }

        if !supplied.contains(declared) {
            return Err(Refusal::MissingCapability {
                ability: ability.name().to_string(),
                trigger: ability.trigger(),
                missing: declared.difference(supplied),
            });
        }

        let referenced = ability.targeters();
        if !declared.contains(referenced) {
            return Err(Refusal::UnsupportedTargeter {
                ability: ability.name().to_string(),
                trigger: ability.trigger(),
                unsupported: referenced.difference(declared),
            });
        }

        Ok(())
    }

    fn dispatch(&self, ability: &Ability, context: Arc<RuntimeContext>) -> Execution {
        let mut execution = Execution {
            ability: ability.name().to_string(),
            completed: 0,
            dispatched: 0,
        };

        for keyword in ability.keywords() {
            if keyword.is_async() {
                let keyword = keyword.clone();
                let context = Arc::clone(&context);
                self.scheduler
                    .spawn_async(Box::new(move || keyword.call(&context)));
                execution.dispatched += 1;
            } else if self.scheduler.is_primary_thread() {
                keyword.call(&context);
                execution.completed += 1;
            } else {
                let keyword = keyword.clone();
                let context = Arc::clone(&context);
                self.scheduler
                    .run_on_primary(Box::new(move || keyword.call(&context)));
                execution.completed += 1;
            }
        }

        tracing::debug!(
            "Executed ability {} ({} inline, {} async)",
            execution.ability,
            execution.completed,
            execution.dispatched
        );
        execution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use relic_core::Location;

    use crate::ability::AbilitySet;
    use crate::arguments::{ArgumentSchema, Arguments};
    use crate::compiler::AbilityCompiler;
    use crate::keyword::{ActiveKeyword, Keyword};
    use crate::registry::FunctionRegistry;
    use crate::targeter::Capabilities;

    fn compile(lines: &[&str], trigger: &str) -> Ability {
        let registry = Arc::new(FunctionRegistry::with_builtins().unwrap());
        AbilityCompiler::new(registry)
            .compile(lines, trigger, "test")
            .unwrap()
            .ability
    }

    fn strict() -> EngineConfig {
        EngineConfig {
            strict: true,
            ..EngineConfig::default()
        }
    }

    fn player() -> Arc<Entity> {
        Arc::new(Entity::player("alex", Location::default()))
    }

    fn world() -> Arc<World> {
        Arc::new(World::new("overworld"))
    }

    struct Counter {
        calls: Arc<AtomicUsize>,
        is_async: bool,
    }

    impl Keyword for Counter {
        fn identifier(&self) -> &str {
            "count"
        }

        fn arguments(&self) -> &[ArgumentSchema] {
            &[]
        }

        fn is_async(&self) -> bool {
            self.is_async
        }

        fn call(&self, _arguments: &Arguments, _context: &RuntimeContext) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn counting_ability(calls: &Arc<AtomicUsize>, pattern: &[bool]) -> Ability {
        let keywords = pattern
            .iter()
            .map(|&is_async| {
                let keyword = Arc::new(Counter {
                    calls: Arc::clone(calls),
                    is_async,
                });
                ActiveKeyword::new(keyword, Arguments::new(Vec::new()))
            })
            .collect();
        Ability::new("counting", AbilityTrigger::RightClick, keywords, Vec::new())
    }

    #[test]
    fn test_execute_applies_keywords() {
        let ability = compile(&["damage(?entity, 5)"], "damage-taken");
        let player = player();
        let zombie = Arc::new(Entity::mob("zombie", 20.0, Location::default()));
        let context = RuntimeContext::new("test", AbilityTrigger::DamageTaken, player, world())
            .with_entity(zombie.clone());

        let engine = AbilityEngine::inline(EngineConfig::default());
        let execution = engine.try_execute(&ability, context).unwrap();

        assert_eq!(execution.completed, 1);
        assert_eq!(zombie.health(), 15.0);
    }

    #[test]
    fn test_trigger_mismatch_refused() {
        let ability = compile(&["heal(?player, 1)"], "right-click");
        let context = RuntimeContext::new("test", AbilityTrigger::LeftClick, player(), world());

        let engine = AbilityEngine::inline(EngineConfig::default());
        assert!(matches!(
            engine.try_execute(&ability, context),
            Err(Refusal::TriggerMismatch { .. })
        ));
    }

    #[test]
    fn test_strict_refuses_unsupported_targeter() {
        let ability = compile(&["damage(?entity, 5)"], "right-click");
        assert_eq!(ability.keywords().len(), 1);

        let player = player();
        let context = RuntimeContext::new("test", AbilityTrigger::RightClick, player.clone(), world());
        let engine = AbilityEngine::inline(strict());

        assert_eq!(
            engine.try_execute(&ability, context),
            Err(Refusal::UnsupportedTargeter {
                ability: "test".to_string(),
                trigger: AbilityTrigger::RightClick,
                unsupported: Capabilities::ENTITY,
            })
        );
        assert_eq!(player.health(), 20.0);
    }

    #[test]
    fn test_lenient_skips_unresolvable_target() {
        let ability = compile(&["damage(?entity, 5)", "heal(?player, 1)"], "right-click");
        let player = player();
        player.set_health(10.0);
        let context = RuntimeContext::new("test", AbilityTrigger::RightClick, player.clone(), world());

        let engine = AbilityEngine::inline(EngineConfig::default());
        assert!(engine.execute(&ability, context));
        assert_eq!(player.health(), 11.0);
    }

    #[test]
    fn test_execute_by_name_unknown_ability() {
        let cache = AbilityCache::default();
        let engine = AbilityEngine::inline(EngineConfig::default());

        assert_eq!(
            engine.execute_by_name(&cache, "nothing", player(), world()),
            Err(Refusal::AbilityNotFound("nothing".to_string()))
        );
    }

    #[test]
    fn test_execute_by_name_ignores_trigger() {
        let mut set = AbilitySet::new();
        set.insert(compile(&["kindle(?player, 60)"], "consume-item"));
        let cache = AbilityCache::new(set);
        let player = player();

        let engine = AbilityEngine::inline(strict());
        let execution = engine
            .execute_by_name(&cache, "test", player.clone(), world())
            .unwrap();
        assert_eq!(execution.completed, 1);
        assert_eq!(player.fire_ticks(), 60);
    }

    #[test]
    fn test_execute_by_name_strict_refuses_entity_trigger() {
        let mut set = AbilitySet::new();
        set.insert(compile(&["heal(?player, 2)"], "damage-dealt"));
        let cache = AbilityCache::new(set);

        let lenient = AbilityEngine::inline(EngineConfig::default());
        assert!(lenient
            .execute_by_name(&cache, "test", player(), world())
            .is_ok());

        let strict = AbilityEngine::inline(strict());
        assert_eq!(
            strict.execute_by_name(&cache, "test", player(), world()),
            Err(Refusal::MissingCapability {
                ability: "test".to_string(),
                trigger: AbilityTrigger::DamageDealt,
                missing: Capabilities::ENTITY,
            })
        );
    }

    #[test]
    fn test_condition_gate_refuses() {
        let registry = Arc::new(FunctionRegistry::with_builtins().unwrap());
        let definition = relic_core::AbilityDefinition {
            trigger: "right-click".to_string(),
            keywords: vec!["heal(?player, 5)".to_string()],
            conditions: vec!["istime(night)".to_string()],
            timer: None,
        };
        let ability = AbilityCompiler::new(registry)
            .compile_definition("moonlight", &definition)
            .unwrap()
            .ability;

        let player = player();
        player.set_health(10.0);
        let world = world();
        world.set_time(6000);

        let engine = AbilityEngine::inline(EngineConfig::default());
        let context =
            RuntimeContext::new("moonlight", AbilityTrigger::RightClick, player.clone(), world.clone());
        assert_eq!(
            engine.try_execute(&ability, context),
            Err(Refusal::ConditionFailed {
                ability: "moonlight".to_string(),
                condition: "istime".to_string(),
            })
        );
        assert_eq!(player.health(), 10.0);

        world.set_time(18000);
        let context = RuntimeContext::new("moonlight", AbilityTrigger::RightClick, player.clone(), world);
        assert!(engine.execute(&ability, context));
        assert_eq!(player.health(), 15.0);
    }

    #[test]
    fn test_off_primary_redispatches_sync_keywords() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ability = counting_ability(&calls, &[false, true, false]);

        let mut scheduler = MockScheduler::new();
        scheduler.expect_is_primary_thread().return_const(false);
        scheduler
            .expect_run_on_primary()
            .times(2)
            .returning(|task| task());
        scheduler
            .expect_spawn_async()
            .times(1)
            .returning(|task| task());

        let engine = AbilityEngine::new(EngineConfig::default(), Arc::new(scheduler));
        let context = RuntimeContext::new("counting", AbilityTrigger::RightClick, player(), world());
        let execution = engine.try_execute(&ability, context).unwrap();

        assert_eq!(execution.completed, 2);
        assert_eq!(execution.dispatched, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_on_primary_runs_sync_inline() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ability = counting_ability(&calls, &[false, false]);

        let mut scheduler = MockScheduler::new();
        scheduler.expect_is_primary_thread().return_const(true);
        scheduler.expect_run_on_primary().never();
        scheduler.expect_spawn_async().never();

        let engine = AbilityEngine::new(EngineConfig::default(), Arc::new(scheduler));
        let context = RuntimeContext::new("counting", AbilityTrigger::RightClick, player(), world());
        assert!(engine.execute(&ability, context));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_refusal_has_no_side_effects() {
        let calls = Arc::new(AtomicUsize::new(0));
        let ability = counting_ability(&calls, &[false, true]);

        let mut scheduler = MockScheduler::new();
        scheduler.expect_is_primary_thread().never();
        scheduler.expect_run_on_primary().never();
        scheduler.expect_spawn_async().never();

        let engine = AbilityEngine::new(EngineConfig::default(), Arc::new(scheduler));
        let context = RuntimeContext::new("counting", AbilityTrigger::ConsumeItem, player(), world());
        assert!(!engine.execute(&ability, context));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

//! Event to context construction.
//!
//! Host event sources describe what happened as a [`GameEvent`]. The listener
//! maps the event to its trigger, builds exactly one [`RuntimeContext`] variant,
//! and hands it to the engine together with the ability bound to the item
//! involved.
//!
//! | Event | Trigger | Context |
//! |-------|---------|---------|
//! | click in air | `right-click` / `left-click` | `Interact` |
//! | click on block | `right-click-block` / `left-click-block` | `InteractBlock` |
//! | click on entity | `right-click-entity` / `left-click-entity` | `Entity` |
//! | player hits entity | `damage-dealt` | `Entity` (victim) |
//! | player is hit | `damage-taken` | `Entity` (damager) |
//! | consume item | `consume-item` | `Base` |
//! | break block | `block-break` | `Block` |
//! | timer tick | `timer` | `Base` |

use std::sync::Arc;

use relic_core::{Block, ClickAction, Entity, Hand, World};

use crate::cache::AbilityCache;
use crate::context::RuntimeContext;
use crate::engine::{AbilityEngine, Execution};
use crate::error::Refusal;
use crate::timer::TimerTable;
use crate::trigger::AbilityTrigger;

/// Something that happened to a player holding an ability item.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A click that did not hit an entity. `block` is the clicked block for
    /// block clicks.
    Interact {
        player: Arc<Entity>,
        action: ClickAction,
        hand: Hand,
        block: Option<Block>,
    },
    InteractEntity {
        player: Arc<Entity>,
        entity: Arc<Entity>,
        right_click: bool,
    },
    DamageDealt {
        player: Arc<Entity>,
        victim: Arc<Entity>,
    },
    DamageTaken {
        player: Arc<Entity>,
        damager: Arc<Entity>,
    },
    Consume {
        player: Arc<Entity>,
    },
    BlockBreak {
        player: Arc<Entity>,
        block: Block,
    },
    Timer {
        player: Arc<Entity>,
    },
}

impl GameEvent {
    /// The trigger this event fires.
    pub fn trigger(&self) -> AbilityTrigger {
        match self {
            GameEvent::Interact { action, block, .. } => {
                match (action.is_right_click(), action.is_block() && block.is_some()) {
                    (true, true) => AbilityTrigger::RightClickBlock,
                    (true, false) => AbilityTrigger::RightClick,
                    (false, true) => AbilityTrigger::LeftClickBlock,
                    (false, false) => AbilityTrigger::LeftClick,
                }
            }
            GameEvent::InteractEntity { right_click, .. } => {
                if *right_click {
                    AbilityTrigger::RightClickEntity
                } else {
                    AbilityTrigger::LeftClickEntity
                }
            }
            GameEvent::DamageDealt { .. } => AbilityTrigger::DamageDealt,
            GameEvent::DamageTaken { .. } => AbilityTrigger::DamageTaken,
            GameEvent::Consume { .. } => AbilityTrigger::ConsumeItem,
            GameEvent::BlockBreak { .. } => AbilityTrigger::BlockBreak,
            GameEvent::Timer { .. } => AbilityTrigger::Timer,
        }
    }

    /// The acting player.
    pub fn player(&self) -> &Arc<Entity> {
        match self {
            GameEvent::Interact { player, .. }
            | GameEvent::InteractEntity { player, .. }
            | GameEvent::DamageDealt { player, .. }
            | GameEvent::DamageTaken { player, .. }
            | GameEvent::Consume { player }
            | GameEvent::BlockBreak { player, .. }
            | GameEvent::Timer { player } => player,
        }
    }

    /// Build the runtime context for `ability`.
    pub fn into_context(self, ability: &str, world: Arc<World>) -> RuntimeContext {
        let trigger = self.trigger();
        match self {
            GameEvent::Interact {
                player,
                action,
                hand,
                block,
            } => {
                let context = RuntimeContext::new(ability, trigger, player, world);
                match block {
                    Some(block) if action.is_block() => {
                        context.with_block_interaction(action, hand, block)
                    }
                    _ => context.with_interaction(action, hand),
                }
            }
            GameEvent::InteractEntity { player, entity, .. } => {
                RuntimeContext::new(ability, trigger, player, world).with_entity(entity)
            }
            GameEvent::DamageDealt { player, victim } => {
                RuntimeContext::new(ability, trigger, player, world).with_entity(victim)
            }
            GameEvent::DamageTaken { player, damager } => {
                RuntimeContext::new(ability, trigger, player, world).with_entity(damager)
            }
            GameEvent::BlockBreak { player, block } => {
                RuntimeContext::new(ability, trigger, player, world).with_block(block)
            }
            GameEvent::Consume { player } | GameEvent::Timer { player } => {
                RuntimeContext::new(ability, trigger, player, world)
            }
        }
    }
}

/// Routes events to the abilities bound to them.
pub struct AbilityListener {
    engine: AbilityEngine,
    cache: Arc<AbilityCache>,
    world: Arc<World>,
}

impl AbilityListener {
    pub fn new(engine: AbilityEngine, cache: Arc<AbilityCache>, world: Arc<World>) -> Self {
        Self {
            engine,
            cache,
            world,
        }
    }

    pub fn engine(&self) -> &AbilityEngine {
        &self.engine
    }

    pub fn cache(&self) -> &Arc<AbilityCache> {
        &self.cache
    }

    /// Fire `ability` for `event`.
    ///
    /// Abilities bound to a different trigger are refused without building a
    /// context.
    pub fn dispatch(&self, event: GameEvent, ability: &str) -> Result<Execution, Refusal> {
        let snapshot = self.cache.snapshot();
        let compiled = snapshot
            .get(ability)
            .ok_or_else(|| Refusal::AbilityNotFound(ability.to_string()))?;

        let fired = event.trigger();
        if compiled.trigger() != fired {
            return Err(Refusal::TriggerMismatch {
                ability: ability.to_string(),
                expected: compiled.trigger(),
                actual: fired,
            });
        }

        let context = event.into_context(ability, Arc::clone(&self.world));
        self.engine.try_execute(compiled, context)
    }

    /// Run every timer ability due on `tick` for `player`. Returns how many ran.
    pub fn on_tick(&self, timers: &TimerTable, tick: u64, player: &Arc<Entity>) -> usize {
        timers
            .due(tick)
            .into_iter()
            .filter(|name| {
                let event = GameEvent::Timer {
                    player: Arc::clone(player),
                };
                match self.dispatch(event, name) {
                    Ok(_) => true,
                    Err(refusal) => {
                        tracing::debug!("Timer ability {} skipped: {}", name, refusal);
                        false
                    }
                }
            })
            .count()
    }
}

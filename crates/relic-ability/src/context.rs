//! Runtime contexts.
//!
//! A context describes what is available while an ability executes. Every
//! context carries the acting player; the [`ContextKind`] refinement adds at most
//! one extra subject.
//!
//! ## Context Kinds
//!
//! | Kind | Built for | Capabilities |
//! |------|-----------|--------------|
//! | `Base` | executed by name, consume, timer | player |
//! | `Interact` | click in air | player |
//! | `InteractBlock` | click on block | player, block |
//! | `Entity` | damage dealt/taken, entity click | player, entity |
//! | `Block` | block break | player, block |
//!
//! Resolution matches every kind explicitly, so adding a kind forces each
//! resolver to decide what it exposes.

use std::sync::Arc;

use relic_core::{Block, ClickAction, Entity, Hand, Location, World};

use crate::targeter::{Capabilities, Targeter};
use crate::trigger::AbilityTrigger;

/// The refinement of a context beyond the acting player.
#[derive(Debug, Clone)]
pub enum ContextKind {
    Base,
    Interact {
        action: ClickAction,
        hand: Hand,
    },
    InteractBlock {
        action: ClickAction,
        hand: Hand,
        block: Block,
    },
    Entity {
        entity: Arc<Entity>,
    },
    Block {
        block: Block,
    },
}

/// Everything a keyword may read while executing.
///
/// Built once per event and dropped after the execution; async keywords share
/// it through an `Arc` for the duration of that one run.
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    ability: String,
    trigger: AbilityTrigger,
    player: Arc<Entity>,
    world: Arc<World>,
    kind: ContextKind,
}

impl RuntimeContext {
    /// Create a base context (player only).
    pub fn new(
        ability: impl Into<String>,
        trigger: AbilityTrigger,
        player: Arc<Entity>,
        world: Arc<World>,
    ) -> Self {
        Self {
            ability: ability.into(),
            trigger,
            player,
            world,
            kind: ContextKind::Base,
        }
    }

    /// Replace the refinement.
    pub fn with_kind(mut self, kind: ContextKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_entity(self, entity: Arc<Entity>) -> Self {
        self.with_kind(ContextKind::Entity { entity })
    }

    pub fn with_interaction(self, action: ClickAction, hand: Hand) -> Self {
        self.with_kind(ContextKind::Interact { action, hand })
    }

    pub fn with_block_interaction(self, action: ClickAction, hand: Hand, block: Block) -> Self {
        self.with_kind(ContextKind::InteractBlock {
            action,
            hand,
            block,
        })
    }

    pub fn with_block(self, block: Block) -> Self {
        self.with_kind(ContextKind::Block { block })
    }

    /// Name of the ability being executed.
    pub fn ability(&self) -> &str {
        &self.ability
    }

    /// Trigger that produced this context.
    pub fn trigger(&self) -> AbilityTrigger {
        self.trigger
    }

    pub fn player(&self) -> &Arc<Entity> {
        &self.player
    }

    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    pub fn kind(&self) -> &ContextKind {
        &self.kind
    }

    /// Targeter modes that resolve to a subject in this context.
    pub fn capabilities(&self) -> Capabilities {
        match &self.kind {
            ContextKind::Base | ContextKind::Interact { .. } => Capabilities::PLAYER,
            ContextKind::InteractBlock { .. } | ContextKind::Block { .. } => {
                Capabilities::PLAYER | Capabilities::BLOCK
            }
            ContextKind::Entity { .. } => Capabilities::PLAYER | Capabilities::ENTITY,
        }
    }

    /// The second living entity, if this context has one.
    pub fn entity(&self) -> Option<&Arc<Entity>> {
        match &self.kind {
            ContextKind::Entity { entity } => Some(entity),
            ContextKind::Base
            | ContextKind::Interact { .. }
            | ContextKind::InteractBlock { .. }
            | ContextKind::Block { .. } => None,
        }
    }

    /// The interacted or broken block, if any.
    pub fn block(&self) -> Option<&Block> {
        match &self.kind {
            ContextKind::InteractBlock { block, .. } | ContextKind::Block { block } => Some(block),
            ContextKind::Base | ContextKind::Interact { .. } | ContextKind::Entity { .. } => None,
        }
    }

    pub fn action(&self) -> Option<ClickAction> {
        match &self.kind {
            ContextKind::Interact { action, .. } | ContextKind::InteractBlock { action, .. } => {
                Some(*action)
            }
            ContextKind::Base | ContextKind::Entity { .. } | ContextKind::Block { .. } => None,
        }
    }

    pub fn hand(&self) -> Option<Hand> {
        match &self.kind {
            ContextKind::Interact { hand, .. } | ContextKind::InteractBlock { hand, .. } => {
                Some(*hand)
            }
            ContextKind::Base | ContextKind::Entity { .. } | ContextKind::Block { .. } => None,
        }
    }

    /// Resolve a targeter to a living entity. Blocks never resolve here.
    pub fn resolve_entity(&self, targeter: Targeter) -> Option<&Arc<Entity>> {
        match targeter {
            Targeter::Player => Some(&self.player),
            Targeter::Entity => self.entity(),
            Targeter::Block => None,
        }
    }

    /// Resolve a targeter to a location in the world.
    pub fn resolve_location(&self, targeter: Targeter) -> Option<Location> {
        match targeter {
            Targeter::Player => Some(self.player.location()),
            Targeter::Entity => self.entity().map(|e| e.location()),
            Targeter::Block => self.block().map(|b| b.location),
        }
    }
}

//! Ability triggers.

use std::fmt;

use crate::targeter::Capabilities;

/// The game event category an ability is bound to.
///
/// Each trigger declares which targeter modes the contexts it produces can
/// supply. The set is fixed; designers cannot add triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AbilityTrigger {
    /// Only runs when executed by name (API or command path).
    None,
    RightClick,
    LeftClick,
    RightClickBlock,
    LeftClickBlock,
    RightClickEntity,
    LeftClickEntity,
    DamageDealt,
    DamageTaken,
    ConsumeItem,
    BlockBreak,
    /// Runs every N ticks.
    Timer,
}

impl AbilityTrigger {
    pub const ALL: &'static [AbilityTrigger] = &[
        AbilityTrigger::None,
        AbilityTrigger::RightClick,
        AbilityTrigger::LeftClick,
        AbilityTrigger::RightClickBlock,
        AbilityTrigger::LeftClickBlock,
        AbilityTrigger::RightClickEntity,
        AbilityTrigger::LeftClickEntity,
        AbilityTrigger::DamageDealt,
        AbilityTrigger::DamageTaken,
        AbilityTrigger::ConsumeItem,
        AbilityTrigger::BlockBreak,
        AbilityTrigger::Timer,
    ];

    /// Resolve a trigger name. Case-insensitive; `_` and `-` are interchangeable.
    pub fn from_identifier(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|trigger| trigger.identifier() == normalized)
    }

    pub fn identifier(self) -> &'static str {
        match self {
            AbilityTrigger::None => "none",
            AbilityTrigger::RightClick => "right-click",
            AbilityTrigger::LeftClick => "left-click",
            AbilityTrigger::RightClickBlock => "right-click-block",
            AbilityTrigger::LeftClickBlock => "left-click-block",
            AbilityTrigger::RightClickEntity => "right-click-entity",
            AbilityTrigger::LeftClickEntity => "left-click-entity",
            AbilityTrigger::DamageDealt => "damage-dealt",
            AbilityTrigger::DamageTaken => "damage-taken",
            AbilityTrigger::ConsumeItem => "consume-item",
            AbilityTrigger::BlockBreak => "block-break",
            AbilityTrigger::Timer => "timer",
        }
    }

    /// Targeter modes that contexts produced by this trigger can resolve.
    pub fn targeters(self) -> Capabilities {
        match self {
            AbilityTrigger::None
            | AbilityTrigger::RightClick
            | AbilityTrigger::LeftClick
            | AbilityTrigger::ConsumeItem
            | AbilityTrigger::Timer => Capabilities::PLAYER,
            AbilityTrigger::RightClickBlock
            | AbilityTrigger::LeftClickBlock
            | AbilityTrigger::BlockBreak => Capabilities::PLAYER | Capabilities::BLOCK,
            AbilityTrigger::RightClickEntity
            | AbilityTrigger::LeftClickEntity
            | AbilityTrigger::DamageDealt
            | AbilityTrigger::DamageTaken => Capabilities::PLAYER | Capabilities::ENTITY,
        }
    }
}

impl fmt::Display for AbilityTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

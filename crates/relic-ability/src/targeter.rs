//! Target-selection modes.
//!
//! A targeter names *who* (or *where*) a keyword acts on. Each mode needs one
//! runtime-context capability; the context decides at execution time whether the
//! mode resolves to a subject.

use std::fmt;

bitflags::bitflags! {
    /// Set of subjects a runtime context (or trigger) can supply.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// The acting player. Every context has one.
        const PLAYER = 1 << 0;
        /// A second living entity (damaged, damager, clicked).
        const ENTITY = 1 << 1;
        /// An interacted or broken block.
        const BLOCK = 1 << 2;
    }
}

impl Capabilities {
    /// Collect the capabilities required by a set of targeters.
    pub fn of<I: IntoIterator<Item = Targeter>>(targeters: I) -> Self {
        targeters
            .into_iter()
            .fold(Capabilities::empty(), |acc, t| acc | t.capability())
    }

    /// Targeter modes contained in this set, in declaration order.
    pub fn targeters(self) -> impl Iterator<Item = Targeter> {
        Targeter::ALL
            .iter()
            .copied()
            .filter(move |t| self.contains(t.capability()))
    }
}

/// A target-selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Targeter {
    /// The player that fired the ability.
    Player,
    /// The other living entity involved in the event.
    Entity,
    /// The block involved in the event.
    Block,
}

impl Targeter {
    pub const ALL: &'static [Targeter] = &[Targeter::Player, Targeter::Entity, Targeter::Block];

    /// Parse a targeter token (case-insensitive).
    ///
    /// Accepted spellings: `?player`, `@player`, `player`, `self`, `@self`;
    /// `?entity`, `@entity`, `entity`, `?target`, `@target`, `target`;
    /// `?block`, `@block`, `block`.
    pub fn from_identifier(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        let name = lowered
            .strip_prefix('?')
            .or_else(|| lowered.strip_prefix('@'))
            .unwrap_or(&lowered);

        match name {
            "player" | "self" => Some(Targeter::Player),
            "entity" | "target" => Some(Targeter::Entity),
            "block" => Some(Targeter::Block),
            _ => None,
        }
    }

    /// Canonical spelling.
    pub fn identifier(self) -> &'static str {
        match self {
            Targeter::Player => "?player",
            Targeter::Entity => "?entity",
            Targeter::Block => "?block",
        }
    }

    /// The context capability this mode needs.
    pub fn capability(self) -> Capabilities {
        match self {
            Targeter::Player => Capabilities::PLAYER,
            Targeter::Entity => Capabilities::ENTITY,
            Targeter::Block => Capabilities::BLOCK,
        }
    }
}

impl fmt::Display for Targeter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

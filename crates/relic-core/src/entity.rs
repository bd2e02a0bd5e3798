//! Entity types.
//!
//! Entities are shared handles (`Arc<Entity>`) whose mutable state sits behind a
//! `parking_lot::RwLock`. Keywords receive handles through the runtime context and
//! mutate state through the methods here.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Highest food level a player can reach.
pub const MAX_FOOD_LEVEL: u32 = 20;

/// Global counter for generating unique entity IDs.
static ENTITY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Stable entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    fn next() -> Self {
        Self(ENTITY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// A point in the world.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// What kind of living entity this is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityKind {
    /// A connected player.
    Player { name: String },

    /// Any other living entity, e.g. "zombie".
    Mob { kind: String },
}

/// Potion effect types that abilities can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PotionEffectType {
    Speed,
    Slowness,
    Haste,
    Strength,
    Regeneration,
    Resistance,
    FireResistance,
    Invisibility,
    NightVision,
    Poison,
    Wither,
    Glowing,
}

impl PotionEffectType {
    /// All effect types, in declaration order.
    pub const ALL: &'static [PotionEffectType] = &[
        PotionEffectType::Speed,
        PotionEffectType::Slowness,
        PotionEffectType::Haste,
        PotionEffectType::Strength,
        PotionEffectType::Regeneration,
        PotionEffectType::Resistance,
        PotionEffectType::FireResistance,
        PotionEffectType::Invisibility,
        PotionEffectType::NightVision,
        PotionEffectType::Poison,
        PotionEffectType::Wither,
        PotionEffectType::Glowing,
    ];

    /// The configuration name of this effect type.
    pub fn name(self) -> &'static str {
        match self {
            PotionEffectType::Speed => "speed",
            PotionEffectType::Slowness => "slowness",
            PotionEffectType::Haste => "haste",
            PotionEffectType::Strength => "strength",
            PotionEffectType::Regeneration => "regeneration",
            PotionEffectType::Resistance => "resistance",
            PotionEffectType::FireResistance => "fire_resistance",
            PotionEffectType::Invisibility => "invisibility",
            PotionEffectType::NightVision => "night_vision",
            PotionEffectType::Poison => "poison",
            PotionEffectType::Wither => "wither",
            PotionEffectType::Glowing => "glowing",
        }
    }
}

/// An active potion effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PotionEffect {
    pub kind: PotionEffectType,
    /// Duration in ticks.
    pub duration: u32,
    /// Zero-based amplifier.
    pub amplifier: u32,
}

/// Mutable state of a living entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityState {
    pub health: f64,
    pub max_health: f64,
    pub fire_ticks: u32,
    pub food_level: u32,
    pub saturation: f32,
    pub location: Location,
    pub effects: Vec<PotionEffect>,
    /// Chat messages delivered to this entity (players only receive them).
    pub inbox: Vec<String>,
}

/// A living entity handle.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    state: RwLock<EntityState>,
}

impl Entity {
    /// Create a player with full health (20) and a full food bar.
    pub fn player(name: impl Into<String>, location: Location) -> Self {
        Self::new(
            EntityKind::Player { name: name.into() },
            20.0,
            MAX_FOOD_LEVEL,
            location,
        )
    }

    /// Create a mob with the given max health.
    pub fn mob(kind: impl Into<String>, max_health: f64, location: Location) -> Self {
        Self::new(EntityKind::Mob { kind: kind.into() }, max_health, 0, location)
    }

    fn new(kind: EntityKind, max_health: f64, food_level: u32, location: Location) -> Self {
        // NaN.max(0.0) is 0.0
        let max_health = max_health.max(0.0);
        Self {
            id: EntityId::next(),
            kind,
            state: RwLock::new(EntityState {
                health: max_health,
                max_health,
                fire_ticks: 0,
                food_level,
                saturation: 5.0,
                location,
                effects: Vec::new(),
                inbox: Vec::new(),
            }),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player { .. })
    }

    /// Display name: the player name or the mob kind.
    pub fn name(&self) -> &str {
        match &self.kind {
            EntityKind::Player { name } => name,
            EntityKind::Mob { kind } => kind,
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> EntityState {
        self.state.read().clone()
    }

    pub fn health(&self) -> f64 {
        self.state.read().health
    }

    pub fn max_health(&self) -> f64 {
        self.state.read().max_health
    }

    /// Set health, clamped to `[0, max_health]`.
    pub fn set_health(&self, health: f64) {
        let mut state = self.state.write();
        state.health = health.max(0.0).min(state.max_health);
    }

    /// Set max health. Current health is clamped to the new maximum.
    pub fn set_max_health(&self, max_health: f64) {
        let mut state = self.state.write();
        state.max_health = max_health.max(0.0);
        state.health = state.health.min(state.max_health);
    }

    /// Reduce health by `amount`, never below zero.
    pub fn damage(&self, amount: f64) {
        let mut state = self.state.write();
        state.health = (state.health - amount).max(0.0);
    }

    /// Increase health by `amount`, never above max health.
    pub fn heal(&self, amount: f64) {
        let mut state = self.state.write();
        state.health = (state.health + amount).min(state.max_health);
    }

    pub fn is_dead(&self) -> bool {
        self.state.read().health <= 0.0
    }

    pub fn fire_ticks(&self) -> u32 {
        self.state.read().fire_ticks
    }

    pub fn set_fire_ticks(&self, ticks: u32) {
        self.state.write().fire_ticks = ticks;
    }

    pub fn food_level(&self) -> u32 {
        self.state.read().food_level
    }

    pub fn saturation(&self) -> f32 {
        self.state.read().saturation
    }

    /// Add food and saturation. Food caps at [`MAX_FOOD_LEVEL`], saturation caps
    /// at the resulting food level.
    pub fn feed(&self, food: i32, saturation: f32) {
        let mut state = self.state.write();
        let food_level = (state.food_level as i64 + food as i64).clamp(0, MAX_FOOD_LEVEL as i64);
        state.food_level = food_level as u32;
        state.saturation = (state.saturation + saturation).clamp(0.0, state.food_level as f32);
    }

    pub fn location(&self) -> Location {
        self.state.read().location
    }

    /// Apply a potion effect, replacing any existing effect of the same type.
    pub fn add_potion_effect(&self, effect: PotionEffect) {
        let mut state = self.state.write();
        state.effects.retain(|e| e.kind != effect.kind);
        state.effects.push(effect);
    }

    pub fn potion_effects(&self) -> Vec<PotionEffect> {
        self.state.read().effects.clone()
    }

    /// Deliver a chat message. Mobs have no chat, so the message is dropped.
    pub fn send_message(&self, message: impl Into<String>) {
        if self.is_player() {
            self.state.write().inbox.push(message.into());
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.state.read().inbox.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_unique() {
        let a = Entity::player("alex", Location::default());
        let b = Entity::mob("zombie", 20.0, Location::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_set_health_clamps() {
        let player = Entity::player("alex", Location::default());

        player.set_health(150.0);
        assert_eq!(player.health(), 20.0);

        player.set_health(-10.0);
        assert_eq!(player.health(), 0.0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_invalid_max_health_never_panics() {
        let slime = Entity::mob("slime", -1.0, Location::default());
        assert_eq!(slime.max_health(), 0.0);
        slime.set_health(5.0);
        assert_eq!(slime.health(), 0.0);

        let ghost = Entity::mob("ghost", f64::NAN, Location::default());
        assert_eq!(ghost.max_health(), 0.0);
        ghost.set_health(5.0);
        assert_eq!(ghost.health(), 0.0);

        let player = Entity::player("alex", Location::default());
        player.set_health(f64::NAN);
        assert_eq!(player.health(), 0.0);
    }

    #[test]
    fn test_damage_and_heal_bounds() {
        let zombie = Entity::mob("zombie", 20.0, Location::default());

        zombie.damage(5.0);
        assert_eq!(zombie.health(), 15.0);

        zombie.heal(100.0);
        assert_eq!(zombie.health(), 20.0);

        zombie.damage(100.0);
        assert_eq!(zombie.health(), 0.0);
    }

    #[test]
    fn test_feed_caps_food_and_saturation() {
        let player = Entity::player("alex", Location::default());
        player.feed(-10, 0.0);
        assert_eq!(player.food_level(), 10);

        player.feed(50, 100.0);
        assert_eq!(player.food_level(), MAX_FOOD_LEVEL);
        assert_eq!(player.saturation(), MAX_FOOD_LEVEL as f32);
    }

    #[test]
    fn test_potion_effect_replaces_same_kind() {
        let player = Entity::player("alex", Location::default());
        player.add_potion_effect(PotionEffect {
            kind: PotionEffectType::Speed,
            duration: 100,
            amplifier: 0,
        });
        player.add_potion_effect(PotionEffect {
            kind: PotionEffectType::Speed,
            duration: 40,
            amplifier: 2,
        });

        let effects = player.potion_effects();
        assert_eq!(effects.len(), 1);
        assert_eq!(effects[0].amplifier, 2);
    }

    #[test]
    fn test_messages_only_reach_players() {
        let player = Entity::player("alex", Location::default());
        let zombie = Entity::mob("zombie", 20.0, Location::default());

        player.send_message("hello");
        zombie.send_message("hello");

        assert_eq!(player.messages(), vec!["hello".to_string()]);
        assert!(zombie.messages().is_empty());
    }
}

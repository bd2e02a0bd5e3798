use relic_core::{PotionEffect, PotionEffectType};

use super::{non_negative, target};
use crate::arguments::{ArgumentSchema, Arguments, PrimitiveKind};
use crate::context::RuntimeContext;
use crate::keyword::Keyword;
use crate::targeter::Targeter;

fn living_target() -> ArgumentSchema {
    ArgumentSchema::targeter([Targeter::Player, Targeter::Entity])
}

/// `damage(target, amount)`
pub struct DamageKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl DamageKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::validated(PrimitiveKind::Double, "damage", non_negative),
            ],
        }
    }
}

impl Keyword for DamageKeyword {
    fn identifier(&self) -> &str {
        "damage"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(amount)) = (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) else {
            return;
        };
        entity.damage(amount);
    }
}

/// `heal(target, amount)`
pub struct HealKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl HealKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::validated(PrimitiveKind::Double, "health", non_negative),
            ],
        }
    }
}

impl Keyword for HealKeyword {
    fn identifier(&self) -> &str {
        "heal"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(amount)) = (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) else {
            return;
        };
        entity.heal(amount);
    }
}

/// `sethealth(target, value)`; the value is clamped to `[0, max health]`.
pub struct SetHealthKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl SetHealthKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::primitive(PrimitiveKind::Double, "health value"),
            ],
        }
    }
}

impl Keyword for SetHealthKeyword {
    fn identifier(&self) -> &str {
        "sethealth"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(health)) = (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) else {
            return;
        };
        entity.set_health(health);
    }
}

/// `healpercent(target, percent)`; negative percentages drain health.
pub struct HealPercentKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl HealPercentKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::primitive(PrimitiveKind::Double, "healing"),
            ],
        }
    }
}

impl Keyword for HealPercentKeyword {
    fn identifier(&self) -> &str {
        "healpercent"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(percent)) = (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) else {
            return;
        };
        let amount = entity.max_health() * percent / 100.0;
        entity.set_health(entity.health() + amount);
    }
}

/// `damagepercent(target, percent)`
pub struct DamagePercentKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl DamagePercentKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::validated(PrimitiveKind::Double, "damage", non_negative),
            ],
        }
    }
}

impl Keyword for DamagePercentKeyword {
    fn identifier(&self) -> &str {
        "damagepercent"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(percent)) = (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) else {
            return;
        };
        entity.damage(entity.max_health() * percent / 100.0);
    }
}

/// `kindle(target, ticks)` sets the target on fire.
pub struct KindleKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl KindleKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::validated(PrimitiveKind::Integer, "duration", non_negative),
            ],
        }
    }
}

impl Keyword for KindleKeyword {
    fn identifier(&self) -> &str {
        "kindle"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(ticks)) = (
            target(self.identifier(), arguments, context),
            arguments.integer(1).and_then(|v| u32::try_from(v).ok()),
        ) else {
            return;
        };
        entity.set_fire_ticks(ticks);
    }
}

/// `feed(?player, food, saturation)`
pub struct FeedKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl FeedKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                ArgumentSchema::targeter([Targeter::Player]),
                ArgumentSchema::primitive(PrimitiveKind::Integer, "food"),
                ArgumentSchema::primitive(PrimitiveKind::Double, "saturation"),
            ],
        }
    }
}

impl Keyword for FeedKeyword {
    fn identifier(&self) -> &str {
        "feed"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(player), Some(food), Some(saturation)) = (
            target(self.identifier(), arguments, context),
            arguments.integer(1).and_then(|v| i32::try_from(v).ok()),
            arguments.double(2),
        ) else {
            return;
        };
        player.feed(food, saturation as f32);
    }
}

/// `effect(target, type, duration, level)`
pub struct EffectKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl EffectKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::enumeration::<PotionEffectType>("potion effect type"),
                ArgumentSchema::validated(PrimitiveKind::Integer, "duration", non_negative),
                ArgumentSchema::validated(PrimitiveKind::Integer, "level", non_negative),
            ],
        }
    }
}

impl Keyword for EffectKeyword {
    fn identifier(&self) -> &str {
        "effect"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let ticks = |index| arguments.integer(index).and_then(|v| u32::try_from(v).ok());
        let (Some(entity), Some(kind), Some(duration), Some(amplifier)) = (
            target(self.identifier(), arguments, context),
            arguments.enumeration::<PotionEffectType>(1),
            ticks(2),
            ticks(3),
        ) else {
            return;
        };
        entity.add_potion_effect(PotionEffect {
            kind,
            duration,
            amplifier,
        });
    }
}

/// `lightning(target)` strikes at the target's location.
pub struct LightningKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl LightningKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![ArgumentSchema::targeter(Targeter::ALL.iter().copied())],
        }
    }
}

impl Keyword for LightningKeyword {
    fn identifier(&self) -> &str {
        "lightning"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let Some(targeter) = arguments.targeter(0) else {
            return;
        };
        match context.resolve_location(targeter) {
            Some(location) => context.world().strike_lightning(location),
            None => tracing::debug!(
                "No {} location for lightning on ability {}",
                targeter,
                context.ability()
            ),
        }
    }
}

/// `message(target, text)` sends a chat message off the primary thread.
pub struct MessageKeyword {
    arguments: Vec<ArgumentSchema>,
}

impl MessageKeyword {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                living_target(),
                ArgumentSchema::primitive(PrimitiveKind::String, "message"),
            ],
        }
    }
}

impl Keyword for MessageKeyword {
    fn identifier(&self) -> &str {
        "message"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn is_async(&self) -> bool {
        true
    }

    fn call(&self, arguments: &Arguments, context: &RuntimeContext) {
        let (Some(entity), Some(text)) = (
            target(self.identifier(), arguments, context),
            arguments.string(1),
        ) else {
            return;
        };
        entity.send_message(text);
    }
}

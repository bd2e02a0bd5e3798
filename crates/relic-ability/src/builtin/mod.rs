//! Built-in keywords and conditions.
//!
//! | Keyword | Arguments | Thread |
//! |---------|-----------|--------|
//! | `damage` | target, damage | primary |
//! | `heal` | target, health | primary |
//! | `sethealth` | target, health value | primary |
//! | `healpercent` | target, healing % of max health | primary |
//! | `damagepercent` | target, damage % of max health | primary |
//! | `kindle` | target, duration in ticks | primary |
//! | `feed` | player, food, saturation | primary |
//! | `effect` | target, effect type, duration, level | primary |
//! | `lightning` | target (player, entity or block) | primary |
//! | `message` | target, text | worker |
//!
//! | Condition | Arguments |
//! |-----------|-----------|
//! | `istime` | time of day |
//! | `isburning` | target |
//! | `healthabove` | target, health |

use std::sync::Arc;

use relic_core::{Entity, PotionEffectType, TimeOfDay};

use crate::arguments::{ArgumentEnum, Arguments, Value};
use crate::context::RuntimeContext;
use crate::error::RegistryError;
use crate::registry::FunctionRegistry;

mod conditions;
mod keywords;

pub use conditions::{HealthAboveCondition, IsBurningCondition, IsTimeCondition};
pub use keywords::{
    DamageKeyword, DamagePercentKeyword, EffectKeyword, FeedKeyword, HealKeyword,
    HealPercentKeyword, KindleKeyword, LightningKeyword, MessageKeyword, SetHealthKeyword,
};

/// Register every built-in keyword and condition.
pub fn register(registry: &mut FunctionRegistry) -> Result<(), RegistryError> {
    registry.register_keyword(Arc::new(DamageKeyword::new()))?;
    registry.register_keyword(Arc::new(HealKeyword::new()))?;
    registry.register_keyword(Arc::new(SetHealthKeyword::new()))?;
    registry.register_keyword(Arc::new(HealPercentKeyword::new()))?;
    registry.register_keyword(Arc::new(DamagePercentKeyword::new()))?;
    registry.register_keyword(Arc::new(KindleKeyword::new()))?;
    registry.register_keyword(Arc::new(FeedKeyword::new()))?;
    registry.register_keyword(Arc::new(EffectKeyword::new()))?;
    registry.register_keyword(Arc::new(LightningKeyword::new()))?;
    registry.register_keyword(Arc::new(MessageKeyword::new()))?;

    registry.register_condition(Arc::new(IsTimeCondition::new()))?;
    registry.register_condition(Arc::new(IsBurningCondition::new()))?;
    registry.register_condition(Arc::new(HealthAboveCondition::new()))?;
    Ok(())
}

impl ArgumentEnum for PotionEffectType {
    const NAME: &'static str = "potion effect type";

    fn variants() -> &'static [Self] {
        PotionEffectType::ALL
    }

    fn variant_name(self) -> &'static str {
        self.name()
    }
}

impl ArgumentEnum for TimeOfDay {
    const NAME: &'static str = "time of day";

    fn variants() -> &'static [Self] {
        &[
            TimeOfDay::Sunrise,
            TimeOfDay::Day,
            TimeOfDay::Sunset,
            TimeOfDay::Night,
        ]
    }

    fn variant_name(self) -> &'static str {
        match self {
            TimeOfDay::Sunrise => "sunrise",
            TimeOfDay::Day => "day",
            TimeOfDay::Sunset => "sunset",
            TimeOfDay::Night => "night",
        }
    }
}

fn non_negative(value: &Value) -> bool {
    value.as_f64().is_some_and(|v| v >= 0.0)
}

/// Resolve the entity named by the targeter at position 0.
fn target<'a>(
    function: &str,
    arguments: &Arguments,
    context: &'a RuntimeContext,
) -> Option<&'a Arc<Entity>> {
    let targeter = arguments.targeter(0)?;
    let entity = context.resolve_entity(targeter);
    if entity.is_none() {
        tracing::debug!(
            "No {} available for {} on ability {} ({})",
            targeter,
            function,
            context.ability(),
            context.trigger()
        );
    }
    entity
}

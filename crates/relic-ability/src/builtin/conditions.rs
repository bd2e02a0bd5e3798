use relic_core::TimeOfDay;

use super::target;
use crate::arguments::{ArgumentSchema, Arguments, EnumValue, PrimitiveKind, Value};
use crate::condition::Condition;
use crate::context::RuntimeContext;
use crate::targeter::Targeter;

fn parse_time_of_day(raw: &str) -> Option<Value> {
    TimeOfDay::from_name(raw).map(|time| Value::Enum(EnumValue::of(time)))
}

/// `istime(sunrise | day | sunset | night)`
pub struct IsTimeCondition {
    arguments: Vec<ArgumentSchema>,
}

impl IsTimeCondition {
    pub fn new() -> Self {
        Self {
            arguments: vec![ArgumentSchema::manual("time of day", parse_time_of_day)],
        }
    }
}

impl Condition for IsTimeCondition {
    fn identifier(&self) -> &str {
        "istime"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn test(&self, arguments: &Arguments, context: &RuntimeContext) -> bool {
        arguments
            .enumeration::<TimeOfDay>(0)
            .is_some_and(|time| context.world().time_of_day() == time)
    }
}

/// `isburning(target)`
pub struct IsBurningCondition {
    arguments: Vec<ArgumentSchema>,
}

impl IsBurningCondition {
    pub fn new() -> Self {
        Self {
            arguments: vec![ArgumentSchema::targeter([Targeter::Player, Targeter::Entity])],
        }
    }
}

impl Condition for IsBurningCondition {
    fn identifier(&self) -> &str {
        "isburning"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn test(&self, arguments: &Arguments, context: &RuntimeContext) -> bool {
        target(self.identifier(), arguments, context).is_some_and(|entity| entity.fire_ticks() > 0)
    }
}

/// `healthabove(target, health)`
pub struct HealthAboveCondition {
    arguments: Vec<ArgumentSchema>,
}

impl HealthAboveCondition {
    pub fn new() -> Self {
        Self {
            arguments: vec![
                ArgumentSchema::targeter([Targeter::Player, Targeter::Entity]),
                ArgumentSchema::primitive(PrimitiveKind::Double, "health"),
            ],
        }
    }
}

impl Condition for HealthAboveCondition {
    fn identifier(&self) -> &str {
        "healthabove"
    }

    fn arguments(&self) -> &[ArgumentSchema] {
        &self.arguments
    }

    fn test(&self, arguments: &Arguments, context: &RuntimeContext) -> bool {
        match (
            target(self.identifier(), arguments, context),
            arguments.double(1),
        ) {
            (Some(entity), Some(threshold)) => entity.health() > threshold,
            _ => false,
        }
    }
}

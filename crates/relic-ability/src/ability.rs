//! Compiled abilities.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::condition::ActiveCondition;
use crate::keyword::ActiveKeyword;
use crate::targeter::Capabilities;
use crate::trigger::AbilityTrigger;

/// A compiled, immutable ability.
#[derive(Debug, Clone, PartialEq)]
pub struct Ability {
    name: String,
    trigger: AbilityTrigger,
    keywords: Vec<ActiveKeyword>,
    conditions: Vec<ActiveCondition>,
    targeters: Capabilities,
    timer: Option<u64>,
}

impl Ability {
    /// Build an ability. The referenced targeter set is computed from the
    /// keywords and conditions.
    pub fn new(
        name: impl Into<String>,
        trigger: AbilityTrigger,
        keywords: Vec<ActiveKeyword>,
        conditions: Vec<ActiveCondition>,
    ) -> Self {
        let targeters = keywords
            .iter()
            .map(ActiveKeyword::targeters)
            .chain(conditions.iter().map(ActiveCondition::targeters))
            .fold(Capabilities::empty(), |acc, caps| acc | caps);

        Self {
            name: name.into(),
            trigger,
            keywords,
            conditions,
            targeters,
            timer: None,
        }
    }

    /// Attach a timer period in ticks.
    pub fn with_timer(mut self, period: u64) -> Self {
        self.timer = Some(period);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trigger(&self) -> AbilityTrigger {
        self.trigger
    }

    pub fn keywords(&self) -> &[ActiveKeyword] {
        &self.keywords
    }

    pub fn conditions(&self) -> &[ActiveCondition] {
        &self.conditions
    }

    /// Targeter modes referenced by any keyword or condition.
    pub fn targeters(&self) -> Capabilities {
        self.targeters
    }

    pub fn timer(&self) -> Option<u64> {
        self.timer
    }
}

/// An immutable set of compiled abilities keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AbilitySet {
    abilities: BTreeMap<String, Arc<Ability>>,
}

impl AbilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an ability, replacing any previous one with the same name.
    pub fn insert(&mut self, ability: Ability) -> Option<Arc<Ability>> {
        self.abilities
            .insert(ability.name().to_string(), Arc::new(ability))
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Ability>> {
        self.abilities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.abilities.contains_key(name)
    }

    /// Ability names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.abilities.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Ability>> {
        self.abilities.values()
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

impl FromIterator<Ability> for AbilitySet {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        let mut set = Self::new();
        for ability in iter {
            set.insert(ability);
        }
        set
    }
}

//! Timer ability schedule.

use crate::ability::AbilitySet;
use crate::trigger::AbilityTrigger;

/// Periods of every `timer` ability in a set.
///
/// An ability with period `p` is due on every tick where `tick % p == 0`,
/// starting after tick zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerTable {
    /// (name, period), sorted by name.
    entries: Vec<(String, u64)>,
}

impl TimerTable {
    pub fn new(set: &AbilitySet) -> Self {
        let entries = set
            .iter()
            .filter(|ability| ability.trigger() == AbilityTrigger::Timer)
            .filter_map(|ability| {
                ability
                    .timer()
                    .filter(|period| *period > 0)
                    .map(|period| (ability.name().to_string(), period))
            })
            .collect();

        Self { entries }
    }

    /// Names of abilities due on `tick`, in name order.
    pub fn due(&self, tick: u64) -> Vec<String> {
        if tick == 0 {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|(_, period)| tick % period == 0)
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn period(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, period)| *period)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::Ability;

    fn timer(name: &str, period: u64) -> Ability {
        Ability::new(name, AbilityTrigger::Timer, Vec::new(), Vec::new()).with_timer(period)
    }

    #[test]
    fn test_due_ticks() {
        let set: AbilitySet = [
            timer("pulse", 20),
            timer("beacon", 40),
            Ability::new("click", AbilityTrigger::RightClick, Vec::new(), Vec::new()),
        ]
        .into_iter()
        .collect();
        let table = TimerTable::new(&set);

        assert_eq!(table.len(), 2);
        assert!(table.due(0).is_empty());
        assert!(table.due(10).is_empty());
        assert_eq!(table.due(20), vec!["pulse".to_string()]);
        assert_eq!(
            table.due(40),
            vec!["beacon".to_string(), "pulse".to_string()]
        );
        assert_eq!(table.period("beacon"), Some(40));
        assert_eq!(table.period("click"), None);
    }
}

//! World state and interaction types.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::entity::Location;

/// Length of one in-game day.
pub const TICKS_PER_DAY: u64 = 24_000;

/// A world: its clock plus a record of lightning strikes.
#[derive(Debug)]
pub struct World {
    name: String,
    full_time: AtomicU64,
    strikes: Mutex<Vec<Location>>,
}

impl World {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_time: AtomicU64::new(0),
            strikes: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Time of day in ticks, `0..TICKS_PER_DAY`.
    pub fn time(&self) -> u64 {
        self.full_time.load(Ordering::Acquire) % TICKS_PER_DAY
    }

    /// Total ticks since world creation.
    pub fn full_time(&self) -> u64 {
        self.full_time.load(Ordering::Acquire)
    }

    pub fn set_time(&self, ticks: u64) {
        self.full_time.store(ticks, Ordering::Release);
    }

    /// Advance the clock by `ticks`, returning the new full time.
    pub fn advance(&self, ticks: u64) -> u64 {
        self.full_time.fetch_add(ticks, Ordering::AcqRel) + ticks
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        TimeOfDay::from_ticks(self.time())
    }

    pub fn strike_lightning(&self, location: Location) {
        self.strikes.lock().push(location);
    }

    pub fn lightning_strikes(&self) -> Vec<Location> {
        self.strikes.lock().clone()
    }
}

/// Coarse time-of-day buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// Ticks 23000..24000.
    Sunrise,
    /// Ticks 0..12000.
    Day,
    /// Ticks 12000..13000.
    Sunset,
    /// Ticks 13000..23000.
    Night,
}

impl TimeOfDay {
    pub fn from_ticks(ticks: u64) -> Self {
        match ticks % TICKS_PER_DAY {
            0..=11_999 => TimeOfDay::Day,
            12_000..=12_999 => TimeOfDay::Sunset,
            13_000..=22_999 => TimeOfDay::Night,
            _ => TimeOfDay::Sunrise,
        }
    }

    /// Parse a time-of-day name. Accepts the bucket names plus common aliases
    /// (`dawn`, `noon`, `dusk`, `midnight`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sunrise" | "dawn" => Some(TimeOfDay::Sunrise),
            "day" | "noon" | "midday" => Some(TimeOfDay::Day),
            "sunset" | "dusk" => Some(TimeOfDay::Sunset),
            "night" | "midnight" => Some(TimeOfDay::Night),
            _ => None,
        }
    }
}

/// A block in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub location: Location,
    /// Material name, e.g. "stone".
    pub material: String,
}

impl Block {
    pub fn new(material: impl Into<String>, location: Location) -> Self {
        Self {
            location,
            material: material.into(),
        }
    }
}

/// The click that produced an interact event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickAction {
    LeftClickAir,
    LeftClickBlock,
    RightClickAir,
    RightClickBlock,
}

impl ClickAction {
    pub fn is_right_click(self) -> bool {
        matches!(self, ClickAction::RightClickAir | ClickAction::RightClickBlock)
    }

    pub fn is_block(self) -> bool {
        matches!(self, ClickAction::LeftClickBlock | ClickAction::RightClickBlock)
    }
}

/// The hand holding the item that was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    #[default]
    MainHand,
    OffHand,
}

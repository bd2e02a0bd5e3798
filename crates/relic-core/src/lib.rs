//! Core types for the Relic ability engine.
//!
//! This crate contains the host-side data structures shared by all Relic crates:
//! - Entities (players and mobs) with lock-protected state
//! - World state (time, lightning), blocks, click actions and hands
//! - Engine configuration and ability definition files
//! - Error types

mod config;
mod entity;
mod error;
mod world;

pub use config::{
    abilities_path, config_dir, ensure_config_dir, AbilityDefinition, AbilityFile, EngineConfig,
};
pub use entity::{
    Entity, EntityId, EntityKind, EntityState, Location, PotionEffect, PotionEffectType,
    MAX_FOOD_LEVEL,
};
pub use error::ConfigError;
pub use world::{Block, ClickAction, Hand, TimeOfDay, World, TICKS_PER_DAY};

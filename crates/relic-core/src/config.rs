//! Configuration types.
//!
//! Two TOML documents drive the engine:
//!
//! ```text
//! ~/.config/relic/
//! ├── relic.toml        # EngineConfig (strict mode, worker threads, tick rate)
//! └── abilities.toml    # AbilityFile ([abilities.<name>] sections)
//! ```
//!
//! Watching these files and deciding when to reload is left to the host.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Engine-wide options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Refuse abilities whose trigger cannot supply every subject they need.
    #[serde(default)]
    pub strict: bool,

    /// Worker threads for async keywords.
    #[serde(default = "default_worker_threads")]
    pub worker_threads: usize,

    /// Length of one simulation tick in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

fn default_worker_threads() -> usize {
    2
}

fn default_tick_millis() -> u64 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            strict: false,
            worker_threads: default_worker_threads(),
            tick_millis: default_tick_millis(),
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path)?)
    }
}

/// One ability as written by a designer.
///
/// ```toml
/// [abilities.fireball]
/// trigger = "right-click"
/// keywords = ["damage(?entity, 5)", "message(?player, Whoosh)"]
/// conditions = ["istime(night)"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityDefinition {
    /// Trigger name, e.g. "right-click".
    pub trigger: String,

    /// Ordered keyword calls.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Condition calls; all must hold for the ability to run.
    #[serde(default)]
    pub conditions: Vec<String>,

    /// Period in ticks, required for the "timer" trigger.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

/// A file of ability definitions keyed by ability name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityFile {
    #[serde(default)]
    pub abilities: BTreeMap<String, AbilityDefinition>,
}

impl AbilityFile {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path)?)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Get the config directory path.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("relic"))
}

/// Get the path to abilities.toml.
pub fn abilities_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("abilities.toml"))
}

/// Ensure the config directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = config_dir().ok_or(ConfigError::NoConfigDir)?;
    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::Io {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!(!config.strict);
    }

    #[test]
    fn test_engine_config_overrides() {
        let config = EngineConfig::from_toml_str("strict = true\nworker_threads = 4").unwrap();
        assert!(config.strict);
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.tick_millis, 50);
    }

    #[test]
    fn test_ability_file_parse() {
        let source = r#"
            [abilities.fireball]
            trigger = "right-click"
            keywords = ["damage(?entity, 5)", "message(?player, Whoosh)"]

            [abilities.regen]
            trigger = "timer"
            keywords = ["heal(?player, 1)"]
            conditions = ["istime(night)"]
            timer = 40
        "#;

        let file = AbilityFile::from_toml_str(source).unwrap();
        assert_eq!(file.abilities.len(), 2);

        let regen = &file.abilities["regen"];
        assert_eq!(regen.trigger, "timer");
        assert_eq!(regen.conditions, vec!["istime(night)".to_string()]);
        assert_eq!(regen.timer, Some(40));

        let fireball = &file.abilities["fireball"];
        assert!(fireball.conditions.is_empty());
        assert_eq!(fireball.timer, None);
    }

    #[test]
    fn test_ability_file_parse_error() {
        let result = AbilityFile::from_toml_str("[abilities.broken]\nkeywords = 5");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "strict = true").unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(config.strict);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AbilityFile::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}

//! Resolver configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where an assignment lands when a public native property and a behavior
/// both provide the name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetPriority {
    /// An existing public native property is assigned directly
    #[default]
    NativeFirst,
    /// Behaviors are always consulted before native storage
    BehaviorsFirst,
}

/// Configuration for a [`Composable`](crate::Composable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelegationConfig {
    /// Resolution order for assignments
    pub set_priority: SetPriority,
    /// Whether detaching (or replacing) a behavior clears its owner handle
    pub clear_owner_on_detach: bool,
}

impl Default for DelegationConfig {
    fn default() -> Self {
        Self {
            set_priority: SetPriority::NativeFirst,
            clear_owner_on_detach: true,
        }
    }
}

impl DelegationConfig {
    /// Behaviors first on assignment and stale owner handles after detach
    pub fn legacy() -> Self {
        Self {
            set_priority: SetPriority::BehaviorsFirst,
            clear_owner_on_detach: false,
        }
    }

    pub fn with_set_priority(mut self, set_priority: SetPriority) -> Self {
        self.set_priority = set_priority;
        self
    }

    pub fn with_clear_owner_on_detach(mut self, clear: bool) -> Self {
        self.clear_owner_on_detach = clear;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Errors raised while loading a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DelegationConfig::default();
        assert_eq!(config.set_priority, SetPriority::NativeFirst);
        assert!(config.clear_owner_on_detach);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DelegationConfig::from_json_str(r#"{"set_priority": "behaviors_first"}"#)
            .unwrap();
        assert_eq!(config.set_priority, SetPriority::BehaviorsFirst);
        assert!(config.clear_owner_on_detach);

        let empty = DelegationConfig::from_json_str("{}").unwrap();
        assert_eq!(empty, DelegationConfig::default());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result = DelegationConfig::from_json_str(r#"{"max_behaviors": 3}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = DelegationConfig::legacy();
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"behaviors_first\""));
        assert_eq!(DelegationConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_builder_style_setters() {
        let config = DelegationConfig::default()
            .with_set_priority(SetPriority::BehaviorsFirst)
            .with_clear_owner_on_detach(false);
        assert_eq!(config, DelegationConfig::legacy());
    }
}

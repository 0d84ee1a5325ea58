//! Feature-flag providers.
//!
//! Flags gate migrations that change a block's structure. The engine never
//! reads flags from global state: a [`FeatureFlags`] provider is passed into
//! every migration, and the host picks the policy by picking the provider.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ConfigurationError;

/// Answers whether a named feature is enabled.
pub trait FeatureFlags: Send + Sync {
    /// Look up `name`. Policies that require explicit configuration return
    /// [`ConfigurationError`] when the flag is absent or not a boolean.
    fn is_enabled(&self, name: &str) -> Result<bool, ConfigurationError>;
}

/// Flag values loaded from configuration.
///
/// ```toml
/// [flags]
/// gallery-refactor = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlagConfig {
    #[serde(default)]
    pub flags: BTreeMap<String, toml::Value>,
}

impl FlagConfig {
    /// Parse a TOML flag document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(source).map_err(|e| ConfigurationError::Parse(e.to_string()))
    }

    /// Set a boolean flag.
    pub fn with_flag(mut self, name: &str, enabled: bool) -> Self {
        self.flags
            .insert(name.to_string(), toml::Value::Boolean(enabled));
        self
    }

    /// Raw configured value of a flag.
    pub fn get(&self, name: &str) -> Option<&toml::Value> {
        self.flags.get(name)
    }
}

/// Policy requiring every flag to be explicitly set to a boolean.
#[derive(Debug, Clone, Default)]
pub struct StrictFlags {
    config: FlagConfig,
}

impl StrictFlags {
    pub fn new(config: FlagConfig) -> Self {
        Self { config }
    }
}

impl FeatureFlags for StrictFlags {
    fn is_enabled(&self, name: &str) -> Result<bool, ConfigurationError> {
        match self.config.get(name) {
            Some(toml::Value::Boolean(enabled)) => Ok(*enabled),
            Some(other) => Err(ConfigurationError::NotBoolean {
                name: name.to_string(),
                found: other.type_str(),
            }),
            None => Err(ConfigurationError::MissingFlag {
                name: name.to_string(),
            }),
        }
    }
}

/// Policy treating every unset flag as enabled.
#[derive(Debug, Clone, Default)]
pub struct DefaultOnFlags {
    config: FlagConfig,
}

impl DefaultOnFlags {
    pub fn new(config: FlagConfig) -> Self {
        Self { config }
    }
}

impl FeatureFlags for DefaultOnFlags {
    fn is_enabled(&self, name: &str) -> Result<bool, ConfigurationError> {
        match self.config.get(name) {
            Some(toml::Value::Boolean(enabled)) => Ok(*enabled),
            Some(other) => {
                warn!(flag = name, found = other.type_str(), "ignoring non-boolean flag value");
                Ok(true)
            }
            None => Ok(true),
        }
    }
}

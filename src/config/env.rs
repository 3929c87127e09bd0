//! Environment variable overrides.
//!
//! Environment variables are read, never written, at runtime.

use super::{ConfigError, ConfigResult};

pub const DEFAULT_PREFIX: &str = "CATALOG_";

/// Read-only view of prefixed environment variables.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    prefix: String,
}

impl EnvOverrides {
    /// Overrides under the default `CATALOG_` prefix
    pub fn new() -> Self {
        Self::prefixed(DEFAULT_PREFIX)
    }

    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Full environment variable name for a dotted or snake-cased key
    pub fn env_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_uppercase().replace('.', "_"))
    }

    /// Value of the variable for `key`. Unset and empty variables both read as `None`.
    pub fn get(&self, key: &str) -> ConfigResult<Option<String>> {
        let env_key = self.env_key(key);
        match std::env::var(&env_key) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue {
                key: env_key,
                message: "not valid unicode".into(),
            }),
        }
    }
}

impl Default for EnvOverrides {
    fn default() -> Self {
        Self::new()
    }
}

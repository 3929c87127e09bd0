//! Layered settings for the catalog tools.
//!
//! ```rust,no_run
//! use resource_catalog::config::SettingsLoader;
//!
//! # fn example() -> Result<(), resource_catalog::config::ConfigError> {
//! let settings = SettingsLoader::new().load(std::path::Path::new("."))?;
//! println!("registry: {}", settings.registry_url);
//! # Ok(())
//! # }
//! ```

pub mod env;
pub mod settings;

pub use env::EnvOverrides;
pub use settings::{
    MarketplaceOwner, MarketplaceSettings, ScaffoldSettings, Settings, SettingsLoader,
    SETTINGS_FILE,
};

use thiserror::Error;

/// Errors that can occur while loading settings
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue {
        /// The key with invalid value
        key: String,
        /// Error message
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidValue {
            key: "registryUrl".to_string(),
            message: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("registryUrl"));
    }
}

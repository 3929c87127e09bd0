//! # resource-catalog
//!
//! Metadata extraction and artifact generation for a repository of markdown
//! resources: agents, prompts, instructions, skills, hooks, workflows and plugins.
//!
//! The crate reads YAML frontmatter and sidecar configuration files, normalizes
//! them into one data model ([`resources::ResourceRecord`]), and derives:
//!
//! - website JSON data files and a flat search index ([`catalog`])
//! - per-kind README tables with registry-linked MCP servers ([`readme`])
//! - a plugin marketplace manifest and materialized plugin bundles ([`plugins`])
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use resource_catalog::{Catalog, RepositoryLayout, history::GitHistory};
//!
//! fn main() -> Result<(), resource_catalog::Error> {
//!     let layout = RepositoryLayout::new(".");
//!     let history = GitHistory::load(&layout);
//!     let catalog = Catalog::collect(&layout, &history)?;
//!     println!("{} agents", catalog.agents.items.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Registry matching
//!
//! ```rust,no_run
//! use resource_catalog::registry::{Registry, RegistryClient};
//!
//! # async fn example() -> Result<(), resource_catalog::Error> {
//! let registry = Registry::new(RegistryClient::new(RegistryClient::DEFAULT_URL)?);
//! let catalog = registry.catalog().await;
//! if let Some(entry) = catalog.find("github") {
//!     println!("linked to {}", entry.link());
//! }
//! # Ok(())
//! # }
//! ```

#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod catalog;
pub mod common;
pub mod config;
pub mod history;
pub mod plugins;
pub mod readme;
pub mod registry;
pub mod resources;

use std::path::PathBuf;

pub use catalog::{Catalog, Collection, SearchEntry, WebsiteData};
pub use common::{Frontmatter, ParsedDocument, RepositoryLayout, WriteStatus};
pub use config::{ConfigError, Settings, SettingsLoader};
pub use plugins::{
    PluginDiscovery, PluginError, PluginManifest, PluginValidator, ValidationReport,
};
pub use readme::ReadmeGenerator;
pub use registry::{MatchPolicy, Registry, RegistryCatalog, RegistryClient, RegistryEntry};
pub use resources::{ResourceBase, ResourceKind, ResourceRecord};

/// Error type for resource-catalog operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Frontmatter block missing or undecodable.
    #[error(transparent)]
    Frontmatter(#[from] common::FrontmatterError),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A directory the operation depends on does not exist.
    #[error("Required directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    /// Plugin manifest or plugin layout problem.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Registry client could not be constructed.
    #[error("Registry error: {0}")]
    Registry(String),
}

/// Error category for unified error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Settings, malformed input documents, bad URLs
    Configuration,
    /// Missing directories or plugin layout problems that halt a tool
    Structural,
    /// IO and serialization failures
    Internal,
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::Frontmatter(_) | Error::Registry(_) => {
                ErrorCategory::Configuration
            }
            Error::MissingDirectory(_) | Error::Plugin(_) => ErrorCategory::Structural,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Internal,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.category() == ErrorCategory::Structural
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::Io(e) => Error::Io(e),
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
        }
    }
}

impl From<registry::RegistryError> for Error {
    fn from(err: registry::RegistryError) -> Self {
        Error::Registry(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingDirectory(PathBuf::from("/repo/plugins"));
        assert!(err.to_string().contains("/repo/plugins"));
        assert!(err.is_structural());
    }

    #[test]
    fn test_error_categories() {
        assert!(Error::Config("bad".into()).is_configuration_error());
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::InvalidValue {
            key: "registryUrl".to_string(),
            message: "not a url".to_string(),
        };
        let err: Error = config_err.into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("registryUrl"));
    }
}

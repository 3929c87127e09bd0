//! Plugin bundles: discovery, validation, materialization and marketplace publishing.
//!
//! A plugin is a folder under `plugins/` with a `.github/plugin/plugin.json` manifest
//! that references resources living elsewhere in the repository. Materialization copies
//! those resources into the folder; cleaning removes the copies again.
//!
//! # Directory Structure
//!
//! ```text
//! plugins/
//! └── review-kit/
//!     ├── .github/
//!     │   └── plugin/
//!     │       └── plugin.json      {"agents": ["./agents/reviewer.md"], ...}
//!     ├── README.md
//!     ├── agents/                  materialized from agents/reviewer.agent.md
//!     ├── commands/                materialized from prompts/*.prompt.md
//!     └── skills/                  materialized from skills/<name>/
//! ```

mod discovery;
mod error;
pub mod manifest;
mod marketplace;
mod materialize;
pub mod reference;
mod scaffold;
pub mod validator;

pub use discovery::{DiscoveredPlugins, PluginDiscovery};
pub use error::PluginError;
pub use manifest::{PluginAuthor, PluginDescriptor, PluginManifest};
pub use marketplace::{Marketplace, MarketplaceEntry, MarketplaceMetadata};
pub use materialize::{CleanSummary, MATERIALIZED_DIRS, MaterializeSummary, clean, materialize};
pub use reference::{ReferenceField, ShapeViolation, SourceRef};
pub use scaffold::{PluginScaffolder, ScaffoldRequest};
pub use validator::{
    PluginValidation, PluginValidator, PluginViolation, ValidationOutcome, ValidationReport,
};

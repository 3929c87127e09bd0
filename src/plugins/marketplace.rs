use serde::Serialize;

use super::PluginDiscovery;
use crate::common::{RepositoryLayout, WriteStatus, write_json_if_changed};
use crate::config::{MarketplaceOwner, MarketplaceSettings};
use crate::{Error, Result};

const DEFAULT_PLUGIN_VERSION: &str = "1.0.0";

/// The marketplace manifest published at `.github/plugin/marketplace.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marketplace {
    pub name: String,
    pub metadata: MarketplaceMetadata,
    pub owner: MarketplaceOwner,
    pub plugins: Vec<MarketplaceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceMetadata {
    pub description: String,
    pub version: String,
    pub plugin_root: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketplaceEntry {
    pub name: String,
    /// `./plugins/<folder>`
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub version: String,
}

impl Marketplace {
    /// Build the manifest from every plugin folder, sorted by folder name.
    pub fn build(layout: &RepositoryLayout, settings: &MarketplaceSettings) -> Result<Self> {
        let plugins_dir = layout.plugins_dir();
        if !plugins_dir.is_dir() {
            return Err(Error::MissingDirectory(plugins_dir));
        }

        let plugins = PluginDiscovery::discover(&[plugins_dir])
            .into_iter()
            .map(|plugin| {
                tracing::debug!(plugin = plugin.name(), "Added plugin");
                MarketplaceEntry {
                    name: plugin.name().to_string(),
                    source: format!("./{}/{}", crate::common::layout::PLUGINS_DIR, plugin.folder()),
                    description: plugin.manifest().description.clone(),
                    version: plugin
                        .manifest()
                        .version
                        .clone()
                        .unwrap_or_else(|| DEFAULT_PLUGIN_VERSION.to_string()),
                }
            })
            .collect();

        Ok(Self {
            name: settings.name.clone(),
            metadata: MarketplaceMetadata {
                description: settings.description.clone(),
                version: settings.version.clone(),
                plugin_root: settings.plugin_root.clone(),
            },
            owner: settings.owner.clone(),
            plugins,
        })
    }

    pub fn write(&self, layout: &RepositoryLayout) -> Result<WriteStatus> {
        let path = layout.marketplace_path();
        let status = write_json_if_changed(&path, self)?;
        tracing::info!(
            path = %path.display(),
            plugins = self.plugins.len(),
            ?status,
            "Generated marketplace manifest"
        );
        Ok(status)
    }
}

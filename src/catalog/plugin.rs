use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::layout::PLUGINS_DIR;
use crate::history::VersionHistory;
use crate::plugins::{PluginDescriptor, ReferenceField};
use crate::resources::ResourceKind;

/// A plugin as listed on the website.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginSummary {
    /// Folder name.
    pub id: String,
    pub name: String,
    pub description: String,
    pub path: String,
    pub tags: Vec<String>,
    pub item_count: usize,
    pub items: Vec<PluginItem>,
    pub last_updated: Option<DateTime<Utc>>,
    pub search_text: String,
    /// Listed first in README tables; not part of the website data.
    #[serde(skip)]
    pub featured: bool,
}

/// One manifest reference, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PluginItem {
    pub kind: ResourceKind,
    pub path: String,
}

impl PluginSummary {
    pub fn from_descriptor(plugin: &PluginDescriptor, history: &dyn VersionHistory) -> Self {
        let manifest = plugin.manifest();
        let items: Vec<PluginItem> = ReferenceField::ALL
            .into_iter()
            .flat_map(|field| {
                manifest.references(field).iter().map(move |path| PluginItem {
                    kind: field.item_kind(),
                    path: path.clone(),
                })
            })
            .collect();

        let path = format!("{PLUGINS_DIR}/{}", plugin.folder());
        let manifest_path = format!("{path}/.github/plugin/plugin.json");
        let tags = manifest.keywords().to_vec();
        let search_text = format!(
            "{} {} {}",
            plugin.name(),
            plugin.description(),
            tags.join(" ")
        )
        .to_lowercase();

        Self {
            id: plugin.folder().to_string(),
            name: plugin.name().to_string(),
            description: plugin.description().to_string(),
            last_updated: history.last_modified(&manifest_path),
            path,
            tags,
            item_count: items.len(),
            items,
            search_text,
            featured: manifest.featured,
        }
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::plugin::PluginSummary;
use crate::resources::ResourceRecord;

pub const PLUGIN_ENTRY_TYPE: &str = "plugin";

/// One row of the flat cross-kind search index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    #[serde(rename = "type")]
    pub entry_type: &'static str,
    pub id: String,
    pub title: String,
    pub description: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub last_updated: Option<DateTime<Utc>>,
    pub search_text: String,
}

impl From<&ResourceRecord> for SearchEntry {
    fn from(record: &ResourceRecord) -> Self {
        let base = record.base();
        Self {
            entry_type: record.kind().as_str(),
            id: base.id.clone(),
            title: base.title.clone(),
            description: base.description.clone(),
            path: record.link_path().to_string(),
            tags: None,
            last_updated: base.last_updated,
            search_text: record.search_text(),
        }
    }
}

impl From<&PluginSummary> for SearchEntry {
    fn from(plugin: &PluginSummary) -> Self {
        Self {
            entry_type: PLUGIN_ENTRY_TYPE,
            id: plugin.id.clone(),
            title: plugin.name.clone(),
            description: plugin.description.clone(),
            path: plugin.path.clone(),
            tags: Some(plugin.tags.clone()),
            last_updated: plugin.last_updated,
            search_text: plugin.search_text.clone(),
        }
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, folder_id,
    required_identity,
};
use crate::common::{RepositoryLayout, bundled_assets, list_subdirs};

pub const HOOK_README: &str = "README.md";
pub const HOOK_CONFIG: &str = "hooks.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    pub name: String,
    /// Event names declared in `hooks.json`.
    pub hooks: Vec<String>,
    pub tags: Vec<String>,
    pub assets: Vec<String>,
    pub readme_file: String,
}

/// Event names from the `hooks` mapping of a hook config.
///
/// A missing file yields no events. An unreadable or malformed file is logged and yields no events.
pub fn read_hook_events(config_path: &Path) -> Vec<String> {
    if !config_path.is_file() {
        return Vec::new();
    }

    let parsed = fs::read_to_string(config_path)
        .map_err(|e| e.to_string())
        .and_then(|content| serde_json::from_str::<Value>(&content).map_err(|e| e.to_string()));

    match parsed {
        Ok(config) => config
            .get("hooks")
            .and_then(Value::as_object)
            .map(|hooks| hooks.keys().cloned().collect())
            .unwrap_or_default(),
        Err(error) => {
            tracing::warn!(path = %config_path.display(), %error, "Failed to parse hooks.json");
            Vec::new()
        }
    }
}

pub struct HookExtractor;

impl ResourceExtractor for HookExtractor {
    type Record = HookRecord;

    const KIND: ResourceKind = ResourceKind::Hook;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_subdirs(&layout.hooks_dir())
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<HookRecord> {
        let id = folder_id(path)?;
        let readme_path = path.join(HOOK_README);
        if !readme_path.is_file() {
            tracing::debug!(path = %path.display(), "Skipping folder without README.md");
            return None;
        }

        let doc = SourceDocument::read(&readme_path)?;
        let (name, description) =
            required_identity(doc.frontmatter.as_ref(), Self::KIND, path)?;

        let relative = ctx.layout.relative(path);
        let readme_file = format!("{relative}/{HOOK_README}");

        Some(HookRecord {
            base: ResourceBase {
                title: doc.folder_title(&id),
                description,
                last_updated: ctx.last_modified(&readme_file),
                path: relative,
                id,
            },
            name,
            hooks: read_hook_events(&path.join(HOOK_CONFIG)),
            tags: doc.string_list("tags"),
            assets: bundled_assets(path, HOOK_README),
            readme_file,
        })
    }
}

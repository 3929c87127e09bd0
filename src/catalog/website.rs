use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Catalog, SearchEntry};
use crate::Result;
use crate::common::{WriteStatus, write_json_if_changed};

pub const SEARCH_INDEX_FILE: &str = "search-index.json";
pub const MANIFEST_FILE: &str = "manifest.json";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebsiteManifest {
    pub generated: DateTime<Utc>,
    pub counts: ManifestCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ManifestCounts {
    pub agents: usize,
    pub prompts: usize,
    pub instructions: usize,
    pub skills: usize,
    pub hooks: usize,
    pub workflows: usize,
    pub plugins: usize,
    /// Size of the search index.
    pub total: usize,
}

/// Everything the website reads from its data directory.
#[derive(Debug, Clone)]
pub struct WebsiteData {
    pub catalog: Catalog,
    pub search_index: Vec<SearchEntry>,
    pub manifest: WebsiteManifest,
}

impl WebsiteData {
    pub fn new(catalog: Catalog, generated: DateTime<Utc>) -> Self {
        let search_index = catalog.search_index();
        let counts = ManifestCounts {
            agents: catalog.agents.len(),
            prompts: catalog.prompts.len(),
            instructions: catalog.instructions.len(),
            skills: catalog.skills.len(),
            hooks: catalog.hooks.len(),
            workflows: catalog.workflows.len(),
            plugins: catalog.plugins.len(),
            total: search_index.len(),
        };
        Self {
            catalog,
            search_index,
            manifest: WebsiteManifest { generated, counts },
        }
    }

    /// Write one file per kind, the search index and the manifest into `dir`.
    pub fn write(&self, dir: &Path) -> Result<Vec<(PathBuf, WriteStatus)>> {
        let catalog = &self.catalog;
        let documents = [
            ("agents.json", serde_json::to_value(&catalog.agents)?),
            ("prompts.json", serde_json::to_value(&catalog.prompts)?),
            ("instructions.json", serde_json::to_value(&catalog.instructions)?),
            ("skills.json", serde_json::to_value(&catalog.skills)?),
            ("hooks.json", serde_json::to_value(&catalog.hooks)?),
            ("workflows.json", serde_json::to_value(&catalog.workflows)?),
            ("plugins.json", serde_json::to_value(&catalog.plugins)?),
            (SEARCH_INDEX_FILE, serde_json::to_value(&self.search_index)?),
            (MANIFEST_FILE, serde_json::to_value(&self.manifest)?),
        ];

        let mut written = Vec::with_capacity(documents.len());
        for (name, document) in documents {
            let path = dir.join(name);
            let status = write_json_if_changed(&path, &document)?;
            written.push((path, status));
        }

        tracing::info!(
            dir = %dir.display(),
            entries = self.search_index.len(),
            "Wrote website data"
        );
        Ok(written)
    }
}

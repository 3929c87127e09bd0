use std::fs;
use std::path::Path;

use super::PluginDiscovery;
use super::reference::{ReferenceField, SourceRef};
use crate::common::{RepositoryLayout, copy_dir_recursive, count_files, list_subdirs};
use crate::{Error, Result};

/// Plugin sub-directories populated by materialization.
pub const MATERIALIZED_DIRS: [&str; 3] = ["agents", "commands", "skills"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    pub agents: usize,
    pub commands: usize,
    pub skills: usize,
    pub warnings: usize,
}

impl MaterializeSummary {
    fn record(&mut self, field: ReferenceField) {
        match field {
            ReferenceField::Agents => self.agents += 1,
            ReferenceField::Commands => self.commands += 1,
            ReferenceField::Skills => self.skills += 1,
        }
    }
}

/// Copy every resource referenced by each plugin manifest into the plugin folder.
///
/// References with an unknown shape or a missing source are counted as warnings and skipped.
pub fn materialize(layout: &RepositoryLayout) -> Result<MaterializeSummary> {
    let plugins_dir = layout.plugins_dir();
    if !plugins_dir.is_dir() {
        return Err(Error::MissingDirectory(plugins_dir));
    }

    let mut summary = MaterializeSummary::default();
    for plugin in PluginDiscovery::discover(&[plugins_dir]) {
        let mut copied = 0usize;
        for field in ReferenceField::ALL {
            for reference in plugin.manifest().references(field) {
                let source = match SourceRef::parse(field, reference) {
                    Ok(source) => source,
                    Err(rule) => {
                        tracing::warn!(plugin = plugin.name(), %reference, %rule, "Unknown path format");
                        summary.warnings += 1;
                        continue;
                    }
                };
                if copy_source(layout, plugin.root_dir(), &source)? {
                    summary.record(field);
                    copied += 1;
                } else {
                    tracing::warn!(
                        plugin = plugin.name(),
                        source = %source.source_path(),
                        "Source not found"
                    );
                    summary.warnings += 1;
                }
            }
        }
        if copied > 0 {
            tracing::info!(plugin = plugin.name(), items = copied, "Materialized plugin");
        }
    }

    Ok(summary)
}

/// Returns `false` when the source does not exist.
fn copy_source(layout: &RepositoryLayout, plugin_dir: &Path, source: &SourceRef) -> Result<bool> {
    let from = layout.resolve(source.source_path());
    let to = plugin_dir.join(source.destination());

    match source.field {
        ReferenceField::Skills => {
            if !from.is_dir() {
                return Ok(false);
            }
            copy_dir_recursive(&from, &to)?;
        }
        ReferenceField::Agents | ReferenceField::Commands => {
            if !from.is_file() {
                return Ok(false);
            }
            if let Some(parent) = to.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&from, &to)?;
        }
    }
    Ok(true)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// `(plugin folder, sub-directory, files removed)` for each directory deleted.
    pub removed: Vec<(String, String, usize)>,
}

impl CleanSummary {
    pub fn total_files(&self) -> usize {
        self.removed.iter().map(|(_, _, count)| count).sum()
    }
}

/// Delete materialized sub-directories from every plugin folder.
pub fn clean(layout: &RepositoryLayout) -> Result<CleanSummary> {
    let plugins_dir = layout.plugins_dir();
    if !plugins_dir.is_dir() {
        return Err(Error::MissingDirectory(plugins_dir));
    }

    let mut summary = CleanSummary::default();
    for plugin_dir in list_subdirs(&plugins_dir) {
        let folder = plugin_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for subdir in MATERIALIZED_DIRS {
            let target = plugin_dir.join(subdir);
            if !target.is_dir() {
                continue;
            }
            let count = count_files(&target);
            fs::remove_dir_all(&target)?;
            tracing::info!(plugin = %folder, dir = subdir, files = count, "Removed materialized files");
            summary.removed.push((folder.clone(), subdir.to_string(), count));
        }
    }

    Ok(summary)
}

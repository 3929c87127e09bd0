use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::PluginError;
use super::manifest::{PluginDescriptor, PluginManifest, config_dir};
use crate::common::{file_name, list_subdirs};

/// Plugin folders found under one or more roots.
#[derive(Debug, Default)]
pub struct DiscoveredPlugins {
    /// Candidate plugin folders in scan order. A folder may lack a manifest.
    pub folders: Vec<PathBuf>,
    /// Folders whose name was already seen under an earlier root.
    pub duplicates: Vec<PluginError>,
}

pub struct PluginDiscovery;

impl PluginDiscovery {
    /// Scan `dirs`. Each directory is either a plugin root itself or a parent of plugin folders.
    ///
    /// Missing directories are skipped.
    pub fn scan(dirs: &[PathBuf]) -> DiscoveredPlugins {
        let mut seen: HashMap<String, PathBuf> = HashMap::new();
        let mut found = DiscoveredPlugins::default();

        for dir in dirs {
            if !dir.exists() {
                tracing::debug!(dir = %dir.display(), "Plugin root not found");
                continue;
            }

            let candidates = if Self::is_plugin_root(dir) {
                vec![dir.clone()]
            } else {
                list_subdirs(dir)
            };

            for folder in candidates {
                let Some(name) = file_name(&folder).map(String::from) else {
                    continue;
                };
                if let Some(first) = seen.get(&name) {
                    found.duplicates.push(PluginError::DuplicateName {
                        name,
                        first: first.clone(),
                        second: folder.clone(),
                    });
                } else {
                    seen.insert(name, folder.clone());
                }
                found.folders.push(folder);
            }
        }

        found
    }

    /// Load every plugin with a readable manifest. Folders without one are skipped, broken
    /// manifests are logged and skipped.
    pub fn discover(dirs: &[PathBuf]) -> Vec<PluginDescriptor> {
        Self::scan(dirs)
            .folders
            .into_iter()
            .filter_map(|folder| match PluginManifest::load(&folder) {
                Ok(manifest) => Some(PluginDescriptor::new(manifest, folder)),
                Err(PluginError::ManifestNotFound { path }) => {
                    tracing::warn!(path = %path.display(), "No plugin.json found, skipping");
                    None
                }
                Err(e) => {
                    tracing::warn!(folder = %folder.display(), error = %e, "Skipping plugin");
                    None
                }
            })
            .collect()
    }

    fn is_plugin_root(dir: &Path) -> bool {
        config_dir(dir).is_dir()
    }
}

use std::fs;
use std::path::PathBuf;

use super::PluginError;
use super::manifest::{PLUGIN_README_FILE, PluginAuthor, PluginManifest, config_dir, manifest_path};
use super::validator::is_slug;
use crate::Result;
use crate::common::RepositoryLayout;
use crate::common::title::title_case;
use crate::config::{MarketplaceSettings, ScaffoldSettings};

const INITIAL_VERSION: &str = "1.0.0";
const DEFAULT_KEYWORD_COUNT: usize = 3;

/// What to scaffold. Everything but the id has a default derived from it.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldRequest {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub keywords: Vec<String>,
}

impl ScaffoldRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> String {
        non_blank(self.display_name.as_deref()).unwrap_or_else(|| title_case(&self.id))
    }

    pub fn description(&self) -> String {
        non_blank(self.description.as_deref())
            .unwrap_or_else(|| format!("A plugin for {}.", self.display_name().to_lowercase()))
    }

    /// Explicit keywords, else the first three segments of the id.
    pub fn keywords(&self) -> Vec<String> {
        let explicit: Vec<String> = self
            .keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect();
        if !explicit.is_empty() {
            return explicit;
        }
        self.id
            .split('-')
            .take(DEFAULT_KEYWORD_COUNT)
            .map(String::from)
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Creates new plugin folders under `plugins/`.
pub struct PluginScaffolder<'a> {
    layout: &'a RepositoryLayout,
    marketplace: &'a MarketplaceSettings,
    defaults: &'a ScaffoldSettings,
}

impl<'a> PluginScaffolder<'a> {
    pub fn new(
        layout: &'a RepositoryLayout,
        marketplace: &'a MarketplaceSettings,
        defaults: &'a ScaffoldSettings,
    ) -> Self {
        Self {
            layout,
            marketplace,
            defaults,
        }
    }

    /// Write `plugin.json` and `README.md` for a new plugin and return its folder.
    pub fn create(&self, request: &ScaffoldRequest) -> Result<PathBuf> {
        let id = request.id.trim();
        if id.is_empty() || !is_slug(id) {
            return Err(PluginError::InvalidName {
                name: id.to_string(),
                reason: "must contain only lowercase letters, numbers, and hyphens".into(),
            }
            .into());
        }

        let plugin_dir = self.layout.plugins_dir().join(id);
        if plugin_dir.exists() {
            return Err(PluginError::AlreadyExists {
                name: id.to_string(),
                path: plugin_dir,
            }
            .into());
        }

        let display_name = request.display_name();
        let manifest = PluginManifest {
            name: Some(id.to_string()),
            description: Some(request.description()),
            version: Some(INITIAL_VERSION.to_string()),
            keywords: Some(request.keywords()),
            author: Some(PluginAuthor {
                name: self.defaults.author.clone(),
                email: None,
                url: None,
            }),
            repository: Some(self.defaults.repository.clone()),
            license: Some(self.defaults.license.clone()),
            ..Default::default()
        };

        fs::create_dir_all(config_dir(&plugin_dir))?;
        let json = serde_json::to_string_pretty(&manifest).map_err(PluginError::Json)?;
        fs::write(manifest_path(&plugin_dir), json + "\n")?;
        fs::write(
            plugin_dir.join(PLUGIN_README_FILE),
            self.readme(id, &display_name, manifest.description.as_deref().unwrap_or_default()),
        )?;

        tracing::info!(plugin = id, path = %plugin_dir.display(), "Created plugin");
        Ok(plugin_dir)
    }

    fn readme(&self, id: &str, display_name: &str, description: &str) -> String {
        format!(
            "# {display_name} Plugin\n\n\
             {description}\n\n\
             ## Installation\n\n\
             ```bash\n\
             copilot plugin install {id}@{marketplace}\n\
             ```\n\n\
             ## What's Included\n\n\
             _Add your plugin contents here._\n\n\
             ## Source\n\n\
             This plugin is part of [Awesome Copilot]({repository}).\n\n\
             ## License\n\n\
             {license}\n",
            marketplace = self.marketplace.name,
            repository = self.defaults.repository,
            license = self.defaults.license,
        )
    }
}

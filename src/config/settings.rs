//! Catalog settings with layered loading.
//!
//! Loads settings from (lowest to highest priority):
//! 1. Built-in defaults
//! 2. Repository settings: `<root>/catalog.json`
//! 3. Environment: `CATALOG_REGISTRY_URL`, `CATALOG_WEBSITE_DATA_DIR`, `CATALOG_DOCS_DIR`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::env::EnvOverrides;
use super::{ConfigError, ConfigResult};

pub const SETTINGS_FILE: &str = "catalog.json";

const DEFAULT_REGISTRY_URL: &str = "https://api.mcp.github.com/v0.1/servers/";
const DEFAULT_WEBSITE_DATA_DIR: &str = "website/public/data";
const DEFAULT_DOCS_DIR: &str = "docs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub registry_url: String,
    /// Website data output, relative to the repository root.
    pub website_data_dir: PathBuf,
    /// Category README output, relative to the repository root.
    pub docs_dir: PathBuf,
    pub marketplace: MarketplaceSettings,
    pub scaffold: ScaffoldSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            website_data_dir: PathBuf::from(DEFAULT_WEBSITE_DATA_DIR),
            docs_dir: PathBuf::from(DEFAULT_DOCS_DIR),
            marketplace: MarketplaceSettings::default(),
            scaffold: ScaffoldSettings::default(),
        }
    }
}

impl Settings {
    pub fn website_data_path(&self, root: &Path) -> PathBuf {
        root.join(&self.website_data_dir)
    }

    pub fn docs_path(&self, root: &Path) -> PathBuf {
        root.join(&self.docs_dir)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        url::Url::parse(&self.registry_url).map_err(|e| ConfigError::InvalidValue {
            key: "registryUrl".into(),
            message: e.to_string(),
        })?;
        if self.marketplace.name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "marketplace.name".into(),
                message: "must not be empty".into(),
            });
        }
        Ok(())
    }
}

/// Identity written into the marketplace manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketplaceSettings {
    pub name: String,
    pub description: String,
    pub version: String,
    pub plugin_root: String,
    pub owner: MarketplaceOwner,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            name: "awesome-copilot".into(),
            description:
                "Community-driven collection of GitHub Copilot plugins, agents, prompts, and skills"
                    .into(),
            version: "1.0.0".into(),
            plugin_root: "./plugins".into(),
            owner: MarketplaceOwner::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketplaceOwner {
    pub name: String,
    pub email: String,
}

impl Default for MarketplaceOwner {
    fn default() -> Self {
        Self {
            name: "GitHub".into(),
            email: "copilot@github.com".into(),
        }
    }
}

/// Values stamped into newly scaffolded plugins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    pub author: String,
    pub repository: String,
    pub license: String,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            author: "Awesome Copilot Community".into(),
            repository: "https://github.com/github/awesome-copilot".into(),
            license: "MIT".into(),
        }
    }
}

/// Settings loader that merges defaults, the repository file and the environment.
#[derive(Debug, Default)]
pub struct SettingsLoader {
    env: EnvOverrides,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env(env: EnvOverrides) -> Self {
        Self { env }
    }

    pub fn load(&self, root: &Path) -> ConfigResult<Settings> {
        let mut settings = Self::load_file(&root.join(SETTINGS_FILE))?;
        self.apply_env(&mut settings)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults when the file is absent.
    pub fn load_file(path: &Path) -> ConfigResult<Settings> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(Settings::default());
        }
        let content = std::fs::read_to_string(path)?;
        let settings = serde_json::from_str(&content)?;
        tracing::debug!(path = %path.display(), "Loaded settings file");
        Ok(settings)
    }

    fn apply_env(&self, settings: &mut Settings) -> ConfigResult<()> {
        if let Some(url) = self.env.get("registry_url")? {
            settings.registry_url = url;
        }
        if let Some(dir) = self.env.get("website_data_dir")? {
            settings.website_data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = self.env.get("docs_dir")? {
            settings.docs_dir = PathBuf::from(dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn isolated_loader(prefix: &str) -> SettingsLoader {
        SettingsLoader::with_env(EnvOverrides::prefixed(prefix))
    }

    #[test]
    fn test_defaults_without_file() {
        let dir = tempdir().unwrap();
        let settings = isolated_loader("TEST_SETTINGS_DEFAULTS_")
            .load(dir.path())
            .unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.marketplace.name, "awesome-copilot");
        assert_eq!(settings.marketplace.owner.email, "copilot@github.com");
        assert_eq!(
            settings.website_data_path(dir.path()),
            dir.path().join("website/public/data")
        );
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"docsDir": "site", "marketplace": {"name": "internal", "pluginRoot": "./bundles"}}"#,
        )
        .unwrap();

        let settings = isolated_loader("TEST_SETTINGS_FILE_")
            .load(dir.path())
            .unwrap();
        assert_eq!(settings.docs_dir, PathBuf::from("site"));
        assert_eq!(settings.marketplace.name, "internal");
        assert_eq!(settings.marketplace.plugin_root, "./bundles");
        assert_eq!(settings.marketplace.version, "1.0.0");
        assert_eq!(settings.registry_url, DEFAULT_REGISTRY_URL);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"registryUrl": "https://file.example/servers"}"#,
        )
        .unwrap();

        // SAFETY: Test-only environment setup with a prefix no other test uses
        unsafe {
            std::env::set_var(
                "TEST_SETTINGS_ENV_REGISTRY_URL",
                "http://127.0.0.1:9/servers",
            )
        };
        let settings = isolated_loader("TEST_SETTINGS_ENV_").load(dir.path()).unwrap();
        unsafe { std::env::remove_var("TEST_SETTINGS_ENV_REGISTRY_URL") };

        assert_eq!(settings.registry_url, "http://127.0.0.1:9/servers");
    }

    #[test]
    fn test_invalid_registry_url() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"registryUrl": "not a url"}"#,
        )
        .unwrap();

        let err = isolated_loader("TEST_SETTINGS_INVALID_")
            .load(dir.path())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "registryUrl"));
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{").unwrap();
        let err = SettingsLoader::load_file(&dir.path().join(SETTINGS_FILE)).unwrap_err();
        assert!(matches!(err, ConfigError::Serialization(_)));
    }
}

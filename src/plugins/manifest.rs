use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::PluginError;
use super::reference::ReferenceField;
use crate::common::file_name;

pub const PLUGIN_CONFIG_DIR: [&str; 2] = [".github", "plugin"];
pub const PLUGIN_MANIFEST_FILE: &str = "plugin.json";
pub const PLUGIN_README_FILE: &str = "README.md";

pub fn config_dir(root_dir: &Path) -> PathBuf {
    PLUGIN_CONFIG_DIR
        .iter()
        .fold(root_dir.to_path_buf(), |path, part| path.join(part))
}

pub fn manifest_path(root_dir: &Path) -> PathBuf {
    config_dir(root_dir).join(PLUGIN_MANIFEST_FILE)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PluginAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Typed view of `plugin.json`. Every field is optional here; the validator enforces presence.
///
/// Decoding is per field: a value of the wrong type is dropped on its own and the rest
/// of the manifest is kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PluginManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    /// Legacy spelling of `keywords`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<PluginAuthor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

impl PluginManifest {
    pub fn load(root_dir: &Path) -> Result<Self, PluginError> {
        let manifest_path = manifest_path(root_dir);
        if !manifest_path.exists() {
            return Err(PluginError::ManifestNotFound {
                path: manifest_path,
            });
        }
        let content = std::fs::read_to_string(&manifest_path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|e| PluginError::InvalidManifest {
                path: manifest_path.clone(),
                reason: e.to_string(),
            })?;
        match value {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            _ => Err(PluginError::InvalidManifest {
                path: manifest_path,
                reason: "expected a JSON object".to_string(),
            }),
        }
    }

    pub fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            name: text(fields, "name"),
            description: text(fields, "description"),
            version: text(fields, "version"),
            keywords: string_array(fields, "keywords"),
            tags: string_array(fields, "tags"),
            author: author(fields),
            repository: text(fields, "repository"),
            license: text(fields, "license"),
            featured: fields
                .get("featured")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            agents: string_array(fields, "agents").unwrap_or_default(),
            commands: string_array(fields, "commands").unwrap_or_default(),
            skills: string_array(fields, "skills").unwrap_or_default(),
        }
    }

    /// `keywords`, falling back to `tags`.
    pub fn keywords(&self) -> &[String] {
        self.keywords
            .as_deref()
            .or(self.tags.as_deref())
            .unwrap_or_default()
    }

    pub fn references(&self, field: ReferenceField) -> &[String] {
        match field {
            ReferenceField::Agents => &self.agents,
            ReferenceField::Commands => &self.commands,
            ReferenceField::Skills => &self.skills,
        }
    }
}

fn ignored(key: &str, value: &Value) {
    tracing::debug!(field = key, value = %value, "Ignoring plugin.json field with unexpected type");
}

/// Strings as-is, numbers and booleans as their JSON text.
fn text(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        v @ (Value::Number(_) | Value::Bool(_)) => Some(v.to_string()),
        other => {
            ignored(key, other);
            None
        }
    }
}

/// Array of strings; non-string entries are skipped.
fn string_array(fields: &Map<String, Value>, key: &str) -> Option<Vec<String>> {
    match fields.get(key)? {
        Value::Null => None,
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect(),
        ),
        other => {
            ignored(key, other);
            None
        }
    }
}

/// `{"name": ..}` object, or a bare string taken as the name.
fn author(fields: &Map<String, Value>) -> Option<PluginAuthor> {
    match fields.get("author")? {
        Value::Null => None,
        Value::String(name) => Some(PluginAuthor {
            name: name.clone(),
            email: None,
            url: None,
        }),
        Value::Object(author) => Some(PluginAuthor {
            name: text(author, "name").unwrap_or_default(),
            email: text(author, "email"),
            url: text(author, "url"),
        }),
        other => {
            ignored("author", other);
            None
        }
    }
}

/// A loaded manifest and the plugin folder it came from.
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    pub(crate) manifest: PluginManifest,
    pub(crate) root_dir: PathBuf,
}

impl PluginDescriptor {
    pub(crate) fn new(manifest: PluginManifest, root_dir: PathBuf) -> Self {
        Self { manifest, root_dir }
    }

    pub fn manifest(&self) -> &PluginManifest {
        &self.manifest
    }

    /// Folder name, which is the plugin's identifier.
    pub fn folder(&self) -> &str {
        file_name(&self.root_dir).unwrap_or_default()
    }

    /// Declared name, or the folder name when absent.
    pub fn name(&self) -> &str {
        self.manifest
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.folder())
    }

    pub fn description(&self) -> &str {
        self.manifest.description.as_deref().unwrap_or_default()
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.root_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_manifest(root: &Path, json: &str) {
        let dir = config_dir(root);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(PLUGIN_MANIFEST_FILE), json).unwrap();
    }

    #[test]
    fn test_manifest_load() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{
                "name": "azure-cloud",
                "description": "Azure tooling",
                "version": "1.2.0",
                "keywords": ["azure"],
                "author": {"name": "Alice", "email": "alice@example.com"},
                "agents": ["./agents/azure.md"],
                "skills": ["./skills/azure-deploy/"]
            }"#,
        );

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("azure-cloud"));
        assert_eq!(manifest.version.as_deref(), Some("1.2.0"));
        assert_eq!(manifest.keywords(), ["azure"]);
        assert_eq!(manifest.author.unwrap().email.as_deref(), Some("alice@example.com"));
        assert_eq!(manifest.agents, vec!["./agents/azure.md"]);
        assert!(manifest.commands.is_empty());
        assert!(!manifest.featured);
    }

    #[test]
    fn test_tags_alias() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), r#"{"name": "x", "tags": ["legacy"]}"#);
        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.keywords(), ["legacy"]);
    }

    #[test]
    fn test_mistyped_fields_degrade_individually() {
        let dir = tempdir().unwrap();
        write_manifest(
            dir.path(),
            r#"{
                "name": "loose",
                "description": ["not", "text"],
                "version": 2,
                "author": "Alice",
                "keywords": "azure",
                "agents": ["./agents/a.md", 3],
                "featured": "yes"
            }"#,
        );

        let manifest = PluginManifest::load(dir.path()).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("loose"));
        assert_eq!(manifest.description, None);
        assert_eq!(manifest.version.as_deref(), Some("2"));
        assert_eq!(manifest.author.as_ref().unwrap().name, "Alice");
        assert!(manifest.keywords().is_empty());
        assert_eq!(manifest.agents, vec!["./agents/a.md"]);
        assert!(!manifest.featured);
    }

    #[test]
    fn test_non_object_manifest_is_invalid() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), "[1, 2]");
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::InvalidManifest { .. }));
    }

    #[test]
    fn test_manifest_not_found() {
        let dir = tempdir().unwrap();
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::ManifestNotFound { .. }));
    }

    #[test]
    fn test_manifest_invalid_json() {
        let dir = tempdir().unwrap();
        write_manifest(dir.path(), "not json");
        let err = PluginManifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, PluginError::InvalidManifest { .. }));
    }

    #[test]
    fn test_descriptor_name_falls_back_to_folder() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("fallback-plugin");
        let descriptor = PluginDescriptor::new(PluginManifest::default(), root);
        assert_eq!(descriptor.name(), "fallback-plugin");
        assert_eq!(descriptor.description(), "");
    }
}

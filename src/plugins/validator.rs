//! Structural and referential validation of plugin manifests.
//!
//! Validation works on the raw JSON so that type mistakes (a number where a string is
//! expected, a string where an array is expected) surface as violations instead of a
//! single decode error. Every rule runs; nothing short-circuits except a missing or
//! unparseable manifest. The README check runs before parsing, so an unparseable manifest
//! still reports a missing README.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::PluginError;
use super::discovery::PluginDiscovery;
use super::manifest::{PLUGIN_README_FILE, manifest_path};
use super::reference::{ReferenceField, ShapeViolation, SourceRef};
use crate::common::{RepositoryLayout, file_name};

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_KEYWORDS: usize = 10;
pub const MAX_KEYWORD_LEN: usize = 30;

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"))
}

/// Lowercase letters, digits and hyphens only.
pub fn is_slug(value: &str) -> bool {
    slug_re().is_match(value)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginViolation {
    #[error("missing required file: README.md")]
    MissingReadme,

    #[error("name is required and must be a string")]
    NameMissing,

    #[error("name must be between 1 and 50 characters")]
    NameLength,

    #[error("name must contain only lowercase letters, numbers, and hyphens")]
    NameCharset,

    #[error("name \"{name}\" must match folder name \"{folder}\"")]
    NameFolderMismatch { name: String, folder: String },

    #[error("description is required and must be a string")]
    DescriptionMissing,

    #[error("description must be between 1 and 500 characters")]
    DescriptionLength,

    #[error("version is required and must be a string")]
    VersionMissing,

    #[error("keywords must be an array")]
    KeywordsNotArray,

    #[error("maximum 10 keywords allowed, found {0}")]
    TooManyKeywords(usize),

    #[error("keywords[{0}] must be a string")]
    KeywordNotString(usize),

    #[error("keyword \"{0}\" must contain only lowercase letters, numbers, and hyphens")]
    KeywordCharset(String),

    #[error("keyword \"{0}\" must be between 1 and 30 characters")]
    KeywordLength(String),

    #[error("{0} must be an array")]
    FieldNotArray(ReferenceField),

    #[error("{field}[{index}] must be a string")]
    EntryNotString { field: ReferenceField, index: usize },

    #[error("{field}[{index}] {rule}")]
    ReferenceShape {
        field: ReferenceField,
        index: usize,
        rule: ShapeViolation,
    },

    #[error("{field}[{index}] source not found: {source_path}")]
    SourceNotFound {
        field: ReferenceField,
        index: usize,
        source_path: String,
    },
}

/// Terminal state of validating one plugin folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    MissingManifest,
    ParseFailed {
        reason: String,
        missing_readme: bool,
    },
    Invalid(Vec<PluginViolation>),
    Valid,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid)
    }

    /// One human-readable line per problem.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationOutcome::MissingManifest => {
                vec!["missing required file: .github/plugin/plugin.json".to_string()]
            }
            ValidationOutcome::ParseFailed {
                reason,
                missing_readme,
            } => {
                let mut messages = Vec::new();
                if *missing_readme {
                    messages.push(PluginViolation::MissingReadme.to_string());
                }
                messages.push(format!("failed to parse plugin.json: {reason}"));
                messages
            }
            ValidationOutcome::Invalid(violations) => {
                violations.iter().map(ToString::to_string).collect()
            }
            ValidationOutcome::Valid => Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PluginValidation {
    pub folder: String,
    pub path: PathBuf,
    pub outcome: ValidationOutcome,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub plugins: Vec<PluginValidation>,
    pub duplicates: Vec<PluginError>,
}

impl ValidationReport {
    pub fn is_success(&self) -> bool {
        self.duplicates.is_empty() && self.plugins.iter().all(|p| p.outcome.is_valid())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PluginValidation> {
        self.plugins.iter().filter(|p| !p.outcome.is_valid())
    }
}

pub struct PluginValidator<'a> {
    layout: &'a RepositoryLayout,
}

impl<'a> PluginValidator<'a> {
    pub fn new(layout: &'a RepositoryLayout) -> Self {
        Self { layout }
    }

    /// Validate every plugin folder under `roots`, flagging folder names seen twice.
    pub fn validate_all(&self, roots: &[PathBuf]) -> ValidationReport {
        let scanned = PluginDiscovery::scan(roots);
        let plugins = scanned
            .folders
            .iter()
            .map(|folder| {
                let validation = self.validate_folder(folder);
                tracing::debug!(
                    folder = %validation.folder,
                    valid = validation.outcome.is_valid(),
                    "Validated plugin"
                );
                validation
            })
            .collect();

        ValidationReport {
            plugins,
            duplicates: scanned.duplicates,
        }
    }

    pub fn validate_folder(&self, plugin_dir: &Path) -> PluginValidation {
        let folder = file_name(plugin_dir).unwrap_or_default().to_string();
        let outcome = self.outcome(plugin_dir, &folder);
        PluginValidation {
            folder,
            path: plugin_dir.to_path_buf(),
            outcome,
        }
    }

    fn outcome(&self, plugin_dir: &Path, folder: &str) -> ValidationOutcome {
        let path = manifest_path(plugin_dir);
        if !path.is_file() {
            return ValidationOutcome::MissingManifest;
        }

        let missing_readme = !plugin_dir.join(PLUGIN_README_FILE).is_file();
        let manifest = match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<Value>(&raw).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(reason) => {
                return ValidationOutcome::ParseFailed {
                    reason,
                    missing_readme,
                };
            }
        };

        let mut violations = Vec::new();
        if missing_readme {
            violations.push(PluginViolation::MissingReadme);
        }
        self.check_manifest(&manifest, folder, &mut violations);

        if violations.is_empty() {
            ValidationOutcome::Valid
        } else {
            ValidationOutcome::Invalid(violations)
        }
    }

    /// Field rules for an already-parsed manifest.
    pub fn check_manifest(&self, manifest: &Value, folder: &str, out: &mut Vec<PluginViolation>) {
        check_name(manifest.get("name"), folder, out);
        check_description(manifest.get("description"), out);
        if non_empty_str(manifest.get("version")).is_none() {
            out.push(PluginViolation::VersionMissing);
        }
        let keywords = manifest
            .get("keywords")
            .filter(|v| !v.is_null())
            .or_else(|| manifest.get("tags").filter(|v| !v.is_null()));
        check_keywords(keywords, out);
        self.check_references(manifest, out);
    }

    fn check_references(&self, manifest: &Value, out: &mut Vec<PluginViolation>) {
        for field in ReferenceField::ALL {
            let Some(value) = manifest.get(field.field()) else {
                continue;
            };
            let Some(entries) = value.as_array() else {
                out.push(PluginViolation::FieldNotArray(field));
                continue;
            };

            for (index, entry) in entries.iter().enumerate() {
                let Some(reference) = entry.as_str() else {
                    out.push(PluginViolation::EntryNotString { field, index });
                    continue;
                };
                match SourceRef::parse(field, reference) {
                    Err(rule) => out.push(PluginViolation::ReferenceShape { field, index, rule }),
                    Ok(source) => {
                        let required = source.required_file();
                        if !self.layout.resolve(&required).is_file() {
                            out.push(PluginViolation::SourceNotFound {
                                field,
                                index,
                                source_path: required,
                            });
                        }
                    }
                }
            }
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn check_name(value: Option<&Value>, folder: &str, out: &mut Vec<PluginViolation>) {
    let Some(name) = non_empty_str(value) else {
        out.push(PluginViolation::NameMissing);
        return;
    };
    if name.chars().count() > MAX_NAME_LEN {
        out.push(PluginViolation::NameLength);
    }
    if !is_slug(name) {
        out.push(PluginViolation::NameCharset);
    }
    if name != folder {
        out.push(PluginViolation::NameFolderMismatch {
            name: name.to_string(),
            folder: folder.to_string(),
        });
    }
}

fn check_description(value: Option<&Value>, out: &mut Vec<PluginViolation>) {
    match non_empty_str(value) {
        None => out.push(PluginViolation::DescriptionMissing),
        Some(description) if description.chars().count() > MAX_DESCRIPTION_LEN => {
            out.push(PluginViolation::DescriptionLength)
        }
        Some(_) => {}
    }
}

fn check_keywords(value: Option<&Value>, out: &mut Vec<PluginViolation>) {
    let Some(value) = value else {
        return;
    };
    let Some(keywords) = value.as_array() else {
        out.push(PluginViolation::KeywordsNotArray);
        return;
    };
    if keywords.len() > MAX_KEYWORDS {
        out.push(PluginViolation::TooManyKeywords(keywords.len()));
    }
    for (index, keyword) in keywords.iter().enumerate() {
        let Some(keyword) = keyword.as_str() else {
            out.push(PluginViolation::KeywordNotString(index));
            continue;
        };
        if !is_slug(keyword) {
            out.push(PluginViolation::KeywordCharset(keyword.to_string()));
        }
        let len = keyword.chars().count();
        if len == 0 || len > MAX_KEYWORD_LEN {
            out.push(PluginViolation::KeywordLength(keyword.to_string()));
        }
    }
}

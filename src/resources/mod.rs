//! Metadata extractors for the six resource kinds.
//!
//! Each kind implements [`ResourceExtractor`]: discover candidate paths under the
//! repository, then turn one path into a record or `None`. Extraction never fails
//! the run; problems are logged and the item is skipped or degraded.

pub mod agent;
pub mod hook;
pub mod instruction;
pub mod prompt;
pub mod skill;
pub mod workflow;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{
    Frontmatter, FrontmatterError, RepositoryLayout, TitleSource, derive_title, file_name,
    parse_document, split_frontmatter,
};
use crate::history::VersionHistory;

pub use agent::{AgentExtractor, AgentRecord, Handoff, McpServerConfig, McpServerRef};
pub use hook::{HookExtractor, HookRecord};
pub use instruction::{InstructionExtractor, InstructionRecord};
pub use prompt::{PromptExtractor, PromptRecord};
pub use skill::{SkillExtractor, SkillFile, SkillRecord};
pub use workflow::{WorkflowExtractor, WorkflowRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Agent,
    Prompt,
    Instruction,
    Skill,
    Hook,
    Workflow,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Agent,
        ResourceKind::Prompt,
        ResourceKind::Instruction,
        ResourceKind::Skill,
        ResourceKind::Hook,
        ResourceKind::Workflow,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Agent => "agent",
            ResourceKind::Prompt => "prompt",
            ResourceKind::Instruction => "instruction",
            ResourceKind::Skill => "skill",
            ResourceKind::Hook => "hook",
            ResourceKind::Workflow => "workflow",
        }
    }

    /// Plural form used for directory names, data files and README names.
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Agent => "agents",
            ResourceKind::Prompt => "prompts",
            ResourceKind::Instruction => "instructions",
            ResourceKind::Skill => "skills",
            ResourceKind::Hook => "hooks",
            ResourceKind::Workflow => "workflows",
        }
    }

    pub fn is_folder_based(self) -> bool {
        matches!(self, ResourceKind::Skill | ResourceKind::Hook)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes shared by every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBase {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Repository-relative path with forward slashes.
    pub path: String,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRecord {
    Agent(AgentRecord),
    Prompt(PromptRecord),
    Instruction(InstructionRecord),
    Skill(SkillRecord),
    Hook(HookRecord),
    Workflow(WorkflowRecord),
}

impl ResourceRecord {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRecord::Agent(_) => ResourceKind::Agent,
            ResourceRecord::Prompt(_) => ResourceKind::Prompt,
            ResourceRecord::Instruction(_) => ResourceKind::Instruction,
            ResourceRecord::Skill(_) => ResourceKind::Skill,
            ResourceRecord::Hook(_) => ResourceKind::Hook,
            ResourceRecord::Workflow(_) => ResourceKind::Workflow,
        }
    }

    pub fn base(&self) -> &ResourceBase {
        match self {
            ResourceRecord::Agent(r) => &r.base,
            ResourceRecord::Prompt(r) => &r.base,
            ResourceRecord::Instruction(r) => &r.base,
            ResourceRecord::Skill(r) => &r.base,
            ResourceRecord::Hook(r) => &r.base,
            ResourceRecord::Workflow(r) => &r.base,
        }
    }

    /// Path the search index points at. Skills and hooks link their manifest file.
    pub fn link_path(&self) -> &str {
        match self {
            ResourceRecord::Skill(r) => &r.skill_file,
            ResourceRecord::Hook(r) => &r.readme_file,
            other => &other.base().path,
        }
    }

    /// Lowercased text searched by the website.
    pub fn search_text(&self) -> String {
        let base = self.base();
        let extra = match self {
            ResourceRecord::Agent(r) => vec![r.tools.join(" ")],
            ResourceRecord::Instruction(r) => vec![r.apply_to_text()],
            ResourceRecord::Hook(r) => vec![r.hooks.join(" "), r.tags.join(" ")],
            ResourceRecord::Workflow(r) => vec![r.triggers.join(" "), r.tags.join(" ")],
            ResourceRecord::Prompt(_) | ResourceRecord::Skill(_) => Vec::new(),
        };

        let mut text = format!("{} {}", base.title, base.description);
        for part in extra {
            text.push(' ');
            text.push_str(&part);
        }
        text.to_lowercase()
    }
}

/// Collaborators every extractor reads from.
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    pub layout: &'a RepositoryLayout,
    pub history: &'a dyn VersionHistory,
}

impl<'a> ExtractContext<'a> {
    pub fn new(layout: &'a RepositoryLayout, history: &'a dyn VersionHistory) -> Self {
        Self { layout, history }
    }

    pub fn last_modified(&self, relative: &str) -> Option<DateTime<Utc>> {
        self.history.last_modified(relative)
    }
}

pub trait ResourceExtractor {
    type Record;

    const KIND: ResourceKind;

    /// Missing directories for required kinds are logged as warnings.
    const REQUIRED: bool = false;

    /// Candidate files or folders, sorted.
    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf>;

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<Self::Record>;

    /// Extract every discoverable record, in discovery order.
    fn collect(ctx: &ExtractContext<'_>) -> Vec<Self::Record> {
        let dir = ctx.layout.resolve(Self::KIND.plural());
        if !dir.is_dir() {
            if Self::REQUIRED {
                tracing::warn!(dir = %dir.display(), kind = %Self::KIND, "Resource directory not found");
            } else {
                tracing::debug!(dir = %dir.display(), kind = %Self::KIND, "Resource directory not found");
            }
            return Vec::new();
        }

        let records: Vec<Self::Record> = Self::discover(ctx.layout)
            .iter()
            .filter_map(|path| Self::extract(path, ctx))
            .collect();
        tracing::debug!(kind = %Self::KIND, count = records.len(), "Extracted resources");
        records
    }
}

/// A markdown document read for extraction.
pub(crate) struct SourceDocument {
    pub frontmatter: Option<Frontmatter>,
    /// Text searched for a heading title; `None` when the metadata block never closes.
    pub heading_region: Option<String>,
}

impl SourceDocument {
    /// Read a document. Only I/O failure yields `None`; frontmatter problems degrade.
    pub fn read(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read resource");
                return None;
            }
        };

        let doc = match parse_document(&content) {
            Ok(doc) => Self {
                frontmatter: Some(doc.frontmatter),
                heading_region: Some(doc.body),
            },
            Err(FrontmatterError::Missing) => Self {
                frontmatter: None,
                heading_region: Some(content),
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse frontmatter");
                let heading_region = split_frontmatter(&content)
                    .ok()
                    .map(|(_, body, _)| body.to_string());
                Self {
                    frontmatter: None,
                    heading_region,
                }
            }
        };
        Some(doc)
    }

    pub fn title(&self, stem: &str) -> String {
        derive_title(&TitleSource {
            frontmatter: self.frontmatter.as_ref(),
            body: self.heading_region.as_deref(),
            stem,
        })
    }

    /// Title for a folder-based resource; headings are not consulted.
    pub fn folder_title(&self, folder: &str) -> String {
        derive_title(&TitleSource {
            frontmatter: self.frontmatter.as_ref(),
            body: None,
            stem: folder,
        })
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        self.frontmatter.as_ref().and_then(|fm| fm.str(key))
    }

    pub fn string_list(&self, key: &str) -> Vec<String> {
        self.frontmatter
            .as_ref()
            .map(|fm| fm.string_list(key))
            .unwrap_or_default()
    }

    pub fn description(&self) -> String {
        self.str("description").unwrap_or_default().to_string()
    }
}

/// File name and the id left after removing `suffix`.
pub(crate) fn id_from_file<'p>(path: &'p Path, suffix: &str) -> Option<(&'p str, String)> {
    let name = file_name(path)?;
    let id = name.strip_suffix(suffix)?;
    Some((name, id.to_string()))
}

/// Folder name of a folder-based resource.
pub(crate) fn folder_id(path: &Path) -> Option<String> {
    file_name(path).map(String::from)
}

/// `name` and `description` required by skills, hooks and workflows.
pub(crate) fn required_identity(
    frontmatter: Option<&Frontmatter>,
    kind: ResourceKind,
    path: &Path,
) -> Option<(String, String)> {
    let fm = frontmatter?;
    match (fm.str("name"), fm.str("description")) {
        (Some(name), Some(description)) => Some((name.to_string(), description.to_string())),
        _ => {
            tracing::warn!(
                path = %path.display(),
                kind = %kind,
                "Invalid resource: missing name or description in frontmatter"
            );
            None
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::fs;
    use std::path::Path;

    use crate::common::RepositoryLayout;
    use crate::history::StaticHistory;

    pub fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    pub fn fixture() -> (tempfile::TempDir, RepositoryLayout, StaticHistory) {
        let temp = tempfile::tempdir().unwrap();
        let layout = RepositoryLayout::new(temp.path());
        (temp, layout, StaticHistory::new())
    }
}

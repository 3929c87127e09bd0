use std::path::{Path, PathBuf};

use super::directory::to_forward_slashes;

pub const AGENTS_DIR: &str = "agents";
pub const PROMPTS_DIR: &str = "prompts";
pub const INSTRUCTIONS_DIR: &str = "instructions";
pub const SKILLS_DIR: &str = "skills";
pub const HOOKS_DIR: &str = "hooks";
pub const WORKFLOWS_DIR: &str = "workflows";
pub const PLUGINS_DIR: &str = "plugins";

/// Well-known locations inside a resource repository.
#[derive(Debug, Clone)]
pub struct RepositoryLayout {
    root: PathBuf,
}

impl RepositoryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn agents_dir(&self) -> PathBuf {
        self.root.join(AGENTS_DIR)
    }

    pub fn prompts_dir(&self) -> PathBuf {
        self.root.join(PROMPTS_DIR)
    }

    pub fn instructions_dir(&self) -> PathBuf {
        self.root.join(INSTRUCTIONS_DIR)
    }

    pub fn skills_dir(&self) -> PathBuf {
        self.root.join(SKILLS_DIR)
    }

    pub fn hooks_dir(&self) -> PathBuf {
        self.root.join(HOOKS_DIR)
    }

    pub fn workflows_dir(&self) -> PathBuf {
        self.root.join(WORKFLOWS_DIR)
    }

    pub fn plugins_dir(&self) -> PathBuf {
        self.root.join(PLUGINS_DIR)
    }

    pub fn readme_path(&self) -> PathBuf {
        self.root.join("README.md")
    }

    pub fn marketplace_path(&self) -> PathBuf {
        self.root.join(".github").join("plugin").join("marketplace.json")
    }

    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Repository-relative path with forward slashes. Paths outside the root are returned as-is.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => to_forward_slashes(rel),
            Err(_) => to_forward_slashes(path),
        }
    }
}

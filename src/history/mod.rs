//! Last-modified timestamps for repository files.

use std::collections::HashMap;
use std::process::Command;

use chrono::{DateTime, Utc};

use crate::common::RepositoryLayout;
use crate::common::layout::{
    AGENTS_DIR, HOOKS_DIR, INSTRUCTIONS_DIR, PLUGINS_DIR, PROMPTS_DIR, SKILLS_DIR, WORKFLOWS_DIR,
};

const COMMIT_MARKER: char = '\u{1f}';

pub trait VersionHistory: Send + Sync {
    /// Last modification time of a repository-relative, forward-slash path.
    fn last_modified(&self, path: &str) -> Option<DateTime<Utc>>;
}

/// Fixed path-to-date table.
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    dates: HashMap<String, DateTime<Utc>>,
}

impl StaticHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(mut self, path: impl Into<String>, date: DateTime<Utc>) -> Self {
        self.dates.insert(path.into(), date);
        self
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl VersionHistory for StaticHistory {
    fn last_modified(&self, path: &str) -> Option<DateTime<Utc>> {
        self.dates.get(path).copied()
    }
}

/// Commit dates read once from `git log` over the resource directories.
#[derive(Debug, Clone, Default)]
pub struct GitHistory {
    inner: StaticHistory,
}

impl GitHistory {
    /// Runs a single `git log` in the repository root. Any failure yields an empty history.
    pub fn load(layout: &RepositoryLayout) -> Self {
        let output = Command::new("git")
            .arg("log")
            .arg(format!("--format={COMMIT_MARKER}%cI"))
            .arg("--name-only")
            .arg("--")
            .args([
                AGENTS_DIR,
                PROMPTS_DIR,
                INSTRUCTIONS_DIR,
                HOOKS_DIR,
                WORKFLOWS_DIR,
                SKILLS_DIR,
                PLUGINS_DIR,
            ])
            .current_dir(layout.root())
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let history = Self::parse_log(&String::from_utf8_lossy(&output.stdout));
                tracing::info!(files = history.len(), "Loaded git history");
                history
            }
            Ok(output) => {
                tracing::warn!(
                    status = %output.status,
                    stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                    "git log failed, timestamps will be empty"
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not run git, timestamps will be empty");
                Self::default()
            }
        }
    }

    /// Parse newest-first `git log --name-only` output. The first date seen for a path wins.
    pub fn parse_log(log: &str) -> Self {
        let mut dates = HashMap::new();
        let mut current: Option<DateTime<Utc>> = None;

        for line in log.lines() {
            if let Some(stamp) = line.strip_prefix(COMMIT_MARKER) {
                current = DateTime::parse_from_rfc3339(stamp.trim())
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc));
                continue;
            }
            let path = line.trim();
            if path.is_empty() {
                continue;
            }
            if let Some(date) = current {
                dates.entry(path.to_string()).or_insert(date);
            }
        }

        Self {
            inner: StaticHistory { dates },
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl VersionHistory for GitHistory {
    fn last_modified(&self, path: &str) -> Option<DateTime<Utc>> {
        self.inner.last_modified(path)
    }
}

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, folder_id,
    required_identity,
};
use crate::common::{RepositoryLayout, bundled_assets, list_subdirs, walk_files};

pub const SKILL_FILE: &str = "SKILL.md";

/// Keyword rules tested in order against the lowercased `name description` text.
const CATEGORY_RULES: &[(&str, &[&str])] = &[
    ("Azure", &["azure", "appinsights"]),
    ("Git & GitHub", &["github", "gh-cli", "git-commit", "git "]),
    ("VS Code", &["vscode", "vs code"]),
    ("Testing", &["test", "qa", "playwright"]),
    ("Microsoft", &["microsoft", "m365", "workiq"]),
    ("CLI Tools", &["cli", "command"]),
    ("Diagrams", &["diagram", "plantuml", "visual"]),
    (".NET", &["nuget", "dotnet", ".net"]),
];

pub const DEFAULT_CATEGORY: &str = "Other";

pub fn categorize(name: &str, description: &str) -> &'static str {
    let text = format!("{name} {description}").to_lowercase();
    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(category, _)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillFile {
    /// Repository-relative path.
    pub path: String,
    /// Path relative to the skill folder.
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    pub name: String,
    pub assets: Vec<String>,
    pub has_assets: bool,
    pub asset_count: usize,
    pub category: String,
    pub skill_file: String,
    pub files: Vec<SkillFile>,
}

pub struct SkillExtractor;

impl ResourceExtractor for SkillExtractor {
    type Record = SkillRecord;

    const KIND: ResourceKind = ResourceKind::Skill;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_subdirs(&layout.skills_dir())
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<SkillRecord> {
        let id = folder_id(path)?;
        let skill_path = path.join(SKILL_FILE);
        if !skill_path.is_file() {
            tracing::debug!(path = %path.display(), "Skipping folder without SKILL.md");
            return None;
        }

        let doc = SourceDocument::read(&skill_path)?;
        let (name, description) =
            required_identity(doc.frontmatter.as_ref(), Self::KIND, path)?;

        let relative = ctx.layout.relative(path);
        let skill_file = format!("{relative}/{SKILL_FILE}");
        let assets = bundled_assets(path, SKILL_FILE);
        let files = walk_files(path)
            .into_iter()
            .map(|entry| SkillFile {
                path: format!("{relative}/{}", entry.relative),
                size: entry.path.metadata().map(|m| m.len()).unwrap_or_default(),
                name: entry.relative,
            })
            .collect();

        Some(SkillRecord {
            base: ResourceBase {
                title: doc.folder_title(&id),
                last_updated: ctx.last_modified(&skill_file),
                description: description.clone(),
                path: relative,
                id,
            },
            category: categorize(&name, &description).to_string(),
            name,
            has_assets: !assets.is_empty(),
            asset_count: assets.len(),
            assets,
            skill_file,
            files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{fixture, write};

    #[test]
    fn test_categorize_priority() {
        assert_eq!(categorize("azure-devops-cli", "Azure CLI"), "Azure");
        assert_eq!(categorize("gh-cli", "GitHub CLI helper"), "Git & GitHub");
        assert_eq!(categorize("webapp-testing", "Playwright"), "Testing");
        assert_eq!(categorize("nuget-manager", "Manage packages"), ".NET");
        assert_eq!(categorize("image-tool", "Resize images"), "Other");
    }

    #[test]
    fn test_extract_skill_with_assets() {
        let (temp, layout, history) = fixture();
        write(
            temp.path(),
            "skills/webapp-testing/SKILL.md",
            "---\nname: webapp-testing\ndescription: Test web apps with Playwright\n---\n# Body\n",
        );
        write(temp.path(), "skills/webapp-testing/scripts/helper.py", "print(1)\n");
        write(temp.path(), "skills/webapp-testing/LICENSE.txt", "MIT");
        let ctx = ExtractContext::new(&layout, &history);

        let records = SkillExtractor::collect(&ctx);
        assert_eq!(records.len(), 1);
        let skill = &records[0];
        assert_eq!(skill.base.id, "webapp-testing");
        assert_eq!(skill.base.title, "Webapp Testing");
        assert_eq!(skill.base.path, "skills/webapp-testing");
        assert_eq!(skill.skill_file, "skills/webapp-testing/SKILL.md");
        assert_eq!(skill.assets, vec!["LICENSE.txt", "scripts/helper.py"]);
        assert_eq!(skill.asset_count, 2);
        assert!(skill.has_assets);
        assert_eq!(skill.category, "Testing");

        let names: Vec<&str> = skill.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["LICENSE.txt", "SKILL.md", "scripts/helper.py"]);
        assert_eq!(skill.files[0].size, 3);
        assert_eq!(skill.files[2].path, "skills/webapp-testing/scripts/helper.py");
    }

    #[test]
    fn test_skill_missing_description_excluded() {
        let (temp, layout, history) = fixture();
        write(temp.path(), "skills/broken/SKILL.md", "---\nname: broken\n---\n");
        write(temp.path(), "skills/no-manifest/notes.md", "notes");
        write(temp.path(), "skills/ok/SKILL.md", "---\nname: ok\ndescription: fine\n---\n");
        let ctx = ExtractContext::new(&layout, &history);

        let records = SkillExtractor::collect(&ctx);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].base.id, "ok");
        assert!(!records[0].has_assets);
    }
}

//! Markdown tables for the per-category READMEs and the root README's featured plugins.
//!
//! Tables are rendered from a collected [`Catalog`]; agent MCP servers are linked
//! through a [`RegistryCatalog`], which may be empty when the registry was unreachable.

mod format;
pub mod templates;

use std::path::{Path, PathBuf};

pub use format::{
    BadgeType, REPO_RAW_BASE, encode_path, format_table_cell, install_badges, mcp_install_payload,
    mcp_server_cell,
};
use templates::SectionText;

use crate::Result;
use crate::catalog::{Catalog, PluginSummary, title_order};
use crate::common::{RepositoryLayout, WriteStatus, write_if_changed};
use crate::registry::RegistryCatalog;

const NO_ENTRIES: &str = "_No entries found yet._";

/// File name of a category README, e.g. `README.agents.md`.
pub fn category_file_name(plural: &str) -> String {
    format!("README.{plural}.md")
}

fn non_empty(text: &str) -> Option<&str> {
    Some(text).filter(|t| !t.is_empty())
}

fn table(header: &[&str], rows: Vec<String>) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let separator: Vec<String> = header.iter().map(|h| "-".repeat(h.len())).collect();
    let mut out = format!("| {} |\n| {} |\n", header.join(" | "), separator.join(" | "));
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    Some(out)
}

fn list_or(values: &[String], fallback: &str) -> String {
    if values.is_empty() {
        fallback.to_string()
    } else {
        values.join(", ")
    }
}

fn assets_cell(assets: &[String]) -> String {
    if assets.is_empty() {
        return "None".to_string();
    }
    assets
        .iter()
        .map(|a| format!("`{a}`"))
        .collect::<Vec<_>>()
        .join("<br />")
}

/// `Topic specific coding standards...` fallback for instructions without a description.
fn instruction_fallback(title: &str) -> String {
    let last = title.split(' ').next_back().unwrap_or_default();
    let topic = last.strip_suffix('s').unwrap_or(last);
    format!("{topic} specific coding standards and best practices")
}

/// Standalone category document: the section text and its table, or a placeholder.
fn category_document(section: &SectionText, table: Option<String>) -> String {
    match table {
        Some(table) => format!(
            "{}\n{}\n\n{}",
            section.standalone_heading(),
            section.usage,
            table
        ),
        None => format!(
            "{}\n\n{}\n\n{NO_ENTRIES}",
            section.standalone_heading(),
            section.usage
        ),
    }
}

pub struct ReadmeGenerator<'a> {
    catalog: &'a Catalog,
    registry: &'a RegistryCatalog,
}

impl<'a> ReadmeGenerator<'a> {
    pub fn new(catalog: &'a Catalog, registry: &'a RegistryCatalog) -> Self {
        Self { catalog, registry }
    }

    pub fn agents_table(&self) -> Option<String> {
        let rows = self
            .catalog
            .agents
            .items
            .iter()
            .map(|agent| {
                let link = encode_path(&format!("agents/{}", agent.filename));
                format!(
                    "| [{}](../{link})<br />{} | {} | {} |",
                    agent.base.title,
                    install_badges(&link, BadgeType::Agent),
                    format_table_cell(non_empty(&agent.base.description)),
                    format::mcp_server_cell(&agent.mcp_servers, self.registry),
                )
            })
            .collect();
        table(&["Title", "Description", "MCP Servers"], rows)
    }

    pub fn prompts_table(&self) -> Option<String> {
        let rows = self
            .catalog
            .prompts
            .items
            .iter()
            .map(|prompt| {
                let link = encode_path(&format!("prompts/{}", prompt.filename));
                format!(
                    "| [{}](../{link})<br />{} | {} |",
                    prompt.base.title,
                    install_badges(&link, BadgeType::Prompt),
                    format_table_cell(non_empty(&prompt.base.description)),
                )
            })
            .collect();
        table(&["Title", "Description"], rows)
    }

    pub fn instructions_table(&self) -> Option<String> {
        let rows = self
            .catalog
            .instructions
            .items
            .iter()
            .map(|instruction| {
                let link = encode_path(&format!("instructions/{}", instruction.filename));
                let description = match non_empty(&instruction.base.description) {
                    Some(text) => format_table_cell(Some(text)),
                    None => instruction_fallback(&instruction.base.title),
                };
                format!(
                    "| [{}](../{link})<br />{} | {description} |",
                    instruction.base.title,
                    install_badges(&link, BadgeType::Instructions),
                )
            })
            .collect();
        table(&["Title", "Description"], rows)
    }

    pub fn skills_table(&self) -> Option<String> {
        let mut skills: Vec<_> = self.catalog.skills.items.iter().collect();
        skills.sort_by(|a, b| title_order(&a.name, &b.name));
        let rows = skills
            .into_iter()
            .map(|skill| {
                format!(
                    "| [{}](../{}) | {} | {} |",
                    skill.name,
                    skill.skill_file,
                    format_table_cell(Some(&skill.base.description)),
                    assets_cell(&skill.assets),
                )
            })
            .collect();
        table(&["Name", "Description", "Bundled Assets"], rows)
    }

    pub fn hooks_table(&self) -> Option<String> {
        let mut hooks: Vec<_> = self.catalog.hooks.items.iter().collect();
        hooks.sort_by(|a, b| title_order(&a.name, &b.name));
        let rows = hooks
            .into_iter()
            .map(|hook| {
                format!(
                    "| [{}](../{}) | {} | {} | {} |",
                    hook.name,
                    hook.readme_file,
                    format_table_cell(Some(&hook.base.description)),
                    list_or(&hook.hooks, "N/A"),
                    assets_cell(&hook.assets),
                )
            })
            .collect();
        table(&["Name", "Description", "Events", "Bundled Assets"], rows)
    }

    pub fn workflows_table(&self) -> Option<String> {
        let mut workflows: Vec<_> = self.catalog.workflows.items.iter().collect();
        workflows.sort_by(|a, b| title_order(&a.name, &b.name));
        let rows = workflows
            .into_iter()
            .map(|workflow| {
                format!(
                    "| [{}](../{}) | {} | {} |",
                    workflow.name,
                    workflow.base.path,
                    format_table_cell(Some(&workflow.base.description)),
                    list_or(&workflow.triggers, "N/A"),
                )
            })
            .collect();
        table(&["Name", "Description", "Triggers"], rows)
    }

    /// Featured plugins first, each group ordered by name.
    pub fn plugins_table(&self) -> Option<String> {
        let (featured, regular): (Vec<&PluginSummary>, Vec<&PluginSummary>) = self
            .catalog
            .plugins
            .items
            .iter()
            .partition(|p| p.featured);
        let rows = featured
            .into_iter()
            .chain(regular)
            .map(|plugin| {
                let name = if plugin.featured {
                    format!("⭐ {}", plugin.name)
                } else {
                    plugin.name.clone()
                };
                plugin_row(&name, &format!("../{}/README.md", plugin.path), plugin)
            })
            .collect();
        table(&["Name", "Description", "Items", "Tags"], rows)
    }

    /// Every category document, keyed by file name.
    pub fn category_readmes(&self) -> Vec<(String, String)> {
        [
            ("instructions", &templates::INSTRUCTIONS, self.instructions_table()),
            ("prompts", &templates::PROMPTS, self.prompts_table()),
            ("agents", &templates::AGENTS, self.agents_table()),
            ("hooks", &templates::HOOKS, self.hooks_table()),
            ("workflows", &templates::WORKFLOWS, self.workflows_table()),
            ("skills", &templates::SKILLS, self.skills_table()),
            ("plugins", &templates::PLUGINS, self.plugins_table()),
        ]
        .into_iter()
        .map(|(plural, section, table)| {
            (category_file_name(plural), category_document(section, table))
        })
        .collect()
    }

    pub fn write_category_readmes(&self, docs_dir: &Path) -> Result<Vec<(PathBuf, WriteStatus)>> {
        let mut written = Vec::new();
        for (name, content) in self.category_readmes() {
            let path = docs_dir.join(&name);
            let status = write_if_changed(&path, &content)?;
            tracing::info!(file = %name, ?status, "Category README");
            written.push((path, status));
        }
        Ok(written)
    }

    /// Featured-plugins section for the root README, or `None` when nothing is featured.
    pub fn featured_section(&self) -> Option<String> {
        let rows: Vec<String> = self
            .catalog
            .plugins
            .items
            .iter()
            .filter(|p| p.featured)
            .map(|plugin| plugin_row(&plugin.name, &format!("{}/README.md", plugin.path), plugin))
            .collect();
        let table = table(&["Name", "Description", "Items", "Tags"], rows)?;
        Some(format!("{}\n\n{table}", templates::FEATURED_PLUGINS))
    }

    /// Splice the featured section into the root README.
    ///
    /// Returns `None` when nothing is featured or the README is absent.
    pub fn update_root_readme(&self, layout: &RepositoryLayout) -> Result<Option<WriteStatus>> {
        let Some(section) = self.featured_section() else {
            tracing::info!("No featured plugins to add to README.md");
            return Ok(None);
        };

        let path = layout.readme_path();
        if !path.is_file() {
            tracing::warn!(path = %path.display(), "README.md not found, skipping featured plugins");
            return Ok(None);
        }

        let current = std::fs::read_to_string(&path)?;
        let updated = splice_featured(&current, &section);
        Ok(Some(write_if_changed(&path, &updated)?))
    }
}

fn plugin_row(name: &str, link: &str, plugin: &PluginSummary) -> String {
    let description = non_empty(&plugin.description).unwrap_or("No description");
    format!(
        "| [{name}]({link}) | {} | {} items | {} |",
        format_table_cell(Some(description)),
        plugin.item_count,
        plugin.tags.join(", "),
    )
}

/// Replace the text between the featured-plugins heading and the MCP server heading,
/// or insert the section before the MCP server heading. Unchanged when neither applies.
pub fn splice_featured(readme: &str, section: &str) -> String {
    let replacement = format!("{section}\n\n");
    match readme.find(templates::FEATURED_PLUGINS_START) {
        Some(start) => match readme[start..].find(templates::FEATURED_PLUGINS_END) {
            Some(offset) => {
                let end = start + offset;
                format!("{}{replacement}{}", &readme[..start], &readme[end..])
            }
            None => readme.to_string(),
        },
        None => match readme.find(templates::FEATURED_PLUGINS_END) {
            Some(at) => format!("{}{replacement}{}", &readme[..at], &readme[at..]),
            None => readme.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::StaticHistory;
    use crate::registry::RegistryEntry;
    use crate::resources::test_support::{fixture, write};

    fn sample_catalog() -> (tempfile::TempDir, RepositoryLayout, Catalog) {
        let (temp, layout, _) = fixture();
        let root = temp.path();
        write(
            root,
            "agents/scraper.agent.md",
            "---\nname: scraper\ndescription: Scrapes | things\nmcp-servers:\n  apify:\n    type: local\n    command: npx\n---\n",
        );
        write(
            root,
            "instructions/python.instructions.md",
            "---\napplyTo: '**/*.py'\n---\n# Python Guidelines\n",
        );
        write(
            root,
            "skills/zeta/SKILL.md",
            "---\nname: zeta\ndescription: Z\n---\n",
        );
        write(
            root,
            "skills/alpha/SKILL.md",
            "---\nname: alpha\ndescription: A\n---\n",
        );
        write(root, "skills/alpha/run.sh", "echo\n");
        write(
            root,
            "plugins/basic/.github/plugin/plugin.json",
            r#"{"name": "basic", "keywords": ["x", "y"], "agents": ["./agents/scraper.md"]}"#,
        );
        write(
            root,
            "plugins/star/.github/plugin/plugin.json",
            r#"{"name": "star", "description": "Shiny", "featured": true}"#,
        );
        let catalog = Catalog::collect(&layout, &StaticHistory::new()).unwrap();
        (temp, layout, catalog)
    }

    #[test]
    fn test_agents_table_links_registry() {
        let (_temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::from_entries(vec![RegistryEntry::new(
            "com.apify/apify-mcp-server",
            None,
        )]);
        let table = ReadmeGenerator::new(&catalog, &registry).agents_table().unwrap();

        assert!(table.starts_with("| Title | Description | MCP Servers |\n| ----- | ----------- | ----------- |\n"));
        assert!(table.contains("| [Scraper](../agents/scraper.agent.md)<br />"));
        assert!(table.contains("| Scrapes &#124; things |"));
        assert!(table.contains("[apify](https://github.com/mcp/com.apify/apify-mcp-server)"));
    }

    #[test]
    fn test_instruction_description_fallback() {
        let (_temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let table = ReadmeGenerator::new(&catalog, &registry)
            .instructions_table()
            .unwrap();
        assert!(table.contains("[Python Guidelines](../instructions/python.instructions.md)"));
        assert!(table.contains("| Guideline specific coding standards and best practices |"));
    }

    #[test]
    fn test_skills_table_sorted_with_assets() {
        let (_temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let table = ReadmeGenerator::new(&catalog, &registry).skills_table().unwrap();
        let alpha = table.find("[alpha](../skills/alpha/SKILL.md) | A | `run.sh` |").unwrap();
        let zeta = table.find("[zeta](../skills/zeta/SKILL.md) | Z | None |").unwrap();
        assert!(alpha < zeta);
    }

    #[test]
    fn test_plugins_table_featured_first() {
        let (_temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let table = ReadmeGenerator::new(&catalog, &registry).plugins_table().unwrap();
        let rows: Vec<&str> = table.lines().skip(2).collect();
        assert_eq!(
            rows,
            vec![
                "| [⭐ star](../plugins/star/README.md) | Shiny | 0 items |  |",
                "| [basic](../plugins/basic/README.md) | No description | 1 items | x, y |",
            ]
        );
    }

    #[test]
    fn test_category_readmes_placeholder_and_heading() {
        let (_temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let readmes = ReadmeGenerator::new(&catalog, &registry).category_readmes();
        assert_eq!(readmes.len(), 7);

        let (name, hooks) = &readmes[3];
        assert_eq!(name, "README.hooks.md");
        assert!(hooks.starts_with("# 🪝 Hooks\n"));
        assert!(hooks.ends_with("_No entries found yet._"));

        let (name, agents) = &readmes[2];
        assert_eq!(name, "README.agents.md");
        assert!(agents.starts_with("# 🤖 Custom Agents\n"));
        assert!(agents.contains("### How to Use Custom Agents"));
    }

    #[test]
    fn test_write_category_readmes_idempotent() {
        let (temp, _layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let generator = ReadmeGenerator::new(&catalog, &registry);
        let docs = temp.path().join("docs");

        let first = generator.write_category_readmes(&docs).unwrap();
        assert!(first.iter().all(|(_, s)| *s == WriteStatus::Created));
        let second = generator.write_category_readmes(&docs).unwrap();
        assert!(second.iter().all(|(_, s)| *s == WriteStatus::Unchanged));
        assert!(docs.join("README.plugins.md").is_file());
    }

    #[test]
    fn test_splice_featured() {
        let section = "## 🌟 Featured Plugins\n\nNEW";

        let existing = "# Top\n\n## 🌟 Featured Plugins\n\nOLD\n\n## MCP Server\n\nrest\n";
        assert_eq!(
            splice_featured(existing, section),
            "# Top\n\n## 🌟 Featured Plugins\n\nNEW\n\n## MCP Server\n\nrest\n"
        );

        let missing = "# Top\n\n## MCP Server\n";
        assert_eq!(
            splice_featured(missing, section),
            "# Top\n\n## 🌟 Featured Plugins\n\nNEW\n\n## MCP Server\n"
        );

        assert_eq!(splice_featured("# Top\n", section), "# Top\n");
    }

    #[test]
    fn test_update_root_readme() {
        let (temp, layout, catalog) = sample_catalog();
        let registry = RegistryCatalog::empty();
        let generator = ReadmeGenerator::new(&catalog, &registry);
        assert_eq!(generator.update_root_readme(&layout).unwrap(), None);

        write(temp.path(), "README.md", "# Repo\n\n## MCP Server\n");
        assert_eq!(
            generator.update_root_readme(&layout).unwrap(),
            Some(WriteStatus::Updated)
        );
        let readme = std::fs::read_to_string(layout.readme_path()).unwrap();
        assert!(readme.contains("| [star](plugins/star/README.md) | Shiny | 0 items |  |"));
        assert!(!readme.contains("basic"));
        assert_eq!(
            generator.update_root_readme(&layout).unwrap(),
            Some(WriteStatus::Unchanged)
        );
    }
}

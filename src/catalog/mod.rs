//! Aggregation of every extractor's output into sorted, faceted collections.
//!
//! [`Catalog::collect`] runs each extractor once, sorts the records by title,
//! computes filter facets per kind and builds the flat search index consumed by
//! the website.

mod filters;
mod plugin;
mod search;
mod website;

use std::cmp::Ordering;

use serde::Serialize;

pub use filters::{
    AgentFilters, Facets, HookFilters, InstructionFilters, NONE_FACET, PluginFilters,
    PromptFilters, SkillFilters, WorkflowFilters,
};
pub use plugin::{PluginItem, PluginSummary};
pub use search::SearchEntry;
pub use website::{ManifestCounts, WebsiteData, WebsiteManifest};

use crate::common::RepositoryLayout;
use crate::history::VersionHistory;
use crate::plugins::PluginDiscovery;
use crate::resources::{
    AgentExtractor, AgentRecord, ExtractContext, HookExtractor, HookRecord, InstructionExtractor,
    InstructionRecord, PromptExtractor, PromptRecord, ResourceExtractor, ResourceRecord,
    SkillExtractor, SkillRecord, WorkflowExtractor, WorkflowRecord,
};
use crate::{Error, Result};

/// Case-insensitive order with exact text as the tie-break.
pub fn title_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Text a collection is sorted by.
pub trait SortKey {
    fn sort_key(&self) -> &str;
}

macro_rules! sort_by_title {
    ($($record:ty),* $(,)?) => {
        $(impl SortKey for $record {
            fn sort_key(&self) -> &str {
                &self.base.title
            }
        })*
    };
}

sort_by_title!(
    AgentRecord,
    PromptRecord,
    InstructionRecord,
    SkillRecord,
    HookRecord,
    WorkflowRecord,
);

impl SortKey for PluginSummary {
    fn sort_key(&self) -> &str {
        &self.name
    }
}

/// Items of one kind plus the facets the website filters them by.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T, F> {
    pub items: Vec<T>,
    pub filters: F,
}

impl<T: SortKey, F: Facets<T>> Collection<T, F> {
    pub fn build(mut items: Vec<T>) -> Self {
        items.sort_by(|a, b| title_order(a.sort_key(), b.sort_key()));
        let filters = F::from_items(&items);
        Self { items, filters }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    pub agents: Collection<AgentRecord, AgentFilters>,
    pub prompts: Collection<PromptRecord, PromptFilters>,
    pub instructions: Collection<InstructionRecord, InstructionFilters>,
    pub skills: Collection<SkillRecord, SkillFilters>,
    pub hooks: Collection<HookRecord, HookFilters>,
    pub workflows: Collection<WorkflowRecord, WorkflowFilters>,
    pub plugins: Collection<PluginSummary, PluginFilters>,
}

impl Catalog {
    /// Extract every resource under the repository root.
    ///
    /// Only a missing root is an error; missing kind directories yield empty collections.
    pub fn collect(layout: &RepositoryLayout, history: &dyn VersionHistory) -> Result<Self> {
        if !layout.root().is_dir() {
            return Err(Error::MissingDirectory(layout.root().to_path_buf()));
        }

        let ctx = ExtractContext::new(layout, history);
        let plugins = PluginDiscovery::discover(&[layout.plugins_dir()])
            .iter()
            .map(|plugin| PluginSummary::from_descriptor(plugin, history))
            .collect();

        let catalog = Self {
            agents: Collection::build(AgentExtractor::collect(&ctx)),
            prompts: Collection::build(PromptExtractor::collect(&ctx)),
            instructions: Collection::build(InstructionExtractor::collect(&ctx)),
            skills: Collection::build(SkillExtractor::collect(&ctx)),
            hooks: Collection::build(HookExtractor::collect(&ctx)),
            workflows: Collection::build(WorkflowExtractor::collect(&ctx)),
            plugins: Collection::build(plugins),
        };

        tracing::info!(
            agents = catalog.agents.len(),
            prompts = catalog.prompts.len(),
            instructions = catalog.instructions.len(),
            skills = catalog.skills.len(),
            hooks = catalog.hooks.len(),
            workflows = catalog.workflows.len(),
            plugins = catalog.plugins.len(),
            "Collected catalog"
        );
        Ok(catalog)
    }

    /// Every resource record in index order: agents, prompts, instructions, hooks,
    /// workflows, skills.
    pub fn records(&self) -> impl Iterator<Item = ResourceRecord> + '_ {
        let agents = self.agents.items.iter().cloned().map(ResourceRecord::Agent);
        let prompts = self.prompts.items.iter().cloned().map(ResourceRecord::Prompt);
        let instructions = self
            .instructions
            .items
            .iter()
            .cloned()
            .map(ResourceRecord::Instruction);
        let hooks = self.hooks.items.iter().cloned().map(ResourceRecord::Hook);
        let workflows = self.workflows.items.iter().cloned().map(ResourceRecord::Workflow);
        let skills = self.skills.items.iter().cloned().map(ResourceRecord::Skill);

        agents
            .chain(prompts)
            .chain(instructions)
            .chain(hooks)
            .chain(workflows)
            .chain(skills)
    }

    pub fn search_index(&self) -> Vec<SearchEntry> {
        self.records()
            .map(|record| SearchEntry::from(&record))
            .chain(self.plugins.items.iter().map(SearchEntry::from))
            .collect()
    }
}

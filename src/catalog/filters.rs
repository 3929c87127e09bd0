use serde::Serialize;

use super::plugin::PluginSummary;
use crate::common::sorted_distinct;
use crate::resources::{
    AgentRecord, HookRecord, InstructionRecord, PromptRecord, SkillRecord, WorkflowRecord,
};

/// Placeholder facet value for records that declare nothing.
pub const NONE_FACET: &str = "(none)";

/// Facet values computed from a collection's items.
pub trait Facets<T>: Sized {
    fn from_items(items: &[T]) -> Self;
}

fn with_none(values: Vec<String>) -> Vec<String> {
    std::iter::once(NONE_FACET.to_string()).chain(values).collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgentFilters {
    pub models: Vec<String>,
    pub tools: Vec<String>,
}

impl Facets<AgentRecord> for AgentFilters {
    fn from_items(items: &[AgentRecord]) -> Self {
        Self {
            models: with_none(sorted_distinct(
                items.iter().filter_map(|a| a.model.as_deref()),
            )),
            tools: sorted_distinct(items.iter().flat_map(|a| a.tools.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PromptFilters {
    pub tools: Vec<String>,
}

impl Facets<PromptRecord> for PromptFilters {
    fn from_items(items: &[PromptRecord]) -> Self {
        Self {
            tools: sorted_distinct(items.iter().flat_map(|p| p.tools.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InstructionFilters {
    pub patterns: Vec<String>,
    pub extensions: Vec<String>,
}

impl Facets<InstructionRecord> for InstructionFilters {
    fn from_items(items: &[InstructionRecord]) -> Self {
        Self {
            patterns: sorted_distinct(
                items
                    .iter()
                    .flat_map(|i| i.apply_to_patterns.iter().map(String::as_str)),
            ),
            extensions: with_none(sorted_distinct(
                items.iter().flat_map(|i| i.extensions.iter().map(String::as_str)),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillFilters {
    pub categories: Vec<String>,
    pub has_assets: Vec<String>,
}

impl Default for SkillFilters {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            has_assets: vec!["Yes".to_string(), "No".to_string()],
        }
    }
}

impl Facets<SkillRecord> for SkillFilters {
    fn from_items(items: &[SkillRecord]) -> Self {
        Self {
            categories: sorted_distinct(items.iter().map(|s| s.category.as_str())),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HookFilters {
    pub hooks: Vec<String>,
    pub tags: Vec<String>,
}

impl Facets<HookRecord> for HookFilters {
    fn from_items(items: &[HookRecord]) -> Self {
        Self {
            hooks: sorted_distinct(items.iter().flat_map(|h| h.hooks.iter().map(String::as_str))),
            tags: sorted_distinct(items.iter().flat_map(|h| h.tags.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WorkflowFilters {
    pub triggers: Vec<String>,
    pub tags: Vec<String>,
}

impl Facets<WorkflowRecord> for WorkflowFilters {
    fn from_items(items: &[WorkflowRecord]) -> Self {
        Self {
            triggers: sorted_distinct(
                items
                    .iter()
                    .flat_map(|w| w.triggers.iter().map(String::as_str)),
            ),
            tags: sorted_distinct(items.iter().flat_map(|w| w.tags.iter().map(String::as_str))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PluginFilters {
    pub tags: Vec<String>,
}

impl Facets<PluginSummary> for PluginFilters {
    fn from_items(items: &[PluginSummary]) -> Self {
        Self {
            tags: sorted_distinct(items.iter().flat_map(|p| p.tags.iter().map(String::as_str))),
        }
    }
}

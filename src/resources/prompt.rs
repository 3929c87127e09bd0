use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, id_from_file,
};
use crate::common::{RepositoryLayout, list_files_with_suffix};

pub const PROMPT_SUFFIX: &str = ".prompt.md";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    pub agent: Option<String>,
    pub model: Option<String>,
    pub tools: Vec<String>,
    pub filename: String,
}

pub struct PromptExtractor;

impl ResourceExtractor for PromptExtractor {
    type Record = PromptRecord;

    const KIND: ResourceKind = ResourceKind::Prompt;
    const REQUIRED: bool = true;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_files_with_suffix(&layout.prompts_dir(), PROMPT_SUFFIX)
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<PromptRecord> {
        let (filename, id) = id_from_file(path, PROMPT_SUFFIX)?;
        let doc = SourceDocument::read(path)?;
        let relative = ctx.layout.relative(path);

        Some(PromptRecord {
            base: ResourceBase {
                title: doc.title(&id),
                description: doc.description(),
                last_updated: ctx.last_modified(&relative),
                path: relative,
                id,
            },
            agent: doc.str("agent").map(String::from),
            model: doc.str("model").map(String::from),
            tools: doc.string_list("tools"),
            filename: filename.to_string(),
        })
    }
}

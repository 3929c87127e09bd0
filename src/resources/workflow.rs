use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, id_from_file,
    required_identity,
};
use crate::common::{RepositoryLayout, list_files_with_suffix};

pub const WORKFLOW_SUFFIX: &str = ".md";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    pub name: String,
    pub triggers: Vec<String>,
    pub tags: Vec<String>,
    pub filename: String,
}

pub struct WorkflowExtractor;

impl ResourceExtractor for WorkflowExtractor {
    type Record = WorkflowRecord;

    const KIND: ResourceKind = ResourceKind::Workflow;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_files_with_suffix(&layout.workflows_dir(), WORKFLOW_SUFFIX)
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<WorkflowRecord> {
        let (filename, id) = id_from_file(path, WORKFLOW_SUFFIX)?;
        let doc = SourceDocument::read(path)?;
        let (name, description) =
            required_identity(doc.frontmatter.as_ref(), Self::KIND, path)?;
        let relative = ctx.layout.relative(path);

        Some(WorkflowRecord {
            base: ResourceBase {
                title: doc.title(&id),
                description,
                last_updated: ctx.last_modified(&relative),
                path: relative,
                id,
            },
            name,
            triggers: doc.string_list("triggers"),
            tags: doc.string_list("tags"),
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{fixture, write};

    #[test]
    fn test_extract_workflow() {
        let (temp, layout, history) = fixture();
        write(
            temp.path(),
            "workflows/daily-triage.md",
            "---\nname: daily-triage\ndescription: Triage new issues\ntriggers: [schedule, issues]\n---\n",
        );
        write(temp.path(), "workflows/.gitkeep", "");
        write(temp.path(), "workflows/untitled.md", "# No frontmatter\n");
        let ctx = ExtractContext::new(&layout, &history);

        let records = WorkflowExtractor::collect(&ctx);
        assert_eq!(records.len(), 1);
        let workflow = &records[0];
        assert_eq!(workflow.base.id, "daily-triage");
        assert_eq!(workflow.base.title, "Daily Triage");
        assert_eq!(workflow.triggers, vec!["schedule", "issues"]);
        assert!(workflow.tags.is_empty());
        assert_eq!(workflow.filename, "daily-triage.md");
    }
}

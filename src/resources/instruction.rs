use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, id_from_file,
};
use crate::common::{RepositoryLayout, list_files_with_suffix};

pub const INSTRUCTION_SUFFIX: &str = ".instructions.md";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    /// `applyTo` exactly as declared.
    pub apply_to: Option<Value>,
    pub apply_to_patterns: Vec<String>,
    pub extensions: Vec<String>,
    pub filename: String,
}

impl InstructionRecord {
    /// Raw `applyTo` as text; arrays are joined with commas.
    pub fn apply_to_text(&self) -> String {
        match &self.apply_to {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            _ => String::new(),
        }
    }
}

fn single_ext_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\.([A-Za-z0-9_]+)$").expect("valid extension regex"))
}

fn brace_ext_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\.\{([^}]+)\}$").expect("valid brace extension regex"))
}

/// Extensions named by a glob's suffix: `**/*.ts` gives `.ts`, `*.{ts,tsx}` gives both.
pub fn extensions_from_pattern(pattern: &str) -> Vec<String> {
    if let Some(caps) = single_ext_re().captures(pattern) {
        return vec![format!(".{}", &caps[1])];
    }
    if let Some(caps) = brace_ext_re().captures(pattern) {
        return caps[1]
            .split(',')
            .map(|ext| format!(".{}", ext.trim()))
            .collect();
    }
    Vec::new()
}

/// Split a comma-separated `applyTo` string, keeping commas inside `{...}` groups.
pub fn split_patterns(raw: &str) -> Vec<String> {
    let mut patterns = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in raw.chars() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                patterns.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    patterns.push(current);

    patterns
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Declared patterns from either a sequence or a comma-separated string.
fn declared_patterns(apply_to: Option<&Value>, doc: &SourceDocument) -> Vec<String> {
    match apply_to {
        Some(Value::String(raw)) => split_patterns(raw),
        _ => doc.string_list("applyTo"),
    }
}

/// Distinct extensions across all patterns, in first-seen order.
pub fn derive_extensions(patterns: &[String]) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for ext in patterns.iter().flat_map(|p| extensions_from_pattern(p)) {
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }
    extensions
}

pub struct InstructionExtractor;

impl ResourceExtractor for InstructionExtractor {
    type Record = InstructionRecord;

    const KIND: ResourceKind = ResourceKind::Instruction;
    const REQUIRED: bool = true;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_files_with_suffix(&layout.instructions_dir(), INSTRUCTION_SUFFIX)
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<InstructionRecord> {
        let (filename, id) = id_from_file(path, INSTRUCTION_SUFFIX)?;
        let doc = SourceDocument::read(path)?;
        let relative = ctx.layout.relative(path);

        let apply_to = doc
            .frontmatter
            .as_ref()
            .and_then(|fm| fm.get("applyTo"))
            .filter(|v| !v.is_null())
            .cloned();
        let apply_to_patterns = declared_patterns(apply_to.as_ref(), &doc);
        let extensions = derive_extensions(&apply_to_patterns);

        Some(InstructionRecord {
            base: ResourceBase {
                title: doc.title(&id),
                description: doc.description(),
                last_updated: ctx.last_modified(&relative),
                path: relative,
                id,
            },
            apply_to,
            apply_to_patterns,
            extensions,
            filename: filename.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::test_support::{fixture, write};

    #[test]
    fn test_extensions_from_pattern() {
        assert_eq!(extensions_from_pattern("**/*.ts"), vec![".ts"]);
        assert_eq!(extensions_from_pattern("**/*.{ts, tsx}"), vec![".ts", ".tsx"]);
        assert!(extensions_from_pattern("**/Dockerfile").is_empty());
        assert!(extensions_from_pattern("*.ts/**").is_empty());
    }

    #[test]
    fn test_split_patterns_keeps_brace_groups() {
        assert_eq!(split_patterns("**/*.{ts,tsx}"), vec!["**/*.{ts,tsx}"]);
        assert_eq!(
            split_patterns("src/**/*.{js, jsx}, **/*.css ,"),
            vec!["src/**/*.{js, jsx}", "**/*.css"]
        );
        assert!(split_patterns(" , ").is_empty());
        assert_eq!(
            derive_extensions(&split_patterns("**/*.{ts,tsx}, **/*.md")),
            vec![".ts", ".tsx", ".md"]
        );
    }

    #[test]
    fn test_string_and_array_apply_to_agree() {
        let (temp, layout, history) = fixture();
        write(
            temp.path(),
            "instructions/a.instructions.md",
            "---\napplyTo: '**/*.ts, **/*.tsx'\n---\n",
        );
        write(
            temp.path(),
            "instructions/b.instructions.md",
            "---\napplyTo: ['**/*.ts', '**/*.tsx']\n---\n",
        );
        write(
            temp.path(),
            "instructions/c.instructions.md",
            "---\napplyTo: '**/*.{ts,tsx}'\n---\n",
        );
        let ctx = ExtractContext::new(&layout, &history);

        let records = InstructionExtractor::collect(&ctx);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].apply_to_patterns, records[1].apply_to_patterns);
        assert_eq!(records[0].apply_to_patterns, vec!["**/*.ts", "**/*.tsx"]);
        assert_eq!(records[0].extensions, vec![".ts", ".tsx"]);
        assert_eq!(records[2].apply_to_patterns, vec!["**/*.{ts,tsx}"]);
        assert_eq!(records[2].extensions, vec![".ts", ".tsx"]);

        assert_eq!(records[0].apply_to_text(), "**/*.ts, **/*.tsx");
        assert_eq!(records[1].apply_to_text(), "**/*.ts,**/*.tsx");
    }

    #[test]
    fn test_missing_apply_to() {
        let (temp, layout, history) = fixture();
        write(temp.path(), "instructions/x.instructions.md", "---\ndescription: d\n---\n");
        let ctx = ExtractContext::new(&layout, &history);
        let records = InstructionExtractor::collect(&ctx);
        assert_eq!(records[0].apply_to, None);
        assert!(records[0].apply_to_patterns.is_empty());
        assert!(records[0].extensions.is_empty());
    }
}

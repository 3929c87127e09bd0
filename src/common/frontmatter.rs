use std::path::Path;

use serde_json::{Map, Value};

const DELIMITER: &str = "---";

#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Document must have YAML frontmatter (starting with ---)")]
    Missing,

    #[error("Frontmatter not properly terminated with ---")]
    Unterminated,

    #[error("Failed to parse frontmatter: {0}")]
    Yaml(String),

    #[error("Frontmatter must be a mapping, found {0}")]
    NotMapping(&'static str),
}

/// Decoded frontmatter mapping with `name`, `title` and `description` normalized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter(Map<String, Value>);

impl Frontmatter {
    pub fn new(mut map: Map<String, Value>) -> Self {
        for key in ["name", "title"] {
            if let Some(Value::String(s)) = map.get_mut(key) {
                *s = s.trim_end_matches(['\r', '\n']).trim().to_string();
            }
        }
        if let Some(Value::String(s)) = map.get_mut("description") {
            s.truncate(s.trim_end().len());
        }
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Non-empty string value for `key`. Empty strings and non-string values are `None`.
    pub fn str(&self, key: &str) -> Option<&str> {
        match self.0.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// A list of strings from either a YAML sequence or a comma-separated string.
    ///
    /// Entries are trimmed and empty ones dropped. Scalars inside a sequence are
    /// rendered to text; nested mappings and sequences are skipped.
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(Value::String(s)) => s
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

pub struct ParsedDocument {
    pub frontmatter: Frontmatter,
    pub body: String,
    /// Zero-based index of the first line after the closing delimiter.
    pub body_start_line: usize,
}

/// Split `content` into its frontmatter YAML, the body, and the body's first line index.
pub fn split_frontmatter(content: &str) -> Result<(&str, &str, usize), FrontmatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut lines = content.split_inclusive('\n');

    let first = lines.next().ok_or(FrontmatterError::Missing)?;
    if !is_delimiter(first) {
        return Err(FrontmatterError::Missing);
    }

    let yaml_start = first.len();
    let mut offset = yaml_start;
    for (index, line) in lines.enumerate() {
        if is_delimiter(line) {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Ok((yaml, body, index + 2));
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']) == DELIMITER
}

pub fn parse_document(content: &str) -> Result<ParsedDocument, FrontmatterError> {
    let (yaml, body, body_start_line) = split_frontmatter(content)?;

    let map = if yaml.trim().is_empty() {
        Map::new()
    } else {
        let value: Value =
            serde_yaml_bw::from_str(yaml).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;
        match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            Value::Array(_) => return Err(FrontmatterError::NotMapping("a sequence")),
            _ => return Err(FrontmatterError::NotMapping("a scalar")),
        }
    };

    Ok(ParsedDocument {
        frontmatter: Frontmatter::new(map),
        body: body.to_string(),
        body_start_line,
    })
}

/// Parse frontmatter from document text, logging and discarding failures.
pub fn parse_frontmatter(content: &str) -> Option<Frontmatter> {
    match parse_document(content) {
        Ok(doc) => Some(doc.frontmatter),
        Err(FrontmatterError::Missing) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed frontmatter");
            None
        }
    }
}

/// Read a file and parse its frontmatter. I/O and decode failures are logged and yield `None`.
pub fn read_frontmatter(path: &Path) -> Option<Frontmatter> {
    read_document(path).map(|doc| doc.frontmatter)
}

/// Read a file and parse it as a frontmatter document, propagating failures.
pub fn load_document(path: &Path) -> crate::Result<ParsedDocument> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_document(&content)?)
}

/// Read a file and parse it as a frontmatter document.
pub fn read_document(path: &Path) -> Option<ParsedDocument> {
    match load_document(path) {
        Ok(doc) => Some(doc),
        Err(crate::Error::Frontmatter(FrontmatterError::Missing)) => {
            tracing::debug!(path = %path.display(), "Document has no frontmatter");
            None
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to parse frontmatter");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let content = r#"---
name: test
description: A test
---

Body content here."#;

        let doc = parse_document(content).unwrap();
        assert_eq!(doc.frontmatter.str("name"), Some("test"));
        assert_eq!(doc.frontmatter.str("description"), Some("A test"));
        assert_eq!(doc.body.trim(), "Body content here.");
        assert_eq!(doc.body_start_line, 4);
    }

    #[test]
    fn test_parse_no_frontmatter() {
        let content = "Just content without frontmatter";
        assert!(matches!(
            parse_document(content),
            Err(FrontmatterError::Missing)
        ));
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_parse_unterminated() {
        let content = "---\nname: test\nNo closing delimiter";
        assert!(matches!(
            parse_document(content),
            Err(FrontmatterError::Unterminated)
        ));
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_parse_invalid_yaml_degrades_to_none() {
        let content = "---\nname: [unclosed\n---\nbody";
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_parse_scalar_is_not_mapping() {
        let content = "---\njust a string\n---\n";
        assert!(matches!(
            parse_document(content),
            Err(FrontmatterError::NotMapping(_))
        ));
    }

    #[test]
    fn test_parse_empty_block() {
        let content = "---\n---\n# Heading\n";
        let doc = parse_document(content).unwrap();
        assert!(doc.frontmatter.as_map().is_empty());
        assert_eq!(doc.body, "# Heading\n");
    }

    #[test]
    fn test_delimiter_must_be_exact() {
        assert!(parse_frontmatter("----\nname: x\n----\n").is_none());
        assert!(parse_frontmatter("--- \nname: x\n---\n").is_none());
    }

    #[test]
    fn test_crlf_document() {
        let content = "---\r\nname: crlf\r\n---\r\nbody\r\n";
        let fm = parse_frontmatter(content).unwrap();
        assert_eq!(fm.str("name"), Some("crlf"));
    }

    #[test]
    fn test_name_trailing_newlines_normalized() {
        let mut map = Map::new();
        map.insert("name".into(), Value::String("foo\n\n".into()));
        map.insert("title".into(), Value::String("  Bar \r\n".into()));
        let fm = Frontmatter::new(map);
        assert_eq!(fm.str("name"), Some("foo"));
        assert_eq!(fm.str("title"), Some("Bar"));
    }

    #[test]
    fn test_description_keeps_internal_breaks() {
        let mut map = Map::new();
        map.insert(
            "description".into(),
            Value::String("  Line1\nLine2\n  ".into()),
        );
        let fm = Frontmatter::new(map);
        assert_eq!(fm.str("description"), Some("  Line1\nLine2"));
    }

    #[test]
    fn test_block_scalar_description() {
        let content = "---\nname: |\n  multi\n\ndescription: |\n  Line1\n  Line2\n\n---\n";
        let fm = parse_frontmatter(content).unwrap();
        assert_eq!(fm.str("name"), Some("multi"));
        assert_eq!(fm.str("description"), Some("Line1\nLine2"));
    }

    #[test]
    fn test_string_list_forms() {
        let content = "---\ntools: ['read', ' edit ', '']\nskills: a, b ,, c\nother: 3\n---\n";
        let fm = parse_frontmatter(content).unwrap();
        assert_eq!(fm.string_list("tools"), vec!["read", "edit"]);
        assert_eq!(fm.string_list("skills"), vec!["a", "b", "c"]);
        assert!(fm.string_list("other").is_empty());
        assert!(fm.string_list("missing").is_empty());
    }

    #[test]
    fn test_empty_string_is_absent() {
        let fm = parse_frontmatter("---\nname: ''\nmodel: 4\n---\n").unwrap();
        assert_eq!(fm.str("name"), None);
        assert_eq!(fm.str("model"), None);
        assert!(fm.contains_key("name"));
    }

    #[test]
    fn test_reparse_is_idempotent() {
        let content = "---\nname: agent-x\ndescription: |\n  Does things\n\nmcp-servers:\n  zeta: {}\n  alpha: {}\n---\n# Body\n";
        let first = parse_frontmatter(content).unwrap();
        let second = parse_frontmatter(content).unwrap();
        assert_eq!(first, second);
        let keys: Vec<&String> = first.get("mcp-servers").unwrap().as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_read_frontmatter_missing_file() {
        assert!(read_frontmatter(Path::new("/nonexistent/file.md")).is_none());
        assert!(matches!(
            load_document(Path::new("/nonexistent/file.md")),
            Err(crate::Error::Io(_))
        ));
    }

    #[test]
    fn test_load_document_reports_unterminated() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.md");
        std::fs::write(&path, "---\nname: x\n").unwrap();
        let err = load_document(&path).err().unwrap();
        assert!(err.is_configuration_error());
    }
}

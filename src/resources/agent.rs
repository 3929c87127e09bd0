use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::{
    ExtractContext, ResourceBase, ResourceExtractor, ResourceKind, SourceDocument, id_from_file,
};
use crate::common::{Frontmatter, RepositoryLayout, list_files_with_suffix};

pub const AGENT_SUFFIX: &str = ".agent.md";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentRecord {
    #[serde(flatten)]
    pub base: ResourceBase,
    pub model: Option<String>,
    pub tools: Vec<String>,
    pub has_handoffs: bool,
    pub handoffs: Vec<Handoff>,
    #[serde(serialize_with = "server_names")]
    pub mcp_servers: Vec<McpServerRef>,
    pub filename: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Handoff {
    pub label: String,
    pub agent: String,
}

/// One entry of an agent's `mcp-servers` mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct McpServerRef {
    pub name: String,
    #[serde(flatten)]
    pub config: McpServerConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct McpServerConfig {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub server_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env: Option<Map<String, Value>>,
}

impl McpServerConfig {
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(String::from);
        let object = |key: &str| value.get(key).and_then(Value::as_object).cloned();
        Self {
            server_type: text("type"),
            command: text("command"),
            args: value.get("args").and_then(Value::as_array).map(|args| {
                args.iter()
                    .map(|arg| match arg {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect()
            }),
            url: text("url"),
            headers: object("headers"),
            env: object("env"),
        }
    }
}

fn server_names<S: Serializer>(servers: &[McpServerRef], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(servers.iter().map(|s| s.name.as_str()))
}

/// Handoffs in declared order. Missing or non-string `label`/`agent` become empty.
pub fn parse_handoffs(frontmatter: &Frontmatter) -> Vec<Handoff> {
    let Some(Value::Array(items)) = frontmatter.get("handoffs") else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| {
            let field = |key: &str| {
                item.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Handoff {
                label: field("label"),
                agent: field("agent"),
            }
        })
        .collect()
}

/// `mcp-servers` entries in declared order.
pub fn parse_mcp_servers(frontmatter: &Frontmatter) -> Vec<McpServerRef> {
    let Some(Value::Object(servers)) = frontmatter.get("mcp-servers") else {
        return Vec::new();
    };
    servers
        .iter()
        .map(|(name, config)| McpServerRef {
            name: name.clone(),
            config: McpServerConfig::from_value(config),
        })
        .collect()
}

pub struct AgentExtractor;

impl ResourceExtractor for AgentExtractor {
    type Record = AgentRecord;

    const KIND: ResourceKind = ResourceKind::Agent;
    const REQUIRED: bool = true;

    fn discover(layout: &RepositoryLayout) -> Vec<PathBuf> {
        list_files_with_suffix(&layout.agents_dir(), AGENT_SUFFIX)
    }

    fn extract(path: &Path, ctx: &ExtractContext<'_>) -> Option<AgentRecord> {
        let (filename, id) = id_from_file(path, AGENT_SUFFIX)?;
        let doc = SourceDocument::read(path)?;
        let relative = ctx.layout.relative(path);

        let (handoffs, mcp_servers) = match doc.frontmatter.as_ref() {
            Some(fm) => (parse_handoffs(fm), parse_mcp_servers(fm)),
            None => (Vec::new(), Vec::new()),
        };

        Some(AgentRecord {
            base: ResourceBase {
                title: doc.title(&id),
                description: doc.description(),
                last_updated: ctx.last_modified(&relative),
                path: relative,
                id,
            },
            model: doc.str("model").map(String::from),
            tools: doc.string_list("tools"),
            has_handoffs: !handoffs.is_empty(),
            handoffs,
            mcp_servers,
            filename: filename.to_string(),
        })
    }
}

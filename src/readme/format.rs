use serde_json::{Map, Value, json};

use crate::registry::RegistryCatalog;
use crate::resources::McpServerRef;

pub const REPO_RAW_BASE: &str = "https://raw.githubusercontent.com/github/awesome-copilot/main";

const VSCODE_INSTALL_IMAGE: &str = "https://img.shields.io/badge/VS_Code-Install-0098FF?style=flat-square&logo=visualstudiocode&logoColor=white";
const VSCODE_INSIDERS_INSTALL_IMAGE: &str = "https://img.shields.io/badge/VS_Code_Insiders-Install-24bfa5?style=flat-square&logo=visualstudiocode&logoColor=white";

const MCP_VSCODE_IMAGE: &str =
    "https://img.shields.io/badge/Install-VS_Code-0098FF?style=flat-square";
const MCP_INSIDERS_IMAGE: &str =
    "https://img.shields.io/badge/Install-VS_Code_Insiders-24bfa5?style=flat-square";
const MCP_VISUAL_STUDIO_IMAGE: &str =
    "https://img.shields.io/badge/Install-Visual_Studio-C16FDE?style=flat-square";

/// Install handler a badge opens in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeType {
    Instructions,
    Prompt,
    Agent,
}

impl BadgeType {
    fn as_str(self) -> &'static str {
        match self {
            BadgeType::Instructions => "instructions",
            BadgeType::Prompt => "prompt",
            BadgeType::Agent => "agent",
        }
    }

    fn install_url(self) -> String {
        format!("https://aka.ms/awesome-copilot/install/{}", self.as_str())
    }
}

/// Make arbitrary text safe inside a single markdown table cell.
///
/// Line endings are normalized, each line trimmed, runs of blank lines collapsed to
/// one, pipes escaped and the remaining newlines rendered as `<br />`.
pub fn format_table_cell(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let normalized = text.replace("\r\n", "\n");
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;
    for line in normalized.split('\n').map(str::trim) {
        let blank = line.is_empty();
        if !(blank && previous_blank) {
            lines.push(line);
        }
        previous_blank = blank;
    }

    lines
        .join("\n")
        .replace('|', "&#124;")
        .replace('\n', "<br />")
        .trim()
        .to_string()
}

/// Percent-encode each segment of a repository path, keeping the separators.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// VS Code and VS Code Insiders install badges for a repository file.
pub fn install_badges(link: &str, badge: BadgeType) -> String {
    let kind = badge.as_str();
    let target = |scheme: &str| {
        urlencoding::encode(&format!(
            "{scheme}:chat-{kind}/install?url={REPO_RAW_BASE}/{link}"
        ))
        .into_owned()
    };
    let base = badge.install_url();
    format!(
        "[![Install in VS Code]({VSCODE_INSTALL_IMAGE})]({base}?url={})<br />\
         [![Install in VS Code Insiders]({VSCODE_INSIDERS_INSTALL_IMAGE})]({base}?url={})",
        target("vscode"),
        target("vscode-insiders"),
    )
}

/// Config-only payload for MCP install links: url and headers for HTTP servers,
/// command, args and env otherwise.
pub fn mcp_install_payload(server: &McpServerRef) -> Value {
    let config = &server.config;
    let is_http = config
        .server_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("http"));

    if is_http {
        json!({
            "url": config.url.clone().unwrap_or_default(),
            "headers": config.headers.clone().unwrap_or_default(),
        })
    } else {
        let args: Vec<String> = config
            .args
            .iter()
            .flatten()
            .map(|arg| urlencoding::encode(arg).into_owned())
            .collect();
        json!({
            "command": config.command.clone().unwrap_or_default(),
            "args": args,
            "env": config.env.clone().unwrap_or_else(Map::new),
        })
    }
}

/// MCP server column: each server's name, linked when the registry knows it,
/// followed by its install badges.
pub fn mcp_server_cell(servers: &[McpServerRef], registry: &RegistryCatalog) -> String {
    servers
        .iter()
        .map(|server| {
            let name = server.name.trim();
            let label = match registry.find(name) {
                Some(entry) => format!("[{name}]({})", entry.link()),
                None => name.to_string(),
            };
            let config = urlencoding::encode(&mcp_install_payload(server).to_string()).into_owned();
            let badges = [
                format!(
                    "[![Install MCP]({MCP_VSCODE_IMAGE})](https://aka.ms/awesome-copilot/install/mcp-vscode?name={name}&config={config})"
                ),
                format!(
                    "[![Install MCP]({MCP_INSIDERS_IMAGE})](https://aka.ms/awesome-copilot/install/mcp-vscodeinsiders?name={name}&config={config})"
                ),
                format!(
                    "[![Install MCP]({MCP_VISUAL_STUDIO_IMAGE})](https://aka.ms/awesome-copilot/install/mcp-visualstudio/mcp-install?{config})"
                ),
            ];
            format!("{label}<br />{}", badges.join("<br />"))
        })
        .collect::<Vec<_>>()
        .join("<br />")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::RegistryEntry;
    use crate::resources::McpServerConfig;

    #[test]
    fn test_format_table_cell() {
        assert_eq!(format_table_cell(None), "");
        assert_eq!(
            format_table_cell(Some("  Line one  \r\n\r\n\r\n  Line | two ")),
            "Line one<br /><br />Line &#124; two"
        );
        assert_eq!(format_table_cell(Some("single")), "single");
    }

    #[test]
    fn test_encode_path_keeps_separators() {
        assert_eq!(
            encode_path("agents/my agent.agent.md"),
            "agents/my%20agent.agent.md"
        );
    }

    #[test]
    fn test_install_badges() {
        let badges = install_badges("prompts/review.prompt.md", BadgeType::Prompt);
        assert!(badges.contains(
            "(https://aka.ms/awesome-copilot/install/prompt?url=vscode%3Achat-prompt%2Finstall%3Furl%3Dhttps%3A%2F%2Fraw.githubusercontent.com%2Fgithub%2Fawesome-copilot%2Fmain%2Fprompts%2Freview.prompt.md)"
        ));
        assert!(badges.contains("vscode-insiders%3Achat-prompt"));
        assert_eq!(badges.matches("<br />").count(), 1);
    }

    #[test]
    fn test_mcp_install_payload() {
        let http = McpServerRef {
            name: "remote".into(),
            config: McpServerConfig {
                server_type: Some("HTTP".into()),
                url: Some("https://mcp.example".into()),
                ..Default::default()
            },
        };
        assert_eq!(
            mcp_install_payload(&http).to_string(),
            r#"{"url":"https://mcp.example","headers":{}}"#
        );

        let stdio = McpServerRef {
            name: "local".into(),
            config: McpServerConfig {
                command: Some("npx".into()),
                args: Some(vec!["-y".into(), "@scope/pkg".into()]),
                ..Default::default()
            },
        };
        assert_eq!(
            mcp_install_payload(&stdio).to_string(),
            r#"{"command":"npx","args":["-y","%40scope%2Fpkg"],"env":{}}"#
        );
    }

    #[test]
    fn test_mcp_server_cell_links_known_servers() {
        let registry = RegistryCatalog::from_entries(vec![RegistryEntry::new(
            "com.apify/apify-mcp-server",
            None,
        )]);
        let servers = vec![
            McpServerRef {
                name: "apify".into(),
                config: McpServerConfig::default(),
            },
            McpServerRef {
                name: "unknown-tool".into(),
                config: McpServerConfig::default(),
            },
        ];

        let cell = mcp_server_cell(&servers, &registry);
        assert!(cell.starts_with("[apify](https://github.com/mcp/com.apify/apify-mcp-server)<br />"));
        assert!(cell.contains("<br />unknown-tool<br />[![Install MCP]"));
        assert!(!cell.contains("[unknown-tool]("));
    }
}

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use super::{RegistryCatalog, RegistryEntry, RegistryError};

const HTTP_TIMEOUT_SECS: u64 = 30;
const DISPLAY_NAME_POINTER: &str =
    "/io.modelcontextprotocol.registry~1publisher-provided/github/displayName";

#[derive(Debug, Default, Deserialize)]
struct ServerList {
    #[serde(default)]
    servers: Vec<ServerItem>,
    #[serde(default)]
    metadata: Option<PageMetadata>,
}

#[derive(Debug, Deserialize)]
struct ServerItem {
    #[serde(default)]
    server: Option<ServerBody>,
}

#[derive(Debug, Deserialize)]
struct ServerBody {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "_meta")]
    meta: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

impl ServerBody {
    fn into_entry(self) -> Option<RegistryEntry> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let display_name = self
            .meta
            .as_ref()
            .and_then(|meta| meta.pointer(DISPLAY_NAME_POINTER))
            .and_then(Value::as_str);
        Some(RegistryEntry::new(name, display_name))
    }
}

/// Paginated reader for the MCP server registry API.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    pub const DEFAULT_URL: &'static str = "https://api.mcp.github.com/v0.1/servers/";

    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch every page. Any failure is logged and yields an empty catalog.
    pub async fn fetch_catalog(&self) -> RegistryCatalog {
        tracing::info!(url = %self.base_url, "Fetching MCP registry");
        match self.fetch_entries().await {
            Ok(entries) => {
                tracing::info!(servers = entries.len(), "Loaded MCP registry");
                RegistryCatalog::from_entries(entries)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load MCP registry");
                RegistryCatalog::empty()
            }
        }
    }

    /// All entries across pages, or the first error encountered.
    pub async fn fetch_entries(&self) -> Result<Vec<RegistryEntry>, RegistryError> {
        let mut entries = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self.fetch_page(cursor.as_deref()).await?;
            entries.extend(
                page.servers
                    .into_iter()
                    .filter_map(|item| item.server)
                    .filter_map(ServerBody::into_entry),
            );
            cursor = page
                .metadata
                .and_then(|m| m.next_cursor)
                .filter(|c| !c.is_empty());
            if cursor.is_none() {
                break;
            }
        }

        Ok(entries)
    }

    fn page_url(&self, cursor: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Some(cursor) = cursor {
            url.query_pairs_mut().append_pair("cursor", cursor);
        }
        url
    }

    async fn fetch_page(&self, cursor: Option<&str>) -> Result<ServerList, RegistryError> {
        let url = self.page_url(cursor);
        tracing::debug!(%url, "Fetching registry page");

        let response = self.http.get(url.clone()).send().await?;
        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_encodes_cursor() {
        let client = RegistryClient::new("https://registry.example/v0.1/servers/").unwrap();
        assert_eq!(
            client.page_url(None).as_str(),
            "https://registry.example/v0.1/servers/"
        );
        assert_eq!(
            client.page_url(Some("abc/+=")).as_str(),
            "https://registry.example/v0.1/servers/?cursor=abc%2F%2B%3D"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            RegistryClient::new("not a url"),
            Err(RegistryError::Url(_))
        ));
    }

    #[test]
    fn test_server_body_display_name() {
        let list: ServerList = serde_json::from_value(serde_json::json!({
            "servers": [
                {"server": {
                    "name": "io.github.github/github-mcp-server",
                    "_meta": {"io.modelcontextprotocol.registry/publisher-provided": {
                        "github": {"displayName": "GitHub"}
                    }}
                }},
                {"server": {"name": "com.apify/apify-mcp-server"}},
                {"server": {}},
                {}
            ]
        }))
        .unwrap();

        let entries: Vec<RegistryEntry> = list
            .servers
            .into_iter()
            .filter_map(|item| item.server)
            .filter_map(ServerBody::into_entry)
            .collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name, "github");
        assert_eq!(entries[1].display_name, "com.apify/apify-mcp-server");
        assert!(list.metadata.is_none());
    }
}

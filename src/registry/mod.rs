//! MCP server registry lookup.
//!
//! The registry is fetched at most once per [`Registry`] value and cached for its
//! lifetime. Fetch failures degrade to an empty catalog, so every lookup simply
//! misses and servers render unlinked.

mod client;

use tokio::sync::OnceCell;

pub use client::RegistryClient;

/// Base of the public page for a registry server.
pub const SERVER_PAGE_BASE: &str = "https://github.com/mcp/";

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Registry returned status {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Malformed registry response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid registry URL: {0}")]
    Url(#[from] url::ParseError),
}

/// One server known to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// Server name as published.
    pub name: String,
    /// Lowercased publisher display name, or the lowercased name when absent.
    pub display_name: String,
    /// Lowercased server name.
    pub full_name: String,
}

impl RegistryEntry {
    pub fn new(name: impl Into<String>, display_name: Option<&str>) -> Self {
        let name = name.into();
        let display_name = display_name
            .filter(|d| !d.is_empty())
            .unwrap_or(&name)
            .to_lowercase();
        let full_name = name.to_lowercase();
        Self {
            name,
            display_name,
            full_name,
        }
    }

    pub fn link(&self) -> String {
        format!("{SERVER_PAGE_BASE}{}", self.name)
    }
}

/// Suffixes stripped from the second segment of a full name before comparing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPolicy {
    pub suffixes: Vec<String>,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            suffixes: vec!["-mcp-server".to_string(), "-mcp".to_string()],
        }
    }
}

impl MatchPolicy {
    /// Suffixes are stripped from the end only, in order.
    pub fn short_name<'a>(&self, segment: &'a str) -> &'a str {
        self.suffixes.iter().fold(segment, |name, suffix| {
            name.strip_suffix(suffix.as_str()).unwrap_or(name)
        })
    }

    pub fn matches(&self, entry: &RegistryEntry, server_name: &str) -> bool {
        if entry.display_name == server_name || entry.full_name == server_name {
            return true;
        }
        entry
            .full_name
            .split('/')
            .nth(1)
            .filter(|segment| !segment.is_empty())
            .is_some_and(|segment| self.short_name(segment) == server_name)
    }
}

/// Registry entries in fetch order.
#[derive(Debug, Clone, Default)]
pub struct RegistryCatalog {
    entries: Vec<RegistryEntry>,
    policy: MatchPolicy,
}

impl RegistryCatalog {
    pub fn from_entries(entries: Vec<RegistryEntry>) -> Self {
        Self {
            entries,
            policy: MatchPolicy::default(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry matching `server_name`, compared case-insensitively.
    pub fn find(&self, server_name: &str) -> Option<&RegistryEntry> {
        let needle = server_name.trim().to_lowercase();
        self.entries
            .iter()
            .find(|entry| self.policy.matches(entry, &needle))
    }
}

/// Run-scoped registry access. The catalog is fetched on first use.
#[derive(Debug)]
pub struct Registry {
    client: Option<RegistryClient>,
    cache: OnceCell<RegistryCatalog>,
}

impl Registry {
    pub fn new(client: RegistryClient) -> Self {
        Self {
            client: Some(client),
            cache: OnceCell::new(),
        }
    }

    /// A registry that never touches the network.
    pub fn with_catalog(catalog: RegistryCatalog) -> Self {
        Self {
            client: None,
            cache: OnceCell::new_with(Some(catalog)),
        }
    }

    pub async fn catalog(&self) -> &RegistryCatalog {
        self.cache
            .get_or_init(|| async {
                match &self.client {
                    Some(client) => client.fetch_catalog().await,
                    None => RegistryCatalog::empty(),
                }
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> RegistryCatalog {
        RegistryCatalog::from_entries(vec![
            RegistryEntry::new("io.github.github/github-mcp-server", Some("GitHub")),
            RegistryEntry::new("com.apify/apify-mcp-server", None),
            RegistryEntry::new("io.example/mcp-tools-mcp", None),
        ])
    }

    #[test]
    fn test_entry_lowercases_for_matching() {
        let entry = RegistryEntry::new("Com.Example/Thing", Some("The Thing"));
        assert_eq!(entry.name, "Com.Example/Thing");
        assert_eq!(entry.display_name, "the thing");
        assert_eq!(entry.full_name, "com.example/thing");
        assert_eq!(entry.link(), "https://github.com/mcp/Com.Example/Thing");

        let entry = RegistryEntry::new("a/b", Some(""));
        assert_eq!(entry.display_name, "a/b");
    }

    #[test]
    fn test_find_by_display_name() {
        let catalog = catalog();
        let entry = catalog.find("GitHub").unwrap();
        assert_eq!(entry.name, "io.github.github/github-mcp-server");
    }

    #[test]
    fn test_find_by_suffix_stripped_segment() {
        let catalog = catalog();
        assert_eq!(
            catalog.find("apify").unwrap().name,
            "com.apify/apify-mcp-server"
        );
        assert_eq!(
            catalog.find("mcp-tools").unwrap().name,
            "io.example/mcp-tools-mcp"
        );
        assert!(catalog.find("unknown-tool").is_none());
    }

    #[test]
    fn test_find_by_full_name() {
        let catalog = catalog();
        assert!(catalog.find("COM.APIFY/APIFY-MCP-SERVER").is_some());
    }

    #[test]
    fn test_policy_strips_from_end_only() {
        let policy = MatchPolicy::default();
        assert_eq!(policy.short_name("apify-mcp-server"), "apify");
        assert_eq!(policy.short_name("mcp-server-tools"), "mcp-server-tools");
        assert_eq!(policy.short_name("github-mcp"), "github");

        let custom = RegistryCatalog::from_entries(vec![RegistryEntry::new("org/foo-server", None)])
            .with_policy(MatchPolicy {
                suffixes: vec!["-server".into()],
            });
        assert!(custom.find("foo").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let catalog = RegistryCatalog::from_entries(vec![
            RegistryEntry::new("one/dup-mcp", None),
            RegistryEntry::new("two/dup", None),
        ]);
        assert_eq!(catalog.find("dup").unwrap().name, "one/dup-mcp");
    }

    #[tokio::test]
    async fn test_registry_with_fixture_catalog() {
        let registry = Registry::with_catalog(catalog());
        assert_eq!(registry.catalog().await.len(), 3);
        assert!(registry.catalog().await.find("apify").is_some());
    }
}

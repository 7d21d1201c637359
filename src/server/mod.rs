//! Server directory and resolution.
//!
//! Server records describe where Solr cores live; stores abstract over
//! where those records and the scope configuration are kept; the
//! resolver turns identifiers into live, ping-checked client handles
//! and caches the outcome.

mod resolver;
mod store;

pub use resolver::ServerResolver;
pub use store::{InMemoryScopeConfig, InMemoryServerStore};

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

fn default_port() -> u16 {
    8080
}

fn default_path() -> String {
    "/solr".to_string()
}

/// A stored description of one Solr server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerRecord {
    pub id: i64,
    pub name: String,
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ServerRecord {
    /// Create a record with the default port (8080) and path (`/solr`)
    pub fn new(id: i64, name: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            host: host.into(),
            port: default_port(),
            path: default_path(),
            username: None,
            password: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Attach HTTP basic auth credentials
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }
}

/// Trait for server directory lookups
#[async_trait]
pub trait ServerStore: Send + Sync {
    /// Find a server record by its numeric id
    async fn find_by_id(&self, id: i64) -> Result<Option<ServerRecord>>;

    /// Find a server record by its unique name
    async fn find_by_name(&self, name: &str) -> Result<Option<ServerRecord>>;

    /// All known server records
    async fn list(&self) -> Result<Vec<ServerRecord>>;
}

/// Trait for per-scope server assignments.
///
/// A scope is a coarse configuration namespace (for example a site or
/// a tenant) and the key names which assignment within it to read.
#[async_trait]
pub trait ScopeConfigStore: Send + Sync {
    /// The server id assigned to `(scope, key)`, when any
    async fn server_id(&self, scope: &str, key: &str) -> Result<Option<i64>>;
}

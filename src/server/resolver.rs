use crate::client::{ClientOptions, SolrClient};
use crate::error::Result;
use crate::server::{ScopeConfigStore, ServerRecord, ServerStore};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Resolves server identifiers to live, ping-checked client handles.
///
/// The outcome of the first probe is cached per server id: a reachable
/// server yields a shared handle that every later resolution returns,
/// and a server that fails its probe is cached as dead and not probed
/// again until [`invalidate`] or [`clear`] drops the entry.
///
/// [`invalidate`]: ServerResolver::invalidate
/// [`clear`]: ServerResolver::clear
pub struct ServerResolver {
    store: Arc<dyn ServerStore>,
    scope_config: Arc<dyn ScopeConfigStore>,
    client_options: ClientOptions,
    handles: DashMap<i64, Option<Arc<SolrClient>>>,
}

impl ServerResolver {
    pub fn new(store: Arc<dyn ServerStore>, scope_config: Arc<dyn ScopeConfigStore>) -> Self {
        Self {
            store,
            scope_config,
            client_options: ClientOptions::default(),
            handles: DashMap::new(),
        }
    }

    /// Override the transport options applied to handles this resolver
    /// builds
    pub fn with_client_options(mut self, options: ClientOptions) -> Self {
        self.client_options = options;
        self
    }

    /// Resolve an identifier to a live client handle.
    ///
    /// A numeric identifier is looked up by id, anything else by name.
    /// When neither matches and a scope key is given, the identifier is
    /// treated as a scope and the scope configuration supplies the id.
    /// Returns `Ok(None)` when no record matches or the server is
    /// cached as dead; store failures and unbuildable clients are
    /// errors.
    pub async fn resolve(
        &self,
        identifier: &str,
        scope_key: Option<&str>,
    ) -> Result<Option<Arc<SolrClient>>> {
        let Some(record) = self.lookup_record(identifier, scope_key).await? else {
            debug!(identifier, "no solr server record matched");
            return Ok(None);
        };

        if let Some(cached) = self.handles.get(&record.id) {
            return Ok(cached.value().clone());
        }

        let probed = self.probe(&record).await?;
        let cached = self.handles.entry(record.id).or_insert(probed);
        Ok(cached.value().clone())
    }

    /// Drop the cached handle (live or dead) for a server id, so the
    /// next resolution probes again
    pub fn invalidate(&self, id: i64) -> bool {
        debug!(id, "invalidating cached solr handle");
        self.handles.remove(&id).is_some()
    }

    /// Drop every cached handle
    pub fn clear(&self) {
        self.handles.clear();
    }

    async fn lookup_record(
        &self,
        identifier: &str,
        scope_key: Option<&str>,
    ) -> Result<Option<ServerRecord>> {
        let direct = match parse_server_id(identifier) {
            Some(id) => self.store.find_by_id(id).await?,
            None => self.store.find_by_name(identifier).await?,
        };
        if direct.is_some() {
            return Ok(direct);
        }

        let Some(key) = scope_key else {
            return Ok(None);
        };
        let Some(id) = self.scope_config.server_id(identifier, key).await? else {
            return Ok(None);
        };
        self.store.find_by_id(id).await
    }

    async fn probe(&self, record: &ServerRecord) -> Result<Option<Arc<SolrClient>>> {
        let client = SolrClient::from_record_with_options(record, self.client_options.clone())?;

        if client.ping().await {
            info!(id = record.id, name = %record.name, "solr server passed its ping probe");
            Ok(Some(Arc::new(client)))
        } else {
            warn!(id = record.id, name = %record.name, "solr server failed its ping probe, caching as dead");
            Ok(None)
        }
    }
}

impl fmt::Debug for ServerResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerResolver")
            .field("client_options", &self.client_options)
            .field("cached_handles", &self.handles.len())
            .finish()
    }
}

fn parse_server_id(identifier: &str) -> Option<i64> {
    if identifier.is_empty() || !identifier.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    identifier.parse().ok()
}

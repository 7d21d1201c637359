use crate::error::Result;
use crate::server::{ScopeConfigStore, ServerRecord, ServerStore};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

/// In-memory server directory backed by a concurrent map.
///
/// Cloning shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryServerStore {
    records: Arc<DashMap<i64, ServerRecord>>,
}

impl InMemoryServerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record under its id
    pub fn insert(&self, record: ServerRecord) {
        debug!(id = record.id, name = %record.name, "registering solr server record");
        self.records.insert(record.id, record);
    }
}

#[async_trait]
impl ServerStore for InMemoryServerStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<ServerRecord>> {
        Ok(self.records.get(&id).map(|entry| entry.value().clone()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ServerRecord>> {
        Ok(self
            .records
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<ServerRecord>> {
        let mut records: Vec<ServerRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

/// In-memory scope configuration mapping `(scope, key)` pairs to
/// server ids
#[derive(Debug, Clone, Default)]
pub struct InMemoryScopeConfig {
    entries: Arc<DashMap<(String, String), i64>>,
}

impl InMemoryScopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a server id to a `(scope, key)` pair
    pub fn set(&self, scope: impl Into<String>, key: impl Into<String>, server_id: i64) {
        self.entries.insert((scope.into(), key.into()), server_id);
    }
}

#[async_trait]
impl ScopeConfigStore for InMemoryScopeConfig {
    async fn server_id(&self, scope: &str, key: &str) -> Result<Option<i64>> {
        Ok(self
            .entries
            .get(&(scope.to_string(), key.to_string()))
            .map(|entry| *entry.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = InMemoryServerStore::new();
        store.insert(ServerRecord::new(1, "main", "solr-a.internal"));
        store.insert(ServerRecord::new(2, "backup", "solr-b.internal"));

        let by_id = store.find_by_id(2).await.unwrap().unwrap();
        assert_eq!(by_id.name, "backup");

        let by_name = store.find_by_name("main").await.unwrap().unwrap();
        assert_eq!(by_name.id, 1);

        assert!(store.find_by_id(99).await.unwrap().is_none());
        assert!(store.find_by_name("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_replaces_same_id() {
        let store = InMemoryServerStore::new();
        store.insert(ServerRecord::new(1, "main", "old.internal"));
        store.insert(ServerRecord::new(1, "main", "new.internal"));

        let record = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(record.host, "new.internal");
    }

    #[tokio::test]
    async fn test_list_sorts_by_id() {
        let store = InMemoryServerStore::new();
        store.insert(ServerRecord::new(5, "c", "c.internal"));
        store.insert(ServerRecord::new(1, "a", "a.internal"));
        store.insert(ServerRecord::new(3, "b", "b.internal"));

        let ids: Vec<i64> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.id)
            .collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_scope_config_lookup() {
        let config = InMemoryScopeConfig::new();
        config.set("content", "solr_server", 4);

        assert_eq!(
            config.server_id("content", "solr_server").await.unwrap(),
            Some(4)
        );
        assert_eq!(config.server_id("content", "other_key").await.unwrap(), None);
        assert_eq!(
            config.server_id("users", "solr_server").await.unwrap(),
            None
        );
    }
}

//! In-memory object store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::object_store::{ObjectStore, StoredObjectInfo};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct StoredObject {
    data: Vec<u8>,
    last_modified: DateTime<Utc>,
}

/// Object store backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<(String, String), StoredObject>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of objects in a namespace
    pub fn count(&self, namespace: &str) -> usize {
        self.objects
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .count()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<()> {
        self.objects.insert(
            (namespace.to_string(), key.to_string()),
            StoredObject {
                data: data.to_vec(),
                last_modified: Utc::now(),
            },
        );
        Ok(())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Vec<u8>> {
        self.objects
            .get(&(namespace.to_string(), key.to_string()))
            .map(|obj| obj.data.clone())
            .ok_or_else(|| Error::not_found(namespace, key))
    }

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool> {
        Ok(self
            .objects
            .contains_key(&(namespace.to_string(), key.to_string())))
    }

    async fn list(&self, namespace: &str) -> Result<Vec<StoredObjectInfo>> {
        let mut objects: Vec<StoredObjectInfo> = self
            .objects
            .iter()
            .filter(|entry| entry.key().0 == namespace)
            .map(|entry| StoredObjectInfo {
                key: entry.key().1.clone(),
                last_modified: entry.value().last_modified,
                size: entry.value().data.len() as u64,
            })
            .collect();
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "memory"
    }
}

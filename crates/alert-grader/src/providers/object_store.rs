//! Namespaced object store trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Metadata about a stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObjectInfo {
    /// Object key within its namespace
    pub key: String,
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

/// Trait for namespaced blob storage
///
/// Implementations:
/// - `MemoryObjectStore`: in-process map
/// - `LocalObjectStore`: local filesystem
/// - `GcsObjectStore`: Google Cloud Storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, replacing any previous content under the key
    async fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<()>;

    /// Retrieve object data; `Error::ObjectNotFound` if absent
    async fn get(&self, namespace: &str, key: &str) -> Result<Vec<u8>>;

    /// Check if an object exists
    async fn exists(&self, namespace: &str, key: &str) -> Result<bool>;

    /// List all objects in a namespace
    async fn list(&self, namespace: &str) -> Result<Vec<StoredObjectInfo>>;

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

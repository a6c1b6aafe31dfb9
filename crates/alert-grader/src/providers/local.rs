//! Local filesystem object store
//!
//! Each namespace is a directory under the root; each key is a file in it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::object_store::{ObjectStore, StoredObjectInfo};
use crate::error::{Error, Result};

/// Filesystem-backed object store
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create namespace directories up front
    pub async fn ensure_namespaces(&self, namespaces: &[&str]) -> Result<()> {
        for namespace in namespaces {
            let dir = self.namespace_dir(namespace)?;
            fs::create_dir_all(&dir).await.map_err(|e| {
                Error::storage(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    fn namespace_dir(&self, namespace: &str) -> Result<PathBuf> {
        check_segment(namespace)?;
        Ok(self.root.join(namespace))
    }

    fn object_path(&self, namespace: &str, key: &str) -> Result<PathBuf> {
        check_segment(key)?;
        Ok(self.namespace_dir(namespace)?.join(key))
    }
}

/// Namespaces and keys must stay a single path component
fn check_segment(segment: &str) -> Result<()> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(Error::storage(format!("Invalid object path segment: {:?}", segment)));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<()> {
        let path = self.object_path(namespace, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write then rename so readers never see a partial object
        let tmp = path.with_file_name(format!("{}.partial", key));
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(namespace, key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(Error::not_found(namespace, key)),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool> {
        let path = self.object_path(namespace, key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn list(&self, namespace: &str) -> Result<Vec<StoredObjectInfo>> {
        let dir = self.namespace_dir(namespace)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut objects = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if key.ends_with(".partial") {
                continue;
            }
            let last_modified: DateTime<Utc> = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            objects.push(StoredObjectInfo {
                key,
                last_modified,
                size: metadata.len(),
            });
        }

        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    fn name(&self) -> &str {
        "local"
    }
}

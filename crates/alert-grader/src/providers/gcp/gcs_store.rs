//! Google Cloud Storage object store
//!
//! Each namespace is a bucket; keys are object names within it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use google_cloud_storage::client::{Client as GcsClient, ClientConfig};
use google_cloud_storage::http::objects::download::Range;
use google_cloud_storage::http::objects::get::GetObjectRequest;
use google_cloud_storage::http::objects::list::ListObjectsRequest;
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use google_cloud_storage::http::Error as GcsError;

use crate::error::{Error, Result};
use crate::providers::object_store::{ObjectStore, StoredObjectInfo};

/// Google Cloud Storage object store
pub struct GcsObjectStore {
    client: GcsClient,
    /// Bucket probed by the health check
    probe_bucket: String,
}

impl GcsObjectStore {
    /// Create a new GCS object store
    ///
    /// Credentials come from the environment (`GOOGLE_APPLICATION_CREDENTIALS`
    /// or the metadata server). A non-empty `endpoint` starting with `http`
    /// overrides the storage API base URL, e.g. for an emulator.
    pub async fn new(endpoint: &str, probe_bucket: impl Into<String>) -> Result<Self> {
        let mut config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| Error::Config(format!("Failed to create GCS client: {}", e)))?;

        if endpoint.starts_with("http") {
            config.storage_endpoint = endpoint.trim_end_matches('/').to_string();
        }

        Ok(Self {
            client: GcsClient::new(config),
            probe_bucket: probe_bucket.into(),
        })
    }

    fn is_not_found(err: &GcsError) -> bool {
        matches!(err, GcsError::Response(resp) if resp.code == 404)
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn put(&self, namespace: &str, key: &str, data: &[u8]) -> Result<()> {
        let content_type = mime_guess::from_path(key)
            .first_or_octet_stream()
            .to_string();

        let mut media = Media::new(key.to_string());
        media.content_type = content_type.into();
        let upload_type = UploadType::Simple(media);

        self.client
            .upload_object(
                &UploadObjectRequest {
                    bucket: namespace.to_string(),
                    ..Default::default()
                },
                data.to_vec(),
                &upload_type,
            )
            .await
            .map_err(|e| Error::storage(format!("Failed to upload {}/{} to GCS: {}", namespace, key, e)))?;

        Ok(())
    }

    async fn get(&self, namespace: &str, key: &str) -> Result<Vec<u8>> {
        self.client
            .download_object(
                &GetObjectRequest {
                    bucket: namespace.to_string(),
                    object: key.to_string(),
                    ..Default::default()
                },
                &Range::default(),
            )
            .await
            .map_err(|e| {
                if Self::is_not_found(&e) {
                    Error::not_found(namespace, key)
                } else {
                    Error::storage(format!("Failed to download {}/{} from GCS: {}", namespace, key, e))
                }
            })
    }

    async fn exists(&self, namespace: &str, key: &str) -> Result<bool> {
        match self
            .client
            .get_object(&GetObjectRequest {
                bucket: namespace.to_string(),
                object: key.to_string(),
                ..Default::default()
            })
            .await
        {
            Ok(_) => Ok(true),
            Err(e) if Self::is_not_found(&e) => Ok(false),
            Err(e) => Err(Error::storage(format!(
                "Failed to stat {}/{} in GCS: {}",
                namespace, key, e
            ))),
        }
    }

    async fn list(&self, namespace: &str) -> Result<Vec<StoredObjectInfo>> {
        let mut objects = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let list_request = ListObjectsRequest {
                bucket: namespace.to_string(),
                page_token: page_token.take(),
                ..Default::default()
            };

            let response = self
                .client
                .list_objects(&list_request)
                .await
                .map_err(|e| Error::storage(format!("Failed to list GCS objects: {}", e)))?;

            for item in response.items.unwrap_or_default() {
                let last_modified = item
                    .updated
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.unix_timestamp(), t.nanosecond()))
                    .unwrap_or_else(Utc::now);
                objects.push(StoredObjectInfo {
                    key: item.name,
                    last_modified,
                    size: item.size.max(0) as u64,
                });
            }

            match response.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(objects)
    }

    async fn health_check(&self) -> Result<bool> {
        // Try to list objects (with limit 1) to check bucket access
        let list_request = ListObjectsRequest {
            bucket: self.probe_bucket.clone(),
            max_results: Some(1),
            ..Default::default()
        };

        self.client
            .list_objects(&list_request)
            .await
            .map(|_| true)
            .map_err(|e| Error::storage(format!("GCS health check failed: {}", e)))
    }

    fn name(&self) -> &str {
        "gcs"
    }
}

//! Object store providers
//!
//! Handlers and the background worker only see the `ObjectStore` trait, so
//! the backend is picked once at startup and can be swapped for a fake in
//! tests.

pub mod local;
pub mod memory;
pub mod object_store;

#[cfg(feature = "gcp")]
pub mod gcp;

use std::sync::Arc;

pub use local::LocalObjectStore;
pub use memory::MemoryObjectStore;
pub use object_store::{ObjectStore, StoredObjectInfo};

use crate::config::{StorageConfig, StoreBackend};
use crate::error::Result;

/// Build the configured object store backend
pub async fn build_object_store(config: &StorageConfig) -> Result<Arc<dyn ObjectStore>> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory object store; uploads are lost on restart");
            Ok(Arc::new(MemoryObjectStore::new()))
        }
        StoreBackend::Local => {
            let store = LocalObjectStore::new(config.local_root());
            store
                .ensure_namespaces(&[
                    config.input_namespace.as_str(),
                    config.output_namespace.as_str(),
                ])
                .await?;
            tracing::info!("Using local object store at {}", config.local_root().display());
            Ok(Arc::new(store))
        }
        StoreBackend::Gcs => {
            #[cfg(feature = "gcp")]
            {
                let store =
                    gcp::GcsObjectStore::new(&config.endpoint, config.input_namespace.clone())
                        .await?;
                tracing::info!("Using GCS object store");
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "gcp"))]
            {
                Err(crate::error::Error::Config(
                    "GCS backend selected but gcp feature is not enabled. \
                     Rebuild with --features gcp"
                        .to_string(),
                ))
            }
        }
    }
}

//! Google Cloud Platform provider implementations
//!
//! - Google Cloud Storage for input and output objects, one bucket per namespace

mod gcs_store;

pub use gcs_store::GcsObjectStore;

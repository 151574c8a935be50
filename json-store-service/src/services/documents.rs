//! Document operations on top of an injected store adapter.

use crate::models::{merge, Document};
use crate::services::metrics::record_store_operation;
use crate::services::store::{DocumentStore, StoreError};
use std::sync::Arc;
use tracing::{info, instrument};

/// The four document operations, independent of backend and response shape.
#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn backend(&self) -> &'static str {
        self.store.backend()
    }

    /// The stored document, or an empty object when nothing is stored.
    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn fetch(&self) -> Result<Document, StoreError> {
        let result = self.store.read().await;
        self.observe("read", &result);
        Ok(result?.unwrap_or_default())
    }

    /// Store `document` as the new current version and hand it back.
    #[instrument(skip(self, document), fields(backend = self.store.backend()))]
    pub async fn replace(&self, document: Document) -> Result<Document, StoreError> {
        let result = self.store.write(&document).await;
        self.observe("write", &result);
        result?;
        info!(keys = document.len(), "Document replaced");
        Ok(document)
    }

    /// Read, shallow-merge `patch` on top, write back.
    ///
    /// Not atomic: a concurrent writer between the read and the write is
    /// overwritten (last writer wins).
    #[instrument(skip(self, patch), fields(backend = self.store.backend()))]
    pub async fn update(&self, patch: Document) -> Result<Document, StoreError> {
        let current = self.fetch().await?;
        let merged = merge(current, patch);

        let result = self.store.write(&merged).await;
        self.observe("write", &result);
        result?;
        info!(keys = merged.len(), "Document merged");
        Ok(merged)
    }

    #[instrument(skip(self), fields(backend = self.store.backend()))]
    pub async fn clear(&self) -> Result<(), StoreError> {
        let result = self.store.clear().await;
        self.observe("clear", &result);
        result?;
        info!("Document cleared");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }

    fn observe<T>(&self, operation: &'static str, result: &Result<T, StoreError>) {
        if let Err(e) = result {
            tracing::error!(
                backend = self.store.backend(),
                operation,
                error = %e,
                "Store operation failed"
            );
        }
        record_store_operation(self.store.backend(), operation, result.is_ok());
    }
}

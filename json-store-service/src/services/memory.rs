use crate::models::Document;
use crate::services::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-local store for development and tests. State is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    document: RwLock<Option<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> Result<RwLockReadGuard<'_, Option<Document>>, StoreError> {
        self.document
            .read()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {}", e)))
    }

    fn write_guard(&self) -> Result<RwLockWriteGuard<'_, Option<Document>>, StoreError> {
        self.document
            .write()
            .map_err(|e| StoreError::Unavailable(format!("memory store lock poisoned: {}", e)))
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn read(&self) -> Result<Option<Document>, StoreError> {
        Ok(self.read_guard()?.clone())
    }

    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        *self.write_guard()? = Some(document.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.write_guard()? = None;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.read_guard().map(|_| ())
    }
}

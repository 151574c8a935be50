//! Store adapter contract shared by every backend.

use crate::models::Document;
use async_trait::async_trait;
use service_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("{0}")]
    Redis(#[from] redis::RedisError),

    #[error("Stored document is not valid JSON: {0}")]
    Serialization(serde_json::Error),

    #[error("Invalid JSON body: {0}")]
    InvalidBody(serde_json::Error),

    #[error("Unreadable request body: {0}")]
    UnreadableBody(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::DatabaseError(anyhow::Error::new(err))
    }
}

/// Persistence primitives for the single stored document.
///
/// Implementations hold no request state; one instance is built at startup
/// and shared by every request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend label used in logs, metrics and health output.
    fn backend(&self) -> &'static str;

    /// The current document, `None` when nothing has been written.
    async fn read(&self) -> Result<Option<Document>, StoreError>;

    /// Persist `document` as the new current document.
    async fn write(&self, document: &Document) -> Result<(), StoreError>;

    /// Remove all persisted state.
    async fn clear(&self) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

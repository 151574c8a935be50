//! Redis backend overwriting the document under one fixed key.

use crate::models::Document;
use crate::services::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, Client};
use tracing::instrument;

#[derive(Clone)]
pub struct RedisStore {
    _client: Client,
    manager: ConnectionManager,
    key: String,
}

impl RedisStore {
    pub async fn connect(url: &str, key: impl Into<String>) -> Result<Self, StoreError> {
        let key = key.into();
        tracing::info!(key = %key, "Connecting to Redis");
        let client = Client::open(url)?;

        // ConnectionManager reconnects on its own after transient failures.
        let manager = client.get_connection_manager().await.map_err(|e| {
            tracing::error!("Failed to get Redis connection manager: {}", e);
            e
        })?;

        tracing::info!("Successfully connected to Redis");

        Ok(Self {
            _client: client,
            manager,
            key,
        })
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn read(&self) -> Result<Option<Document>, StoreError> {
        let mut conn = self.manager.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(&self.key)
            .query_async(&mut conn)
            .await?;

        raw.map(|payload| serde_json::from_str(&payload).map_err(StoreError::Serialization))
            .transpose()
    }

    #[instrument(skip(self, document), fields(key = %self.key))]
    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        let payload = serde_json::to_string(document).map_err(StoreError::Serialization)?;
        let mut conn = self.manager.clone();
        let _: () = redis::cmd("SET")
            .arg(&self.key)
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    #[instrument(skip(self), fields(key = %self.key))]
    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: () = redis::cmd("DEL")
            .arg(&self.key)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

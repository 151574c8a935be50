//! PostgreSQL backend keeping an append-only history of the document.

use crate::models::Document;
use crate::services::store::{DocumentStore, StoreError};
use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new database connection pool.
    #[instrument(skip(database_url))]
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    #[instrument(skip(self))]
    async fn read(&self) -> Result<Option<Document>, StoreError> {
        let latest = sqlx::query_scalar::<_, Json<Document>>(
            r#"
            SELECT data
            FROM json_data
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(latest.map(|Json(document)| document))
    }

    #[instrument(skip(self, document), fields(keys = document.len()))]
    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO json_data (data) VALUES ($1)")
            .bind(Json(document))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Wipes the whole history table, not just the newest version.
    #[instrument(skip(self))]
    async fn clear(&self) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM json_data")
            .execute(&self.pool)
            .await?;
        info!(rows = result.rows_affected(), "Deleted stored document history");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

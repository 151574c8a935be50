//! Common test utilities for json-store-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use json_store_service::config::{
    AccessConfig, DatabaseConfig, Environment, JsonStoreConfig, Profile, RedisConfig,
    StoreBackend, StoreConfig,
};
use json_store_service::models::Document;
use json_store_service::services::{DocumentStore, MemoryStore, StoreError};
use json_store_service::{build_router, AppState};
use serde_json::Value;
use service_core::config::Config as CommonConfig;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tower::util::ServiceExt;

pub const DOCUMENT_PATH: &str = "/api/data";
pub const ALLOWED_ORIGIN: &str = "https://intergramx.github.io";
pub const FOREIGN_ORIGIN: &str = "https://evil.example";

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,json_store_service=debug,sqlx=warn")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn test_config(profile: Profile) -> JsonStoreConfig {
    JsonStoreConfig {
        common: CommonConfig {
            port: 0,
            ..CommonConfig::default()
        },
        environment: Environment::Dev,
        service_name: "json-store-service-test".to_string(),
        log_level: "debug".to_string(),
        otlp_endpoint: None,
        profile,
        document_path: DOCUMENT_PATH.to_string(),
        store: StoreConfig {
            backend: StoreBackend::Memory,
            database: DatabaseConfig {
                url: None,
                max_connections: 2,
                min_connections: 1,
                run_migrations: true,
            },
            redis: RedisConfig {
                url: None,
                key: "json_data_test".to_string(),
            },
        },
        access: AccessConfig::default(),
    }
}

/// Memory-backed store that counts every call and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: AtomicUsize,
    failing: bool,
    failing_writes: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Reads succeed, every write fails.
    pub fn failing_writes() -> Self {
        Self {
            failing_writes: true,
            ..Self::default()
        }
    }

    /// Seed the backing store without going through the recorded calls.
    pub async fn seed(&self, document: Value) {
        let document: Document =
            serde_json::from_value(document).expect("Seed must be a JSON object");
        self.inner
            .write(&document)
            .await
            .expect("Failed to seed store");
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(StoreError::Unavailable("simulated outage".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    fn backend(&self) -> &'static str {
        "recording"
    }

    async fn read(&self) -> Result<Option<Document>, StoreError> {
        self.enter()?;
        self.inner.read().await
    }

    async fn write(&self, document: &Document) -> Result<(), StoreError> {
        self.enter()?;
        if self.failing_writes {
            return Err(StoreError::Unavailable("simulated write outage".to_string()));
        }
        self.inner.write(document).await
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.enter()?;
        self.inner.clear().await
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.enter()?;
        self.inner.health_check().await
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<RecordingStore>,
}

impl TestApp {
    pub fn spawn(profile: Profile) -> Self {
        Self::with_store(profile, RecordingStore::new())
    }

    pub fn with_store(profile: Profile, store: RecordingStore) -> Self {
        init_tracing();
        let store = Arc::new(store);
        let state = AppState::new(test_config(profile), store.clone());
        Self {
            router: build_router(state),
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        body: Option<&Value>,
        origin: Option<&str>,
    ) -> TestResponse {
        let raw = body.map(|b| serde_json::to_vec(b).expect("Failed to encode body"));
        self.request_raw(method, raw, origin).await
    }

    pub async fn request_raw(
        &self,
        method: Method,
        body: Option<Vec<u8>>,
        origin: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(DOCUMENT_PATH);
        if let Some(origin) = origin {
            builder = builder.header(header::ORIGIN, origin);
        }
        let request = match body {
            Some(bytes) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(bytes)),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        TestResponse::read(response).await
    }

    pub async fn get(&self) -> TestResponse {
        self.request(Method::GET, None, None).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub async fn read(response: axum::response::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

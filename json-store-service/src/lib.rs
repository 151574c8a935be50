//! JSON Store Service - one JSON document behind a small CRUD endpoint.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;

use crate::config::JsonStoreConfig;
use crate::dtos::ResponseShape;
use crate::middleware::{access_middleware, AccessPolicy};
use crate::services::{DocumentService, DocumentStore};
use axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::get,
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware, security_headers::security_headers_middleware,
    tracing::{http_trace_layer, request_id_middleware},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: JsonStoreConfig,
    pub documents: DocumentService,
    pub shape: ResponseShape,
    pub access: Arc<AccessPolicy>,
}

impl AppState {
    /// Wire the profile's shape and access policy around an already built store.
    pub fn new(config: JsonStoreConfig, store: Arc<dyn DocumentStore>) -> Self {
        let shape = config.profile.shape();
        let access = Arc::new(
            config
                .profile
                .access_policy(&config.access.allowed_origins),
        );

        Self {
            config,
            documents: DocumentService::new(store),
            shape,
            access,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let mut document_route = get(handlers::read_document)
        .post(handlers::create_document)
        .put(handlers::update_document);
    if state.config.profile.allows_delete() {
        document_route = document_route.delete(handlers::clear_document);
    }
    let document_route = document_route.fallback(handlers::method_not_allowed);

    // CORS and the origin check only guard the document route.
    let documents = Router::new()
        .route(&state.config.document_path, document_route)
        .route_layer(from_fn_with_state(state.clone(), access_middleware));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics))
        .merge(documents)
        .with_state(state)
        .layer(from_fn(metrics_middleware))
        .layer(http_trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
}

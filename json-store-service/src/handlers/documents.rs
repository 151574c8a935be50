//! Document endpoint: one handler per HTTP method.
//!
//! Every store failure, including a body that cannot be read or parsed, ends
//! up as a 500 rendered by the active [`ResponseShape`](crate::dtos::ResponseShape).

use crate::middleware::RequestOrigin;
use crate::models::Document;
use crate::services::StoreError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    response::Response,
};

fn parse_body(body: Result<Bytes, BytesRejection>) -> Result<Document, StoreError> {
    let body = body.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read request body");
        StoreError::UnreadableBody(e.body_text())
    })?;

    serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed JSON body");
        StoreError::InvalidBody(e)
    })
}

pub async fn read_document(State(state): State<AppState>, origin: RequestOrigin) -> Response {
    match state.documents.fetch().await {
        Ok(document) => state.shape.read(origin.as_deref(), document),
        Err(err) => state.shape.failure(origin.as_deref(), err),
    }
}

pub async fn create_document(
    State(state): State<AppState>,
    origin: RequestOrigin,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match parse_body(body) {
        Ok(document) => state.documents.replace(document).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(document) => state.shape.created(origin.as_deref(), document),
        Err(err) => state.shape.failure(origin.as_deref(), err),
    }
}

pub async fn update_document(
    State(state): State<AppState>,
    origin: RequestOrigin,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let result = match parse_body(body) {
        Ok(patch) => state.documents.update(patch).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(document) => state.shape.merged(origin.as_deref(), document),
        Err(err) => state.shape.failure(origin.as_deref(), err),
    }
}

pub async fn clear_document(State(state): State<AppState>, origin: RequestOrigin) -> Response {
    match state.documents.clear().await {
        Ok(()) => state.shape.cleared(origin.as_deref()),
        Err(err) => state.shape.failure(origin.as_deref(), err),
    }
}

/// Method router fallback for anything the profile does not expose.
pub async fn method_not_allowed(State(state): State<AppState>, origin: RequestOrigin) -> Response {
    state.shape.method_not_allowed(origin.as_deref())
}

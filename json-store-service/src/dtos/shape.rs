//! Rendering of endpoint outcomes for each profile.

use crate::dtos::Envelope;
use crate::models::Document;
use crate::services::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use service_core::error::AppError;

pub const PROHIBITED_ORIGIN_TEXT: &str = "The URL is prohibited.";
pub const METHOD_NOT_ALLOWED_TEXT: &str = "Method not allowed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// Bare document on GET, `{success, data}` on writes, `{error, details}` on failure.
    Plain,
    /// Every response wrapped in an [`Envelope`].
    Namespaced,
}

impl ResponseShape {
    pub fn read(self, origin: Option<&str>, document: Document) -> Response {
        match self {
            ResponseShape::Plain => Json(Value::Object(document)).into_response(),
            ResponseShape::Namespaced => {
                enveloped(StatusCode::OK, origin, Some(&document), "Document loaded", None)
            }
        }
    }

    pub fn created(self, origin: Option<&str>, document: Document) -> Response {
        self.written(origin, document, "Document saved")
    }

    pub fn merged(self, origin: Option<&str>, document: Document) -> Response {
        self.written(origin, document, "Document updated")
    }

    pub fn cleared(self, origin: Option<&str>) -> Response {
        match self {
            ResponseShape::Plain => Json(json!({ "success": true })).into_response(),
            ResponseShape::Namespaced => {
                enveloped(StatusCode::OK, origin, None, "Document deleted", None)
            }
        }
    }

    pub fn method_not_allowed(self, origin: Option<&str>) -> Response {
        match self {
            ResponseShape::Plain => AppError::MethodNotAllowed.into_response(),
            ResponseShape::Namespaced => enveloped(
                StatusCode::METHOD_NOT_ALLOWED,
                origin,
                None,
                METHOD_NOT_ALLOWED_TEXT,
                None,
            ),
        }
    }

    pub fn forbidden(self, origin: Option<&str>) -> Response {
        match self {
            ResponseShape::Plain => {
                AppError::Forbidden(anyhow::anyhow!(PROHIBITED_ORIGIN_TEXT)).into_response()
            }
            ResponseShape::Namespaced => enveloped(
                StatusCode::FORBIDDEN,
                origin,
                None,
                PROHIBITED_ORIGIN_TEXT,
                None,
            ),
        }
    }

    /// 500 carrying the store's message.
    pub fn failure(self, origin: Option<&str>, err: StoreError) -> Response {
        match self {
            ResponseShape::Plain => AppError::from(err).into_response(),
            ResponseShape::Namespaced => enveloped(
                StatusCode::INTERNAL_SERVER_ERROR,
                origin,
                None,
                "Database error",
                Some(err.to_string()),
            ),
        }
    }

    fn written(self, origin: Option<&str>, document: Document, text: &str) -> Response {
        match self {
            ResponseShape::Plain => {
                Json(json!({ "success": true, "data": document })).into_response()
            }
            ResponseShape::Namespaced => {
                enveloped(StatusCode::OK, origin, Some(&document), text, None)
            }
        }
    }
}

fn enveloped(
    code: StatusCode,
    origin: Option<&str>,
    document: Option<&Document>,
    text: &str,
    store_error: Option<String>,
) -> Response {
    (
        code,
        Json(Envelope::new(code, origin, document, text, store_error)),
    )
        .into_response()
}

//! Namespaced response envelope used by the guarded profile.

use crate::models::{namespace, Document, NAMESPACES};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "intergramX")]
    pub intergram_x: Value,
    #[serde(rename = "ScraJang")]
    pub scra_jang: Value,
    pub status: EnvelopeStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvelopeStatus {
    /// Origin of the request, `null` when the header was absent.
    pub from_url: Option<String>,
    /// Canonical reason phrase of `code`.
    pub text: String,
    pub code: u16,
    pub server_response: ServerResponse,
    /// Outcome reported by the backing store; `null` when it succeeded or
    /// was never called.
    #[serde(rename = "supabase_response")]
    pub store_response: Option<StoreResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerResponse {
    pub error: bool,
    pub ok: bool,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreResponse {
    pub message: String,
}

impl Envelope {
    /// Build an envelope around `document`; both namespaces default to `{}`.
    pub fn new(
        code: StatusCode,
        from_url: Option<&str>,
        document: Option<&Document>,
        text: impl Into<String>,
        store_error: Option<String>,
    ) -> Self {
        let empty = Document::new();
        let document = document.unwrap_or(&empty);
        let [intergram_x, scra_jang] = NAMESPACES.map(|key| namespace(document, key));
        let ok = code.is_success();

        Self {
            intergram_x,
            scra_jang,
            status: EnvelopeStatus {
                from_url: from_url.map(str::to_string),
                text: code.canonical_reason().unwrap_or_default().to_string(),
                code: code.as_u16(),
                server_response: ServerResponse {
                    error: !ok,
                    ok,
                    text: text.into(),
                },
                store_response: store_error.map(|message| StoreResponse { message }),
            },
        }
    }
}

//! CORS headers, preflight short-circuit and the origin allow-list.

use crate::AppState;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;

const OPEN_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const GUARDED_METHODS: &str = "GET, POST, PUT, OPTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Any,
    AllowList(Vec<String>),
}

/// Which origins may call the document route and which CORS headers they get.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    rule: OriginRule,
    allow_methods: HeaderValue,
}

impl AccessPolicy {
    pub fn any_origin() -> Self {
        Self {
            rule: OriginRule::Any,
            allow_methods: HeaderValue::from_static(OPEN_METHODS),
        }
    }

    /// Exact, case-sensitive match against `origins`.
    pub fn allow_list(origins: Vec<String>) -> Self {
        Self {
            rule: OriginRule::AllowList(origins),
            allow_methods: HeaderValue::from_static(GUARDED_METHODS),
        }
    }

    pub fn permits(&self, origin: Option<&str>) -> bool {
        match (&self.rule, origin) {
            (OriginRule::Any, _) => true,
            (OriginRule::AllowList(origins), Some(origin)) => origins.iter().any(|o| o == origin),
            (OriginRule::AllowList(_), None) => false,
        }
    }

    pub fn apply_headers(&self, headers: &mut HeaderMap, origin: Option<&str>) {
        match &self.rule {
            OriginRule::Any => {
                headers.insert(
                    header::ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                );
            }
            OriginRule::AllowList(_) => {
                if let Some(value) = origin
                    .filter(|o| self.permits(Some(*o)))
                    .and_then(|o| HeaderValue::from_str(o).ok())
                {
                    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
                }
                headers.append(header::VARY, HeaderValue::from_static("Origin"));
            }
        }
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            self.allow_methods.clone(),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        );
    }
}

/// The request's `Origin` header, if present and valid UTF-8.
#[derive(Debug, Clone)]
pub struct RequestOrigin(pub Option<String>);

impl RequestOrigin {
    fn from_headers(headers: &HeaderMap) -> Self {
        Self(
            headers
                .get(header::ORIGIN)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        )
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for RequestOrigin {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// Wraps the document route: answers preflight with 204, rejects prohibited
/// origins with 403 and stamps CORS headers on every response. Neither the
/// preflight nor the rejection reaches the store.
pub async fn access_middleware(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let origin = RequestOrigin::from_headers(req.headers());

    let mut response = if req.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else if !state.access.permits(origin.as_deref()) {
        tracing::warn!(
            origin = origin.as_deref().unwrap_or("-"),
            method = %req.method(),
            "Rejected request from prohibited origin"
        );
        state.shape.forbidden(origin.as_deref())
    } else {
        next.run(req).await
    };

    state
        .access
        .apply_headers(response.headers_mut(), origin.as_deref());
    response
}

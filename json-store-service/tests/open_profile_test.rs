//! Document endpoint behaviour under the open profile.

mod common;

use axum::http::{header, Method, StatusCode};
use common::TestApp;
use json_store_service::config::Profile;
use serde_json::json;

#[tokio::test]
async fn get_without_prior_write_returns_empty_object() {
    let app = TestApp::spawn(Profile::Open);

    let response = app.get().await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({}));
}

#[tokio::test]
async fn post_then_get_round_trips_the_body() {
    let app = TestApp::spawn(Profile::Open);
    let body = json!({
        "title": "notes",
        "tags": ["a", "b"],
        "nested": { "deep": { "value": 1.5 } },
        "empty": null
    });

    let created = app.request(Method::POST, Some(&body), None).await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body, json!({ "success": true, "data": body }));

    let fetched = app.get().await;
    assert_eq!(fetched.body, body);
}

#[tokio::test]
async fn post_replaces_the_whole_document() {
    let app = TestApp::spawn(Profile::Open);
    app.request(Method::POST, Some(&json!({ "a": 1, "b": 2 })), None)
        .await;
    app.request(Method::POST, Some(&json!({ "c": 3 })), None)
        .await;

    assert_eq!(app.get().await.body, json!({ "c": 3 }));
}

#[tokio::test]
async fn put_shallow_merges_onto_stored_document() {
    let app = TestApp::spawn(Profile::Open);
    let original = json!({
        "keep": "me",
        "replace": 1,
        "nested": { "x": 1, "y": 2 }
    });
    app.request(Method::POST, Some(&original), None).await;

    let update = json!({ "replace": 2, "nested": { "z": 3 }, "added": true });
    let merged = app.request(Method::PUT, Some(&update), None).await;

    let expected = json!({
        "keep": "me",
        "replace": 2,
        "nested": { "z": 3 },
        "added": true
    });
    assert_eq!(merged.status, StatusCode::OK);
    assert_eq!(merged.body, json!({ "success": true, "data": expected }));
    assert_eq!(app.get().await.body, expected);
}

#[tokio::test]
async fn put_on_empty_state_equals_the_update() {
    let app = TestApp::spawn(Profile::Open);
    let update = json!({ "only": ["this"] });

    let merged = app.request(Method::PUT, Some(&update), None).await;

    assert_eq!(merged.body["data"], update);
    assert_eq!(app.get().await.body, update);
}

#[tokio::test]
async fn delete_then_get_returns_empty_object() {
    let app = TestApp::spawn(Profile::Open);
    app.request(Method::POST, Some(&json!({ "a": 1 })), None)
        .await;

    let deleted = app.request(Method::DELETE, None, None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({ "success": true }));

    assert_eq!(app.get().await.body, json!({}));
}

#[tokio::test]
async fn options_short_circuits_with_204() {
    let app = TestApp::spawn(Profile::Open);
    app.request(Method::POST, Some(&json!({ "a": 1 })), None)
        .await;
    let calls_before = app.store.calls();

    let response = app
        .request(Method::OPTIONS, None, Some("https://anywhere.example"))
        .await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    assert_eq!(response.body, serde_json::Value::Null);
    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_METHODS),
        Some("GET, POST, PUT, DELETE, OPTIONS")
    );
    assert_eq!(
        response.header(header::ACCESS_CONTROL_ALLOW_HEADERS),
        Some("Content-Type")
    );
    assert_eq!(app.store.calls(), calls_before);
}

#[tokio::test]
async fn unsupported_method_returns_405_and_keeps_state() {
    let app = TestApp::spawn(Profile::Open);
    let stored = json!({ "a": 1 });
    app.request(Method::POST, Some(&stored), None).await;

    let response = app
        .request(Method::PATCH, Some(&json!({ "a": 2 })), None)
        .await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.body, json!({ "error": "Method not allowed" }));
    assert_eq!(app.get().await.body, stored);
}

#[tokio::test]
async fn malformed_json_body_is_a_500() {
    let app = TestApp::spawn(Profile::Open);

    let response = app
        .request_raw(Method::POST, Some(b"{\"a\":".to_vec()), None)
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Database error");
    assert!(!response.body["details"].as_str().unwrap().is_empty());
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn body_over_the_size_limit_is_a_500() {
    let app = TestApp::spawn(Profile::Open);
    let raw = vec![b' '; 3 * 1024 * 1024];

    let response = app.request_raw(Method::PUT, Some(raw), None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "Database error");
    let details = response.body["details"].as_str().unwrap_or_default();
    assert!(details.contains("length limit"), "{details}");
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn non_object_body_is_rejected_without_writing() {
    let app = TestApp::spawn(Profile::Open);

    let response = app.request(Method::PUT, Some(&json!([1, 2, 3])), None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.get().await.body, json!({}));
}

#[tokio::test]
async fn every_response_carries_wildcard_cors_headers() {
    let app = TestApp::spawn(Profile::Open);

    let response = app.get().await;

    assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), Some("*"));
    assert!(response.header(header::VARY).is_none());
    assert_eq!(response.header(header::X_CONTENT_TYPE_OPTIONS), Some("nosniff"));
    assert!(response.header(header::HeaderName::from_static("x-request-id")).is_some());
}

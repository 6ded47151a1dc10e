//! Integration tests for the import pipeline endpoints.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, TestApp};
use outfred_core::catalog::NewProduct;
use outfred_pipeline::catalog::ProductCatalog;
use serde_json::{json, Value};

/// Poll the status endpoint until the session reaches a terminal
/// status, then return the session JSON.
async fn wait_for_terminal(app: &TestApp, session_id: &str) -> Value {
    for _ in 0..200 {
        let response = get(
            app.router.clone(),
            &format!("/api/v1/import/status/{session_id}"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let status = body["data"]["status"].as_str().unwrap().to_string();
        if status == "completed" || status == "failed" {
            return body["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("session {session_id} never reached a terminal status");
}

async fn start_csv_import(app: &TestApp, csv_content: &str, update_existing: bool) -> String {
    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "merchant-1",
            "source_type": "csv",
            "source_data": { "csv_content": csv_content },
            "options": { "update_existing": update_existing, "auto_sync": false },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["message"], "Import started");
    body["data"]["session_id"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Start + status: end-to-end CSV scenario
// ---------------------------------------------------------------------------

#[tokio::test]
async fn csv_import_completes_with_expected_stats() {
    let app = common::test_app();

    let session_id = start_csv_import(&app, "name,price\nShirt,100\nShoes,abc\n", false).await;
    let session = wait_for_terminal(&app, &session_id).await;

    assert_eq!(session["status"], "completed");
    assert_eq!(session["stats"]["total"], 2);
    assert_eq!(session["stats"]["added"], 1);
    assert_eq!(session["stats"]["updated"], 0);
    assert_eq!(session["stats"]["duplicates"], 0);
    assert_eq!(session["stats"]["failed"], 1);
    assert!(session["duration_ms"].is_i64());

    // The log narrates the run for the polling client.
    let logs: Vec<&str> = session["logs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["message"].as_str().unwrap())
        .collect();
    assert!(logs.contains(&"Import started"));
    assert!(logs.contains(&"Added: Shirt"));
    assert!(logs.iter().any(|m| m.starts_with("Import finished:")));
}

#[tokio::test]
async fn seeded_catalog_yields_duplicates_not_failures() {
    let app = common::test_app();
    app.catalog
        .create(NewProduct {
            merchant_id: "merchant-1".to_string(),
            name: "Blue Shirt".to_string(),
            price: 50.0,
            color: None,
            size: None,
            image_url: None,
            sku: None,
        })
        .await
        .unwrap();

    // Case/whitespace variant of the existing name, updates disabled.
    let session_id = start_csv_import(&app, "name,price\nblue shirt ,90\n", false).await;
    let session = wait_for_terminal(&app, &session_id).await;

    assert_eq!(session["status"], "completed");
    assert_eq!(session["stats"]["duplicates"], 1);
    assert_eq!(session["stats"]["failed"], 0);
    assert_eq!(session["stats"]["added"], 0);
}

#[tokio::test]
async fn update_existing_overwrites_the_matched_product() {
    let app = common::test_app();
    app.catalog
        .create(NewProduct {
            merchant_id: "merchant-1".to_string(),
            name: "Blue Shirt".to_string(),
            price: 50.0,
            color: None,
            size: None,
            image_url: None,
            sku: None,
        })
        .await
        .unwrap();

    let session_id = start_csv_import(&app, "name,price\nblue shirt ,90\n", true).await;
    let session = wait_for_terminal(&app, &session_id).await;

    assert_eq!(session["stats"]["updated"], 1);
    assert_eq!(session["stats"]["added"], 0);

    let products = app.catalog.list_for_merchant("merchant-1").await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].price, 90.0);
}

#[tokio::test]
async fn unreachable_website_source_fails_the_session() {
    let app = common::test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "merchant-1",
            "source_type": "website",
            "source_data": { "url": "http://127.0.0.1:9/collections/all" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = body_json(response).await;
    let session_id = body["data"]["session_id"].as_str().unwrap().to_string();

    let session = wait_for_terminal(&app, &session_id).await;
    assert_eq!(session["status"], "failed");
    assert!(session["error"].is_string());
    assert_eq!(session["stats"]["total"], 0);
    assert_eq!(session["stats"]["added"], 0);
    assert_eq!(session["stats"]["failed"], 0);
}

// ---------------------------------------------------------------------------
// Start: input validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn start_rejects_blank_merchant_id() {
    let app = common::test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "   ",
            "source_type": "csv",
            "source_data": { "csv_content": "name,price\n" },
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn start_rejects_source_data_mismatched_with_source_type() {
    let app = common::test_app();

    // CSV import without CSV content.
    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "merchant-1",
            "source_type": "csv",
            "source_data": { "url": "https://shop.example.com" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Website import without a URL.
    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "merchant-1",
            "source_type": "website",
            "source_data": {},
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn start_rejects_unknown_source_type() {
    let app = common::test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "merchant-1",
            "source_type": "ftp",
            "source_data": { "url": "ftp://example.com" },
        }),
    )
    .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn invalid_input_creates_no_session() {
    let app = common::test_app();

    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "",
            "source_type": "csv",
            "source_data": { "csv_content": "name,price\n" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(app.store.list_by_merchant("").await.is_empty());
}

// ---------------------------------------------------------------------------
// Status: lookups
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_of_unknown_session_is_404() {
    let app = common::test_app();

    let response = get(
        app.router.clone(),
        &format!("/api/v1/import/status/{}", uuid::Uuid::new_v4()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn status_with_malformed_id_is_a_client_error() {
    let app = common::test_app();
    let response = get(app.router.clone(), "/api/v1/import/status/not-a-uuid").await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_then_status_is_404() {
    let app = common::test_app();

    let session_id = start_csv_import(&app, "name,price\nShirt,100\n", false).await;
    wait_for_terminal(&app, &session_id).await;

    let response = delete(
        app.router.clone(),
        &format!("/api/v1/import/session/{session_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["deleted"], true);

    let response = get(
        app.router.clone(),
        &format!("/api/v1/import/status/{session_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Deleting again reports false.
    let response = delete(
        app.router.clone(),
        &format!("/api/v1/import/session/{session_id}"),
    )
    .await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["deleted"], false);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_lists_own_sessions_newest_first() {
    let app = common::test_app();

    let first = start_csv_import(&app, "name,price\nShirt,100\n", false).await;
    wait_for_terminal(&app, &first).await;
    let second = start_csv_import(&app, "name,price\nShoes,80\n", false).await;
    wait_for_terminal(&app, &second).await;

    // Another merchant's session must not appear.
    let response = post_json(
        app.router.clone(),
        "/api/v1/import/start",
        json!({
            "merchant_id": "someone-else",
            "source_type": "csv",
            "source_data": { "csv_content": "name,price\nHat,15\n" },
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = get(
        app.router.clone(),
        "/api/v1/import/history?merchant_id=merchant-1",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let sessions = body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0]["id"].as_str().unwrap(), second);
    assert_eq!(sessions[1]["id"].as_str().unwrap(), first);

    // Limit truncates from the newest end.
    let response = get(
        app.router.clone(),
        "/api/v1/import/history?merchant_id=merchant-1&limit=1",
    )
    .await;
    let body = body_json(response).await;
    let sessions = body["data"].as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["id"].as_str().unwrap(), second);
}

#[tokio::test]
async fn history_requires_a_merchant_id() {
    let app = common::test_app();

    let response = get(app.router.clone(), "/api/v1/import/history?merchant_id=").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(app.router.clone(), "/api/v1/import/history").await;
    assert!(response.status().is_client_error());
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn connectors_lists_the_three_source_types() {
    let app = common::test_app();

    let response = get(app.router.clone(), "/api/v1/import/connectors").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let connectors = body["data"].as_array().unwrap();
    assert_eq!(connectors.len(), 3);

    let types: Vec<&str> = connectors
        .iter()
        .map(|c| c["source_type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"csv"));
    assert!(types.contains(&"website"));
    assert!(types.contains(&"api"));

    // Every connector describes its expected input fields.
    for connector in connectors {
        assert!(!connector["fields"].as_array().unwrap().is_empty());
    }
}

//! Tests against a running server with a real spreadsheet.
//!
//! These tests require:
//! - The server running (cargo run -p customer-sheets-server)
//! - Google Sheets credentials in its environment
//!
//! They create and then delete their own customer row.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

/// Base URL of the server under test (configurable via environment).
fn base_url() -> String {
    std::env::var("CUSTOMER_SHEETS_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

fn unique_id() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("live-test-{nanos}")
}

#[tokio::test]
#[ignore = "Requires running server and Google Sheets credentials"]
async fn test_live_readiness() {
    let resp = Client::new()
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to reach server");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running server and Google Sheets credentials"]
async fn test_live_customer_lifecycle() {
    let client = Client::new();
    let url = format!("{}/api/customers", base_url());
    let id = unique_id();

    let resp = client
        .post(&url)
        .json(&json!({ "id": id, "name": "Live Test", "phone": "000" }))
        .send()
        .await
        .expect("Failed to create customer");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .put(&url)
        .json(&json!({ "id": id, "phone": "111" }))
        .send()
        .await
        .expect("Failed to update customer");
    assert_eq!(resp.status(), StatusCode::OK);

    let list: Vec<Value> = client
        .get(&url)
        .send()
        .await
        .expect("Failed to list customers")
        .json()
        .await
        .expect("Failed to parse customer list");
    let found = list
        .iter()
        .find(|c| c["id"] == id.as_str())
        .expect("Created customer missing from list");
    assert_eq!(found["phone"], "111");

    let resp = client
        .delete(format!("{url}?id={id}"))
        .send()
        .await
        .expect("Failed to delete customer");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .delete(format!("{url}?id={id}"))
        .send()
        .await
        .expect("Failed to send second delete");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

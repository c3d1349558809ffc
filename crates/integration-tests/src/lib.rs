//! Integration tests for Customer Sheets.
//!
//! # Running Tests
//!
//! ```bash
//! # Router tests against an in-memory spreadsheet
//! cargo test -p customer-sheets-integration-tests
//!
//! # Live tests against a running server with a real spreadsheet
//! cargo run -p customer-sheets-server &
//! cargo test -p customer-sheets-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `customers_api` - Full router over the in-memory sheet backend
//! - `live_server` - HTTP against `CUSTOMER_SHEETS_BASE_URL` (ignored by default)

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use customer_sheets_server::config::AppConfig;
use customer_sheets_server::sheets::memory::MemoryStore;
use customer_sheets_server::state::AppState;
use customer_sheets_server::store::CustomerStore;
use serde_json::Value;
use tower::ServiceExt;

/// Sheet name used by the default configuration.
pub const SHEET: &str = "Customers";

/// A router wired to an in-memory spreadsheet.
pub struct TestApp {
    pub memory: Arc<MemoryStore>,
    router: Router,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Response body is not JSON")
    }
}

impl TestApp {
    /// Build the full application over a `Customers` sheet holding `rows`.
    #[must_use]
    pub fn with_rows(rows: &[&[&str]]) -> Self {
        let memory = Arc::new(MemoryStore::new().with_sheet(SHEET, rows));
        let store = CustomerStore::with_backend(memory.clone());
        let router = customer_sheets_server::app(AppState::with_store(AppConfig::default(), store));
        Self { memory, router }
    }

    /// Build the full application with no sheet backend configured.
    #[must_use]
    pub fn unconfigured(reason: &str) -> Self {
        let store = CustomerStore::unconfigured(reason);
        let router = customer_sheets_server::app(AppState::with_store(AppConfig::default(), store));
        Self {
            memory: Arc::new(MemoryStore::new()),
            router,
        }
    }

    /// Send a request through the router, with an optional JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn send(&self, method: Method, uri: &str, body: Option<&Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");

        TestResponse {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    /// Rows currently stored in the customer sheet.
    ///
    /// # Panics
    ///
    /// Panics if the sheet does not exist.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.memory.rows(SHEET).expect("Customer sheet missing")
    }
}

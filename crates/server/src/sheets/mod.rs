//! Remote tabular store access.
//!
//! The customer store talks to its backend through [`TabularStore`]: a grid of
//! text cells per named sheet, with range reads, row appends, row overwrites,
//! sheet id lookup and row deletion.
//!
//! # Implementations
//!
//! - [`SheetsClient`] - Google Sheets v4 REST API with service account auth
//! - [`memory::MemoryStore`] - in-process grid for tests (`test-util` feature)

pub mod auth;
pub mod client;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod range;

pub use client::SheetsClient;
pub use range::A1Range;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the tabular store.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("Sheets API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Service account authentication failed.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The signing key could not be loaded or used.
    #[error("Invalid service account key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),

    /// No sheet with this title exists in the spreadsheet.
    #[error("Sheet {0} not found")]
    SheetNotFound(String),

    /// Failed to build a request URL.
    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A remote grid-of-strings store addressed by sheet name.
///
/// Implementations must be safe to share across concurrent requests. They
/// hold no record data between calls.
#[async_trait]
pub trait TabularStore: Send + Sync {
    /// Read every non-empty row in `range`. Trailing empty cells and rows may
    /// be omitted; an empty sheet yields no rows.
    async fn get_values(&self, range: &A1Range) -> Result<Vec<Vec<String>>, SheetsError>;

    /// Append rows after the last non-empty row of the table at `range`.
    async fn append_values(&self, range: &A1Range, rows: Vec<Vec<String>>)
    -> Result<(), SheetsError>;

    /// Overwrite cells starting at `range`, one row per entry in `rows`.
    async fn update_values(&self, range: &A1Range, rows: Vec<Vec<String>>)
    -> Result<(), SheetsError>;

    /// Resolve a sheet title to its numeric sheet id.
    async fn sheet_id(&self, sheet: &str) -> Result<i64, SheetsError>;

    /// Delete rows `[start, end)` (zero-based) from a sheet, shifting later rows up.
    async fn delete_rows(&self, sheet_id: i64, start: u32, end: u32) -> Result<(), SheetsError>;
}

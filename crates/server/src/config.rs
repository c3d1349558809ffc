//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Sheet backend
//! - `GOOGLE_PROJECT_ID` - Google Cloud project of the service account
//! - `GOOGLE_CLIENT_EMAIL` - Service account email
//! - `GOOGLE_PRIVATE_KEY` - Service account PEM private key (`\n` escapes allowed)
//! - `SHEETS_SPREADSHEET_ID` - Spreadsheet holding the customer sheet
//!
//! The server starts without these. Every customer operation then fails with
//! a configuration error naming the first missing variable.
//!
//! ## Optional
//! - `SHEETS_CUSTOMER_SHEET` - Sheet (tab) name (default: Customers)
//! - `APP_HOST` - Bind address (default: 127.0.0.1)
//! - `APP_PORT` - Listen port (default: 3000)
//! - `LOG_FORMAT` - `json` for structured logs, anything else for text
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 1.0)

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;

const DEFAULT_SHEET_NAME: &str = "Customers";
const PEM_PRIVATE_KEY_MARKER: &str = "PRIVATE KEY-----";

/// Configuration errors that can occur during loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Google Sheets backend, or the reason it is unavailable
    pub sheets: Result<SheetsConfig, ConfigError>,
    /// Name of the sheet (tab) holding customer rows
    pub sheet_name: String,
    /// Emit JSON logs instead of text
    pub log_json: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

/// Google Sheets service account configuration.
///
/// Implements `Debug` manually to redact the private key.
#[derive(Clone)]
pub struct SheetsConfig {
    /// Google Cloud project id
    pub project_id: String,
    /// Service account email (JWT issuer)
    pub client_email: String,
    /// Service account PEM private key
    pub private_key: SecretString,
    /// Target spreadsheet id
    pub spreadsheet_id: String,
}

impl std::fmt::Debug for SheetsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsConfig")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("private_key", &"[REDACTED]")
            .field("spreadsheet_id", &self.spreadsheet_id)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present. A missing
    /// or malformed sheet backend does not fail loading; it is recorded in
    /// [`AppConfig::sheets`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the bind address or port is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("APP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("APP_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("APP_PORT".to_string(), e.to_string()))?;

        let sheets = SheetsConfig::from_env();
        let sheet_name = get_env_or_default("SHEETS_CUSTOMER_SHEET", DEFAULT_SHEET_NAME);
        let log_json = get_optional_env("LOG_FORMAT").is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_optional_env("SENTRY_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);
        let sentry_traces_sample_rate = get_optional_env("SENTRY_TRACES_SAMPLE_RATE")
            .and_then(|s| s.parse().ok())
            .unwrap_or(1.0);

        Ok(Self {
            host,
            port,
            sheets,
            sheet_name,
            log_json,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for AppConfig {
    /// Local defaults with no sheet backend. Used by tests.
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            sheets: Err(ConfigError::MissingEnvVar("GOOGLE_PROJECT_ID".to_string())),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            log_json: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        }
    }
}

impl SheetsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let project_id = get_required_env("GOOGLE_PROJECT_ID")?;
        let client_email = get_required_env("GOOGLE_CLIENT_EMAIL")?;
        let private_key = get_private_key("GOOGLE_PRIVATE_KEY")?;
        let spreadsheet_id = get_required_env("SHEETS_SPREADSHEET_ID")?;

        Ok(Self {
            project_id,
            client_email,
            private_key,
            spreadsheet_id,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required, non-empty environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    get_optional_env(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Load the service account key, expanding literal `\n` escapes.
fn get_private_key(key: &str) -> Result<SecretString, ConfigError> {
    let value = normalize_private_key(&get_required_env(key)?);
    validate_private_key(&value, key)?;
    Ok(SecretString::from(value))
}

/// Replace escaped newlines (as stored in single-line env files) with real ones.
fn normalize_private_key(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Reject values that are obviously not a PEM private key.
fn validate_private_key(value: &str, var_name: &str) -> Result<(), ConfigError> {
    if value.contains("-----BEGIN") && value.contains(PEM_PRIVATE_KEY_MARKER) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be a PEM-encoded private key".to_string(),
        ))
    }
}

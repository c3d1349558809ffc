//! Google service account authentication.
//!
//! Exchanges a signed JWT assertion for an OAuth access token using the
//! JWT bearer grant (RFC 7523).

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::SheetsError;
use crate::config::SheetsConfig;

/// Google OAuth 2.0 token endpoint (also the assertion audience).
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Read/write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for each assertion. Google caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Seconds before expiry at which a token is treated as expired.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Access token obtained from the token endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Bearer token for API requests.
    pub token: SecretString,
    /// Unix timestamp when the token expires.
    pub expires_at: i64,
}

impl AccessToken {
    /// Check if the token has expired (or will within the safety buffer).
    #[must_use]
    pub fn is_expired(&self) -> bool {
        let now = chrono::Utc::now().timestamp();
        now >= self.expires_at - EXPIRY_BUFFER_SECS
    }
}

/// Claims of the service account assertion.
#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Response from the token endpoint.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    /// Token lifetime in seconds.
    expires_in: i64,
}

/// Error response from the token endpoint.
#[derive(Deserialize)]
struct TokenErrorResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

/// Sign the assertion JWT for a service account.
///
/// # Errors
///
/// Returns `SheetsError::InvalidKey` if the private key is not a valid RSA PEM key.
pub fn sign_assertion(config: &SheetsConfig, issued_at: i64) -> Result<String, SheetsError> {
    let key = EncodingKey::from_rsa_pem(config.private_key.expose_secret().as_bytes())?;
    let claims = AssertionClaims {
        iss: &config.client_email,
        scope: SPREADSHEETS_SCOPE,
        aud: TOKEN_ENDPOINT,
        iat: issued_at,
        exp: issued_at + ASSERTION_LIFETIME_SECS,
    };
    Ok(jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &key)?)
}

/// Obtain a fresh access token for the service account.
///
/// # Errors
///
/// Returns `SheetsError::AuthenticationFailed` if the token endpoint rejects
/// the assertion, or `SheetsError::Http` if the request fails.
#[instrument(skip(client, config), fields(client_email = %config.client_email))]
pub async fn fetch_access_token(
    client: &reqwest::Client,
    config: &SheetsConfig,
) -> Result<AccessToken, SheetsError> {
    let now = chrono::Utc::now().timestamp();
    let assertion = sign_assertion(config, now)?;

    let response = client
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await?;

    let status = response.status();

    if status.is_success() {
        let token_response: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token_response.expires_in, "Obtained Sheets access token");

        Ok(AccessToken {
            token: SecretString::from(token_response.access_token),
            expires_at: now + token_response.expires_in,
        })
    } else {
        let error_response: TokenErrorResponse =
            response.json().await.unwrap_or(TokenErrorResponse {
                error: None,
                error_description: None,
            });

        let message = error_response
            .error_description
            .or(error_response.error)
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(SheetsError::AuthenticationFailed(message))
    }
}

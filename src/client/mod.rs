//! HTTP client for the user-management API
//!
//! Thin request/response glue: two endpoints, JSON bodies, a correlation ID
//! per request. No retry, no timeout, no cancellation.

use crate::stats::{RequestEvent, SharedStats};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Header carrying the per-request trace token
pub const CORRELATION_HEADER: &str = "X-Correlation-ID";

const USERS_PATH: &str = "/api/users";
const USER_PATH: &str = "/api/user";

/// A user record as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Opaque until render time; the API has been observed to omit it
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request payload for creating a new user
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}

impl NewUser {
    /// Trim both fields and require them to be non-empty.
    /// Returns `None` if either field is empty after trimming.
    pub fn parse(name: &str, email: &str) -> Option<Self> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            email: email.to_string(),
        })
    }
}

/// Errors returned by `UserApi` operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}")]
    Status {
        status: u16,
        /// Server-provided error message, when the body carried one
        message: Option<String>,
    },

    /// The response body could not be parsed as the expected JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Generate a fresh correlation ID: `web-` plus nine base-36 characters
pub fn correlation_id() -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut n = uuid::Uuid::new_v4().as_u128();
    let mut suffix = String::with_capacity(9);
    for _ in 0..9 {
        suffix.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    format!("web-{suffix}")
}

/// Client for the user-management API
///
/// Holds no base URL: the URL is session state owned by `SharedConfig` and
/// passed in per call, so a mid-session URL change applies to the next
/// request without rebuilding the client.
#[derive(Clone)]
pub struct UserApi {
    client: Client,
    stats: SharedStats,
}

impl UserApi {
    /// Create a new API client.
    /// Built without a request timeout: a hung request hangs only the
    /// operation that issued it.
    pub fn new(stats: SharedStats) -> Self {
        let client = Client::builder()
            .build()
            .expect("Failed to create HTTP client");

        Self { client, stats }
    }

    fn endpoint(base_url: &str, path: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), path)
    }

    /// Issue a read-only request against the users collection and report the
    /// raw status code. `Err` only for transport-level failures.
    pub async fn probe(&self, base_url: &str) -> Result<u16, ApiError> {
        let cid = correlation_id();
        let url = Self::endpoint(base_url, USERS_PATH);

        tracing::debug!(url = %url, correlation_id = %cid, "Probing API");

        let response = match self
            .client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(CORRELATION_HEADER, &cid)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.stats
                    .record_request(RequestEvent::new(cid, "GET", USERS_PATH));
                return Err(e.into());
            }
        };

        let status = response.status().as_u16();
        self.stats
            .record_request(RequestEvent::new(cid, "GET", USERS_PATH).with_status(status));
        Ok(status)
    }

    /// Fetch the full current set of users
    pub async fn list_users(&self, base_url: &str) -> Result<Vec<User>, ApiError> {
        let cid = correlation_id();
        let url = Self::endpoint(base_url, USERS_PATH);

        tracing::debug!(url = %url, correlation_id = %cid, "Fetching users");

        let response = match self
            .client
            .get(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(CORRELATION_HEADER, &cid)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.stats
                    .record_request(RequestEvent::new(cid, "GET", USERS_PATH));
                return Err(e.into());
            }
        };

        let status = response.status();
        self.stats
            .record_request(RequestEvent::new(cid, "GET", USERS_PATH).with_status(status.as_u16()));

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: None,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Submit a new user.
    /// The body is parsed as JSON before the status is inspected, so a
    /// non-JSON body is a decode failure even for error statuses; a JSON
    /// error body surfaces its `error` field through `ApiError::Status`.
    pub async fn create_user(&self, base_url: &str, input: &NewUser) -> Result<User, ApiError> {
        let cid = correlation_id();
        let url = Self::endpoint(base_url, USER_PATH);

        tracing::debug!(url = %url, correlation_id = %cid, name = %input.name, "Creating user");

        let response = match self
            .client
            .post(&url)
            .header(CORRELATION_HEADER, &cid)
            .json(input)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                self.stats
                    .record_request(RequestEvent::new(cid, "POST", USER_PATH));
                return Err(e.into());
            }
        };

        let status = response.status();
        self.stats
            .record_request(RequestEvent::new(cid, "POST", USER_PATH).with_status(status.as_u16()));

        let body = response.text().await?;
        let value: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;

        if !status.is_success() {
            let message = value
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

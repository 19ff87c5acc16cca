//! Explicit login session with an init (login) and teardown (logout)
//! lifecycle.
//!
//! The session is a value handed to whatever needs it (command handlers,
//! the navigation surface), never an ambient key-value store consulted from
//! random call sites. Between runs it persists as one JSON file under the
//! configured store path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::http::RateLimitedApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminRole {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "sub-admin")]
    SubAdmin,
}

/// A logged-in back-office identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub admin_id: String,
    pub role: AdminRole,
    pub email: String,
    /// Page keys a sub-admin may open. Irrelevant for full admins.
    #[serde(default)]
    pub page_access: Vec<String>,
}

impl Session {
    /// Whether this identity may open the given page. Full admins see
    /// everything; sub-admins only what they were granted at signup.
    pub fn allows(&self, page: &str) -> bool {
        match self.role {
            AdminRole::Admin => true,
            AdminRole::SubAdmin => self.page_access.iter().any(|granted| granted == page),
        }
    }
}

/// Wire shape of `POST /admin/login`. The id's type is not guaranteed by
/// the service, so it is accepted as-is and stored as text.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(default)]
    id: Option<Value>,
    role: AdminRole,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    page_access: Option<Vec<String>>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("login request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("login rejected with HTTP {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("session store error: {0}")]
    Store(#[from] std::io::Error),
}

impl AuthError {
    pub fn service_message(&self) -> Option<&str> {
        match self {
            AuthError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the admin auth endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: RateLimitedApiClient,
    base_url: String,
}

impl AuthClient {
    pub fn new(base_url: impl Into<String>, http: RateLimitedApiClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn from_config() -> anyhow::Result<Self> {
        let config = crate::config::config()?;
        let http = RateLimitedApiClient::new(
            config.api.rate_limit.requests_per_minute,
            config.api.rate_limit.burst_capacity,
        )?;
        Ok(Self::new(config.api.base_url.clone(), http))
    }

    /// Initialize a session by signing in against the admin auth endpoint.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let url = format!("{}/admin/login", self.base_url);
        debug!(email = %email, "Signing in");

        let response = self
            .http
            .execute(self.http.inner().post(&url).json(&serde_json::json!({
                "email": email,
                "password": password,
            })))
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message);
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: LoginResponse = response.json().await?;
        let session = Session {
            token: body.token,
            admin_id: body.id.map(id_as_text).unwrap_or_default(),
            role: body.role,
            email: body.email.unwrap_or_else(|| email.to_string()),
            page_access: body.page_access.unwrap_or_default(),
        };
        info!(email = %session.email, role = ?session.role, "Login successful");
        Ok(session)
    }
}

fn id_as_text(id: Value) -> String {
    match id {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config() -> anyhow::Result<Self> {
        let config = crate::config::config()?;
        Ok(Self::new(&config.session.store_path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current session, or None when nobody is logged in. A corrupt
    /// store file reads as logged-out rather than an error.
    pub fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn save(&self, session: &Session) -> Result<(), AuthError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string_pretty(session).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    /// Teardown: forget the persisted session. Idempotent.
    pub fn clear(&self) -> Result<(), AuthError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::Store(e)),
        }
    }
}

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::http::RateLimitedApiClient;
use crate::progress::types::{LicenseType, ProgressEnvelope, ProgressRecord, TransitionRequest};

/// Progress service operations, behind a trait so the workflow presenter can
/// be exercised against an in-memory double in tests.
#[async_trait]
pub trait ProgressApi {
    /// Read the current record for one (license type, user) pair.
    /// `Ok(None)` means the service holds no record for that user yet.
    async fn fetch_record(
        &self,
        license_type: LicenseType,
        user_id: &str,
    ) -> Result<Option<ProgressRecord>, ProgressError>;

    /// Persist one status transition. The service is the source of truth;
    /// callers re-read after a successful write.
    async fn submit_transition(
        &self,
        license_type: LicenseType,
        request: &TransitionRequest,
    ) -> Result<(), ProgressError>;
}

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("progress service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("progress service returned HTTP {status}")]
    Api { status: u16, message: Option<String> },
}

impl ProgressError {
    /// Human-readable message carried by an error response body, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ProgressError::Api { message, .. } => message.as_deref(),
            ProgressError::Http(_) => None,
        }
    }
}

/// Error body shape used by the back-office API: `{ "message": "..." }`.
#[derive(Debug, Deserialize)]
struct ServiceMessage {
    message: Option<String>,
}

/// REST client for the progress service.
#[derive(Debug, Clone)]
pub struct ProgressClient {
    http: RateLimitedApiClient,
    base_url: String,
}

impl ProgressClient {
    pub fn new(base_url: impl Into<String>, http: RateLimitedApiClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Build a client from the loaded application configuration.
    pub fn from_config() -> anyhow::Result<Self> {
        let config = crate::config::config()?;
        let http = RateLimitedApiClient::new(
            config.api.rate_limit.requests_per_minute,
            config.api.rate_limit.burst_capacity,
        )?;
        Ok(Self::new(config.api.base_url.clone(), http))
    }

    fn collection_url(&self, license_type: LicenseType) -> String {
        format!("{}/progress/{}", self.base_url, license_type)
    }

    fn record_url(&self, license_type: LicenseType, user_id: &str) -> String {
        format!("{}/progress/{}/{}", self.base_url, license_type, user_id)
    }

    async fn error_for_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProgressError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        // Error bodies may carry a display message; ignore bodies that don't.
        let message = response
            .json::<ServiceMessage>()
            .await
            .ok()
            .and_then(|body| body.message);
        Err(ProgressError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ProgressApi for ProgressClient {
    async fn fetch_record(
        &self,
        license_type: LicenseType,
        user_id: &str,
    ) -> Result<Option<ProgressRecord>, ProgressError> {
        let url = self.record_url(license_type, user_id);
        debug!(license_type = %license_type, user_id = %user_id, "Fetching progress record");

        let response = self.http.execute(self.http.inner().get(&url)).await?;
        let response = Self::error_for_status(response).await?;
        let envelope: ProgressEnvelope = response.json().await?;
        Ok(envelope.data)
    }

    async fn submit_transition(
        &self,
        license_type: LicenseType,
        request: &TransitionRequest,
    ) -> Result<(), ProgressError> {
        let url = self.collection_url(license_type);
        debug!(
            license_type = %license_type,
            user_id = %request.user_id,
            target_status = %request.status,
            "Submitting progress transition"
        );

        let response = self
            .http
            .execute(self.http.inner().put(&url).json(request))
            .await?;
        Self::error_for_status(response).await?;
        Ok(())
    }
}

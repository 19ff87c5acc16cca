use thiserror::Error;
use tracing::{info, warn};

use crate::progress::client::{ProgressApi, ProgressError};
use crate::progress::types::{LicenseType, ProgressRecord, TransitionRequest};
use crate::workflow::transitions::{next_action, AdvanceInput, NextAction};

#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Missing or inconsistent local input. Blocks the request; nothing is
    /// sent and no state changes.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A previous fetch/advance has not completed yet.
    #[error("another request is still in flight")]
    OperationInFlight,
    /// The held record's status offers no transition for this license type.
    #[error("no action is available from status '{status}' for a {license_type} license")]
    NoActionAvailable {
        status: String,
        license_type: LicenseType,
    },
    /// The supplied input belongs to a different table row than the one
    /// currently offered.
    #[error("input is for '{supplied}' but the offered action is '{offered}'")]
    InputMismatch {
        supplied: &'static str,
        offered: &'static str,
    },
    /// Read failed; the held record has been cleared.
    #[error("reading progress failed: {0}")]
    ServiceRead(#[source] ProgressError),
    /// Write failed; the held record is unchanged.
    #[error("updating progress failed: {0}")]
    ServiceWrite(#[source] ProgressError),
}

impl WorkflowError {
    /// Display message carried by a service error response, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            WorkflowError::ServiceRead(e) | WorkflowError::ServiceWrite(e) => e.service_message(),
            _ => None,
        }
    }
}

/// Holds the progress record for one (license type, user) pair and derives
/// the single action the workflow offers next.
///
/// The presenter never trusts itself over the service: a successful advance
/// is always followed by a re-read, and a failed one leaves the held record
/// exactly as it was. All errors are recoverable; the presenter stays usable
/// after any of them.
#[derive(Debug)]
pub struct WorkflowPresenter<C> {
    api: C,
    license_type: LicenseType,
    user_id: String,
    record: Option<ProgressRecord>,
    in_flight: bool,
}

impl<C> WorkflowPresenter<C> {
    pub fn new(api: C, license_type: LicenseType, user_id: impl Into<String>) -> Self {
        Self {
            api,
            license_type,
            user_id: user_id.into(),
            record: None,
            in_flight: false,
        }
    }

    pub fn license_type(&self) -> LicenseType {
        self.license_type
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// The record currently held, if the last fetch found one.
    pub fn record(&self) -> Option<&ProgressRecord> {
        self.record.as_ref()
    }

    /// The action the transition table offers for the held record.
    /// `None` until a record has been fetched.
    pub fn offered_action(&self) -> Option<NextAction> {
        self.record
            .as_ref()
            .map(|record| next_action(&record.status, self.license_type))
    }

    /// Stored download link, surfaced when the record is at `license_ready`.
    pub fn download_link(&self) -> Option<&str> {
        match self.offered_action() {
            Some(NextAction::DownloadLicense) => self
                .record
                .as_ref()
                .and_then(|record| record.payload_str("license_download_link")),
            _ => None,
        }
    }

    fn require_user_id(&self) -> Result<(), WorkflowError> {
        if self.user_id.trim().is_empty() {
            return Err(WorkflowError::Validation(
                "user id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl<C: ProgressApi> WorkflowPresenter<C> {
    /// Replace the held record with the service's current answer.
    ///
    /// On any service failure the held record is cleared so a stale state is
    /// never displayed; the caller may simply retry.
    pub async fn fetch(&mut self) -> Result<Option<&ProgressRecord>, WorkflowError> {
        self.require_user_id()?;
        if self.in_flight {
            return Err(WorkflowError::OperationInFlight);
        }

        self.in_flight = true;
        let result = self.api.fetch_record(self.license_type, &self.user_id).await;
        self.in_flight = false;

        match result {
            Ok(record) => {
                info!(
                    license_type = %self.license_type,
                    user_id = %self.user_id,
                    status = record.as_ref().map(|r| r.status.as_str()).unwrap_or("<none>"),
                    "Progress record fetched"
                );
                self.record = record;
                Ok(self.record.as_ref())
            }
            Err(e) => {
                warn!(
                    license_type = %self.license_type,
                    user_id = %self.user_id,
                    error = %e,
                    "Progress fetch failed, clearing held record"
                );
                self.record = None;
                Err(WorkflowError::ServiceRead(e))
            }
        }
    }

    /// Submit the offered transition, then re-read the authoritative record.
    ///
    /// The input must match the action the table offers for the held
    /// record's status; a transition the table does not offer is never sent.
    pub async fn advance(&mut self, input: AdvanceInput) -> Result<(), WorkflowError> {
        self.require_user_id()?;
        if self.in_flight {
            return Err(WorkflowError::OperationInFlight);
        }

        let record = self.record.as_ref().ok_or_else(|| {
            WorkflowError::Validation("no record is held; fetch progress first".to_string())
        })?;

        let offered = match next_action(&record.status, self.license_type) {
            NextAction::Advance(kind) => kind,
            NextAction::DownloadLicense | NextAction::Terminal | NextAction::Unavailable => {
                return Err(WorkflowError::NoActionAvailable {
                    status: record.status.as_str().to_string(),
                    license_type: self.license_type,
                });
            }
        };
        if input.kind() != offered {
            return Err(WorkflowError::InputMismatch {
                supplied: input.kind().label(),
                offered: offered.label(),
            });
        }

        let request = TransitionRequest {
            user_id: self.user_id.clone(),
            status: offered.target(),
            fields: input.into_fields(),
        };

        self.in_flight = true;
        let result = self.api.submit_transition(self.license_type, &request).await;
        self.in_flight = false;

        match result {
            Ok(()) => {
                info!(
                    license_type = %self.license_type,
                    user_id = %self.user_id,
                    action = offered.label(),
                    target_status = %request.status,
                    "Progress transition accepted"
                );
                // The service is the source of truth; re-read rather than
                // trusting the request we just sent.
                self.fetch().await?;
                Ok(())
            }
            Err(e) => {
                warn!(
                    license_type = %self.license_type,
                    user_id = %self.user_id,
                    action = offered.label(),
                    error = %e,
                    "Progress transition rejected, held record unchanged"
                );
                Err(WorkflowError::ServiceWrite(e))
            }
        }
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// The two parallel license workflows. Mostly shared statuses, but the entry
/// point (`processing`/`test_failed`) and the `test_passed` exit diverge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseType {
    Learning,
    Driving,
}

impl LicenseType {
    pub const ALL: [LicenseType; 2] = [LicenseType::Learning, LicenseType::Driving];

    /// Path segment used by the progress service routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::Learning => "learning",
            LicenseType::Driving => "driving",
        }
    }
}

impl fmt::Display for LicenseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "learning" => Ok(LicenseType::Learning),
            "driving" => Ok(LicenseType::Driving),
            other => Err(format!(
                "unknown license type '{}', expected 'learning' or 'driving'",
                other
            )),
        }
    }
}

/// Workflow node of a license application.
///
/// The service is the source of truth for this value; a status the client
/// does not recognize deserializes to `Unknown` and simply offers no action.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    Processing,
    TestFailed,
    SlotBooked,
    TestPending,
    TestPassed,
    LicenseReady,
    Dispatched,
    Delivered,
    #[serde(untagged)]
    Unknown(String),
}

impl ProgressStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ProgressStatus::Processing => "processing",
            ProgressStatus::TestFailed => "test_failed",
            ProgressStatus::SlotBooked => "slot_booked",
            ProgressStatus::TestPending => "test_pending",
            ProgressStatus::TestPassed => "test_passed",
            ProgressStatus::LicenseReady => "license_ready",
            ProgressStatus::Dispatched => "dispatched",
            ProgressStatus::Delivered => "delivered",
            ProgressStatus::Unknown(other) => other,
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One license application's current state for one user.
///
/// Payload fields accumulate across transitions (`application_id`,
/// `test_link`, `slot_datetime`, `tracking_id`, ...); the client never
/// validates them against the current status. Records are never mutated
/// locally; every transition is a write followed by a full re-read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub user_id: String,
    pub status: ProgressStatus,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl ProgressRecord {
    /// Auxiliary payload field attached by an earlier transition, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Instructor assignment carried by the `slot_booked → test_pending`
/// transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorDetails {
    pub name: String,
    pub vehicle_no: String,
    pub destination: String,
}

/// Wire body for `PUT /progress/{license_type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub user_id: String,
    pub status: ProgressStatus,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Read envelope returned by `GET /progress/{license_type}/{user_id}`.
/// `data: null` means no record exists for that user yet.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressEnvelope {
    pub data: Option<ProgressRecord>,
}

//! Transition policy for the license-progress workflow.
//!
//! The two license types share most statuses but diverge at two decision
//! points: the `processing`/`test_failed` rows apply to one type each, and
//! `test_passed` exits to `license_ready` (learning) or `dispatched`
//! (driving). The whole policy is one total match over
//! `(status, license type)`, so the next step is a pure function of state
//! and the compiler rejects an unhandled combination.

use chrono::NaiveDateTime;
use serde_json::{json, Map, Value};

use crate::progress::types::{InstructorDetails, LicenseType, ProgressStatus};

/// Identity of a transition-offering row in the table. One variant per
/// button the back office can press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    SetUpTest,
    RebookSlot,
    AssignInstructor,
    MarkPassed,
    SetLicenseReady,
    DispatchLicense,
    MarkDelivered,
}

impl TransitionKind {
    pub fn label(&self) -> &'static str {
        match self {
            TransitionKind::SetUpTest => "Set Up Test",
            TransitionKind::RebookSlot => "Rebook Slot",
            TransitionKind::AssignInstructor => "Assign Instructor",
            TransitionKind::MarkPassed => "Mark as Passed",
            TransitionKind::SetLicenseReady => "Set License Ready",
            TransitionKind::DispatchLicense => "Dispatch License",
            TransitionKind::MarkDelivered => "Mark as Delivered",
        }
    }

    /// Status the transition requests from the service.
    pub fn target(&self) -> ProgressStatus {
        match self {
            TransitionKind::SetUpTest => ProgressStatus::TestFailed,
            TransitionKind::RebookSlot => ProgressStatus::SlotBooked,
            TransitionKind::AssignInstructor => ProgressStatus::TestPending,
            TransitionKind::MarkPassed => ProgressStatus::TestPassed,
            TransitionKind::SetLicenseReady => ProgressStatus::LicenseReady,
            TransitionKind::DispatchLicense => ProgressStatus::Dispatched,
            TransitionKind::MarkDelivered => ProgressStatus::Delivered,
        }
    }
}

/// The single forward step offered for a `(status, license type)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// A transition request may be sent.
    Advance(TransitionKind),
    /// `license_ready`: the stored download link is surfaced, nothing is sent.
    DownloadLicense,
    /// `delivered`: the workflow is finished.
    Terminal,
    /// No forward step exists for this pair (includes unrecognized statuses).
    Unavailable,
}

/// The transition table. Pure and total: every status × license type pair
/// maps to exactly one outcome.
pub fn next_action(status: &ProgressStatus, license_type: LicenseType) -> NextAction {
    use LicenseType::{Driving, Learning};
    use ProgressStatus::*;

    match (status, license_type) {
        (Processing, Learning) => NextAction::Advance(TransitionKind::SetUpTest),
        (Processing, Driving) => NextAction::Unavailable,
        (TestFailed, Driving) => NextAction::Advance(TransitionKind::RebookSlot),
        (TestFailed, Learning) => NextAction::Unavailable,
        (SlotBooked, _) => NextAction::Advance(TransitionKind::AssignInstructor),
        (TestPending, _) => NextAction::Advance(TransitionKind::MarkPassed),
        (TestPassed, Learning) => NextAction::Advance(TransitionKind::SetLicenseReady),
        (TestPassed, Driving) => NextAction::Advance(TransitionKind::DispatchLicense),
        (LicenseReady, _) => NextAction::DownloadLicense,
        (Dispatched, _) => NextAction::Advance(TransitionKind::MarkDelivered),
        (Delivered, _) => NextAction::Terminal,
        (Unknown(_), _) => NextAction::Unavailable,
    }
}

/// Typed input for one transition. Each variant carries exactly the fields
/// its table row requires, so a request can never be built with extras or
/// omissions.
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceInput {
    SetUpTest {
        application_id: String,
        test_password: String,
        test_link: String,
    },
    RebookSlot {
        slot_datetime: NaiveDateTime,
    },
    AssignInstructor {
        instructor: InstructorDetails,
    },
    MarkPassed,
    SetLicenseReady {
        license_download_link: String,
    },
    DispatchLicense {
        tracking_id: String,
    },
    MarkDelivered,
}

impl AdvanceInput {
    pub fn kind(&self) -> TransitionKind {
        match self {
            AdvanceInput::SetUpTest { .. } => TransitionKind::SetUpTest,
            AdvanceInput::RebookSlot { .. } => TransitionKind::RebookSlot,
            AdvanceInput::AssignInstructor { .. } => TransitionKind::AssignInstructor,
            AdvanceInput::MarkPassed => TransitionKind::MarkPassed,
            AdvanceInput::SetLicenseReady { .. } => TransitionKind::SetLicenseReady,
            AdvanceInput::DispatchLicense { .. } => TransitionKind::DispatchLicense,
            AdvanceInput::MarkDelivered => TransitionKind::MarkDelivered,
        }
    }

    /// Extra fields for the wire body. `retest_fee_paid` is a table-level
    /// constant of the rebook row, not caller input.
    pub fn into_fields(self) -> Map<String, Value> {
        let mut fields = Map::new();
        match self {
            AdvanceInput::SetUpTest {
                application_id,
                test_password,
                test_link,
            } => {
                fields.insert("application_id".to_string(), json!(application_id));
                fields.insert("test_password".to_string(), json!(test_password));
                fields.insert("test_link".to_string(), json!(test_link));
            }
            AdvanceInput::RebookSlot { slot_datetime } => {
                fields.insert(
                    "slot_datetime".to_string(),
                    json!(slot_datetime.format(SLOT_DATETIME_FORMAT).to_string()),
                );
                fields.insert("retest_fee_paid".to_string(), json!(true));
            }
            AdvanceInput::AssignInstructor { instructor } => {
                fields.insert(
                    "instructor_details".to_string(),
                    json!({
                        "name": instructor.name,
                        "vehicle_no": instructor.vehicle_no,
                        "destination": instructor.destination,
                    }),
                );
            }
            AdvanceInput::SetLicenseReady {
                license_download_link,
            } => {
                fields.insert(
                    "license_download_link".to_string(),
                    json!(license_download_link),
                );
            }
            AdvanceInput::DispatchLicense { tracking_id } => {
                fields.insert("tracking_id".to_string(), json!(tracking_id));
            }
            AdvanceInput::MarkPassed | AdvanceInput::MarkDelivered => {}
        }
        fields
    }
}

/// Slot datetimes travel in the same minute-precision shape the booking
/// form produces.
pub const SLOT_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

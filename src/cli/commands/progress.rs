use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use tracing::Instrument;

use crate::cli::commands::{require_page_access, Command};
use crate::cli::AdvanceAction;
use crate::progress::{InstructorDetails, LicenseType, ProgressClient};
use crate::telemetry::{create_workflow_span, generate_correlation_id};
use crate::workflow::transitions::SLOT_DATETIME_FORMAT;
use crate::workflow::{AdvanceInput, NextAction, WorkflowError, WorkflowPresenter};

/// Page key of the license-progress screen in the admin console.
const PAGE: &str = "license-progress";

pub struct FetchCommand {
    pub license_type: LicenseType,
    pub user_id: String,
}

impl FetchCommand {
    pub fn new(license_type: LicenseType, user_id: String) -> Self {
        Self {
            license_type,
            user_id,
        }
    }
}

impl Command for FetchCommand {
    async fn execute(&self) -> Result<()> {
        require_page_access(PAGE)?;

        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("fetch", self.license_type.as_str(), &self.user_id, &correlation_id);

        async {
            let client = ProgressClient::from_config()?;
            let mut presenter = WorkflowPresenter::new(client, self.license_type, self.user_id.clone());

            match presenter.fetch().await {
                Ok(_) => {
                    println!("✅ Progress fetched successfully!");
                    render(&presenter);
                    Ok(())
                }
                Err(e) => {
                    report_failure(&e);
                    Err(e.into())
                }
            }
        }
        .instrument(span)
        .await
    }
}

pub struct AdvanceCommand {
    pub license_type: LicenseType,
    pub user_id: String,
    pub action: AdvanceAction,
}

impl AdvanceCommand {
    pub fn new(license_type: LicenseType, user_id: String, action: AdvanceAction) -> Self {
        Self {
            license_type,
            user_id,
            action,
        }
    }
}

impl Command for AdvanceCommand {
    async fn execute(&self) -> Result<()> {
        require_page_access(PAGE)?;
        let input = advance_input(&self.action)?;

        let correlation_id = generate_correlation_id();
        let span = create_workflow_span("advance", self.license_type.as_str(), &self.user_id, &correlation_id);

        async {
            let client = ProgressClient::from_config()?;
            let mut presenter = WorkflowPresenter::new(client, self.license_type, self.user_id.clone());

            // The offered action is derived from the status the service
            // reports right now, never from what the caller assumes.
            presenter.fetch().await.inspect_err(report_failure)?;

            match presenter.advance(input).await {
                Ok(()) => {
                    println!("✅ Progress updated successfully!");
                    render(&presenter);
                    Ok(())
                }
                Err(e) => {
                    report_failure(&e);
                    Err(e.into())
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Map CLI arguments onto the typed transition input.
fn advance_input(action: &AdvanceAction) -> Result<AdvanceInput> {
    let input = match action {
        AdvanceAction::SetUpTest {
            application_id,
            test_password,
            test_link,
        } => AdvanceInput::SetUpTest {
            application_id: application_id.clone(),
            test_password: test_password.clone(),
            test_link: test_link.clone(),
        },
        AdvanceAction::RebookSlot { slot_datetime } => AdvanceInput::RebookSlot {
            slot_datetime: parse_slot_datetime(slot_datetime)?,
        },
        AdvanceAction::AssignInstructor {
            name,
            vehicle_no,
            destination,
        } => AdvanceInput::AssignInstructor {
            instructor: InstructorDetails {
                name: name.clone(),
                vehicle_no: vehicle_no.clone(),
                destination: destination.clone(),
            },
        },
        AdvanceAction::MarkPassed => AdvanceInput::MarkPassed,
        AdvanceAction::SetLicenseReady {
            license_download_link,
        } => AdvanceInput::SetLicenseReady {
            license_download_link: license_download_link.clone(),
        },
        AdvanceAction::DispatchLicense { tracking_id } => AdvanceInput::DispatchLicense {
            tracking_id: tracking_id.clone(),
        },
        AdvanceAction::MarkDelivered => AdvanceInput::MarkDelivered,
    };
    Ok(input)
}

fn parse_slot_datetime(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, SLOT_DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| anyhow!("invalid slot datetime '{}', expected e.g. 2026-03-14T10:30", raw))
}

fn render<C>(presenter: &WorkflowPresenter<C>) {
    println!();
    println!("📋 LICENSE PROGRESS");
    println!("───────────────────");
    println!("   License type: {}", presenter.license_type());
    println!("   User: {}", presenter.user_id());

    let Some(record) = presenter.record() else {
        println!("   📭 No progress record found for this user");
        return;
    };
    println!("   Current status: {}", record.status);

    match presenter.offered_action() {
        Some(NextAction::Advance(kind)) => {
            println!("   ➡️  Next action: {} (→ {})", kind.label(), kind.target());
        }
        Some(NextAction::DownloadLicense) => match presenter.download_link() {
            Some(link) => println!("   📄 Download License: {}", link),
            None => println!("   📄 License is ready; no download link on record yet"),
        },
        Some(NextAction::Terminal) => println!("   🏁 License Delivered ✅"),
        Some(NextAction::Unavailable) => {
            println!("   ⏸️  No action available from this status")
        }
        None => {}
    }
}

fn report_failure(error: &WorkflowError) {
    match error.service_message() {
        Some(message) => println!("❌ {}: {}", error, message),
        None => println!("❌ {}", error),
    }
}

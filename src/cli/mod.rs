use clap::{Parser, Subcommand};

use crate::progress::LicenseType;

pub mod commands;

#[derive(Parser)]
#[command(name = "drivedesk")]
#[command(about = "Driving-school back-office administration")]
#[command(long_about = "Drivedesk is the staff-side client for the driving-school API: \
                       sign in, look up a learner's license progress, and move an \
                       application through its workflow one step at a time. Start with \
                       'drivedesk login', then 'drivedesk progress fetch'.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and store the session for later commands
    Login {
        /// Admin account email
        #[arg(long)]
        email: String,
        /// Account password (falls back to the DRIVEDESK_PASSWORD environment variable)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Inspect and advance license-progress workflows
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
}

#[derive(Subcommand)]
pub enum ProgressCommands {
    /// Fetch the current progress record and show the offered next action
    Fetch {
        /// Which workflow to read: learning or driving
        #[arg(long)]
        license_type: LicenseType,
        /// Externally issued user identifier
        #[arg(long)]
        user_id: String,
    },
    /// Perform the single action the workflow offers for the current status
    Advance {
        /// Which workflow to advance: learning or driving
        #[arg(long)]
        license_type: LicenseType,
        /// Externally issued user identifier
        #[arg(long)]
        user_id: String,
        #[command(subcommand)]
        action: AdvanceAction,
    },
}

/// One subcommand per row of the transition table that sends a request.
#[derive(Subcommand)]
pub enum AdvanceAction {
    /// Set up the learner's test (processing, learning only)
    SetUpTest {
        #[arg(long)]
        application_id: String,
        #[arg(long)]
        test_password: String,
        #[arg(long)]
        test_link: String,
    },
    /// Rebook a failed driving test; marks the retest fee as paid
    RebookSlot {
        /// Slot date and time, e.g. 2026-03-14T10:30
        #[arg(long)]
        slot_datetime: String,
    },
    /// Assign the instructor for a booked slot
    AssignInstructor {
        #[arg(long)]
        name: String,
        #[arg(long)]
        vehicle_no: String,
        #[arg(long)]
        destination: String,
    },
    /// Record that the pending test was passed
    MarkPassed,
    /// Publish the download link for a passed learning license
    SetLicenseReady {
        #[arg(long)]
        license_download_link: String,
    },
    /// Hand a passed driving license to the courier
    DispatchLicense {
        #[arg(long)]
        tracking_id: String,
    },
    /// Record courier delivery of a dispatched license
    MarkDelivered,
}

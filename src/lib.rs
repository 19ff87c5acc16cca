// Drivedesk Library - Driving-School Back-Office Client
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod http;
pub mod progress;
pub mod session;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::{config, init_config, DrivedeskConfig};
pub use http::RateLimitedApiClient;
pub use progress::{
    InstructorDetails, LicenseType, ProgressApi, ProgressClient, ProgressError, ProgressRecord,
    ProgressStatus, TransitionRequest,
};
pub use session::{AdminRole, AuthClient, AuthError, Session, SessionStore};
pub use telemetry::{create_workflow_span, generate_correlation_id, init_telemetry};
pub use workflow::{
    next_action, AdvanceInput, NextAction, TransitionKind, WorkflowError, WorkflowPresenter,
};

pub mod client;
pub mod types;

pub use client::{ProgressApi, ProgressClient, ProgressError};
pub use types::{
    InstructorDetails, LicenseType, ProgressEnvelope, ProgressRecord, ProgressStatus,
    TransitionRequest,
};

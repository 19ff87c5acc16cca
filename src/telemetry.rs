use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

/// Initialize structured logging.
///
/// `RUST_LOG` wins when set; otherwise the configured log level applies.
/// JSON output is opt-in via config so interactive use stays readable.
pub fn init_telemetry(default_level: &str, json_logs: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_logs {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .with(filter)
            .init();
    }

    tracing::debug!("Drivedesk telemetry initialized");
    Ok(())
}

/// Generate a correlation ID for linking related operations
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span with common workflow attributes
pub fn create_workflow_span(
    operation: &str,
    license_type: &str,
    user_id: &str,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "license_workflow",
        operation = operation,
        license.kind = license_type,
        user.id = user_id,
        correlation.id = correlation_id,
    )
}

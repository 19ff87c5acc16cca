use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Drivedesk
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DrivedeskConfig {
    /// Back-office API settings
    pub api: ApiConfig,
    /// Observability settings
    pub observability: ObservabilityConfig,
    /// Session storage settings
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL of the back-office REST API
    pub base_url: String,
    /// Client-side rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Requests per minute limit
    pub requests_per_minute: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level when RUST_LOG is not set
    pub log_level: String,
    /// Emit logs as JSON lines instead of human-readable output
    pub json_logs: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Path to the persisted session file
    pub store_path: String,
}

impl Default for DrivedeskConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "https://driving.shellcode.cloud/api".to_string(),
                rate_limit: RateLimitConfig {
                    requests_per_minute: 120,
                    burst_capacity: 20,
                },
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
            session: SessionConfig {
                store_path: ".drivedesk/session.json".to_string(),
            },
        }
    }
}

impl DrivedeskConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (drivedesk.toml)
    /// 3. Environment variables (prefixed with DRIVEDESK__)
    pub fn load() -> Result<Self> {
        let defaults = Config::try_from(&DrivedeskConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        if Path::new("drivedesk.toml").exists() {
            builder = builder.add_source(File::with_name("drivedesk"));
        }

        // Double underscore keeps nested keys unambiguous:
        // DRIVEDESK__API__BASE_URL -> api.base_url
        builder = builder.add_source(
            Environment::with_prefix("DRIVEDESK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<DrivedeskConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = DrivedeskConfig::load_env_file();
        DrivedeskConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static DrivedeskConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}

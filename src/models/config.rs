//! Configuration module for the emergency client
//!
//! Defaults come from utils/constants.rs; every value can be overridden from
//! the environment. No hardcoded endpoints in this file.

use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use super::errors::{AppError, AppResult};
use super::types::Coordinate;
use crate::utils::constants::{
    location_timeout, DEFAULT_API_BASE, ENV_API_BASE, ENV_DEMO_OTP, ENV_LOCATION_TIMEOUT_SECS,
    ENV_REQUEST_TIMEOUT_SECS, ENV_SESSION_FILE,
};

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    pub api_base: String,
    /// Per-request timeout. `None` means requests wait indefinitely.
    pub request_timeout: Option<Duration>,
    /// Bounded wait for a device position fix
    pub location_timeout: Duration,
    /// Coordinate substituted when the position fix fails
    pub fallback: Coordinate,
    /// Surface the OTP echoed by demo backends
    pub expose_demo_otp: bool,
    /// Where the file session store persists its entries
    pub session_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
            location_timeout: location_timeout(),
            fallback: Coordinate::fallback(),
            expose_demo_otp: false,
            session_file: None,
        }
    }
}

impl ClientConfig {
    /// Build from environment variables on top of the defaults
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, test map, ...)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(base) = lookup(ENV_API_BASE).filter(|b| !b.trim().is_empty()) {
            config = config.with_api_base(base);
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout = Some(parse_secs(ENV_REQUEST_TIMEOUT_SECS, &raw)?);
        }

        if let Some(raw) = lookup(ENV_LOCATION_TIMEOUT_SECS) {
            config.location_timeout = parse_secs(ENV_LOCATION_TIMEOUT_SECS, &raw)?;
        }

        if let Some(raw) = lookup(ENV_DEMO_OTP) {
            config.expose_demo_otp = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes"
            );
            if config.expose_demo_otp {
                warn!("Demo OTP exposure enabled - never use this against a production backend");
            }
        }

        if let Some(path) = lookup(ENV_SESSION_FILE).filter(|p| !p.is_empty()) {
            config.session_file = Some(PathBuf::from(path));
        }

        info!("🔧 API base: {}", config.api_base);
        Ok(config)
    }

    /// Replace the API base, trimming any trailing slash
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        self.api_base = base.trim().trim_end_matches('/').to_string();
        self
    }

    /// Full URL for a backend path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

fn parse_secs(key: &str, raw: &str) -> AppResult<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| AppError::invalid_config(format!("{} must be whole seconds, got {:?}", key, raw)))
}

//! Device Location Provider
//!
//! Reads the current position from a pluggable [`PositionSource`] with a
//! bounded wait. Runtime failures (denied, unavailable, timeout) fall back to
//! a fixed coordinate; a host without any position capability is a hard
//! `CapabilityUnavailable` error.

use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::config::ClientConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::Coordinate;

/// Options handed to the position source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Duration,
    /// Maximum age of a cached fix. Zero means a fresh reading is required.
    pub maximum_age: Duration,
}

impl PositionOptions {
    /// High accuracy, no cached fixes
    pub fn fresh(timeout: Duration) -> Self {
        Self {
            enable_high_accuracy: true,
            timeout,
            maximum_age: Duration::ZERO,
        }
    }
}

/// Raw fix reported by a source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DevicePosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("user denied geolocation")]
    PermissionDenied,
    #[error("position unavailable: {0}")]
    PositionUnavailable(String),
    #[error("timed out waiting for a position fix")]
    Timeout,
}

/// Platform position capability
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<DevicePosition, PositionError>;
}

/// Source that always reports the same fix
#[derive(Debug, Clone, Copy)]
pub struct StaticPositionSource {
    position: DevicePosition,
}

impl StaticPositionSource {
    pub fn new(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            position: DevicePosition {
                latitude,
                longitude,
                accuracy_meters,
            },
        }
    }
}

impl PositionSource for StaticPositionSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<DevicePosition, PositionError> {
        Ok(self.position)
    }
}

/// Capability present but never able to produce a fix
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFixSource;

impl PositionSource for NoFixSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<DevicePosition, PositionError> {
        Err(PositionError::PositionUnavailable(
            "no positioning hardware reported a fix".to_string(),
        ))
    }
}

pub struct LocationProvider<S> {
    source: Option<S>,
    timeout: Duration,
    fallback: Coordinate,
}

impl<S: PositionSource> LocationProvider<S> {
    pub fn new(source: S, config: &ClientConfig) -> Self {
        Self {
            source: Some(source),
            timeout: config.location_timeout,
            fallback: config.fallback,
        }
    }

    /// Host without a position capability
    pub fn without_capability(config: &ClientConfig) -> Self {
        Self {
            source: None,
            timeout: config.location_timeout,
            fallback: config.fallback,
        }
    }

    pub fn has_capability(&self) -> bool {
        self.source.is_some()
    }

    /// Current coordinate, or the fallback when the fix fails.
    /// Only errors when the capability is missing entirely.
    pub async fn get_location(&self) -> AppResult<Coordinate> {
        let source = self
            .source
            .as_ref()
            .ok_or_else(AppError::capability_unavailable)?;

        let options = PositionOptions::fresh(self.timeout);
        let reading = tokio::time::timeout(self.timeout, source.current_position(&options))
            .await
            .unwrap_or(Err(PositionError::Timeout));

        match reading {
            Ok(fix) => {
                info!(
                    "📍 Position fix: {:.4}, {:.4} (±{} m)",
                    fix.latitude, fix.longitude, fix.accuracy_meters
                );
                Ok(Coordinate::device(
                    fix.latitude,
                    fix.longitude,
                    fix.accuracy_meters,
                ))
            }
            Err(e) => {
                warn!("⚠️ Geolocation error: {} - using default location", e);
                Ok(self.fallback)
            }
        }
    }
}

//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so it can be told apart in logs.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - TRANSPORT_xxx: failures at the HTTP boundary (never shown verbatim to users)
//! - LOCATION_xxx: position capability errors
//! - INPUT_xxx: rejected before any network call
//! - BACKEND_xxx: backend answered with success=false
//! - STORAGE_xxx / CFG_xxx / UI_xxx: local resources

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Transport Errors
    // ============================================
    /// Backend unreachable (connection refused, DNS, reset)
    TransportConnect,
    /// Request exceeded the configured timeout
    TransportTimeout,
    /// Backend answered with a non-2xx status
    TransportStatus,
    /// Response body was not the expected JSON
    TransportDecode,
    /// Any other reqwest failure
    TransportOther,

    // ============================================
    // Location Errors
    // ============================================
    /// Host has no position capability at all
    CapabilityUnavailable,

    // ============================================
    // Input Errors
    // ============================================
    /// Phone number is not exactly 10 digits
    InvalidPhoneFormat,
    /// Other malformed user input
    InvalidInput,

    // ============================================
    // Backend Errors
    // ============================================
    /// Backend body carried success=false
    BackendRejected,

    // ============================================
    // Local Resource Errors
    // ============================================
    /// Session store could not be read or written
    StorageFailed,
    /// Invalid configuration value
    ConfigInvalidValue,
    /// A presentation collaborator failed to render
    PresentationFailed,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TransportConnect => "TRANSPORT_CONNECT",
            Self::TransportTimeout => "TRANSPORT_TIMEOUT",
            Self::TransportStatus => "TRANSPORT_STATUS",
            Self::TransportDecode => "TRANSPORT_DECODE",
            Self::TransportOther => "TRANSPORT_OTHER",

            Self::CapabilityUnavailable => "LOCATION_CAPABILITY_UNAVAILABLE",

            Self::InvalidPhoneFormat => "INPUT_INVALID_PHONE",
            Self::InvalidInput => "INPUT_INVALID",

            Self::BackendRejected => "BACKEND_REJECTED",

            Self::StorageFailed => "STORAGE_FAILED",
            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",
            Self::PresentationFailed => "UI_PRESENTATION_FAILED",
        }
    }

    /// Failure produced at the HTTP boundary
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportConnect
                | Self::TransportTimeout
                | Self::TransportStatus
                | Self::TransportDecode
                | Self::TransportOther
        )
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Backend returned a non-2xx status
    pub fn bad_status(status: u16, path: &str) -> Self {
        Self::new(
            ErrorCode::TransportStatus,
            format!("{} answered HTTP {}", path, status),
        )
    }

    /// Position capability missing
    pub fn capability_unavailable() -> Self {
        Self::new(
            ErrorCode::CapabilityUnavailable,
            "Geolocation is not supported",
        )
    }

    /// Phone number failed validation
    pub fn invalid_phone(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPhoneFormat, msg)
    }

    /// Generic invalid input
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    /// Backend said no
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendRejected, msg)
    }

    /// Session store failure
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageFailed, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalidValue, msg)
    }

    /// Presentation collaborator failure
    pub fn presentation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::PresentationFailed, msg)
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorCode::StorageFailed, "IO error", err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::with_source(ErrorCode::TransportTimeout, "Request timeout", err)
        } else if err.is_connect() {
            Self::with_source(ErrorCode::TransportConnect, "Connection failed", err)
        } else if err.is_decode() {
            Self::with_source(ErrorCode::TransportDecode, "Invalid response body", err)
        } else if let Some(status) = err.status() {
            Self::new(
                ErrorCode::TransportStatus,
                format!("HTTP {}", status.as_u16()),
            )
        } else {
            Self::new(ErrorCode::TransportOther, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::TransportDecode, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::capability_unavailable();
        assert_eq!(err.code, ErrorCode::CapabilityUnavailable);
        assert_eq!(err.code_str(), "LOCATION_CAPABILITY_UNAVAILABLE");
        assert_eq!(
            err.to_string(),
            "[LOCATION_CAPABILITY_UNAVAILABLE] Geolocation is not supported"
        );
    }

    #[test]
    fn test_transport_classification() {
        assert!(ErrorCode::TransportConnect.is_transport());
        assert!(ErrorCode::TransportDecode.is_transport());
        assert!(ErrorCode::TransportStatus.is_transport());
        assert!(!ErrorCode::BackendRejected.is_transport());
        assert!(!ErrorCode::CapabilityUnavailable.is_transport());
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("<html>")
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::TransportDecode);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_bad_status_message() {
        let err = AppError::bad_status(503, "/sos");
        assert_eq!(err.code, ErrorCode::TransportStatus);
        assert!(err.message.contains("503"));
    }
}

//! Constants Module - Single Source of Truth
//!
//! Every endpoint path, storage key, default and user-facing message used by
//! the client is defined here. Other modules must not hardcode them.

use std::time::Duration;

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "RescueLink";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for HTTP requests
pub const USER_AGENT: &str = concat!("RescueLink/", env!("CARGO_PKG_VERSION"));

// ============================================
// BACKEND CONTRACT
// ============================================

/// Default API base (local development backend)
pub const DEFAULT_API_BASE: &str = "http://localhost:3000/api";

pub const PATH_HOSPITALS: &str = "/hospitals";
pub const PATH_HOSPITALS_BEST: &str = "/hospitals/best";
pub const PATH_HOSPITALS_NEARBY: &str = "/hospitals/nearby";
pub const PATH_SOS: &str = "/sos";
pub const PATH_ROUTE_OPTIMIZE: &str = "/route/optimize";
pub const PATH_SEND_OTP: &str = "/auth/send-otp";
pub const PATH_VERIFY_OTP: &str = "/auth/verify-otp";
pub const PATH_CONTACTS: &str = "/contacts";

/// Default number of hospitals requested by `find_nearby_hospitals`
pub const DEFAULT_NEARBY_LIMIT: u32 = 5;

// ============================================
// LOCATION
// ============================================

/// Bounded wait for a device position fix (seconds)
pub const LOCATION_TIMEOUT_SECS: u64 = 10;

/// Fallback latitude used when no live fix is available
pub const FALLBACK_LATITUDE: f64 = 8.7139;

/// Fallback longitude used when no live fix is available
pub const FALLBACK_LONGITUDE: f64 = 77.7567;

/// Location timeout as a Duration
pub fn location_timeout() -> Duration {
    Duration::from_secs(LOCATION_TIMEOUT_SECS)
}

// ============================================
// AUTH & SESSION
// ============================================

/// Required phone number length (digits)
pub const PHONE_NUMBER_LEN: usize = 10;

/// Dialing prefix shown next to the phone number on the OTP step
pub const PHONE_DISPLAY_PREFIX: &str = "+91";

/// Session store key for the auth token
pub const STORAGE_KEY_AUTH_TOKEN: &str = "authToken";

/// Session store key for the logged-in phone number
pub const STORAGE_KEY_USER_PHONE: &str = "userPhone";

/// Default session file used by the CLI
pub const DEFAULT_SESSION_FILE: &str = ".rescue_session.json";

// ============================================
// MAP VIEW
// ============================================

/// Initial zoom level of the emergency map
pub const MAP_DEFAULT_ZOOM: u8 = 13;

/// Padding (px) applied when fitting the route bounds
pub const MAP_FIT_PADDING_PX: u32 = 50;

// ============================================
// USER-FACING MESSAGES
// ============================================

pub const MSG_DETECTING_LOCATION: &str = "Detecting your location...";
pub const MSG_USING_DEFAULT_LOCATION: &str = "Using default location";
pub const MSG_NO_HOSPITAL: &str =
    "No suitable hospital found. Please try again or call emergency services.";
pub const MSG_SOS_FAILED: &str =
    "Ambulance could not be dispatched. Please call emergency services directly.";
pub const MSG_EMERGENCY_ERROR: &str = "Error processing emergency request. Please try again.";
pub const MSG_INVALID_PHONE: &str = "Please enter a valid 10-digit phone number";
pub const MSG_OTP_SEND_FAILED: &str = "Error sending OTP. Please try again.";
pub const MSG_INVALID_OTP: &str = "Invalid OTP. Please try again.";
pub const MSG_SESSION_SAVE_FAILED: &str = "Could not save your login. Please try again.";

// ============================================
// ENVIRONMENT VARIABLES
// ============================================

pub const ENV_API_BASE: &str = "RESCUE_API_BASE";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "RESCUE_REQUEST_TIMEOUT_SECS";
pub const ENV_LOCATION_TIMEOUT_SECS: &str = "RESCUE_LOCATION_TIMEOUT_SECS";
pub const ENV_DEMO_OTP: &str = "RESCUE_DEMO_OTP";
pub const ENV_SESSION_FILE: &str = "RESCUE_SESSION_FILE";

//! Type definitions for the emergency client
//! Plain request/response records exchanged with the backend

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::errors::{AppError, AppResult};
use crate::utils::constants::{
    FALLBACK_LATITUDE, FALLBACK_LONGITUDE, MSG_USING_DEFAULT_LOCATION, PHONE_DISPLAY_PREFIX,
    PHONE_NUMBER_LEN,
};

// ============================================
// Location
// ============================================

/// A resolved position. Always fully populated, even when it is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius; absent for fallback values
    pub accuracy_meters: Option<f64>,
    /// True when the value did not come from the device
    pub is_fallback: bool,
}

impl Coordinate {
    /// Coordinate read from a live device fix
    pub fn device(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: Some(accuracy_meters),
            is_fallback: false,
        }
    }

    /// The fixed fallback coordinate
    pub fn fallback() -> Self {
        Self::fallback_at(FALLBACK_LATITUDE, FALLBACK_LONGITUDE)
    }

    /// A fallback coordinate at a configured position
    pub fn fallback_at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            is_fallback: true,
        }
    }

    /// A plain map point that did not come from this device (e.g. a route destination)
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: None,
            is_fallback: false,
        }
    }

    /// Text shown in the location status region
    pub fn status_text(&self) -> String {
        if self.is_fallback {
            MSG_USING_DEFAULT_LOCATION.to_string()
        } else {
            format!("Location: {:.4}, {:.4}", self.latitude, self.longitude)
        }
    }
}

/// Latitude typed by the user, in degrees
pub fn parse_latitude(raw: &str) -> AppResult<f64> {
    parse_degrees(raw, "latitude", 90.0)
}

/// Longitude typed by the user, in degrees
pub fn parse_longitude(raw: &str) -> AppResult<f64> {
    parse_degrees(raw, "longitude", 180.0)
}

fn parse_degrees(raw: &str, axis: &str, limit: f64) -> AppResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::invalid_input(format!("{} {:?} is not a number", axis, raw)))?;
    // NaN would serialize as null
    if !value.is_finite() || value.abs() > limit {
        return Err(AppError::invalid_input(format!(
            "{} must be between -{} and {}, got {}",
            axis, limit, limit, raw
        )));
    }
    Ok(value)
}

// ============================================
// Emergency
// ============================================

/// Emergency category tag. The set is owned by the backend, so any string
/// is passed through unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmergencyType(String);

impl EmergencyType {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn medical() -> Self {
        Self::new("medical")
    }

    pub fn fire() -> Self {
        Self::new("fire")
    }

    pub fn accident() -> Self {
        Self::new("accident")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmergencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EmergencyType {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

// ============================================
// Hospitals & Dispatch
// ============================================

/// Hospital as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HospitalSummary {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(rename = "icu", default)]
    pub icu_bed_count: u32,
    #[serde(rename = "beds", default)]
    pub normal_bed_count: u32,
    #[serde(rename = "distance", default)]
    pub distance_km: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub contact: String,
    /// Hospital position, used for the map marker when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

impl HospitalSummary {
    /// Position of the hospital if the backend sent one
    pub fn position(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}

/// Ambulance assigned by the SOS trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbulanceAssignment {
    pub id: i64,
    #[serde(rename = "eta")]
    pub eta_minutes: f64,
}

impl AmbulanceAssignment {
    /// Vehicle label, e.g. `AMB-0007`
    pub fn vehicle_label(&self) -> String {
        format!("AMB-{:04}", self.id)
    }
}

/// Distance and travel time to the assigned hospital
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(rename = "eta")]
    pub eta_minutes: f64,
}

/// Outcome of an SOS trigger.
/// A rejected result never carries ambulance or hospital data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "SosResultWire")]
pub struct SosResult {
    pub success: bool,
    pub ambulance: Option<AmbulanceAssignment>,
    pub hospital: Option<RouteInfo>,
    pub error_message: Option<String>,
}

impl SosResult {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            ambulance: None,
            hospital: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct SosResultWire {
    #[serde(default)]
    success: bool,
    ambulance: Option<AmbulanceAssignment>,
    hospital: Option<RouteInfo>,
    error: Option<String>,
    message: Option<String>,
}

impl From<SosResultWire> for SosResult {
    fn from(wire: SosResultWire) -> Self {
        if wire.success {
            Self {
                success: true,
                ambulance: wire.ambulance,
                hospital: wire.hospital,
                error_message: None,
            }
        } else {
            Self::failed(
                wire.error
                    .or(wire.message)
                    .unwrap_or_else(|| "SOS request was rejected".to_string()),
            )
        }
    }
}

// ============================================
// Contacts
// ============================================

/// Emergency contact record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EmergencyContact {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "number")]
    pub phone: String,
    #[serde(default, alias = "relationship", skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
}

// ============================================
// Auth
// ============================================

/// Validated 10-digit phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> AppResult<Self> {
        if raw.len() != PHONE_NUMBER_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::invalid_phone(format!(
                "expected {} digits, got {:?}",
                PHONE_NUMBER_LEN, raw
            )));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number as shown on the OTP step, e.g. `+91 9876543210`
    pub fn display_form(&self) -> String {
        format!("{} {}", PHONE_DISPLAY_PREFIX, self.0)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response of `POST /auth/send-otp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "OtpDeliveryWire")]
pub struct OtpDelivery {
    pub success: bool,
    /// Echoed OTP. Demo backends only.
    pub otp: Option<String>,
    pub error_message: Option<String>,
}

impl OtpDelivery {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            otp: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct OtpDeliveryWire {
    #[serde(default)]
    success: bool,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    otp: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl From<OtpDeliveryWire> for OtpDelivery {
    fn from(wire: OtpDeliveryWire) -> Self {
        Self {
            success: wire.success,
            otp: wire.otp,
            error_message: if wire.success {
                None
            } else {
                wire.error.or(wire.message)
            },
        }
    }
}

/// Response of `POST /auth/verify-otp`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "OtpVerificationWire")]
pub struct OtpVerification {
    pub success: bool,
    pub token: Option<String>,
    pub error_message: Option<String>,
}

impl OtpVerification {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            token: None,
            error_message: Some(message.into()),
        }
    }
}

#[derive(Deserialize)]
struct OtpVerificationWire {
    #[serde(default)]
    success: bool,
    token: Option<String>,
    error: Option<String>,
    message: Option<String>,
}

impl From<OtpVerificationWire> for OtpVerification {
    fn from(wire: OtpVerificationWire) -> Self {
        if wire.success {
            Self {
                success: true,
                token: wire.token,
                error_message: None,
            }
        } else {
            Self::failed(
                wire.error
                    .or(wire.message)
                    .unwrap_or_else(|| "OTP verification failed".to_string()),
            )
        }
    }
}

/// Client-side login state: phone submitted, then verified.
/// A token can only be attached through [`OtpSession::verified`].
#[derive(Debug, Clone, PartialEq)]
pub struct OtpSession {
    phone: PhoneNumber,
    verified: bool,
    auth_token: Option<String>,
}

impl OtpSession {
    /// Phone submitted, OTP pending
    pub fn pending(phone: PhoneNumber) -> Self {
        Self {
            phone,
            verified: false,
            auth_token: None,
        }
    }

    /// Verified session. Rejects an empty token.
    pub fn verified(phone: PhoneNumber, token: impl Into<String>) -> AppResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(AppError::rejected("backend returned an empty auth token"));
        }
        Ok(Self {
            phone,
            verified: true,
            auth_token: Some(token),
        })
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

// ============================================
// serde helpers
// ============================================

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Int(n) => n.to_string(),
            RawId::Float(f) => f.to_string(),
        }
    }
}

/// Ids arrive as numbers from some backends and strings from others
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?
        .map(String::from)
        .unwrap_or_default())
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawId>::deserialize(deserializer)?.map(String::from))
}

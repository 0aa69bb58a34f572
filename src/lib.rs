//! RescueLink Library
//!
//! Client for the Smart Emergency Response backend:
//! - Hospital lookup (all, best for an emergency, nearby)
//! - SOS trigger with ambulance assignment and route info
//! - Route optimization and emergency contacts
//! - Two-step OTP login with a persisted session
//!
//! Device position comes from a pluggable source with a fixed fallback
//! coordinate; rendering goes through presenter and map seams.

pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::{
    AuthFlow, ConsolePresenter, EmergencyFlow, EmergencyMap, EmergencyOutcome, LoginChallenge,
    MapCanvas, MapView, Presenter, View,
};
pub use models::{
    AmbulanceAssignment, AppError, AppResult, ClientConfig, Coordinate, EmergencyContact,
    EmergencyType, ErrorCode, HospitalSummary, OtpDelivery, OtpSession, OtpVerification,
    PhoneNumber, RouteInfo, SosResult,
};
pub use providers::{
    ApiClient, EmergencyApi, FileSessionStore, LocationProvider, MemorySessionStore, NoFixSource,
    OrFallback, PositionSource, SessionStore, StaticPositionSource,
};

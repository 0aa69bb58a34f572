//! Emergency Backend API Client
//!
//! One method per backend capability, one HTTP exchange per call, no retries
//! and no redirects followed.
//!
//! Every transport failure (unreachable backend, timeout, non-2xx status,
//! body that is not the expected JSON) is converted into an [`AppError`] at
//! this boundary. Callers that prefer a logged safe default over the error
//! call [`OrFallback::or_fallback`] on the result:
//!
//! | Operation | Fallback |
//! |---|---|
//! | list_hospitals / find_nearby_hospitals / list_contacts | empty list |
//! | find_best_hospital / optimize_route | `None` |
//! | trigger_sos / send_otp / verify_otp | `success: false` with the error text |

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::models::config::ClientConfig;
use crate::models::errors::{AppError, AppResult, ErrorCode};
use crate::models::types::{
    Coordinate, EmergencyContact, EmergencyType, HospitalSummary, OtpDelivery, OtpVerification,
    PhoneNumber, RouteInfo, SosResult,
};
use crate::utils::constants::{
    PATH_CONTACTS, PATH_HOSPITALS, PATH_HOSPITALS_BEST, PATH_HOSPITALS_NEARBY,
    PATH_ROUTE_OPTIMIZE, PATH_SEND_OTP, PATH_SOS, PATH_VERIFY_OTP, USER_AGENT as USER_AGENT_CONST,
};

// ============================================
// API SEAM
// ============================================

/// Backend capabilities consumed by the flows.
///
/// The flows only ever run on a single task, so the futures are not required
/// to be `Send`.
#[allow(async_fn_in_trait)]
pub trait EmergencyApi {
    async fn list_hospitals(&self) -> AppResult<Vec<HospitalSummary>>;

    async fn find_best_hospital(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
    ) -> AppResult<Option<HospitalSummary>>;

    async fn find_nearby_hospitals(
        &self,
        at: &Coordinate,
        limit: u32,
    ) -> AppResult<Vec<HospitalSummary>>;

    async fn trigger_sos(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
        people_count: u32,
        user_id: Option<&str>,
    ) -> AppResult<SosResult>;

    async fn optimize_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> AppResult<Option<RouteInfo>>;

    async fn send_otp(&self, phone: &PhoneNumber) -> AppResult<OtpDelivery>;

    async fn verify_otp(&self, phone: &PhoneNumber, otp: &str) -> AppResult<OtpVerification>;

    async fn list_contacts(&self) -> AppResult<Vec<EmergencyContact>>;
}

impl<T: EmergencyApi + ?Sized> EmergencyApi for &T {
    async fn list_hospitals(&self) -> AppResult<Vec<HospitalSummary>> {
        (**self).list_hospitals().await
    }

    async fn find_best_hospital(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
    ) -> AppResult<Option<HospitalSummary>> {
        (**self).find_best_hospital(at, emergency_type).await
    }

    async fn find_nearby_hospitals(
        &self,
        at: &Coordinate,
        limit: u32,
    ) -> AppResult<Vec<HospitalSummary>> {
        (**self).find_nearby_hospitals(at, limit).await
    }

    async fn trigger_sos(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
        people_count: u32,
        user_id: Option<&str>,
    ) -> AppResult<SosResult> {
        (**self)
            .trigger_sos(at, emergency_type, people_count, user_id)
            .await
    }

    async fn optimize_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> AppResult<Option<RouteInfo>> {
        (**self).optimize_route(origin, destination).await
    }

    async fn send_otp(&self, phone: &PhoneNumber) -> AppResult<OtpDelivery> {
        (**self).send_otp(phone).await
    }

    async fn verify_otp(&self, phone: &PhoneNumber, otp: &str) -> AppResult<OtpVerification> {
        (**self).verify_otp(phone, otp).await
    }

    async fn list_contacts(&self) -> AppResult<Vec<EmergencyContact>> {
        (**self).list_contacts().await
    }
}

// ============================================
// FALLBACK VALUES
// ============================================

/// Documented safe value for a failed operation
pub trait Fallback: Sized {
    fn fallback(err: &AppError) -> Self;
}

impl<T> Fallback for Vec<T> {
    fn fallback(_err: &AppError) -> Self {
        Vec::new()
    }
}

impl<T> Fallback for Option<T> {
    fn fallback(_err: &AppError) -> Self {
        None
    }
}

impl Fallback for SosResult {
    fn fallback(err: &AppError) -> Self {
        SosResult::failed(err.message.clone())
    }
}

impl Fallback for OtpDelivery {
    fn fallback(err: &AppError) -> Self {
        OtpDelivery::failed(err.message.clone())
    }
}

impl Fallback for OtpVerification {
    fn fallback(err: &AppError) -> Self {
        OtpVerification::failed(err.message.clone())
    }
}

/// Collapse an API result into its fallback value, logging the failure
pub trait OrFallback<T> {
    fn or_fallback(self) -> T;
}

impl<T: Fallback> OrFallback<T> for AppResult<T> {
    fn or_fallback(self) -> T {
        match self {
            Ok(value) => value,
            Err(e) if e.code.is_transport() => {
                warn!(code = e.code_str(), "⚠️ Backend call failed: {}", e.message);
                T::fallback(&e)
            }
            Err(e) => {
                error!(code = e.code_str(), "❌ Unexpected API failure: {}", e.message);
                T::fallback(&e)
            }
        }
    }
}

// ============================================
// REQUEST BODIES
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BestHospitalRequest<'a> {
    lat: f64,
    lng: f64,
    emergency_type: &'a EmergencyType,
}

#[derive(Debug, Serialize)]
struct NearbyRequest {
    lat: f64,
    lng: f64,
    limit: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SosRequest<'a> {
    lat: f64,
    lng: f64,
    emergency_type: &'a EmergencyType,
    people_count: u32,
    user_id: Option<&'a str>,
    timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteRequest {
    origin_lat: f64,
    origin_lng: f64,
    dest_lat: f64,
    dest_lng: f64,
}

#[derive(Debug, Serialize)]
struct SendOtpRequest<'a> {
    phone: &'a str,
}

#[derive(Debug, Serialize)]
struct VerifyOtpRequest<'a> {
    phone: &'a str,
    otp: &'a str,
}

// ============================================
// HTTP CLIENT
// ============================================

/// reqwest-backed implementation of [`EmergencyApi`]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        // One exchange per call: a 3xx is reported, never followed
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(Policy::none())
            .gzip(true);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;
        info!("🏥 Emergency API client ready ({})", config.api_base);

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        let url = self.config.endpoint(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await?;
        Self::read_json(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + std::fmt::Debug,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!("POST {} {:?}", url, body);

        let response = self.client.post(&url).json(body).send().await?;
        Self::read_json(path, response).await
    }

    async fn read_json<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> AppResult<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::bad_status(status.as_u16(), path));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            AppError::with_source(
                ErrorCode::TransportDecode,
                format!("{} returned an unexpected body", path),
                e,
            )
        })
    }
}

impl EmergencyApi for ApiClient {
    async fn list_hospitals(&self) -> AppResult<Vec<HospitalSummary>> {
        let hospitals: Vec<HospitalSummary> = self.get_json(PATH_HOSPITALS).await?;
        info!("🏥 {} hospitals listed", hospitals.len());
        Ok(hospitals)
    }

    async fn find_best_hospital(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
    ) -> AppResult<Option<HospitalSummary>> {
        info!(
            "🔍 Finding best hospital for '{}' near {:.4}, {:.4}",
            emergency_type, at.latitude, at.longitude
        );

        let body = BestHospitalRequest {
            lat: at.latitude,
            lng: at.longitude,
            emergency_type,
        };
        let hospital: Option<HospitalSummary> = self.post_json(PATH_HOSPITALS_BEST, &body).await?;

        match &hospital {
            Some(h) => info!("🏥 Best hospital: {} ({} km)", h.name, h.distance_km),
            None => warn!("⚠️ Backend found no hospital for '{}'", emergency_type),
        }
        Ok(hospital)
    }

    async fn find_nearby_hospitals(
        &self,
        at: &Coordinate,
        limit: u32,
    ) -> AppResult<Vec<HospitalSummary>> {
        let body = NearbyRequest {
            lat: at.latitude,
            lng: at.longitude,
            limit,
        };
        let hospitals: Vec<HospitalSummary> =
            self.post_json(PATH_HOSPITALS_NEARBY, &body).await?;
        info!("📍 {} nearby hospitals (limit {})", hospitals.len(), limit);
        Ok(hospitals)
    }

    async fn trigger_sos(
        &self,
        at: &Coordinate,
        emergency_type: &EmergencyType,
        people_count: u32,
        user_id: Option<&str>,
    ) -> AppResult<SosResult> {
        info!(
            "🚨 SOS: '{}' for {} people at {:.4}, {:.4}",
            emergency_type, people_count, at.latitude, at.longitude
        );

        let body = SosRequest {
            lat: at.latitude,
            lng: at.longitude,
            emergency_type,
            people_count,
            user_id,
            timestamp: Utc::now(),
        };
        let result: SosResult = self.post_json(PATH_SOS, &body).await?;

        if result.success {
            if let Some(ambulance) = &result.ambulance {
                info!(
                    "🚑 {} assigned, ETA {} min",
                    ambulance.vehicle_label(),
                    ambulance.eta_minutes
                );
            }
        } else {
            warn!(
                "⚠️ SOS rejected: {}",
                result.error_message.as_deref().unwrap_or("no reason given")
            );
        }
        Ok(result)
    }

    async fn optimize_route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
    ) -> AppResult<Option<RouteInfo>> {
        let body = RouteRequest {
            origin_lat: origin.latitude,
            origin_lng: origin.longitude,
            dest_lat: destination.latitude,
            dest_lng: destination.longitude,
        };
        self.post_json(PATH_ROUTE_OPTIMIZE, &body).await
    }

    async fn send_otp(&self, phone: &PhoneNumber) -> AppResult<OtpDelivery> {
        info!("📱 Requesting OTP for {}", phone.display_form());

        let body = SendOtpRequest {
            phone: phone.as_str(),
        };
        let mut delivery: OtpDelivery = self.post_json(PATH_SEND_OTP, &body).await?;

        if !self.config.expose_demo_otp && delivery.otp.take().is_some() {
            debug!("Demo OTP present in response; withheld");
        }
        Ok(delivery)
    }

    async fn verify_otp(&self, phone: &PhoneNumber, otp: &str) -> AppResult<OtpVerification> {
        let body = VerifyOtpRequest {
            phone: phone.as_str(),
            otp,
        };
        let verification: OtpVerification = self.post_json(PATH_VERIFY_OTP, &body).await?;
        info!(
            "🔐 OTP verification for {}: {}",
            phone.display_form(),
            if verification.success { "accepted" } else { "rejected" }
        );
        Ok(verification)
    }

    async fn list_contacts(&self) -> AppResult<Vec<EmergencyContact>> {
        self.get_json(PATH_CONTACTS).await
    }
}

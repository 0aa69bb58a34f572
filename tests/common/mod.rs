//! Recording doubles shared by the flow tests

#![allow(dead_code)]

use std::cell::RefCell;

use rescue_link::{
    AmbulanceAssignment, AppError, AppResult, Coordinate, EmergencyApi, EmergencyContact,
    EmergencyType, ErrorCode, HospitalSummary, MapCanvas, OtpDelivery, OtpVerification,
    PhoneNumber, Presenter, RouteInfo, SosResult, View,
};

pub fn hospital() -> HospitalSummary {
    HospitalSummary {
        id: "17".to_string(),
        name: "Galaxy Hospital".to_string(),
        icu_bed_count: 6,
        normal_bed_count: 150,
        distance_km: 3.1,
        rating: 4.4,
        contact: "0462-2563333".to_string(),
        lat: Some(8.73),
        lng: Some(77.74),
    }
}

pub fn dispatched_sos() -> SosResult {
    SosResult {
        success: true,
        ambulance: Some(AmbulanceAssignment {
            id: 12,
            eta_minutes: 7.0,
        }),
        hospital: Some(RouteInfo {
            distance_km: 3.1,
            eta_minutes: 9.0,
        }),
        error_message: None,
    }
}

fn unreachable() -> AppError {
    AppError::new(ErrorCode::TransportConnect, "Connection failed")
}

/// Scripted backend. `None` responses behave like an unreachable backend.
#[derive(Default)]
pub struct MockApi {
    pub best_hospital: Option<Option<HospitalSummary>>,
    pub sos: Option<SosResult>,
    pub otp_delivery: Option<OtpDelivery>,
    pub verification: Option<OtpVerification>,
    pub calls: RefCell<Vec<&'static str>>,
    pub last_user_id: RefCell<Option<String>>,
}

impl MockApi {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn record(&self, name: &'static str) {
        self.calls.borrow_mut().push(name);
    }
}

impl EmergencyApi for MockApi {
    async fn list_hospitals(&self) -> AppResult<Vec<HospitalSummary>> {
        self.record("list_hospitals");
        Ok(vec![hospital()])
    }

    async fn find_best_hospital(
        &self,
        _at: &Coordinate,
        _emergency_type: &EmergencyType,
    ) -> AppResult<Option<HospitalSummary>> {
        self.record("find_best_hospital");
        self.best_hospital.clone().ok_or_else(unreachable)
    }

    async fn find_nearby_hospitals(
        &self,
        _at: &Coordinate,
        _limit: u32,
    ) -> AppResult<Vec<HospitalSummary>> {
        self.record("find_nearby_hospitals");
        Ok(vec![hospital()])
    }

    async fn trigger_sos(
        &self,
        _at: &Coordinate,
        _emergency_type: &EmergencyType,
        _people_count: u32,
        user_id: Option<&str>,
    ) -> AppResult<SosResult> {
        self.record("trigger_sos");
        *self.last_user_id.borrow_mut() = user_id.map(str::to_string);
        self.sos.clone().ok_or_else(unreachable)
    }

    async fn optimize_route(
        &self,
        _origin: &Coordinate,
        _destination: &Coordinate,
    ) -> AppResult<Option<RouteInfo>> {
        self.record("optimize_route");
        Ok(None)
    }

    async fn send_otp(&self, _phone: &PhoneNumber) -> AppResult<OtpDelivery> {
        self.record("send_otp");
        self.otp_delivery.clone().ok_or_else(unreachable)
    }

    async fn verify_otp(&self, _phone: &PhoneNumber, _otp: &str) -> AppResult<OtpVerification> {
        self.record("verify_otp");
        self.verification.clone().ok_or_else(unreachable)
    }

    async fn list_contacts(&self) -> AppResult<Vec<EmergencyContact>> {
        self.record("list_contacts");
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Loading(String),
    LocationDetected,
    Processing,
    LocationStatus(Coordinate),
    Hospital(HospitalSummary),
    Ambulance(AmbulanceAssignment),
    Route(RouteInfo),
    OtpStep(String),
    Alert(String),
    Navigate(View),
}

#[derive(Default)]
pub struct RecordingPresenter {
    pub events: Vec<Rendered>,
    /// Simulate a renderer that blows up on the hospital card
    pub fail_on_hospital: bool,
}

impl RecordingPresenter {
    pub fn alerts(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Rendered::Alert(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn rendered_hospital(&self) -> bool {
        self.events.iter().any(|e| matches!(e, Rendered::Hospital(_)))
    }

    pub fn rendered_dispatch(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, Rendered::Ambulance(_) | Rendered::Route(_)))
    }
}

impl Presenter for RecordingPresenter {
    fn show_loading(&mut self, message: &str) -> AppResult<()> {
        self.events.push(Rendered::Loading(message.to_string()));
        Ok(())
    }

    fn location_detected(&mut self) -> AppResult<()> {
        self.events.push(Rendered::LocationDetected);
        Ok(())
    }

    fn show_processing(&mut self) -> AppResult<()> {
        self.events.push(Rendered::Processing);
        Ok(())
    }

    fn update_location_status(&mut self, at: &Coordinate) -> AppResult<()> {
        self.events.push(Rendered::LocationStatus(*at));
        Ok(())
    }

    fn display_hospital(&mut self, hospital: &HospitalSummary) -> AppResult<()> {
        if self.fail_on_hospital {
            return Err(AppError::presentation("hospital region missing"));
        }
        self.events.push(Rendered::Hospital(hospital.clone()));
        Ok(())
    }

    fn display_ambulance(&mut self, ambulance: &AmbulanceAssignment) -> AppResult<()> {
        self.events.push(Rendered::Ambulance(ambulance.clone()));
        Ok(())
    }

    fn display_route(&mut self, route: &RouteInfo) -> AppResult<()> {
        self.events.push(Rendered::Route(route.clone()));
        Ok(())
    }

    fn show_otp_step(&mut self, phone: &PhoneNumber) -> AppResult<()> {
        self.events.push(Rendered::OtpStep(phone.display_form()));
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.events.push(Rendered::Alert(message.to_string()));
    }

    fn navigate(&mut self, view: View) -> AppResult<()> {
        self.events.push(Rendered::Navigate(view));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingMap {
    pub drawn: Vec<(Coordinate, HospitalSummary)>,
}

impl MapCanvas for RecordingMap {
    fn draw_emergency_map(
        &mut self,
        user: &Coordinate,
        hospital: &HospitalSummary,
    ) -> AppResult<()> {
        self.drawn.push((*user, hospital.clone()));
        Ok(())
    }
}

//! Presentation collaborators
//!
//! The flows hand plain records to a [`Presenter`]; how they end up on screen
//! is the presenter's business. [`ConsolePresenter`] renders text cards to any
//! `io::Write`, which is what the CLI uses.

use std::io::Write;
use tracing::{error, info};

use crate::models::errors::{AppError, AppResult};
use crate::models::types::{
    AmbulanceAssignment, Coordinate, HospitalSummary, PhoneNumber, RouteInfo,
};

/// Navigation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Dashboard,
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Login => "login",
            View::Dashboard => "dashboard",
        }
    }
}

pub trait Presenter {
    fn show_loading(&mut self, message: &str) -> AppResult<()>;
    fn location_detected(&mut self) -> AppResult<()>;
    fn show_processing(&mut self) -> AppResult<()>;
    fn update_location_status(&mut self, at: &Coordinate) -> AppResult<()>;
    fn display_hospital(&mut self, hospital: &HospitalSummary) -> AppResult<()>;
    fn display_ambulance(&mut self, ambulance: &AmbulanceAssignment) -> AppResult<()>;
    fn display_route(&mut self, route: &RouteInfo) -> AppResult<()>;
    fn show_otp_step(&mut self, phone: &PhoneNumber) -> AppResult<()>;
    /// Last-resort user message. Must not fail.
    fn alert(&mut self, message: &str);
    fn navigate(&mut self, view: View) -> AppResult<()>;
}

// ============================================
// Card templates
// ============================================

pub fn hospital_card(hospital: &HospitalSummary) -> String {
    format!(
        "🏥 Nearest Best Hospital\n   {}\n   ICU Beds: {} | Normal Beds: {}\n   Distance: {} km\n   Rating: {} ⭐\n   Contact: {}",
        hospital.name,
        hospital.icu_bed_count,
        hospital.normal_bed_count,
        hospital.distance_km,
        hospital.rating,
        hospital.contact
    )
}

pub fn ambulance_card(ambulance: &AmbulanceAssignment) -> String {
    format!(
        "🚑 Ambulance Assigned\n   Vehicle: {}\n   ETA: {} minutes",
        ambulance.vehicle_label(),
        ambulance.eta_minutes
    )
}

pub fn route_card(route: &RouteInfo) -> String {
    format!(
        "🛣️ Route Optimized\n   Distance: {} km\n   ETA: {} minutes",
        route.distance_km, route.eta_minutes
    )
}

// ============================================
// Console presenter
// ============================================

/// Renders every region as plain text
pub struct ConsolePresenter<W: Write> {
    out: W,
    current_view: View,
}

impl ConsolePresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            current_view: View::Login,
        }
    }

    pub fn current_view(&self) -> View {
        self.current_view
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: &str) -> AppResult<()> {
        writeln!(self.out, "{}", text)
            .map_err(|e| AppError::presentation(format!("console write failed: {}", e)))
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn show_loading(&mut self, message: &str) -> AppResult<()> {
        self.line(&format!("⏳ {}", message))
    }

    fn location_detected(&mut self) -> AppResult<()> {
        self.line("✅ Location detected")
    }

    fn show_processing(&mut self) -> AppResult<()> {
        self.line("── Processing emergency ──")
    }

    fn update_location_status(&mut self, at: &Coordinate) -> AppResult<()> {
        self.line(&format!("📍 {}", at.status_text()))
    }

    fn display_hospital(&mut self, hospital: &HospitalSummary) -> AppResult<()> {
        self.line(&hospital_card(hospital))
    }

    fn display_ambulance(&mut self, ambulance: &AmbulanceAssignment) -> AppResult<()> {
        self.line(&ambulance_card(ambulance))
    }

    fn display_route(&mut self, route: &RouteInfo) -> AppResult<()> {
        self.line(&route_card(route))
    }

    fn show_otp_step(&mut self, phone: &PhoneNumber) -> AppResult<()> {
        self.line(&format!("🔐 Enter the OTP sent to {}", phone.display_form()))
    }

    fn alert(&mut self, message: &str) {
        if let Err(e) = self.line(&format!("⚠️ {}", message)) {
            error!("Alert could not be shown ({}): {}", e, message);
        }
    }

    fn navigate(&mut self, view: View) -> AppResult<()> {
        info!("➡️ Navigating to {}", view.as_str());
        self.current_view = view;
        self.line(&format!("➡️ {}", view.as_str()))
    }
}

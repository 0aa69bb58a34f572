//! Emergency Flow
//!
//! Location -> best hospital -> SOS, strictly in sequence. Each step waits on
//! the previous one and the flow stops as soon as a step yields nothing usable.
//! Unexpected errors are caught once, at the top, and shown as one generic
//! alert.

use tracing::{error, info, warn};

use super::map::MapCanvas;
use super::presenter::Presenter;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{Coordinate, EmergencyType, HospitalSummary, SosResult};
use crate::providers::api::{EmergencyApi, Fallback};
use crate::providers::location::{LocationProvider, PositionSource};
use crate::utils::constants::{
    MSG_DETECTING_LOCATION, MSG_EMERGENCY_ERROR, MSG_NO_HOSPITAL, MSG_SOS_FAILED,
};

/// Which branch of the flow ran
#[derive(Debug)]
pub enum EmergencyOutcome {
    /// No hospital could be found; nothing was rendered or dispatched
    NoHospital { location: Coordinate },
    /// Hospital rendered, SOS refused or failed
    SosRejected {
        location: Coordinate,
        hospital: HospitalSummary,
        reason: String,
    },
    /// Ambulance dispatched and rendered
    Dispatched {
        location: Coordinate,
        hospital: HospitalSummary,
        sos: SosResult,
    },
    /// Unexpected error, shown to the user as a generic alert
    Aborted { error: AppError },
}

impl EmergencyOutcome {
    pub fn is_dispatched(&self) -> bool {
        matches!(self, Self::Dispatched { .. })
    }
}

pub struct EmergencyFlow<A, S, P, M> {
    api: A,
    location: LocationProvider<S>,
    presenter: P,
    map: M,
    user_id: Option<String>,
}

impl<A, S, P, M> EmergencyFlow<A, S, P, M>
where
    A: EmergencyApi,
    S: PositionSource,
    P: Presenter,
    M: MapCanvas,
{
    pub fn new(api: A, location: LocationProvider<S>, presenter: P, map: M) -> Self {
        Self {
            api,
            location,
            presenter,
            map,
            user_id: None,
        }
    }

    /// Attach a user id to every SOS sent by this flow
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub async fn handle_emergency(
        &mut self,
        emergency_type: &EmergencyType,
        people_count: u32,
    ) -> EmergencyOutcome {
        match self.run(emergency_type, people_count).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(code = e.code_str(), "❌ Emergency error: {}", e);
                self.presenter.alert(MSG_EMERGENCY_ERROR);
                EmergencyOutcome::Aborted { error: e }
            }
        }
    }

    async fn run(
        &mut self,
        emergency_type: &EmergencyType,
        people_count: u32,
    ) -> AppResult<EmergencyOutcome> {
        self.presenter.show_loading(MSG_DETECTING_LOCATION)?;
        let location = self.location.get_location().await?;
        self.presenter.location_detected()?;
        self.presenter.show_processing()?;
        self.presenter.update_location_status(&location)?;

        let hospital = match self.api.find_best_hospital(&location, emergency_type).await {
            Ok(Some(hospital)) => hospital,
            Ok(None) => {
                warn!("⚠️ No hospital available for '{}'", emergency_type);
                self.presenter.alert(MSG_NO_HOSPITAL);
                return Ok(EmergencyOutcome::NoHospital { location });
            }
            Err(e) => {
                warn!(code = e.code_str(), "⚠️ Hospital lookup failed: {}", e.message);
                self.presenter.alert(MSG_NO_HOSPITAL);
                return Ok(EmergencyOutcome::NoHospital { location });
            }
        };

        self.presenter.display_hospital(&hospital)?;
        self.map.draw_emergency_map(&location, &hospital)?;

        let sos = self
            .api
            .trigger_sos(
                &location,
                emergency_type,
                people_count,
                self.user_id.as_deref(),
            )
            .await
            .unwrap_or_else(|e| SosResult::fallback(&e));

        if !sos.success {
            let reason = sos
                .error_message
                .unwrap_or_else(|| "SOS request was rejected".to_string());
            warn!("⚠️ SOS not dispatched: {}", reason);
            self.presenter.alert(MSG_SOS_FAILED);
            return Ok(EmergencyOutcome::SosRejected {
                location,
                hospital,
                reason,
            });
        }

        if let Some(ambulance) = &sos.ambulance {
            self.presenter.display_ambulance(ambulance)?;
        }
        if let Some(route) = &sos.hospital {
            self.presenter.display_route(route)?;
        }

        info!("✅ Emergency handled: {} dispatched", hospital.name);
        Ok(EmergencyOutcome::Dispatched {
            location,
            hospital,
            sos,
        })
    }
}

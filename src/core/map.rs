//! Emergency map view model
//!
//! Tile rendering is out of scope; [`EmergencyMap`] builds the view a map
//! widget would draw (center, zoom, markers, route line, fitted bounds) and
//! keeps the latest one as the single map handle.

use serde::Serialize;
use tracing::{info, warn};

use crate::models::errors::AppResult;
use crate::models::types::{Coordinate, HospitalSummary};
use crate::utils::constants::{MAP_DEFAULT_ZOOM, MAP_FIT_PADDING_PX};

pub trait MapCanvas {
    fn draw_emergency_map(&mut self, user: &Coordinate, hospital: &HospitalSummary)
        -> AppResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    User,
    Hospital,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub kind: MarkerKind,
    pub lat: f64,
    pub lng: f64,
    pub popup: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    fn around(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let init = Self {
            south: first.0,
            west: first.1,
            north: first.0,
            east: first.1,
        };
        Some(rest.iter().fold(init, |b, &(lat, lng)| Self {
            south: b.south.min(lat),
            west: b.west.min(lng),
            north: b.north.max(lat),
            east: b.east.max(lng),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: (f64, f64),
    pub zoom: u8,
    pub markers: Vec<MapMarker>,
    /// Straight line user -> hospital; empty when the hospital has no position
    pub route: Vec<(f64, f64)>,
    pub fit_bounds: Option<MapBounds>,
    pub padding_px: u32,
}

impl MapView {
    pub fn build(user: &Coordinate, hospital: &HospitalSummary) -> Self {
        let user_point = (user.latitude, user.longitude);
        let mut markers = vec![MapMarker {
            kind: MarkerKind::User,
            lat: user.latitude,
            lng: user.longitude,
            popup: "Your Location".to_string(),
        }];

        let route = match hospital.position() {
            Some((lat, lng)) => {
                markers.push(MapMarker {
                    kind: MarkerKind::Hospital,
                    lat,
                    lng,
                    popup: format!("{}\n{} km away", hospital.name, hospital.distance_km),
                });
                vec![user_point, (lat, lng)]
            }
            None => Vec::new(),
        };

        Self {
            center: user_point,
            zoom: MAP_DEFAULT_ZOOM,
            fit_bounds: MapBounds::around(&route),
            markers,
            route,
            padding_px: MAP_FIT_PADDING_PX,
        }
    }
}

/// Holds the one live map view
#[derive(Debug, Default)]
pub struct EmergencyMap {
    view: Option<MapView>,
}

impl EmergencyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }
}

impl MapCanvas for EmergencyMap {
    fn draw_emergency_map(
        &mut self,
        user: &Coordinate,
        hospital: &HospitalSummary,
    ) -> AppResult<()> {
        let view = MapView::build(user, hospital);
        if view.route.is_empty() {
            warn!("⚠️ {} has no coordinates; map shows the user only", hospital.name);
        } else {
            info!("🗺️ Map drawn: {} markers, route fitted", view.markers.len());
        }
        self.view = Some(view);
        Ok(())
    }
}

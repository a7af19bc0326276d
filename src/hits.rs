//! Satellite detection cross checks
use hifitime::Epoch;
use log::debug;

use crate::{
    prelude::{Error, GeodeticPoint},
    satellite::SatelliteTrack,
    track::VesselTrack,
    visibility::{surface_distance, visibility, Trackable, Visibility},
};

/// Satellite detection (or non detection) of a vessel,
/// only used to cross check the geometry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ValidationHit {
    /// Vessel identifier
    pub vessel_id: String,
    /// Detection instant
    pub epoch: Epoch,
    /// Satellite identifier
    pub satellite_id: String,
    /// True when the vessel was detected
    pub hit: bool,
    /// Sub satellite point reported along the detection
    pub satellite_position: GeodeticPoint,
}

impl ValidationHit {
    /// Builds a new [ValidationHit], with reported satellite coordinates in decimal degrees
    pub fn new(
        vessel_id: &str,
        epoch: Epoch,
        satellite_id: &str,
        hit: bool,
        satellite_lon_ddeg: f64,
        satellite_lat_ddeg: f64,
    ) -> Self {
        Self {
            vessel_id: vessel_id.to_string(),
            epoch,
            satellite_id: satellite_id.to_string(),
            hit,
            satellite_position: GeodeticPoint::from_ddeg(satellite_lon_ddeg, satellite_lat_ddeg, 0.0),
        }
    }
}

/// Result of a [ValidationHit] cross check
#[derive(Debug, Clone, PartialEq)]
pub struct HitCheck {
    /// Propagated satellite position at detection instant
    pub satellite_position: Option<GeodeticPoint>,
    /// Surface distance [km] between reported and propagated
    /// sub satellite points
    pub deviation_km: Option<f64>,
    /// Interpolated vessel position at detection instant
    pub vessel_position: Option<GeodeticPoint>,
    /// Geometric classification of the pair
    pub visibility: Visibility,
}

impl HitCheck {
    /// Cross checks a [ValidationHit] against the reconstructed geometry.
    /// Missing tracks or unresolved positions leave the related fields empty.
    pub fn new(
        hit: &ValidationHit,
        satellite: Option<&SatelliteTrack>,
        vessel: Option<&VesselTrack>,
        range_km: f64,
    ) -> Self {
        let resolve = |track: Option<&dyn Trackable>| -> Option<GeodeticPoint> {
            match track.map(|track| track.position_at(hit.epoch)) {
                Some(Ok(point)) => Some(point),
                Some(Err(e)) => {
                    debug!("{:?} ({} / {}) - {}", hit.epoch, hit.vessel_id, hit.satellite_id, e);
                    None
                },
                None => None,
            }
        };

        let satellite_position = resolve(satellite.map(|s| s as &dyn Trackable));
        let vessel_position = resolve(vessel.map(|v| v as &dyn Trackable));

        let deviation_km = satellite_position
            .and_then(|p| surface_distance(&p, &hit.satellite_position).ok())
            .map(|d| d / 1000.0);

        let visibility = match (satellite_position, vessel_position) {
            (Some(sat), Some(vessel)) => Self::classify(&sat, &vessel, range_km),
            _ => Visibility::Unresolved,
        };

        Self {
            satellite_position,
            deviation_km,
            vessel_position,
            visibility,
        }
    }
    fn classify(sat: &GeodeticPoint, vessel: &GeodeticPoint, range_km: f64) -> Visibility {
        visibility(sat, vessel, range_km).unwrap_or_else(|e: Error| {
            debug!("unresolved hit geometry: {}", e);
            Visibility::Unresolved
        })
    }
    /// A detection is plausible if the pair was in range. A non detection
    /// is always plausible. None when the geometry could not be resolved.
    pub fn plausible(&self, hit: &ValidationHit) -> Option<bool> {
        match self.visibility {
            Visibility::Unresolved => None,
            visibility => Some(!hit.hit || visibility.in_range()),
        }
    }
}

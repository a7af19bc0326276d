use crate::{hits::ValidationHit, satellite::SatelliteTrack, track::VesselTrack};

/// Entity identifier, as exchanged with the rendering front end
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityId {
    /// Satellite identifier
    Satellite(String),
    /// Vessel identifier
    Vessel(String),
    /// Validation hit marker (index of the hit)
    Hit(usize),
}

impl EntityId {
    pub fn satellite(id: &str) -> Self {
        Self::Satellite(id.to_string())
    }
    pub fn vessel(id: &str) -> Self {
        Self::Vessel(id.to_string())
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Satellite(id) => write!(f, "Satellite: {}", id),
            Self::Vessel(id) => write!(f, "Vessel: {}", id),
            Self::Hit(index) => write!(f, "Hit: #{}", index),
        }
    }
}

/// Scenario entity
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Satellite(&'a SatelliteTrack),
    Vessel(&'a VesselTrack),
    HitMarker(usize, &'a ValidationHit),
}

impl<'a> Entity<'a> {
    pub fn id(&self) -> EntityId {
        match self {
            Self::Satellite(sat) => EntityId::Satellite(sat.satellite_id.clone()),
            Self::Vessel(vessel) => EntityId::Vessel(vessel.vessel_id.clone()),
            Self::HitMarker(index, _) => EntityId::Hit(*index),
        }
    }
    /// Human readable name
    pub fn name(&self) -> String {
        match self {
            Self::Satellite(sat) => sat.satellite_id.clone(),
            Self::Vessel(vessel) => vessel.name.clone(),
            Self::HitMarker(_, hit) => format!("{} / {}", hit.vessel_id, hit.satellite_id),
        }
    }
}

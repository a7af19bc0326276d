#![doc = include_str!("../README.md")]
#![cfg_attr(docrs, feature(doc_cfg))]

// private modules
mod cfg;
mod entity;
mod error;
mod frame;
mod geodetic;
mod hits;
mod interp;
mod orbit;
mod satellite;
mod scenario;
mod selection;
mod timeline;
mod track;
mod visibility;

// pub export
pub use error::Error;

#[cfg(test)]
mod tests;

// prelude
pub mod prelude {
    pub use crate::cfg::{Config, CoveragePolicy};
    pub use crate::entity::{Entity, EntityId};
    pub use crate::error::Error;
    pub use crate::frame::{eci_to_ecef, eci_to_geodetic, gmst};
    pub use crate::geodetic::GeodeticPoint;
    pub use crate::hits::{HitCheck, ValidationHit};
    pub use crate::interp::SampledPositionFunction;
    pub use crate::orbit::{ElementSet, OrbitalElementRecord};
    pub use crate::satellite::SatelliteTrack;
    pub use crate::scenario::{Scenario, Summary};
    pub use crate::selection::{Highlight, HighlightUpdate, Selection, SelectionController};
    pub use crate::timeline::{Timeline, ValidityInterval};
    pub use crate::track::{VesselReport, VesselTrack};
    pub use crate::visibility::{classify_all, is_in_range, surface_distance, Trackable, Visibility};
    // re-export
    pub use hifitime::{Duration, Epoch, TimeScale, Unit};
    pub use nalgebra::Vector3;
}

use chrono::{Datelike, Timelike};
use hifitime::Epoch;
use nalgebra::Vector3;
use sgp4::{Constants, Elements, MinutesSinceEpoch};

use crate::{
    frame::eci_to_geodetic,
    prelude::{Error, GeodeticPoint},
};

/// Two line element set row, as provided for one object at one epoch.
/// The record epoch describes when this element set becomes authoritative,
/// which may differ from the epoch encoded in the lines themselves.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct OrbitalElementRecord {
    /// Object (satellite) identifier
    pub object_id: String,
    /// Epoch of this record
    pub epoch: Epoch,
    /// First element line
    pub line1: String,
    /// Second element line
    pub line2: String,
}

impl OrbitalElementRecord {
    pub fn new(object_id: &str, epoch: Epoch, line1: &str, line2: &str) -> Self {
        Self {
            object_id: object_id.to_string(),
            epoch,
            line1: line1.to_string(),
            line2: line2.to_string(),
        }
    }
    /// Parses both element lines into a ready to use [ElementSet].
    /// This is pure and should be performed once per record.
    pub fn parse(&self) -> Result<ElementSet, Error> {
        let malformed = |reason: String| Error::MalformedElementSet {
            object_id: self.object_id.clone(),
            reason,
        };

        let elements = Elements::from_tle(
            Some(self.object_id.clone()),
            self.line1.trim_end().as_bytes(),
            self.line2.trim_end().as_bytes(),
        )
        .map_err(|e| malformed(format!("{:?}", e)))?;

        let constants =
            Constants::from_elements(&elements).map_err(|e| malformed(format!("{:?}", e)))?;

        let dt = elements.datetime;
        let tle_epoch = Epoch::from_gregorian_utc(
            dt.year(),
            dt.month() as u8,
            dt.day() as u8,
            dt.hour() as u8,
            dt.minute() as u8,
            dt.second() as u8,
            dt.nanosecond(),
        );

        Ok(ElementSet {
            object_id: self.object_id.clone(),
            epoch: self.epoch,
            tle_epoch,
            constants,
        })
    }
}

/// Parsed element set: SGP4 propagator state
pub struct ElementSet {
    /// Object (satellite) identifier
    pub(crate) object_id: String,
    /// Record epoch
    pub(crate) epoch: Epoch,
    /// Epoch encoded in the element lines, reference of the propagation
    pub(crate) tle_epoch: Epoch,
    /// SGP4 state
    constants: Constants,
}

impl std::fmt::Debug for ElementSet {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ElementSet")
            .field("object_id", &self.object_id)
            .field("epoch", &self.epoch)
            .field("tle_epoch", &self.tle_epoch)
            .finish()
    }
}

impl ElementSet {
    /// Record epoch
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
    /// Epoch of the element lines
    pub fn tle_epoch(&self) -> Epoch {
        self.tle_epoch
    }
    /// Propagates to `t`, returns ECI (TEME) position [km] and velocity [km/s].
    pub fn propagate(&self, t: Epoch) -> Result<(Vector3<f64>, Vector3<f64>), Error> {
        let minutes = (t - self.tle_epoch).to_seconds() / 60.0;

        let prediction = self
            .constants
            .propagate(MinutesSinceEpoch(minutes))
            .map_err(|e| {
                Error::GeometryFailure(format!("{} ({:?}): {:?}", self.object_id, t, e))
            })?;

        let position = Vector3::from(prediction.position);
        let velocity = Vector3::from(prediction.velocity);

        if position.iter().chain(velocity.iter()).all(|v| v.is_finite()) {
            Ok((position, velocity))
        } else {
            Err(Error::GeometryFailure(format!(
                "{} ({:?}): non finite state",
                self.object_id, t
            )))
        }
    }
    /// Propagates to `t` and projects onto the ellipsoid
    pub fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        let (position, _) = self.propagate(t)?;
        let point = eci_to_geodetic(&position, t);
        if point.is_finite() {
            Ok(point)
        } else {
            Err(Error::GeometryFailure(format!(
                "{} ({:?}): non finite projection",
                self.object_id, t
            )))
        }
    }
}

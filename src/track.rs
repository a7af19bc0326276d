//! Vessel tracks
use hifitime::Epoch;
use itertools::Itertools;
use log::debug;

use crate::{
    interp::SampledPositionFunction,
    prelude::{Error, GeodeticPoint},
    visibility::Trackable,
};

/// Vessel position report row
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct VesselReport {
    /// Vessel identifier
    pub vessel_id: String,
    /// Vessel name
    pub vessel_name: String,
    /// Report instant
    pub epoch: Epoch,
    /// Reported longitude [rad]
    pub longitude: f64,
    /// Reported latitude [rad]
    pub latitude: f64,
}

impl VesselReport {
    /// Builds a new report, from coordinates in decimal degrees
    pub fn new(vessel_id: &str, vessel_name: &str, epoch: Epoch, lon_ddeg: f64, lat_ddeg: f64) -> Self {
        let point = GeodeticPoint::from_ddeg(lon_ddeg, lat_ddeg, 0.0);
        Self {
            vessel_id: vessel_id.to_string(),
            vessel_name: vessel_name.to_string(),
            epoch,
            longitude: point.longitude,
            latitude: point.latitude,
        }
    }
    /// Reported position, on the ellipsoid surface
    pub fn position(&self) -> GeodeticPoint {
        GeodeticPoint::from_rad(self.longitude, self.latitude, 0.0)
    }
}

/// Continuous vessel track, valid over `[first report, last report]`.
#[derive(Debug, Clone, PartialEq)]
pub struct VesselTrack {
    /// Vessel identifier
    pub vessel_id: String,
    /// Vessel name
    pub name: String,
    /// Chronological reports
    reports: Vec<(Epoch, GeodeticPoint)>,
    /// Interpolation function
    samples: SampledPositionFunction,
}

impl VesselTrack {
    /// Builds a [VesselTrack] from unordered reports. Reports are sorted by
    /// instant, duplicated instants only retain the first report.
    /// Fewer than 2 distinct instants is a [Error::DegenerateTrack].
    pub fn build(vessel_id: &str, name: &str, reports: &[(Epoch, GeodeticPoint)]) -> Result<Self, Error> {
        let reports = reports
            .iter()
            .map(|(t, point)| (*t, point.on_surface()))
            .sorted_by(|(a, _), (b, _)| a.cmp(b))
            .dedup_by(|(a, _), (b, _)| a == b)
            .collect::<Vec<_>>();

        if reports.len() < 2 {
            return Err(Error::DegenerateTrack {
                vessel_id: vessel_id.to_string(),
                reports: reports.len(),
            });
        }

        let mut samples = SampledPositionFunction::with_capacity(reports.len());
        for (t, point) in reports.iter() {
            samples.push_geodetic(*t, point);
        }

        debug!("{}: {} reports", vessel_id, reports.len());

        Ok(Self {
            vessel_id: vessel_id.to_string(),
            name: name.to_string(),
            reports,
            samples,
        })
    }
    /// Builds a [VesselTrack] from [VesselReport]s, all expected
    /// to describe the same vessel.
    pub fn from_reports(reports: &[VesselReport]) -> Result<Self, Error> {
        let first = reports.first().ok_or_else(|| Error::DegenerateTrack {
            vessel_id: String::default(),
            reports: 0,
        })?;
        let points = reports
            .iter()
            .map(|r| (r.epoch, r.position()))
            .collect::<Vec<_>>();
        Self::build(&first.vessel_id, &first.vessel_name, &points)
    }
    /// `[first, last]` report instants
    pub fn validity(&self) -> (Epoch, Epoch) {
        // at least 2 reports by construction
        (self.reports[0].0, self.reports[self.reports.len() - 1].0)
    }
    /// True if `t` lies within `[first, last]`
    pub fn covers(&self, t: Epoch) -> bool {
        let (first, last) = self.validity();
        first <= t && t <= last
    }
    /// Interpolated position at `t`. Height is always null.
    pub fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        if !self.covers(t) {
            return Err(Error::NoCoverage {
                id: self.vessel_id.clone(),
                epoch: t,
            });
        }
        Ok(self.samples.position_at(t)?.on_surface())
    }
    /// Chronological reports
    pub fn reports(&self) -> &[(Epoch, GeodeticPoint)] {
        &self.reports
    }
}

impl Trackable for VesselTrack {
    fn covers(&self, t: Epoch) -> bool {
        VesselTrack::covers(self, t)
    }
    fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        VesselTrack::position_at(self, t)
    }
}

use crate::prelude::Vector3;
use map_3d::{deg2rad, ecef2geodetic, geodetic2ecef, rad2deg, Ellipsoid};

/// Point referenced to the WGS84 ellipsoid.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct GeodeticPoint {
    /// Longitude [rad]
    pub longitude: f64,
    /// Latitude [rad]
    pub latitude: f64,
    /// Height above ellipsoid [m]
    pub height: f64,
}

impl GeodeticPoint {
    /// Builds Self from longitude [rad], latitude [rad] and height [m]
    pub fn from_rad(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude,
            latitude,
            height,
        }
    }
    /// Builds Self from longitude [ddeg], latitude [ddeg] and height [m]
    pub fn from_ddeg(longitude: f64, latitude: f64, height: f64) -> Self {
        Self::from_rad(deg2rad(longitude), deg2rad(latitude), height)
    }
    /// Builds Self from ECEF coordinates [m]
    pub fn from_ecef(ecef: Vector3<f64>) -> Self {
        let (lat, lon, h) = ecef2geodetic(ecef[0], ecef[1], ecef[2], Ellipsoid::WGS84);
        Self::from_rad(lon, lat, h)
    }
    /// Returns ECEF coordinates [m]
    pub fn ecef(&self) -> Vector3<f64> {
        let (x, y, z) = geodetic2ecef(
            self.latitude,
            self.longitude,
            self.height,
            Ellipsoid::WGS84,
        );
        Vector3::new(x, y, z)
    }
    /// Returns (longitude, latitude) in decimal degrees
    pub fn ddeg(&self) -> (f64, f64) {
        (rad2deg(self.longitude), rad2deg(self.latitude))
    }
    /// Horizontal projection of Self, height forced to zero.
    pub fn on_surface(&self) -> Self {
        Self {
            height: 0.0,
            ..*self
        }
    }
    pub(crate) fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite() && self.height.is_finite()
    }
}

impl std::fmt::Display for GeodeticPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (lon, lat) = self.ddeg();
        write!(f, "({:.5}°, {:.5}°, {:.1}m)", lon, lat, self.height)
    }
}

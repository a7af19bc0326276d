//! Inertial to Earth fixed frame conversions
use hifitime::Epoch;
use nalgebra::{Rotation3, Vector3};
use std::f64::consts::TAU;

use crate::prelude::GeodeticPoint;

/// Julian days between MJD and JD origins
const MJD_JD_OFFSET: f64 = 2_400_000.5;

/// J2000 reference, in Julian days
const J2000_JD: f64 = 2_451_545.0;

/// Greenwich Mean Sidereal Time [rad] at `t` (IAU-82 model),
/// UT1 being approximated by UTC.
pub fn gmst(t: Epoch) -> f64 {
    let jd_ut1 = t.to_mjd_utc_days() + MJD_JD_OFFSET;
    let tut1 = (jd_ut1 - J2000_JD) / 36525.0;

    // [s]
    let theta = -6.2E-6 * tut1.powi(3)
        + 0.093104 * tut1.powi(2)
        + (876600.0 * 3600.0 + 8640184.812866) * tut1
        + 67310.54841;

    // 1 second of time is 1/240 deg
    (theta.to_radians() / 240.0).rem_euclid(TAU)
}

/// Rotates ECI coordinates into the Earth fixed frame at `t`.
/// Units are preserved.
pub fn eci_to_ecef(eci: &Vector3<f64>, t: Epoch) -> Vector3<f64> {
    Rotation3::from_axis_angle(&Vector3::z_axis(), -gmst(t)) * eci
}

/// Projects an ECI position [km] onto the WGS84 ellipsoid at `t`.
/// Height is expressed in meters.
pub fn eci_to_geodetic(eci_km: &Vector3<f64>, t: Epoch) -> GeodeticPoint {
    let ecef_m = eci_to_ecef(eci_km, t) * 1000.0;
    GeodeticPoint::from_ecef(ecef_m)
}

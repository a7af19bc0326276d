//! Fixed horizon visibility model
use hifitime::Epoch;
use log::debug;
use std::collections::HashMap;
use std::f64::consts::{PI, TAU};
use std::hash::Hash;

use crate::prelude::{Error, GeodeticPoint};

/// WGS84 semi major axis [m]
const WGS84_A: f64 = 6378137.0;

/// WGS84 flattening
const WGS84_F: f64 = 1.0 / 298.257223563;

/// Vincenty iteration limit
const MAX_ITERATIONS: usize = 200;

/// Vincenty convergence criterion on lambda [rad]
const CONVERGENCE: f64 = 1.0E-12;

/// Anything with a time dependent position.
pub trait Trackable {
    /// True if Self has an authoritative position at `t`
    fn covers(&self, t: Epoch) -> bool;
    /// Resolves position at `t`
    fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error>;
}

/// Binary visibility classification
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Visibility {
    InRange,
    OutOfRange,
    /// Position could not be resolved: neutral state
    Unresolved,
}

impl Visibility {
    /// Classifies a surface distance [m] against the range [km]
    pub fn from_distance(distance_m: f64, range_km: f64) -> Self {
        if distance_m / 1000.0 < range_km {
            Self::InRange
        } else {
            Self::OutOfRange
        }
    }
    pub fn in_range(&self) -> bool {
        matches!(self, Self::InRange)
    }
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::InRange => write!(f, "in range"),
            Self::OutOfRange => write!(f, "out of range"),
            Self::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// Geodesic distance [m] between the horizontal projections of both points,
/// along the WGS84 surface (Vincenty inverse formula).
/// Heights are ignored. Near antipodal points, where Vincenty does not converge,
/// fall back to the great circle distance on the mean sphere.
/// Only non finite coordinates are a [Error::GeometryFailure].
pub fn surface_distance(a: &GeodeticPoint, b: &GeodeticPoint) -> Result<f64, Error> {
    let (a, b) = (a.on_surface(), b.on_surface());
    if !a.is_finite() || !b.is_finite() {
        return Err(Error::GeometryFailure(format!(
            "non finite coordinates {:?} {:?}",
            a, b
        )));
    }

    let semi_minor = (1.0 - WGS84_F) * WGS84_A;

    let l = (b.longitude - a.longitude + PI).rem_euclid(TAU) - PI;
    let u1 = ((1.0 - WGS84_F) * a.latitude.tan()).atan();
    let u2 = ((1.0 - WGS84_F) * b.latitude.tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;

    let (mut sin_sigma, mut cos_sigma, mut sigma) = (0.0_f64, 0.0_f64, 0.0_f64);
    let (mut cos_sq_alpha, mut cos_2sigma_m) = (0.0_f64, 0.0_f64);

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;

        if sin_sigma == 0.0 {
            if cos_sigma > 0.0 {
                // coincident points
                return Ok(0.0);
            }
            // exact antipodes
            break;
        }

        sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha.powi(2);

        // equatorial line
        cos_2sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = WGS84_F / 16.0 * cos_sq_alpha * (4.0 + WGS84_F * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;

        lambda = l
            + (1.0 - c)
                * WGS84_F
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if lambda.abs() > PI {
            // antipodal region
            break;
        }
        if (lambda - previous).abs() < CONVERGENCE {
            converged = true;
            break;
        }
    }

    if !converged {
        debug!("near antipodal geodesic between {} and {}", a, b);
        return great_circle_distance(&a, &b);
    }

    let u_sq = cos_sq_alpha * (WGS84_A.powi(2) - semi_minor.powi(2)) / semi_minor.powi(2);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

    let delta_sigma = big_b
        * sin_sigma
        * (cos_2sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));

    let distance = semi_minor * big_a * (sigma - delta_sigma);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(Error::GeometryFailure(format!(
            "non finite distance between {} and {}",
            a, b
        )))
    }
}

/// Great circle distance [m] on the mean earth sphere `R1 = (2a + b) / 3`,
/// used where the Vincenty iteration does not converge (near antipodal points).
fn great_circle_distance(a: &GeodeticPoint, b: &GeodeticPoint) -> Result<f64, Error> {
    let mean_radius = (2.0 * WGS84_A + (1.0 - WGS84_F) * WGS84_A) / 3.0;

    let (sin_phi1, cos_phi1) = a.latitude.sin_cos();
    let (sin_phi2, cos_phi2) = b.latitude.sin_cos();
    let (sin_dl, cos_dl) = (b.longitude - a.longitude).sin_cos();

    let y = ((cos_phi2 * sin_dl).powi(2) + (cos_phi1 * sin_phi2 - sin_phi1 * cos_phi2 * cos_dl).powi(2))
        .sqrt();
    let x = sin_phi1 * sin_phi2 + cos_phi1 * cos_phi2 * cos_dl;

    let distance = mean_radius * y.atan2(x);
    if distance.is_finite() {
        Ok(distance)
    } else {
        Err(Error::GeometryFailure(format!(
            "non finite distance between {} and {}",
            a, b
        )))
    }
}

/// Classifies both points against the range [km]
pub fn visibility(a: &GeodeticPoint, b: &GeodeticPoint, range_km: f64) -> Result<Visibility, Error> {
    let distance = surface_distance(a, b)?;
    Ok(Visibility::from_distance(distance, range_km))
}

/// True if both points are within `range_km` of each other
pub fn is_in_range(a: &GeodeticPoint, b: &GeodeticPoint, range_km: f64) -> Result<bool, Error> {
    Ok(visibility(a, b, range_km)?.in_range())
}

/// Classifies every candidate covering `t` against the reference point.
/// Candidates not covering `t` are not part of the results.
/// A candidate that fails to resolve is reported as [Visibility::Unresolved]:
/// one failure never aborts the batch.
pub fn classify_all<'a, K, T, I>(
    reference: &GeodeticPoint,
    candidates: I,
    t: Epoch,
    range_km: f64,
) -> HashMap<K, Visibility>
where
    K: Eq + Hash + std::fmt::Debug,
    T: Trackable + ?Sized + 'a,
    I: IntoIterator<Item = (K, &'a T)>,
{
    candidates
        .into_iter()
        .filter(|(_, candidate)| candidate.covers(t))
        .map(|(key, candidate)| {
            let status = candidate
                .position_at(t)
                .and_then(|position| visibility(reference, &position, range_km))
                .unwrap_or_else(|e| {
                    debug!("{:?} ({:?}) - unresolved: {}", t, key, e);
                    Visibility::Unresolved
                });
            (key, status)
        })
        .collect()
}

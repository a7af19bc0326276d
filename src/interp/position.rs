use crate::interp::linear_weights;
use crate::prelude::{Epoch, Error, GeodeticPoint, Vector3};
use log::debug;

/// Chronological set of ECEF position samples, linearly interpolated.
/// Only defined within `[first, last]` sampling instants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledPositionFunction {
    buffer: Vec<(Epoch, Vector3<f64>)>,
}

impl SampledPositionFunction {
    pub fn with_capacity(size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(size),
        }
    }
    /// Appends a new sample. Samples must be provided in strict chronological
    /// order: anything not past the latest sample is dropped.
    pub fn push(&mut self, t: Epoch, ecef: Vector3<f64>) -> bool {
        if let Some((last, _)) = self.buffer.last() {
            if t <= *last {
                debug!("{:?} - sample dropped, not past {:?}", t, last);
                return false;
            }
        }
        self.buffer.push((t, ecef));
        true
    }
    /// Appends a new geodetic sample
    pub fn push_geodetic(&mut self, t: Epoch, point: &GeodeticPoint) -> bool {
        self.push(t, point.ecef())
    }
    pub fn len(&self) -> usize {
        self.buffer.len()
    }
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
    /// `[first, last]` sampling instants
    pub fn span(&self) -> Option<(Epoch, Epoch)> {
        let (first, _) = self.buffer.first()?;
        let (last, _) = self.buffer.last()?;
        Some((*first, *last))
    }
    /// Interpolates ECEF position [m] at `t`, between the two bracketing samples.
    pub fn interpolate(&self, t: Epoch) -> Option<Vector3<f64>> {
        let idx = self.buffer.partition_point(|(t_k, _)| *t_k <= t);
        let (before_t, before) = self.buffer.get(idx.checked_sub(1)?)?;
        if *before_t == t {
            return Some(*before);
        }
        let (after_t, after) = self.buffer.get(idx)?;
        let (w_before, w_after) = linear_weights(*before_t, *after_t, t)?;
        Some(before * w_before + after * w_after)
    }
    /// Interpolated [GeodeticPoint] at `t`
    pub fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        let ecef = self.interpolate(t).ok_or_else(|| {
            Error::GeometryFailure(format!("{:?} outside of sampled span", t))
        })?;
        let point = GeodeticPoint::from_ecef(ecef);
        if point.is_finite() {
            Ok(point)
        } else {
            Err(Error::GeometryFailure(format!(
                "{:?} - non finite interpolation",
                t
            )))
        }
    }
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> &[(Epoch, Vector3<f64>)] {
        &self.buffer
    }
}

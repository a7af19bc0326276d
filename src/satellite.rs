//! Satellite tracks
use hifitime::{Epoch, Unit};
use log::{debug, warn};

use crate::{
    cfg::Config,
    interp::SampledPositionFunction,
    orbit::{ElementSet, OrbitalElementRecord},
    prelude::{Error, GeodeticPoint},
    timeline::{Timeline, ValidityInterval},
    visibility::Trackable,
};

/// Satellite track: element set validity timeline, and the render samples
/// generated for each interval.
#[derive(Debug)]
pub struct SatelliteTrack {
    /// Satellite identifier
    pub satellite_id: String,
    /// Authoritative element sets
    timeline: Timeline<ElementSet>,
    /// Render samples, one function per element set interval
    samples: Timeline<SampledPositionFunction>,
}

impl SatelliteTrack {
    /// Builds a [SatelliteTrack] from unordered [OrbitalElementRecord]s
    /// of the same satellite. Malformed records are dropped.
    pub fn build(satellite_id: &str, records: &[OrbitalElementRecord], cfg: &Config) -> Self {
        let sets = records.iter().filter_map(|record| match record.parse() {
            Ok(set) => Some((record.epoch, set)),
            Err(e) => {
                warn!("{:?} - {}", record.epoch, e);
                None
            },
        });

        let timeline = Timeline::build(sets, cfg.coverage);

        let samples = timeline.filter_map(|interval| {
            let samples = Self::sample(interval, cfg.samples_per_interval);
            if samples.len() > 1 {
                Some(samples)
            } else {
                debug!(
                    "{} ({:?}) - not enough samples",
                    satellite_id, interval.start
                );
                None
            }
        });

        debug!(
            "{}: {} element set interval(s), {} sampled",
            satellite_id,
            timeline.len(),
            samples.len()
        );

        Self {
            satellite_id: satellite_id.to_string(),
            timeline,
            samples,
        }
    }
    /// Uniformly samples the interval, both ends included
    fn sample(interval: &ValidityInterval<ElementSet>, count: usize) -> SampledPositionFunction {
        let mut samples = SampledPositionFunction::with_capacity(count);
        if count < 2 {
            return samples;
        }
        let step = (interval.stop - interval.start).to_seconds() / (count - 1) as f64;
        for k in 0..count {
            let t = interval.start + (k as f64 * step) * Unit::Second;
            match interval.payload.position_at(t) {
                Ok(point) => {
                    samples.push_geodetic(t, &point);
                },
                Err(e) => debug!("sample skipped: {}", e),
            }
        }
        samples
    }
    /// Element set timeline
    pub fn timeline(&self) -> &Timeline<ElementSet> {
        &self.timeline
    }
    /// Element set authoritative at `t`
    pub fn element_set(&self, t: Epoch) -> Result<&ElementSet, Error> {
        self.timeline.lookup(t).ok_or_else(|| Error::NoCoverage {
            id: self.satellite_id.clone(),
            epoch: t,
        })
    }
    /// Smooth position, interpolated from render samples.
    /// Falls back to direct propagation when no samples cover `t`.
    pub fn sampled_position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        match self.samples.lookup(t).map(|samples| samples.position_at(t)) {
            Some(Ok(point)) => Ok(point),
            _ => self.position_at(t),
        }
    }
    /// Overall `[start, stop)` span covered by Self
    pub fn span(&self) -> Option<(Epoch, Epoch)> {
        self.timeline.span()
    }
}

impl Trackable for SatelliteTrack {
    fn covers(&self, t: Epoch) -> bool {
        self.timeline.covers(t)
    }
    /// Authoritative position at `t`, always obtained by direct propagation
    fn position_at(&self, t: Epoch) -> Result<GeodeticPoint, Error> {
        self.element_set(t)?.position_at(t)
    }
}

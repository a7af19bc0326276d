use hifitime::{Duration, Unit};
use std::str::FromStr;

use crate::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

/// Horizon limited look distance [km], applied uniformly to every satellite.
pub const DEFAULT_VISIBILITY_RANGE_KM: f64 = 10018.0;

/// Number of render samples per element set interval.
pub const DEFAULT_SAMPLES_PER_INTERVAL: usize = 20;

/// Describes how element sets are turned into validity intervals,
/// once sorted chronologically.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub enum CoveragePolicy {
    /// Each element set is authoritative until the next epoch.
    /// The last element set opens no interval.
    #[default]
    Successor,
    /// Element set `i` is only paired with `i+1` while `i+1 < N-1`:
    /// the last two element sets contribute no coverage.
    Conservative,
    /// Same as [CoveragePolicy::Successor], and the last element set
    /// remains authoritative for the given horizon past its epoch.
    Extended(Duration),
}

impl std::fmt::Display for CoveragePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Successor => write!(f, "successor"),
            Self::Conservative => write!(f, "conservative"),
            Self::Extended(horizon) => write!(f, "extended({})", horizon),
        }
    }
}

impl std::str::FromStr for CoveragePolicy {
    type Err = Error;
    /// Parses "successor", "conservative" or "extended(<duration>)",
    /// the duration being described the way [Duration] displays itself.
    fn from_str(s: &str) -> Result<Self, Error> {
        let c = s.trim().to_lowercase();
        match c.as_str() {
            "successor" => Ok(Self::Successor),
            "conservative" => Ok(Self::Conservative),
            _ => {
                let horizon = c
                    .strip_prefix("extended(")
                    .and_then(|s| s.strip_suffix(')'))
                    .and_then(|s| Duration::from_str(s.trim()).ok())
                    .ok_or_else(|| Error::UnknownCoveragePolicy(c.clone()))?;
                Ok(Self::Extended(horizon))
            },
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Two points are in range when their surface distance [km]
    /// is strictly below this value.
    pub visibility_range_km: f64,
    /// Render samples generated for each element set interval.
    pub samples_per_interval: usize,
    /// Minimal simulated time between two visibility recomputations
    /// of the current selection.
    pub recompute_period: Duration,
    /// Timeline boundary policy
    pub coverage: CoveragePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            visibility_range_km: DEFAULT_VISIBILITY_RANGE_KM,
            samples_per_interval: DEFAULT_SAMPLES_PER_INTERVAL,
            recompute_period: 1.0 * Unit::Second,
            coverage: CoveragePolicy::default(),
        }
    }
}

impl Config {
    /// Returns a copy of Self using given [CoveragePolicy]
    pub fn with_coverage(&self, coverage: CoveragePolicy) -> Self {
        let mut s = self.clone();
        s.coverage = coverage;
        s
    }
    /// Returns a copy of Self using given visibility range [km]
    pub fn with_visibility_range_km(&self, range_km: f64) -> Self {
        let mut s = self.clone();
        s.visibility_range_km = range_km;
        s
    }
}

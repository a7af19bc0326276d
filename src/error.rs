use hifitime::Epoch;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Element lines could not be turned into a propagator state.
    #[error("{object_id}: malformed element set: {reason}")]
    MalformedElementSet { object_id: String, reason: String },
    /// No validity interval contains this instant.
    #[error("{id}: no coverage @{epoch}")]
    NoCoverage { id: String, epoch: Epoch },
    /// Fewer than 2 distinct reports.
    #[error("{vessel_id}: degenerate track ({reports} report(s))")]
    DegenerateTrack { vessel_id: String, reports: usize },
    /// Numerical failure in propagation, interpolation or distance calculation.
    #[error("geometry failure: {0}")]
    GeometryFailure(String),
    #[error("unknown entity \"{0}\"")]
    UnknownEntity(String),
    #[error("unknown coverage policy \"{0}\"")]
    UnknownCoveragePolicy(String),
}

pub mod position;

pub use position::SampledPositionFunction;

use hifitime::Epoch;

/// Linear weights `(w_before, w_after)` of `t` between two sampling instants.
pub(crate) fn linear_weights(before: Epoch, after: Epoch, t: Epoch) -> Option<(f64, f64)> {
    let dt = (after - before).to_seconds();
    if dt <= 0.0 || !dt.is_finite() {
        return None;
    }
    let w_after = (t - before).to_seconds() / dt;
    Some((1.0 - w_after, w_after))
}

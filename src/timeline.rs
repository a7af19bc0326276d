//! Validity intervals and timelines
use hifitime::Epoch;
use log::debug;

use crate::cfg::CoveragePolicy;

/// Half open time range `[start, stop)` during which
/// the payload is authoritative.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidityInterval<T> {
    /// First instant covered (included)
    pub start: Epoch,
    /// End of coverage (excluded)
    pub stop: Epoch,
    /// Authoritative data
    pub payload: T,
}

impl<T> ValidityInterval<T> {
    /// Builds new [ValidityInterval], returns None unless `start < stop`.
    pub fn new(start: Epoch, stop: Epoch, payload: T) -> Option<Self> {
        if start < stop {
            Some(Self {
                start,
                stop,
                payload,
            })
        } else {
            None
        }
    }
    /// True if `t` lies within `[start, stop)`
    pub fn contains(&self, t: Epoch) -> bool {
        self.start <= t && t < self.stop
    }
    /// Maps the payload, preserving the time range
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ValidityInterval<U> {
        ValidityInterval {
            start: self.start,
            stop: self.stop,
            payload: f(self.payload),
        }
    }
}

/// Ordered, pairwise disjoint sequence of [ValidityInterval]s.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<T> {
    intervals: Vec<ValidityInterval<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    /// Builds a [Timeline] from `(epoch, payload)` records, in any order.
    /// Records are sorted by epoch (stable on ties) and each record is bounded
    /// by its successor, as described by the [CoveragePolicy].
    /// Records sharing the same epoch would open an empty interval:
    /// the latest one (in input order) wins.
    pub fn build<I>(records: I, policy: CoveragePolicy) -> Self
    where
        I: IntoIterator<Item = (Epoch, T)>,
    {
        let mut records = records.into_iter().collect::<Vec<_>>();
        records.sort_by(|(a, _), (b, _)| a.cmp(b));

        let epochs = records.iter().map(|(t, _)| *t).collect::<Vec<_>>();
        let total = epochs.len();

        let mut intervals = Vec::<ValidityInterval<T>>::with_capacity(total);

        for (i, (start, payload)) in records.into_iter().enumerate() {
            let next = match policy {
                CoveragePolicy::Successor | CoveragePolicy::Extended(_) => epochs.get(i + 1),
                CoveragePolicy::Conservative => {
                    if i + 1 < total.saturating_sub(1) {
                        epochs.get(i + 1)
                    } else {
                        None
                    }
                },
            };

            let stop = match (next, policy) {
                (Some(next), _) => *next,
                (None, CoveragePolicy::Extended(horizon)) => start + horizon,
                (None, _) => {
                    debug!("{:?} - no successor: no coverage", start);
                    continue;
                },
            };

            match ValidityInterval::new(start, stop, payload) {
                Some(interval) => intervals.push(interval),
                None => debug!("{:?} - empty interval (superseded)", start),
            }
        }

        Self { intervals }
    }
    /// Returns the interval containing `t`, if any.
    pub fn interval(&self, t: Epoch) -> Option<&ValidityInterval<T>> {
        let idx = self.intervals.partition_point(|iv| iv.start <= t);
        let candidate = self.intervals.get(idx.checked_sub(1)?)?;
        if candidate.contains(t) {
            Some(candidate)
        } else {
            None
        }
    }
    /// Returns the payload valid at `t`, or None when `t` is not covered:
    /// before the first epoch, past the last interval, or within a gap.
    pub fn lookup(&self, t: Epoch) -> Option<&T> {
        self.interval(t).map(|iv| &iv.payload)
    }
    /// True if some interval contains `t`
    pub fn covers(&self, t: Epoch) -> bool {
        self.interval(t).is_some()
    }
    /// Overall `[start, stop)` span covered by Self
    pub fn span(&self) -> Option<(Epoch, Epoch)> {
        let first = self.intervals.first()?;
        let last = self.intervals.last()?;
        Some((first.start, last.stop))
    }
    pub fn len(&self) -> usize {
        self.intervals.len()
    }
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &ValidityInterval<T>> {
        self.intervals.iter()
    }
    /// Converts each payload, preserving the intervals
    pub fn map<U, F: FnMut(&ValidityInterval<T>) -> U>(&self, mut f: F) -> Timeline<U> {
        Timeline {
            intervals: self
                .intervals
                .iter()
                .map(|iv| ValidityInterval {
                    start: iv.start,
                    stop: iv.stop,
                    payload: f(iv),
                })
                .collect(),
        }
    }
    /// Same as [Timeline::map] for fallible conversions:
    /// intervals for which `f` returns None are dropped.
    pub fn filter_map<U, F: FnMut(&ValidityInterval<T>) -> Option<U>>(
        &self,
        mut f: F,
    ) -> Timeline<U> {
        Timeline {
            intervals: self
                .intervals
                .iter()
                .filter_map(|iv| {
                    f(iv).map(|payload| ValidityInterval {
                        start: iv.start,
                        stop: iv.stop,
                        payload,
                    })
                })
                .collect(),
        }
    }
}

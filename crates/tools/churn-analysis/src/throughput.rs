//! Churn phase throughput.
//!
//! Batches record `num_ops` and `duration` in nanoseconds, so
//! `num_ops / duration * 1000` is operations per microsecond.

use std::collections::BTreeMap;

use churn_data::ThroughputSample;
use serde::Serialize;

/// Nanoseconds per microsecond.
const NS_PER_US: f64 = 1000.0;

/// Throughput of one churn cycle, summed over its selected batches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleThroughput {
    /// Churn cycle.
    pub churn_cycle: u64,
    /// Total operations in the cycle.
    pub num_ops: f64,
    /// Total duration in nanoseconds.
    pub duration: f64,
    /// Operations per microsecond.
    pub thrput: f64,
}

/// Batches whose operation kind is one of `ops`.
pub fn select<'a, S: AsRef<str>>(
    samples: &'a [ThroughputSample],
    ops: &[S],
) -> Vec<&'a ThroughputSample> {
    samples
        .iter()
        .filter(|s| ops.iter().any(|op| op.as_ref() == s.op))
        .collect()
}

/// Overall throughput: total operations over total time.
///
/// Returns `None` for an empty selection or zero total duration.
pub fn overall(samples: &[&ThroughputSample]) -> Option<f64> {
    let num_ops: f64 = samples.iter().map(|s| s.num_ops).sum();
    let duration: f64 = samples.iter().map(|s| s.duration).sum();
    ratio(num_ops, duration)
}

/// Throughput per churn cycle, ascending by cycle.
///
/// Cycles whose summed duration is zero are dropped.
pub fn per_cycle(samples: &[&ThroughputSample]) -> Vec<CycleThroughput> {
    let mut cycles: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
    for s in samples {
        let entry = cycles.entry(s.churn_cycle).or_default();
        entry.0 += s.num_ops;
        entry.1 += s.duration;
    }

    cycles
        .into_iter()
        .filter_map(|(churn_cycle, (num_ops, duration))| {
            ratio(num_ops, duration).map(|thrput| CycleThroughput {
                churn_cycle,
                num_ops,
                duration,
                thrput,
            })
        })
        .collect()
}

/// Per-batch throughput against batch end time in seconds.
#[allow(clippy::cast_precision_loss)]
pub fn over_time(samples: &[&ThroughputSample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .filter_map(|s| ratio(s.num_ops, s.duration).map(|t| (s.ts as f64 / 1e9, t)))
        .collect()
}

fn ratio(num_ops: f64, duration: f64) -> Option<f64> {
    (duration > 0.0).then(|| num_ops / duration * NS_PER_US)
}

//! Tombstone counts and ratios per churn cycle.

use churn_data::MetadataSample;

/// `(churn_cycle, tombstones)` per metadata row.
#[allow(clippy::cast_precision_loss)]
pub fn counts(samples: &[MetadataSample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .map(|s| (s.churn_cycle as f64, s.tombstones as f64))
        .collect()
}

/// `(churn_cycle, tombstones / (tombstones + occupied))` per metadata row.
///
/// Rows for an empty table have no defined ratio and are dropped.
#[allow(clippy::cast_precision_loss)]
pub fn ratios(samples: &[MetadataSample]) -> Vec<(f64, f64)> {
    samples
        .iter()
        .filter_map(|s| {
            let used = s.tombstones + s.occupied;
            (used > 0).then(|| (s.churn_cycle as f64, s.tombstones as f64 / used as f64))
        })
        .collect()
}

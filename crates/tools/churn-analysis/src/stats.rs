//! Descriptive statistics for latency samples.

use serde::Serialize;

/// Linear-interpolated percentile of sorted data, `q` in `[0, 1]`.
///
/// Returns `None` for empty input.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn percentile(sorted: &[f64], q: f64) -> Option<f64> {
    let (&first, &last) = (sorted.first()?, sorted.last()?);
    if q <= 0.0 {
        return Some(first);
    }
    if q >= 1.0 {
        return Some(last);
    }
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Summary in the shape of a dataframe `describe()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation; `NaN` for fewer than two samples.
    pub std: f64,
    /// Smallest sample.
    pub min: f64,
    /// `(q, value)` for each requested percentile.
    pub percentiles: Vec<(f64, f64)>,
    /// Largest sample.
    pub max: f64,
}

impl Summary {
    /// Describe `values`. Returns `None` if there are none.
    #[allow(clippy::cast_precision_loss)]
    pub fn describe(values: &[f64], percentiles: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            var.sqrt()
        } else {
            f64::NAN
        };

        let percentiles = percentiles
            .iter()
            .filter_map(|&q| percentile(&sorted, q).map(|v| (q, v)))
            .collect();

        Some(Self {
            count: n,
            mean,
            std,
            min: sorted[0],
            percentiles,
            max: sorted[n - 1],
        })
    }
}

/// Percentile row label: `0.5` → `50%`, `0.9999` → `99.99%`.
pub fn percentile_label(q: f64) -> String {
    let pct = format!("{:.4}", q * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{pct}%")
}

/// Box plot statistics with whiskers at 1.5 × IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    /// Lower whisker: smallest sample not below `q1 - 1.5 * iqr`.
    pub whisker_lo: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Upper whisker: largest sample not above `q3 + 1.5 * iqr`.
    pub whisker_hi: f64,
    /// Samples outside the whiskers.
    pub fliers: Vec<f64>,
}

impl BoxStats {
    /// Compute box statistics. Returns `None` for empty input.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = percentile(&sorted, 0.25)?;
        let median = percentile(&sorted, 0.5)?;
        let q3 = percentile(&sorted, 0.75)?;
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let whisker_lo = sorted
            .iter()
            .copied()
            .find(|&v| v >= lo_fence)
            .map_or(q1, |v| v.min(q1));
        let whisker_hi = sorted
            .iter()
            .copied()
            .rev()
            .find(|&v| v <= hi_fence)
            .map_or(q3, |v| v.max(q3));
        let fliers = sorted
            .iter()
            .copied()
            .filter(|&v| v < whisker_lo || v > whisker_hi)
            .collect();

        Some(Self {
            whisker_lo,
            q1,
            median,
            q3,
            whisker_hi,
            fliers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&data, 0.5), Some(2.5));
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 1.0), Some(4.0));
        assert!((percentile(&data, 0.9).unwrap() - 3.7).abs() < 1e-12);
        assert_eq!(percentile(&[], 0.5), None);
    }

    #[test]
    fn describe_matches_dataframe_semantics() {
        let s = Summary::describe(&[4.0, 1.0, 3.0, 2.0], &[0.5, 0.9]).unwrap();
        assert_eq!(s.count, 4);
        assert_eq!(s.mean, 2.5);
        assert!((s.std - 1.290_994_448_7).abs() < 1e-9);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 4.0);
        assert_eq!(s.percentiles[0], (0.5, 2.5));
    }

    #[test]
    fn describe_single_value() {
        let s = Summary::describe(&[7.0], &[0.99]).unwrap();
        assert!(s.std.is_nan());
        assert_eq!(s.percentiles, vec![(0.99, 7.0)]);
        assert!(Summary::describe(&[], &[0.5]).is_none());
    }

    #[test]
    fn percentile_labels() {
        assert_eq!(percentile_label(0.5), "50%");
        assert_eq!(percentile_label(0.9), "90%");
        assert_eq!(percentile_label(0.99), "99%");
        assert_eq!(percentile_label(0.9999), "99.99%");
        assert_eq!(percentile_label(0.125), "12.5%");
    }

    #[test]
    fn box_stats_whiskers_and_fliers() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
        let b = BoxStats::compute(&values).unwrap();
        assert_eq!(b.q1, 3.0);
        assert_eq!(b.median, 5.0);
        assert_eq!(b.q3, 7.0);
        assert_eq!(b.whisker_lo, 1.0);
        assert_eq!(b.whisker_hi, 8.0);
        assert_eq!(b.fliers, vec![100.0]);
    }

    #[test]
    fn box_stats_constant_data() {
        let b = BoxStats::compute(&[5.0; 4]).unwrap();
        assert_eq!((b.whisker_lo, b.q1, b.median, b.q3, b.whisker_hi), (5.0, 5.0, 5.0, 5.0, 5.0));
        assert!(b.fliers.is_empty());
        assert!(BoxStats::compute(&[]).is_none());
    }
}

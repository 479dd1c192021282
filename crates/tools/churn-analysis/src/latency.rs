//! Per-operation latency summaries and their LaTeX table.

use churn_data::LatencySample;

use crate::humanize;
use crate::latex::{Align, LatexTable};
use crate::stats::{Summary, percentile_label};

/// Percentiles reported by default.
pub const DEFAULT_PERCENTILES: [f64; 4] = [0.5, 0.9, 0.99, 0.9999];

/// Latencies (ns) of the samples for `op`.
#[allow(clippy::cast_precision_loss)]
pub fn latencies(samples: &[LatencySample], op: &str) -> Vec<f64> {
    samples
        .iter()
        .filter(|s| s.op == op)
        .map(|s| s.latency as f64)
        .collect()
}

/// Summarize the latencies of `op`; `None` if the op was never sampled.
pub fn summarize(samples: &[LatencySample], op: &str, percentiles: &[f64]) -> Option<Summary> {
    Summary::describe(&latencies(samples, op), percentiles)
}

/// Build the latency table for one op: a column per variant, a row per
/// statistic, durations humanized.
pub fn latency_table(columns: &[(String, Summary)]) -> LatexTable {
    let mut table = columns
        .iter()
        .fold(LatexTable::new(), |t, (name, _)| t.column(name.clone(), Align::Left));

    let Some((_, first)) = columns.first() else {
        return table;
    };

    table.push_row("count", columns.iter().map(|(_, s)| s.count.to_string()).collect());
    table.push_row("mean", cells(columns, |s| s.mean));
    table.push_row("std", cells(columns, |s| s.std));
    table.push_row("min", cells(columns, |s| s.min));
    for (i, &(q, _)) in first.percentiles.iter().enumerate() {
        table.push_row(
            percentile_label(q),
            cells(columns, |s| s.percentiles.get(i).map_or(f64::NAN, |p| p.1)),
        );
    }
    table.push_row("max", cells(columns, |s| s.max));
    table
}

fn cells(columns: &[(String, Summary)], stat: impl Fn(&Summary) -> f64) -> Vec<String> {
    columns
        .iter()
        .map(|(_, s)| {
            let v = stat(s);
            if v.is_nan() {
                "-".to_string()
            } else {
                humanize::nanoseconds(v)
            }
        })
        .collect()
}

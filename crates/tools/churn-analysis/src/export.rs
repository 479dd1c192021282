//! CSV exports of the data behind the charts.
//!
//! Each file starts with an index column, so it can be loaded back with the
//! first column as the row index.

use anyhow::{Context, Result};
use churn_data::{Distribution, LoadPoint};
use log::debug;
use std::path::Path;

use crate::throughput::CycleThroughput;

/// Write per-cycle throughput, indexed by churn cycle.
pub fn write_cycle_throughput(path: &Path, cycles: &[CycleThroughput]) -> Result<()> {
    write(path, |w| {
        w.write_record(["churn_cycle", "num_ops", "duration", "thrput"])?;
        for c in cycles {
            w.write_record([
                c.churn_cycle.to_string(),
                float(c.num_ops),
                float(c.duration),
                float(c.thrput),
            ])?;
        }
        Ok(())
    })
}

/// Write a distribution sorted by key, indexed by original row.
pub fn write_distribution(path: &Path, dist: &Distribution) -> Result<()> {
    let mut rows: Vec<(usize, (f64, f64))> = dist.points.iter().copied().enumerate().collect();
    rows.sort_by(|a, b| a.1.0.total_cmp(&b.1.0));

    write(path, |w| {
        w.write_record(["", dist.key.as_str(), dist.value.as_str()])?;
        for (idx, (key, value)) in rows {
            w.write_record([idx.to_string(), float(key), float(value)])?;
        }
        Ok(())
    })
}

/// Write load phase points.
pub fn write_load(path: &Path, points: &[LoadPoint]) -> Result<()> {
    write(path, |w| {
        w.write_record(["", "x_0", "y_0"])?;
        for (idx, p) in points.iter().enumerate() {
            w.write_record([idx.to_string(), float(p.x), float(p.y)])?;
        }
        Ok(())
    })
}

fn write(
    path: &Path,
    body: impl FnOnce(&mut csv::Writer<std::fs::File>) -> csv::Result<()>,
) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    body(&mut writer).with_context(|| format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("writing {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Integral values print without a fractional part (`2000`); everything
/// else uses the shortest round-trip representation.
#[allow(clippy::float_cmp)]
fn float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:?}")
    }
}

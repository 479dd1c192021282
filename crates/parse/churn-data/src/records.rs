//! Typed records for each harness result file.

use anyhow::{Context, Result, bail};
use std::path::Path;

use crate::table::Table;

/// One load phase measurement from `load.txt`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadPoint {
    /// Progress through the load phase.
    pub x: f64,
    /// Throughput over the interval.
    pub y: f64,
}

/// One churn batch from `churn_thrput.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputSample {
    /// Churn cycle the batch belongs to.
    pub churn_cycle: u64,
    /// End of the batch, nanoseconds since the start of the churn phase.
    pub ts: u64,
    /// Operations executed in the batch.
    pub num_ops: f64,
    /// Batch duration in nanoseconds.
    pub duration: f64,
    /// Operation kind (`INSERT`, `DELETE`, `LOOKUP`, `MIXED`).
    pub op: String,
}

/// One sampled operation from `churn_latency.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct LatencySample {
    /// Operation kind.
    pub op: String,
    /// Latency in nanoseconds.
    pub latency: u64,
}

/// Occupancy after a churn cycle, from `churn_metadata.txt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataSample {
    /// Churn cycle.
    pub churn_cycle: u64,
    /// Nanoseconds since the start of the churn phase.
    pub ts: u64,
    /// Occupied slots.
    pub occupied: u64,
    /// Tombstoned slots.
    pub tombstones: u64,
}

/// A two-column distribution such as `cluster_len.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    /// Name of the key column (first column).
    pub key: String,
    /// Name of the value column (second column).
    pub value: String,
    /// `(key, value)` pairs in file order.
    pub points: Vec<(f64, f64)>,
}

impl Distribution {
    /// Points sorted by key.
    pub fn sorted(&self) -> Vec<(f64, f64)> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }
}

/// Read `load.txt`.
pub fn read_load(path: &Path) -> Result<Vec<LoadPoint>> {
    let table = Table::read(path)?;
    if table.is_empty() {
        return Ok(Vec::new());
    }
    in_file(path, || {
        let xs = table.column("x_0")?.f64s()?;
        let ys = table.column("y_0")?.f64s()?;
        Ok(xs.into_iter().zip(ys).map(|(x, y)| LoadPoint { x, y }).collect())
    })
}

/// Read `churn_thrput.txt`.
pub fn read_throughput(path: &Path) -> Result<Vec<ThroughputSample>> {
    let table = Table::read(path)?;
    if table.is_empty() {
        return Ok(Vec::new());
    }
    in_file(path, || {
        let cycles = table.column("churn_cycle")?.u64s()?;
        let ts = table.column("ts")?.u64s()?;
        let num_ops = table.column("num_ops")?.f64s()?;
        let durations = table.column("duration")?.f64s()?;
        let ops = table.column("op")?.strs();

        Ok(cycles
            .into_iter()
            .zip(ts)
            .zip(num_ops)
            .zip(durations)
            .zip(ops)
            .map(|((((churn_cycle, ts), num_ops), duration), op)| ThroughputSample {
                churn_cycle,
                ts,
                num_ops,
                duration,
                op: op.to_string(),
            })
            .collect())
    })
}

/// Read `churn_latency.txt`.
pub fn read_latency(path: &Path) -> Result<Vec<LatencySample>> {
    let table = Table::read(path)?;
    if table.is_empty() {
        return Ok(Vec::new());
    }
    in_file(path, || {
        let ops = table.column("op")?.strs();
        let latencies = table.column("latency")?.u64s()?;
        Ok(ops
            .zip(latencies)
            .map(|(op, latency)| LatencySample {
                op: op.to_string(),
                latency,
            })
            .collect())
    })
}

/// Read `churn_metadata.txt`. The harness leaves it empty when no cycle
/// completed.
pub fn read_metadata(path: &Path) -> Result<Vec<MetadataSample>> {
    let table = Table::read(path)?;
    if table.is_empty() {
        return Ok(Vec::new());
    }
    in_file(path, || {
        let cycles = table.column("churn_cycle")?.u64s()?;
        let ts = table.column("ts")?.u64s()?;
        let occupied = table.column("occupied")?.u64s()?;
        let tombstones = table.column("tombstones")?.u64s()?;
        Ok(cycles
            .into_iter()
            .zip(ts)
            .zip(occupied)
            .zip(tombstones)
            .map(|(((churn_cycle, ts), occupied), tombstones)| MetadataSample {
                churn_cycle,
                ts,
                occupied,
                tombstones,
            })
            .collect())
    })
}

/// Read a two-column distribution file. Column names are taken from the
/// header; any columns past the second are ignored.
pub fn read_distribution(path: &Path) -> Result<Option<Distribution>> {
    let table = Table::read(path)?;
    if table.is_empty() {
        return Ok(None);
    }
    in_file(path, || {
        let (Some(key), Some(value)) = (table.column_at(0), table.column_at(1)) else {
            bail!("expected two columns, found {}", table.columns().len());
        };
        let keys = key.f64s()?;
        let values = value.f64s()?;
        Ok(Some(Distribution {
            key: key.name().to_string(),
            value: value.name().to_string(),
            points: keys.into_iter().zip(values).collect(),
        }))
    })
}

fn in_file<T>(path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    f().with_context(|| format!("parsing {}", path.display()))
}

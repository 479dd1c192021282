//! Analysis of `hm_churn` benchmark results.
//!
//! Turns the typed records from `churn-data` into the numbers behind each
//! chart and table: per-cycle throughput, tombstone ratios, latency
//! summaries, box plot statistics, memory efficiency. Also renders LaTeX
//! tables, CSV exports and a terminal summary.

pub mod export;
pub mod humanize;
pub mod latency;
pub mod latex;
pub mod memory;
pub mod stats;
pub mod summary;
pub mod throughput;
pub mod tombstone;

//! Readers for the result files written by the `hm_churn` benchmark harness.
//!
//! A benchmark run is a directory with one subdirectory per tested hash map
//! variant. Each variant directory holds whitespace-delimited text tables
//! (`load.txt`, `churn_thrput.txt`, ...) plus a headerless `test_params.txt`.
//! This crate discovers the variants, parses the tables by column name, and
//! turns them into typed records.

pub mod params;
pub mod records;
pub mod run;
pub mod table;

pub use params::TestParams;
pub use records::{
    Distribution, LatencySample, LoadPoint, MetadataSample, ThroughputSample,
};
pub use run::{DataFile, RunDir, Variant};
pub use table::{Column, Table};

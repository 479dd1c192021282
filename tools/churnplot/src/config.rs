//! Report configuration.
//!
//! Loaded from `churnplot.toml`, either given with `--config` or found in the
//! run directory. Every key has a default, so an absent file means "render
//! the standard report".

use anyhow::{Context, Result, ensure};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use churn_analysis::latency::DEFAULT_PERCENTILES;

/// Name of the configuration file looked up in the run directory.
pub const CONFIG_FILE: &str = "churnplot.toml";

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub charts: ChartsConfig,
    #[serde(default = "default_throughput_groups")]
    pub throughput: Vec<ThroughputGroup>,
    #[serde(default)]
    pub latency: LatencyConfig,
    #[serde(default)]
    pub distributions: DistributionsConfig,
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            charts: ChartsConfig::default(),
            throughput: default_throughput_groups(),
            latency: LatencyConfig::default(),
            distributions: DistributionsConfig::default(),
            memory: MemoryConfig::default(),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Root for CSV and LaTeX output; files land in `<csv-root>/<run path>/`.
    #[serde(default = "default_csv_root", rename = "csv-root")]
    pub csv_root: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_root: default_csv_root(),
        }
    }
}

fn default_csv_root() -> PathBuf {
    PathBuf::from("csv")
}

/// `[charts]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartsConfig {
    /// Default chart width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Default chart height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
    /// Also plot per-batch throughput against wall time.
    #[serde(default, rename = "time-series")]
    pub time_series: bool,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            time_series: false,
        }
    }
}

fn default_width() -> u32 {
    1000
}
fn default_height() -> u32 {
    600
}

/// A `[[throughput]]` entry: one churn throughput chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThroughputGroup {
    /// Chart name, used in the title and file names.
    pub name: String,
    /// Operation kinds aggregated into the chart.
    pub ops: Vec<String>,
    /// Export per-cycle throughput as CSV.
    #[serde(default)]
    pub csv: bool,
}

impl ThroughputGroup {
    fn new(name: &str, ops: &[&str], csv: bool) -> Self {
        Self {
            name: name.into(),
            ops: ops.iter().map(|s| (*s).to_string()).collect(),
            csv,
        }
    }
}

fn default_throughput_groups() -> Vec<ThroughputGroup> {
    vec![
        ThroughputGroup::new("DELETE", &["DELETE"], false),
        ThroughputGroup::new("INSERT", &["INSERT"], false),
        ThroughputGroup::new("LOOKUP", &["LOOKUP"], false),
        ThroughputGroup::new("OVERALL", &["INSERT", "DELETE", "LOOKUP"], true),
        ThroughputGroup::new("OVERALL_NO_LOOKUP", &["INSERT", "DELETE"], false),
        ThroughputGroup::new("MIXED", &["MIXED"], true),
    ]
}

/// `[latency]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatencyConfig {
    /// Ops with a LaTeX latency table.
    #[serde(default = "default_table_ops", rename = "table-ops")]
    pub table_ops: Vec<String>,
    /// Ops with a latency box plot.
    #[serde(default = "default_boxplot_ops", rename = "boxplot-ops")]
    pub boxplot_ops: Vec<String>,
    /// Percentiles reported in the tables, in (0, 1).
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<f64>,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            table_ops: default_table_ops(),
            boxplot_ops: default_boxplot_ops(),
            percentiles: default_percentiles(),
        }
    }
}

fn default_table_ops() -> Vec<String> {
    ["DELETE", "INSERT", "LOOKUP"].map(String::from).to_vec()
}
fn default_boxplot_ops() -> Vec<String> {
    ["DELETE", "INSERT", "LOOKUP", "MIXED"].map(String::from).to_vec()
}
fn default_percentiles() -> Vec<f64> {
    DEFAULT_PERCENTILES.to_vec()
}

/// `[distributions]` section.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistributionsConfig {
    /// Distribution files (without `.txt`) to plot.
    #[serde(default = "default_metrics")]
    pub metrics: Vec<String>,
}

impl Default for DistributionsConfig {
    fn default() -> Self {
        Self {
            metrics: default_metrics(),
        }
    }
}

fn default_metrics() -> Vec<String> {
    ["home_slot_dist", "tombstone_dist", "cluster_len"].map(String::from).to_vec()
}

/// `[memory]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Ideal payload in bytes for the space efficiency column. Derived from
    /// the test parameters when unset.
    #[serde(default, rename = "payload-bytes")]
    pub payload_bytes: Option<f64>,
}

impl ReportConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn parse(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("parsing configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Load the configuration for a run.
    ///
    /// An explicit path must exist. Without one, `<run_dir>/churnplot.toml`
    /// is used if present, defaults otherwise.
    pub fn load(explicit: Option<&Path>, run_dir: &Path) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = run_dir.join(CONFIG_FILE);
                if !candidate.is_file() {
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("loading {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.charts.width > 0 && self.charts.height > 0,
            "chart dimensions must be non-zero"
        );

        let mut names = BTreeSet::new();
        for group in &self.throughput {
            ensure!(
                !group.ops.is_empty(),
                "throughput group '{}' has no ops",
                group.name
            );
            ensure!(
                names.insert(group.name.as_str()),
                "duplicate throughput group '{}'",
                group.name
            );
        }

        for &q in &self.latency.percentiles {
            ensure!(q > 0.0 && q < 1.0, "percentile {q} outside (0, 1)");
        }

        if let Some(payload) = self.memory.payload_bytes {
            ensure!(payload > 0.0, "payload-bytes must be positive");
        }
        Ok(())
    }
}

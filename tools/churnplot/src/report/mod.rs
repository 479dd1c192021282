//! Report pipeline.
//!
//! A `Report` holds the inputs shared by every stage (run directory, config,
//! caption, output directories) and runs the stages in order:
//!
//! load phase → distributions → churn throughput → tombstones → latency →
//! memory
//!
//! Images go into the run directory; CSV and LaTeX files go into
//! `<csv-root>/<run path>/`. Stages never fail because an input is missing:
//! the affected variant is skipped. A chart that fails to render is logged
//! and counted, and the remaining charts are still produced.

mod churn;
mod distribution;
mod latency;
mod load;
mod memory;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

use churn_analysis::summary::{RunSummary, VariantSummary};
use churn_data::{RunDir, TestParams};

use crate::config::ReportConfig;
use crate::plot::Frame;
use crate::verbose::Timer;

/// Which outputs to produce.
#[derive(Debug, Clone, Copy)]
pub struct Outputs {
    /// Render PNG charts.
    pub plots: bool,
    /// Write LaTeX tables.
    pub tables: bool,
}

/// Result of a completed report.
#[derive(Debug)]
pub struct Outcome {
    /// Headline numbers gathered while rendering.
    pub summary: RunSummary,
    /// Charts that failed to render.
    pub failed_charts: usize,
}

/// Shared state for one report over one run directory.
pub struct Report<'a> {
    run: &'a RunDir,
    config: &'a ReportConfig,
    outputs: Outputs,
    params: Option<TestParams>,
    csv_dir: PathBuf,
    summary: RunSummary,
    failed_charts: usize,
}

impl<'a> Report<'a> {
    /// Prepare a report: read the run parameters and create the CSV directory.
    pub fn new(run: &'a RunDir, config: &'a ReportConfig, outputs: Outputs) -> Result<Self> {
        let params = run.params()?;
        if params.is_none() {
            warn!("no test_params.txt in any variant; charts will have no caption");
        }

        let csv_dir = config.output.csv_root.join(run.table_subdir());
        std::fs::create_dir_all(&csv_dir)
            .with_context(|| format!("creating {}", csv_dir.display()))?;

        let summary = RunSummary {
            run: run.name(),
            variants: run
                .variants
                .iter()
                .map(|v| VariantSummary {
                    name: v.name.clone(),
                    ..VariantSummary::default()
                })
                .collect(),
        };

        Ok(Self {
            run,
            config,
            outputs,
            params,
            csv_dir,
            summary,
            failed_charts: 0,
        })
    }

    /// Run every stage.
    pub fn run(mut self) -> Result<Outcome> {
        info!(
            "{}: {} variant(s), output in {}",
            self.run.root.display(),
            self.run.variants.len(),
            self.csv_dir.display()
        );

        {
            let _t = Timer::start("load phase");
            self.load_phase()?;
        }
        {
            let _t = Timer::start("distributions");
            self.distributions()?;
        }
        {
            let _t = Timer::start("churn throughput");
            self.churn_throughput()?;
        }
        {
            let _t = Timer::start("tombstones");
            self.tombstones()?;
        }
        {
            let _t = Timer::start("latency");
            self.latency()?;
        }
        {
            let _t = Timer::start("memory");
            self.memory()?;
        }

        Ok(Outcome {
            summary: self.summary,
            failed_charts: self.failed_charts,
        })
    }

    // =======================================================================
    // Helpers shared by the stages
    // =======================================================================

    /// Caption line under every chart, if the run has parameters.
    fn caption(&self) -> Option<String> {
        self.params.as_ref().map(TestParams::caption)
    }

    /// A frame at the configured size with the run caption.
    fn frame(&self, title: impl Into<String>) -> Frame {
        Frame::new(title)
            .size(self.config.charts.width, self.config.charts.height)
            .caption(self.caption().as_deref())
    }

    /// Path of an exported CSV or LaTeX file.
    fn table_path(&self, name: &str) -> PathBuf {
        self.csv_dir.join(name)
    }

    /// Summary entry for the variant at `idx`.
    fn variant_summary(&mut self, idx: usize) -> &mut VariantSummary {
        &mut self.summary.variants[idx]
    }

    /// Render an image into the run directory, unless plots are disabled.
    ///
    /// Failures are logged and counted, never propagated.
    fn render(&mut self, file_name: &str, draw: impl FnOnce(&Path) -> Result<()>) {
        if !self.outputs.plots {
            debug!("{file_name}: plots disabled");
            return;
        }
        let path = self.run.root.join(file_name);
        match draw(&path) {
            Ok(()) => debug!("wrote {}", path.display()),
            Err(err) => {
                warn!("{file_name}: {err:#}");
                self.failed_charts += 1;
            }
        }
    }

    /// Write a LaTeX table into the CSV directory.
    fn write_tex(&self, file_name: &str, text: &str) -> Result<()> {
        let path = self.table_path(file_name);
        std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

use anyhow::Result;
use log::{debug, info};

use churn_analysis::latency;
use churn_analysis::stats::Summary;
use churn_data::{DataFile, LatencySample, records};

use super::Report;
use crate::plot::BoxChart;

/// Width of one box in the grouped chart.
const GROUPED_BOX_WIDTH: u32 = 110;

impl Report<'_> {
    /// Latency box plots and LaTeX tables.
    pub(super) fn latency(&mut self) -> Result<()> {
        info!("latency");
        let mut runs: Vec<(usize, Vec<LatencySample>)> = Vec::new();
        for (idx, variant) in self.run.variants.iter().enumerate() {
            let Some(path) = variant.existing(&DataFile::ChurnLatency) else {
                continue;
            };
            let samples = records::read_latency(&path)?;
            if samples.is_empty() {
                debug!("{}: {} is empty", variant.name, DataFile::ChurnLatency);
                continue;
            }
            runs.push((idx, samples));
        }
        if runs.is_empty() {
            debug!("no latency samples");
            return Ok(());
        }

        self.latency_boxplots(&runs);
        self.latency_tables(&runs)
    }

    /// `plot_churn_latency_<op>.png` per op and `plot_churn_latency_grouped.png`.
    fn latency_boxplots(&mut self, runs: &[(usize, Vec<LatencySample>)]) {
        let ops = self.config.latency.boxplot_ops.clone();
        let mut grouped = BoxChart::new(self.frame("Latencies").log_y());

        for op in &ops {
            let mut chart = BoxChart::new(self.frame(format!("{op} Latencies")).log_y());
            for (idx, samples) in runs {
                let name = &self.run.variants[*idx].name;
                let values = latency::latencies(samples, op);
                if !chart.push(name.as_str(), &values) {
                    debug!("{name}: no {op} latencies");
                    continue;
                }
                grouped.push(format!("{op}/{name}"), &values);
            }
            if chart.is_empty() {
                continue;
            }
            self.render(&format!("plot_churn_latency_{op}.png"), |path| chart.render(path));
        }

        if grouped.is_empty() {
            return;
        }
        #[allow(clippy::cast_possible_truncation)]
        let width = self
            .config
            .charts
            .width
            .max(GROUPED_BOX_WIDTH.saturating_mul(grouped.boxes.len() as u32));
        grouped.frame = grouped.frame.size(width, self.config.charts.height);
        self.render("plot_churn_latency_grouped.png", |path| grouped.render(path));
    }

    /// `<op>.tex` per table op; also fills the latency part of the summary.
    fn latency_tables(&mut self, runs: &[(usize, Vec<LatencySample>)]) -> Result<()> {
        let ops = self.config.latency.table_ops.clone();
        let percentiles = self.config.latency.percentiles.clone();

        for op in &ops {
            let mut columns: Vec<(String, Summary)> = Vec::new();
            for (idx, samples) in runs {
                let Some(summary) = latency::summarize(samples, op, &percentiles) else {
                    continue;
                };
                columns.push((self.run.variants[*idx].name.clone(), summary.clone()));
                self.variant_summary(*idx).latency.insert(op.clone(), summary);
            }

            if !self.outputs.tables {
                continue;
            }
            if columns.is_empty() {
                debug!("{op}: no latency samples, no table");
                continue;
            }
            self.write_tex(&format!("{op}.tex"), &latency::latency_table(&columns).render())?;
        }
        Ok(())
    }
}

use anyhow::Result;
use log::{debug, info};

use churn_analysis::memory::{self, MemoryRow};
use churn_data::{DataFile, TestParams};

use super::Report;
use crate::plot::BarChart;

impl Report<'_> {
    /// `mem.tex` (also printed) and `plot_memory_usage.png`.
    pub(super) fn memory(&mut self) -> Result<()> {
        info!("memory");
        let mut rows = Vec::new();
        for (idx, variant) in self.run.variants.iter().enumerate() {
            let Some(path) = variant.existing(&DataFile::TestParams) else {
                continue;
            };
            let params = TestParams::read(&path)?;
            rows.push((
                idx,
                MemoryRow {
                    variant: variant.name.clone(),
                    usage: params.memory_usage,
                },
            ));
        }
        if rows.is_empty() {
            debug!("no memory usage data");
            return Ok(());
        }
        for (idx, row) in &rows {
            self.variant_summary(*idx).memory_usage = Some(row.usage);
        }
        let rows: Vec<MemoryRow> = rows.into_iter().map(|(_, row)| row).collect();

        if self.outputs.tables {
            let payload = self
                .config
                .memory
                .payload_bytes
                .or_else(|| self.params.as_ref().map(TestParams::payload_bytes));
            match payload {
                Some(payload) => {
                    let table = memory::memory_table(&rows, payload).render();
                    println!("{table}");
                    self.write_tex("mem.tex", &table)?;
                }
                None => debug!("no payload size for the memory table"),
            }
        }

        let mut chart = BarChart::new(
            self.frame("Memory Usage")
                .y_label("Size (B)")
                .size(640, 480)
                .log_y(),
        );
        for row in &rows {
            #[allow(clippy::cast_precision_loss)]
            chart.push(row.variant.as_str(), row.usage as f64);
        }
        self.render("plot_memory_usage.png", |path| chart.render(path));
        Ok(())
    }
}

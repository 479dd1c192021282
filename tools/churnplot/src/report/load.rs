use anyhow::Result;
use log::{debug, info};

use churn_analysis::export;
use churn_data::{DataFile, records};

use super::Report;
use crate::plot::{Frame, LineChart, Series};

impl Report<'_> {
    /// Load phase throughput: `plot_insert.png` and `<v>_load_phase.csv`.
    pub(super) fn load_phase(&mut self) -> Result<()> {
        info!("load phase");
        let frame = Frame::new("LOAD PHASE")
            .x_label("percent of keys inserted")
            .y_label("throughput")
            .size(2000, 600)
            .caption(self.caption().as_deref());
        let mut chart = LineChart::new(frame).markers();

        for variant in &self.run.variants {
            let Some(path) = variant.existing(&DataFile::Load) else {
                continue;
            };
            let points = records::read_load(&path)?;
            if points.is_empty() {
                debug!("{}: {} is empty", variant.name, DataFile::Load);
                continue;
            }
            export::write_load(
                &self.table_path(&format!("{}_load_phase.csv", variant.name)),
                &points,
            )?;
            chart.push(Series::new(
                variant.name.as_str(),
                points.iter().map(|p| (p.x, p.y)).collect(),
            ));
        }

        if chart.is_empty() {
            debug!("no load phase data");
            return Ok(());
        }
        self.render("plot_insert.png", |path| chart.render(path));
        Ok(())
    }
}

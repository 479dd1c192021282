use anyhow::Result;
use log::{debug, info};

use churn_analysis::export;
use churn_data::{DataFile, records};

use super::Report;
use crate::plot::{Frame, LineChart, Series};

/// Total horizontal spread of the series, so that overlapping
/// distributions stay distinguishable.
const SHIFT_SPAN: f64 = 0.8;

impl Report<'_> {
    /// Distribution charts `plot_<metric>.png` and `<v>_<metric>.csv`.
    pub(super) fn distributions(&mut self) -> Result<()> {
        info!("distributions");
        let metrics = self.config.distributions.metrics.clone();
        for metric in &metrics {
            self.distribution(metric)?;
        }
        Ok(())
    }

    fn distribution(&mut self, metric: &str) -> Result<()> {
        let file = DataFile::Distribution(metric.to_string());

        let mut key_column = None;
        let mut plotted = Vec::new();
        for variant in &self.run.variants {
            let Some(path) = variant.existing(&file) else {
                continue;
            };
            let Some(dist) = records::read_distribution(&path)? else {
                debug!("{}: {file} is empty", variant.name);
                continue;
            };
            export::write_distribution(
                &self.table_path(&format!("{}_{metric}.csv", variant.name)),
                &dist,
            )?;
            plotted.push((variant.name.clone(), dist.sorted()));
            key_column.get_or_insert(dist.key);
        }
        let series = spread(plotted, self.run.variants.len());

        let Some(key_column) = key_column else {
            debug!("no {metric} data");
            return Ok(());
        };
        let frame = Frame::new(format!("{key_column} Distribution"))
            .x_label(key_column)
            .y_label("count")
            .size(self.config.charts.width, self.config.charts.height)
            .log_y();
        let mut chart = LineChart::new(frame);
        for s in series {
            chart.push(s);
        }
        if chart.is_empty() {
            debug!("{metric}: nothing to plot on a log axis");
            return Ok(());
        }
        self.render(&format!("plot_{metric}.png"), |path| chart.render(path));
        Ok(())
    }
}

/// Turn the plotted distributions into series, moving the n-th plotted one
/// left by `n * SHIFT_SPAN / variants`. Only plotted variants take a slot.
fn spread(plotted: Vec<(String, Vec<(f64, f64)>)>, variants: usize) -> Vec<Series> {
    #[allow(clippy::cast_precision_loss)]
    let step = SHIFT_SPAN / variants.max(1) as f64;
    plotted
        .into_iter()
        .enumerate()
        .map(|(slot, (name, points))| {
            #[allow(clippy::cast_precision_loss)]
            let shift = slot as f64 * step;
            Series::new(name, points.into_iter().map(|(x, y)| (x - shift, y)).collect())
        })
        .collect()
}

use anyhow::Result;
use log::{debug, info};

use churn_analysis::{export, throughput, tombstone};
use churn_data::{DataFile, MetadataSample, ThroughputSample, records};

use super::Report;
use crate::config::ThroughputGroup;
use crate::plot::{Frame, LineChart, Series};

impl Report<'_> {
    /// Churn throughput charts, one per configured group.
    pub(super) fn churn_throughput(&mut self) -> Result<()> {
        info!("churn throughput");
        let mut runs: Vec<(usize, Vec<ThroughputSample>)> = Vec::new();
        for (idx, variant) in self.run.variants.iter().enumerate() {
            let Some(path) = variant.existing(&DataFile::ChurnThroughput) else {
                continue;
            };
            runs.push((idx, records::read_throughput(&path)?));
        }

        let groups = self.config.throughput.clone();
        for group in &groups {
            self.throughput_group(group, &runs)?;
        }
        Ok(())
    }

    /// `plot_churn_<name>.png`, the optional time series chart and the
    /// optional `<v>_<name>_throughput.csv` exports for one group.
    fn throughput_group(
        &mut self,
        group: &ThroughputGroup,
        runs: &[(usize, Vec<ThroughputSample>)],
    ) -> Result<()> {
        let mut per_cycle = LineChart::new(
            self.frame(format!("CHURN PHASE {} Throughput", group.name))
                .x_label("test progression (churn_cycle)")
                .y_label("throughput (ops/usec)"),
        );
        let mut over_time = LineChart::new(
            self.frame(format!("CHURN PHASE {} Throughput", group.name))
                .x_label("test progression (sec)")
                .y_label("throughput (ops/usec)"),
        );

        for (idx, samples) in runs {
            let name = self.run.variants[*idx].name.clone();
            let selected = throughput::select(samples, group.ops.as_slice());
            if selected.is_empty() {
                debug!("{name}: no {} samples", group.name);
                continue;
            }

            let overall = throughput::overall(&selected);
            if let Some(t) = overall {
                self.variant_summary(*idx)
                    .throughput
                    .insert(group.name.clone(), t);
            }
            let label = match overall {
                Some(t) => format!("{name}: {t:.3}"),
                None => format!("{name}: -"),
            };

            let cycles = throughput::per_cycle(&selected);
            if group.csv {
                export::write_cycle_throughput(
                    &self.table_path(&format!("{name}_{}_throughput.csv", group.name)),
                    &cycles,
                )?;
            }
            #[allow(clippy::cast_precision_loss)]
            let points = cycles
                .iter()
                .map(|c| (c.churn_cycle as f64, c.thrput))
                .collect();
            per_cycle.push(Series::new(label.clone(), points));
            over_time.push(Series::new(label, throughput::over_time(&selected)));
        }

        if per_cycle.is_empty() {
            debug!("{}: nothing to plot", group.name);
            return Ok(());
        }
        self.render(&format!("plot_churn_{}.png", group.name), |path| {
            per_cycle.render(path)
        });
        if self.config.charts.time_series && !over_time.is_empty() {
            self.render(&format!("plot_churn_xtime_{}.png", group.name), |path| {
                over_time.render(path)
            });
        }
        Ok(())
    }

    /// Tombstone count and tombstone-to-occupied ratio per churn cycle.
    pub(super) fn tombstones(&mut self) -> Result<()> {
        info!("tombstones");
        let mut metadata: Vec<(String, Vec<MetadataSample>)> = Vec::new();
        for variant in &self.run.variants {
            let Some(path) = variant.existing(&DataFile::ChurnMetadata) else {
                continue;
            };
            let samples = records::read_metadata(&path)?;
            if samples.is_empty() {
                debug!("{}: {} is empty", variant.name, DataFile::ChurnMetadata);
                continue;
            }
            metadata.push((variant.name.clone(), samples));
        }
        if metadata.is_empty() {
            debug!("no churn metadata");
            return Ok(());
        }

        let (counts, ratios) = tombstone_charts(|title| self.frame(title), &metadata);

        self.render("plot_churn_tombstones.png", |path| counts.render(path));
        if ratios.is_empty() {
            debug!("no tombstone ratios: every cycle had an empty table");
        } else {
            self.render("plot_churn_tombstones_ratio.png", |path| ratios.render(path));
        }
        Ok(())
    }
}

/// Tombstone count and tombstone ratio charts, one series per variant.
fn tombstone_charts(
    frame: impl Fn(&str) -> Frame,
    metadata: &[(String, Vec<MetadataSample>)],
) -> (LineChart, LineChart) {
    let mut counts = LineChart::new(
        frame("CHURN Tombstone count")
            .x_label("churn cycle")
            .y_label("tombstone_count"),
    );
    let mut ratios = LineChart::new(
        frame("CHURN Tombstone to Occupied Ratio")
            .x_label("churn cycle")
            .y_label("tombstone ratio"),
    );
    for (name, samples) in metadata {
        counts.push(Series::new(name.as_str(), tombstone::counts(samples)));
        ratios.push(Series::new(name.as_str(), tombstone::ratios(samples)));
    }
    (counts, ratios)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(churn_cycle: u64, occupied: u64, tombstones: u64) -> MetadataSample {
        MetadataSample {
            churn_cycle,
            ts: churn_cycle * 1000,
            occupied,
            tombstones,
        }
    }

    #[test]
    fn ratio_chart_has_its_own_axis_label() {
        let metadata = vec![("graveyard".to_string(), vec![sample(0, 900, 100), sample(1, 0, 0)])];
        let (counts, ratios) = tombstone_charts(|title: &str| Frame::new(title), &metadata);
        assert_eq!(counts.frame.y_label, "tombstone_count");
        assert_eq!(ratios.frame.y_label, "tombstone ratio");
        assert_eq!(ratios.frame.title, "CHURN Tombstone to Occupied Ratio");
        assert_eq!(ratios.series[0].label, "graveyard");
        assert_eq!(ratios.series[0].points, vec![(0.0, 0.1)]);
        assert_eq!(counts.series[0].points.len(), 2);
    }
}

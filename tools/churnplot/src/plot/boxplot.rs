//! Box-and-whisker charts, one box per labelled sample set.

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use churn_analysis::stats::BoxStats;

use super::{Frame, Scale, color, draw_category_labels, draw_error};

const HALF_WIDTH: f64 = 0.3;
const CAP_HALF_WIDTH: f64 = 0.15;

/// A box plot chart.
#[derive(Debug, Clone)]
pub struct BoxChart {
    pub frame: Frame,
    pub boxes: Vec<(String, BoxStats)>,
}

impl BoxChart {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            boxes: Vec::new(),
        }
    }

    /// Add a box for `values`. Values the y axis cannot show are dropped
    /// first; returns false if nothing was left to plot.
    pub fn push(&mut self, label: impl Into<String>, values: &[f64]) -> bool {
        let scale = self.frame.y_scale;
        let kept: Vec<f64> = values
            .iter()
            .copied()
            .filter(|&v| scale.project(v).is_some())
            .collect();
        match BoxStats::compute(&kept) {
            Some(stats) => {
                self.boxes.push((label.into(), stats));
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Render the chart as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<()> {
        let frame = &self.frame;
        let scale = frame.y_scale;
        // Every value in a box was accepted by `push`, so projection succeeds.
        let p = |v: f64| scale.project(v).unwrap_or(f64::NAN);

        let y_range = scale.range(self.boxes.iter().flat_map(|(_, s)| {
            [p(s.whisker_lo), p(s.whisker_hi)]
                .into_iter()
                .chain(s.fliers.iter().map(|&f| p(f)))
        }));
        #[allow(clippy::cast_precision_loss)]
        let x_range = -0.5..(self.boxes.len() as f64 - 0.5);

        let root = BitMapBackend::new(path, frame.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        let area = frame.split_caption(&root)?;

        let mut chart = ChartBuilder::on(&area)
            .caption(&frame.title, ("sans-serif", 22).into_font())
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(75)
            .build_cartesian_2d(x_range, y_range.clone())
            .map_err(draw_error)?;

        let y_fmt = |v: &f64| scale.tick(*v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(0)
            .x_desc(frame.x_label.as_str())
            .y_desc(frame.y_label.as_str())
            .y_labels(scale.label_count(&y_range))
            .y_label_formatter(&y_fmt)
            .draw()
            .map_err(draw_error)?;

        for (idx, (_, stats)) in self.boxes.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let x = idx as f64;
            let c = color(idx);
            let (lo, q1, med, q3, hi) = (
                p(stats.whisker_lo),
                p(stats.q1),
                p(stats.median),
                p(stats.q3),
                p(stats.whisker_hi),
            );

            chart
                .draw_series([
                    Rectangle::new([(x - HALF_WIDTH, q3), (x + HALF_WIDTH, q1)], c.mix(0.35).filled()),
                    Rectangle::new([(x - HALF_WIDTH, q3), (x + HALF_WIDTH, q1)], BLACK.stroke_width(1)),
                ])
                .map_err(draw_error)?;

            let whiskers = [
                vec![(x, q3), (x, hi)],
                vec![(x, q1), (x, lo)],
                vec![(x - CAP_HALF_WIDTH, hi), (x + CAP_HALF_WIDTH, hi)],
                vec![(x - CAP_HALF_WIDTH, lo), (x + CAP_HALF_WIDTH, lo)],
            ];
            chart
                .draw_series(
                    whiskers
                        .into_iter()
                        .map(|path| PathElement::new(path, BLACK.stroke_width(1))),
                )
                .map_err(draw_error)?;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(x - HALF_WIDTH, med), (x + HALF_WIDTH, med)],
                    color(1).stroke_width(2),
                )))
                .map_err(draw_error)?;
            chart
                .draw_series(
                    stats
                        .fliers
                        .iter()
                        .map(|&f| Circle::new((x, p(f)), 2, BLACK.stroke_width(1))),
                )
                .map_err(draw_error)?;
        }

        let labels: Vec<&str> = self.boxes.iter().map(|(l, _)| l.as_str()).collect();
        draw_category_labels(&area, &chart, &labels, y_range.start)?;

        root.present()
            .map_err(draw_error)
            .map_err(|e| e.context(format!("writing {}", path.display())))
    }
}

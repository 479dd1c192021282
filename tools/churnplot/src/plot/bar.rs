//! Bar charts over named categories.

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::{Frame, color, draw_error, draw_category_labels};

/// One bar per category.
#[derive(Debug, Clone)]
pub struct BarChart {
    pub frame: Frame,
    pub bars: Vec<(String, f64)>,
}

impl BarChart {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            bars: Vec::new(),
        }
    }

    pub fn push(&mut self, label: impl Into<String>, value: f64) {
        self.bars.push((label.into(), value));
    }

    /// Render the chart as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<()> {
        let frame = &self.frame;
        let scale = frame.y_scale;
        let heights: Vec<Option<f64>> = self.bars.iter().map(|(_, v)| scale.project(*v)).collect();
        let y_range = match scale {
            // Bars grow from zero on a linear axis.
            super::Scale::Linear => scale.range(heights.iter().flatten().copied().chain([0.0])),
            super::Scale::Log => scale.range(heights.iter().flatten().copied()),
        };
        #[allow(clippy::cast_precision_loss)]
        let x_range = -0.5..(self.bars.len() as f64 - 0.5);

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

        let base = if scale == super::Scale::Linear { 0.0 } else { y_range.start };
        for (idx, height) in heights.iter().enumerate() {
            let Some(height) = *height else { continue };
            #[allow(clippy::cast_precision_loss)]
            let x = idx as f64;
            let c = color(idx);
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x - 0.35, base), (x + 0.35, height)],
                    c.filled(),
                )))
                .map_err(draw_error)?;
        }

        let labels: Vec<&str> = self.bars.iter().map(|(l, _)| l.as_str()).collect();
        draw_category_labels(&area, &chart, &labels, y_range.start)?;

        root.present()
            .map_err(draw_error)
            .map_err(|e| e.context(format!("writing {}", path.display())))
    }
}

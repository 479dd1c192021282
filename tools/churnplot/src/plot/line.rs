//! Line charts: one polyline per variant.

use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

use super::{Frame, color, draw_error};

/// One labelled polyline.
#[derive(Debug, Clone)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
        }
    }
}

/// A multi-series line chart.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub frame: Frame,
    pub series: Vec<Series>,
    /// Draw a dot at every data point.
    pub markers: bool,
}

impl LineChart {
    pub fn new(frame: Frame) -> Self {
        Self {
            frame,
            series: Vec::new(),
            markers: false,
        }
    }

    pub fn markers(mut self) -> Self {
        self.markers = true;
        self
    }

    pub fn push(&mut self, series: Series) {
        self.series.push(series);
    }

    /// True if no series has a drawable point.
    pub fn is_empty(&self) -> bool {
        self.projected().iter().all(|(_, pts)| pts.is_empty())
    }

    /// Series points mapped into axis space, dropping undrawable values.
    fn projected(&self) -> Vec<(&str, Vec<(f64, f64)>)> {
        let scale = self.frame.y_scale;
        self.series
            .iter()
            .map(|s| {
                let pts = s
                    .points
                    .iter()
                    .filter(|(x, _)| x.is_finite())
                    .filter_map(|&(x, y)| scale.project(y).map(|py| (x, py)))
                    .collect();
                (s.label.as_str(), pts)
            })
            .collect()
    }

    /// Render the chart as a PNG at `path`.
    pub fn render(&self, path: &Path) -> Result<()> {
        let frame = &self.frame;
        let projected = self.projected();
        let all = || projected.iter().flat_map(|(_, pts)| pts.iter());
        let x_range = super::Scale::Linear.range(all().map(|p| p.0));
        let y_range = frame.y_scale.range(all().map(|p| p.1));
        let y_labels = frame.y_scale.label_count(&y_range);

        let root = BitMapBackend::new(path, frame.size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        let area = frame.split_caption(&root)?;

        let mut chart = ChartBuilder::on(&area)
            .caption(&frame.title, ("sans-serif", 22).into_font())
            .margin(12)
            .x_label_area_size(45)
            .y_label_area_size(75)
            .build_cartesian_2d(x_range, y_range)
            .map_err(draw_error)?;

        let x_fmt = |v: &f64| super::tick(*v);
        let y_fmt = |v: &f64| frame.y_scale.tick(*v);
        chart
            .configure_mesh()
            .x_desc(frame.x_label.as_str())
            .y_desc(frame.y_label.as_str())
            .x_label_formatter(&x_fmt)
            .y_labels(y_labels)
            .y_label_formatter(&y_fmt)
            .draw()
            .map_err(draw_error)?;

        for (idx, (label, points)) in projected.iter().enumerate() {
            let c = color(idx);
            chart
                .draw_series(LineSeries::new(points.iter().copied(), c.stroke_width(2)))
                .map_err(draw_error)?
                .label(*label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], c.stroke_width(2)));
            if self.markers {
                chart
                    .draw_series(points.iter().map(|&p| Circle::new(p, 3, c.filled())))
                    .map_err(draw_error)?;
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(draw_error)?;

        root.present()
            .map_err(draw_error)
            .map_err(|e| e.context(format!("writing {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_scale_drops_zero_points() {
        let mut chart = LineChart::new(Frame::new("t").log_y());
        chart.push(Series::new("a", vec![(0.0, 0.0), (1.0, 10.0)]));
        let projected = chart.projected();
        assert_eq!(projected[0].1, vec![(1.0, 1.0)]);
        assert!(!chart.is_empty());
    }

    #[test]
    fn empty_when_nothing_drawable() {
        let mut chart = LineChart::new(Frame::new("t").log_y());
        assert!(chart.is_empty());
        chart.push(Series::new("a", vec![(0.0, 0.0), (f64::NAN, 3.0)]));
        assert!(chart.is_empty());
    }

    #[test]
    #[ignore = "needs system fonts"]
    fn renders_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("line.png");
        let mut chart = LineChart::new(
            Frame::new("CHURN PHASE OVERALL Throughput")
                .x_label("test progression (churn_cycle)")
                .caption(Some("q_bits=22, r_bits=10")),
        )
        .markers();
        chart.push(Series::new("a: 12.000", vec![(0.0, 10.0), (1.0, 14.0)]));
        chart.render(&path).unwrap();
        assert!(path.exists());
    }
}

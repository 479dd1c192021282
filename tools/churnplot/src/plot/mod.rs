//! PNG chart rendering.
//!
//! Each chart type is a plain data description (`LineChart`, `BarChart`,
//! `BoxChart`) built by the report stages and rendered with `plotters`.
//! Log-scale axes are drawn by plotting `log10(y)` on a linear axis and
//! labelling ticks with the original magnitude, so every chart shares one
//! coordinate type.

mod bar;
mod boxplot;
mod line;

pub use bar::BarChart;
pub use boxplot::BoxChart;
pub use line::{LineChart, Series};

use anyhow::Result;
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// Height of the strip reserved under the plot for the run caption.
const CAPTION_HEIGHT: u32 = 32;

/// Default series colors, in the usual order of a categorical palette.
const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

/// Series color for index `idx`, cycling through the palette.
fn color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Vertical axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

impl Scale {
    /// Map a data value to axis space. `None` if the value cannot be shown
    /// (non-finite, or non-positive on a log axis).
    pub fn project(self, v: f64) -> Option<f64> {
        match self {
            Self::Linear => v.is_finite().then_some(v),
            Self::Log => (v.is_finite() && v > 0.0).then(|| v.log10()),
        }
    }

    /// Axis range covering the projected values.
    fn range(self, projected: impl Iterator<Item = f64>) -> Range<f64> {
        let (lo, hi) = bounds(projected).unwrap_or((0.0, 1.0));
        match self {
            Self::Linear => pad(lo, hi),
            Self::Log => {
                let lo = lo.floor();
                let hi = hi.ceil();
                if hi > lo { lo..hi } else { lo..lo + 1.0 }
            }
        }
    }

    /// Tick label for an axis-space value. Log axes label whole decades only.
    fn tick(self, v: f64) -> String {
        match self {
            Self::Linear => tick(v),
            Self::Log if (v - v.round()).abs() > 1e-9 => String::new(),
            Self::Log => format!("{:.0e}", 10f64.powf(v)),
        }
    }

    /// Number of y labels to request for `range`: one per decade on a log axis.
    fn label_count(self, range: &Range<f64>) -> usize {
        match self {
            Self::Linear => 10,
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Self::Log => (range.end - range.start).round().max(1.0) as usize + 1,
        }
    }
}

/// Shared chart decorations.
#[derive(Debug, Clone)]
pub struct Frame {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub caption: Option<String>,
    pub size: (u32, u32),
    pub y_scale: Scale,
}

impl Frame {
    /// A 1000×600 linear chart with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            caption: None,
            size: (1000, 600),
            y_scale: Scale::Linear,
        }
    }

    pub fn x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = label.into();
        self
    }

    pub fn y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = label.into();
        self
    }

    pub fn caption(mut self, caption: Option<&str>) -> Self {
        self.caption = caption.map(str::to_string);
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn log_y(mut self) -> Self {
        self.y_scale = Scale::Log;
        self
    }

    /// Draw the caption strip (if any) and return the area left for the plot.
    fn split_caption<'a>(
        &self,
        root: &DrawingArea<BitMapBackend<'a>, Shift>,
    ) -> Result<DrawingArea<BitMapBackend<'a>, Shift>> {
        let Some(caption) = &self.caption else {
            return Ok(root.clone());
        };
        let (width, height) = root.dim_in_pixel();
        let (upper, lower) = root.split_vertically(px(height.saturating_sub(CAPTION_HEIGHT)));
        let style = TextStyle::from(("sans-serif", 15).into_font())
            .pos(Pos::new(HPos::Center, VPos::Center));
        lower
            .draw_text(caption, &style, (px(width) / 2, px(CAPTION_HEIGHT) / 2))
            .map_err(draw_error)?;
        Ok(upper)
    }
}

/// Convert a plotters error into an `anyhow` error.
fn draw_error<E: std::fmt::Display>(err: E) -> anyhow::Error {
    anyhow::anyhow!("drawing failed: {err}")
}

/// Write category names under a chart whose x axis has one slot per category
/// at 0, 1, 2, ...
fn draw_category_labels(
    area: &DrawingArea<BitMapBackend<'_>, Shift>,
    chart: &ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    labels: &[&str],
    y_bottom: f64,
) -> Result<()> {
    let style = TextStyle::from(("sans-serif", 14).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (idx, label) in labels.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let (x, y) = chart.backend_coord(&(idx as f64, y_bottom));
        area.draw_text(label, &style, (x, y + 6)).map_err(draw_error)?;
    }
    Ok(())
}

#[allow(clippy::cast_possible_wrap)]
fn px(v: u32) -> i32 {
    v.min(i32::MAX as u32) as i32
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Linear range with 5% headroom on both ends.
fn pad(lo: f64, hi: f64) -> Range<f64> {
    if hi > lo {
        let margin = (hi - lo) * 0.05;
        (lo - margin)..(hi + margin)
    } else {
        let margin = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
        (lo - margin)..(hi + margin)
    }
}

/// Compact tick label for a linear axis.
fn tick(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1e5 || (abs > 0.0 && abs < 1e-3) {
        format!("{v:.1e}")
    } else if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

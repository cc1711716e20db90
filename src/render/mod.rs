//! Drawing of finished charts.
//!
//! The pipeline describes what to draw as a [`Chart`] and hands it to a [`Renderer`].
//! [`SvgRenderer`] is the implementation used by the command line tool.

pub mod chart;
pub mod svg;

use crate::types::marker::Marker;
use crate::types::variable::ReferenceLine;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

pub use svg::SvgRenderer;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Chart '{0}' has no data to draw")]
    EmptyChart(String),

    #[error("Failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// RGB line colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineColor(pub u8, pub u8, pub u8);

impl LineColor {
    pub const RED: LineColor = LineColor(214, 39, 40);
    pub const BLUE: LineColor = LineColor(31, 119, 180);
}

/// Everything a renderer needs to produce one plot.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Legend entry of the main line.
    pub series_label: String,
    /// The main line. `None` values break the line.
    pub points: Vec<(DateTime<Utc>, Option<f64>)>,
    pub line_color: LineColor,
    pub line_width: u32,
    pub markers: Vec<Marker>,
    pub reference_lines: Vec<ReferenceLine>,
    /// Text printed below the plot area.
    pub footer: String,
    /// `strftime` pattern for x axis tick labels.
    pub x_label_format: &'static str,
    /// File name without extension.
    pub file_stem: String,
}

impl Chart {
    /// Smallest and largest value on the main line, markers excluded.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|(_, v)| *v)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn time_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.points.first()?.0, self.points.last()?.0))
    }

    /// Consecutive runs of present values.
    pub fn segments(&self) -> Vec<Vec<(DateTime<Utc>, f64)>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for &(time, value) in &self.points {
            match value {
                Some(v) => current.push((time, v)),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Turns a [`Chart`] into an artifact and reports where it went.
pub trait Renderer {
    fn render(&self, chart: &Chart) -> Result<PathBuf, RenderError>;
}

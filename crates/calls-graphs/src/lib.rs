//! # Calls Graphs
//!
//! PNG charts for 911 call analysis, drawn with plotters.
//!
//! Each chart kind has its own [`GraphRenderer`]; [`ChartGenerator`] draws the
//! whole set from an [`calls_analysis::AnalysisResults`].

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod count_plot;
pub mod fitted_line;
pub mod generator;
pub mod heatmap;
pub mod line_chart;
pub mod palette;
pub mod renderer;
pub mod types;

pub use count_plot::CountPlot;
pub use fitted_line::FittedLineGraph;
pub use generator::{ChartGenerator, ChartKind};
pub use heatmap::{HeatmapCell, HeatmapGraph};
pub use line_chart::{LineChartRenderer, XAxis};
pub use palette::Gradient;
pub use renderer::{parse_hex_color, GraphRenderer};
pub use types::*;

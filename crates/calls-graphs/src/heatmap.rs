//! Heatmaps of two-dimensional count tables

use crate::palette::Gradient;
use crate::renderer::key_label;
use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use calls_analysis::{AggregationResult, ClusterOrder};
use calls_common::{CallsError, Result};
use calls_config::PaletteName;
use plotters::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Width in pixels reserved for the color bar
const COLOR_BAR_WIDTH: u32 = 110;

/// Steps drawn in the color bar
const COLOR_BAR_STEPS: usize = 64;

/// A grid of cells colored by count
///
/// The first row key is drawn at the top, the first column key at the left.
#[derive(Debug, Clone)]
pub struct HeatmapGraph {
    pub result: AggregationResult,
    pub palette: PaletteName,
}

/// One colored cell in chart coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapCell {
    pub x: f64,
    pub y: f64,
    pub count: u64,
}

impl HeatmapGraph {
    pub fn new(result: AggregationResult, palette: PaletteName) -> Self {
        Self { result, palette }
    }

    /// Heatmap of `result` with rows and columns in cluster leaf order
    pub fn clustered(result: &AggregationResult, order: &ClusterOrder, palette: PaletteName) -> Self {
        debug!(rows = ?order.rows, columns = ?order.columns, "Drawing heatmap in cluster order");
        Self::new(order.apply(result), palette)
    }

    pub fn default_config(result: &AggregationResult) -> GraphConfig {
        GraphConfig {
            graph_type: GraphType::Heatmap,
            title: format!(
                "Calls by {} and {}",
                result.row_dimension(),
                result.column_dimension()
            ),
            ..GraphConfig::default()
        }
        .with_labels(result.column_dimension().label(), result.row_dimension().label())
    }

    /// Cell centers, with row 0 mapped to the highest y
    pub fn cells(&self) -> Vec<HeatmapCell> {
        let rows = self.result.row_keys().len();
        self.result
            .counts()
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter().enumerate().map(move |(c, &count)| HeatmapCell {
                    x: c as f64,
                    y: (rows - 1 - r) as f64,
                    count,
                })
            })
            .collect()
    }
}

#[async_trait]
impl GraphRenderer for HeatmapGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let row_keys = self.result.row_keys();
        let column_keys = self.result.column_keys();
        if row_keys.is_empty() || column_keys.is_empty() {
            return Err(CallsError::graph("No data available for heatmap"));
        }

        let rows = row_keys.len();
        let columns = column_keys.len();
        let max = self.result.max_count() as f64;
        let gradient = Gradient::for_palette(self.palette);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let root = root.titled(&config.title, title_font)?;
        let (plot_area, bar_area) =
            root.split_horizontally(config.width.saturating_sub(COLOR_BAR_WIDTH) as i32);

        let mut chart = ChartBuilder::on(&plot_area)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(-0.5..(columns as f64 - 0.5), -0.5..(rows as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(columns)
            .y_labels(rows)
            .x_label_formatter(&|x| {
                if (x - x.round()).abs() < 1e-6 {
                    key_label(column_keys, x.round() as i64)
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y| {
                if (y - y.round()).abs() < 1e-6 {
                    key_label(row_keys, rows as i64 - 1 - y.round() as i64)
                } else {
                    String::new()
                }
            })
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or(""))
            .draw()?;

        chart.draw_series(self.cells().into_iter().map(|cell| {
            Rectangle::new(
                [(cell.x - 0.5, cell.y - 0.5), (cell.x + 0.5, cell.y + 0.5)],
                gradient.scaled(cell.count as f64, max).filled(),
            )
        }))?;

        let bar_top = if max > 0.0 { max } else { 1.0 };
        let mut bar = ChartBuilder::on(&bar_area)
            .margin(config.style.margins.top as i32)
            .margin_left(10)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(50)
            .build_cartesian_2d(0.0..1.0, 0.0..bar_top)?;

        bar.configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_label_formatter(&|y| format!("{y:.0}"))
            .draw()?;

        let step = bar_top / COLOR_BAR_STEPS as f64;
        bar.draw_series((0..COLOR_BAR_STEPS).map(|i| {
            let low = i as f64 * step;
            Rectangle::new(
                [(0.0, low), (1.0, low + step)],
                gradient.color_at((i as f64 + 0.5) / COLOR_BAR_STEPS as f64).filled(),
            )
        }))?;

        root.present()?;
        info!("Rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "heatmap"
    }
}

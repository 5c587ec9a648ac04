//! Bar chart of record counts per category

use crate::palette::Gradient;
use crate::renderer::{key_label, padded_range};
use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use calls_analysis::{DimensionValue, Series};
use calls_common::{CallsError, Result};
use calls_config::PaletteName;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// One bar per key of a [`Series`], colored along a gradient
#[derive(Debug, Clone)]
pub struct CountPlot {
    pub series: Series,
    pub palette: PaletteName,
}

impl CountPlot {
    pub fn new(series: Series, palette: PaletteName) -> Self {
        Self { series, palette }
    }

    /// Default configuration for a count plot over `series`
    pub fn default_config(series: &Series) -> GraphConfig {
        GraphConfig {
            graph_type: GraphType::Bar,
            title: format!("Calls by {}", series.dimension()),
            ..GraphConfig::default()
        }
        .with_labels(series.dimension().label(), "Count")
    }

    fn keys(&self) -> Vec<DimensionValue> {
        self.series.points().iter().map(|(k, _)| k.clone()).collect()
    }

    /// Bar spans as `(left, right, height)` in chart coordinates
    pub fn bars(&self) -> Vec<(f64, f64, f64)> {
        self.series
            .points()
            .iter()
            .enumerate()
            .map(|(i, (_, count))| (i as f64 - 0.4, i as f64 + 0.4, *count as f64))
            .collect()
    }
}

#[async_trait]
impl GraphRenderer for CountPlot {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if self.series.is_empty() {
            return Err(CallsError::graph("No data available for count plot"));
        }

        let keys = self.keys();
        let bars = self.bars();
        let colors = Gradient::for_palette(self.palette).sample(bars.len());
        let (_, y_max) = padded_range(0.0, self.series.max_count() as f64, 0.08);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(-0.5..(bars.len() as f64 - 0.5), 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(keys.len())
            .x_label_formatter(&|x| {
                if (x - x.round()).abs() < 1e-6 {
                    key_label(&keys, x.round() as i64)
                } else {
                    String::new()
                }
            })
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or("Count"))
            .draw()?;

        chart.draw_series(bars.iter().zip(colors.iter()).map(|(&(left, right, height), color)| {
            Rectangle::new([(left, 0.0), (right, height)], color.filled())
        }))?;

        root.present()?;
        info!("Rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "count plot"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calls_analysis::Dimension;
    use tempfile::tempdir;

    fn reasons() -> Series {
        Series::new(
            Dimension::Reason,
            vec![
                (DimensionValue::Reason("EMS".into()), 8),
                (DimensionValue::Reason("Fire".into()), 2),
                (DimensionValue::Reason("Traffic".into()), 2),
            ],
        )
    }

    #[test]
    fn test_bars_are_centered_on_indices() {
        let plot = CountPlot::new(reasons(), PaletteName::Plasma);
        let bars = plot.bars();
        assert_eq!(bars.len(), 3);
        assert!((bars[0].0 + 0.4).abs() < 1e-9);
        assert!((bars[2].1 - 2.4).abs() < 1e-9);
        assert_eq!(bars[0].2, 8.0);
    }

    #[test]
    fn test_default_config() {
        let config = CountPlot::default_config(&reasons());
        assert_eq!(config.title, "Calls by Reason");
        assert_eq!(config.x_label.as_deref(), Some("Reason"));
        assert_eq!(config.graph_type, GraphType::Bar);
    }

    #[tokio::test]
    async fn test_render_empty_data_error() {
        let plot = CountPlot::new(Series::new(Dimension::Reason, vec![]), PaletteName::Plasma);
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let result = plot.render_to_file(&GraphConfig::default(), &path).await;
        assert!(matches!(result, Err(CallsError::Graph { .. })));
        assert!(!path.exists());
    }
}

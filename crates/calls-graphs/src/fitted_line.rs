//! Observed counts with a least-squares line and its band

use crate::renderer::padded_range;
use crate::{GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use calls_analysis::LinearFit;
use calls_common::{CallsError, Result};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const LINE_COLOR: RGBColor = RGBColor(214, 39, 40);

/// Scatter of observed values with the fitted line drawn over it
#[derive(Debug, Clone)]
pub struct FittedLineGraph {
    pub fit: LinearFit,
}

impl FittedLineGraph {
    pub fn new(fit: LinearFit) -> Self {
        Self { fit }
    }

    pub fn default_config(x_label: &str) -> GraphConfig {
        GraphConfig {
            graph_type: GraphType::FittedLine,
            title: format!("Calls by {x_label} with linear fit"),
            ..GraphConfig::default()
        }
        .with_labels(x_label, "Count")
    }

    /// Closed outline of the band, upper edge left to right then lower edge back
    pub fn band_outline(&self) -> Option<Vec<(f64, f64)>> {
        let band = self.fit.band?;
        let (x_min, x_max) = self.fit.x_range()?;
        Some(vec![
            (x_min, self.fit.predict(x_min) + band),
            (x_max, self.fit.predict(x_max) + band),
            (x_max, self.fit.predict(x_max) - band),
            (x_min, self.fit.predict(x_min) - band),
        ])
    }

    /// Chart bounds covering points, line and band
    pub fn data_ranges(&self) -> (f64, f64, f64, f64) {
        let (x_min, x_max) = self.fit.x_range().unwrap_or((0.0, 1.0));
        let band = self.fit.band.unwrap_or(0.0);

        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for point in &self.fit.points {
            y_min = y_min.min(point.observed).min(point.fitted - band);
            y_max = y_max.max(point.observed).max(point.fitted + band);
        }

        let (x_min, x_max) = padded_range(x_min, x_max, 0.05);
        let (y_min, y_max) = padded_range(y_min.min(0.0), y_max, 0.08);
        (x_min, x_max, y_min, y_max)
    }
}

#[async_trait]
impl GraphRenderer for FittedLineGraph {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        let Some((x_start, x_end)) = self.fit.x_range() else {
            return Err(CallsError::graph("No data available for fitted line"));
        };

        let (x_min, x_max, y_min, y_max) = self.data_ranges();

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or("Count"))
            .draw()?;

        if let Some(outline) = self.band_outline() {
            chart.draw_series(std::iter::once(Polygon::new(outline, LINE_COLOR.mix(0.15).filled())))?;
        }

        chart
            .draw_series(LineSeries::new(
                vec![(x_start, self.fit.predict(x_start)), (x_end, self.fit.predict(x_end))],
                LINE_COLOR.stroke_width(2),
            ))?
            .label(format!("y = {:.2}x + {:.2}", self.fit.slope, self.fit.intercept))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], LINE_COLOR.stroke_width(2)));

        chart
            .draw_series(
                self.fit
                    .points
                    .iter()
                    .map(|p| Circle::new((p.x, p.observed), 5, POINT_COLOR.filled())),
            )?
            .label("Observed")
            .legend(|(x, y)| Circle::new((x + 8, y), 5, POINT_COLOR.filled()));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;

        root.present()?;
        info!(
            slope = self.fit.slope,
            intercept = self.fit.intercept,
            "Rendered {} to {}",
            self.name(),
            path.display()
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "fitted line"
    }
}

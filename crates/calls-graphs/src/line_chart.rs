//! Line charts of one or more count series

use crate::renderer::padded_range;
use crate::{DataPoint, DataSet, GraphConfig, GraphRenderer, GraphType};
use async_trait::async_trait;
use calls_analysis::{Dimension, ReasonSeries, Series};
use calls_common::{CallsError, Result};
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// How x values map back to axis labels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum XAxis {
    Numeric,
    /// x is the number of days since `origin`
    Dates { origin: NaiveDate },
}

impl XAxis {
    pub fn label(&self, x: f64) -> String {
        match self {
            Self::Numeric => format!("{x:.0}"),
            Self::Dates { origin } => (*origin + Duration::days(x.round() as i64))
                .format("%Y-%m-%d")
                .to_string(),
        }
    }
}

/// Concrete implementation of GraphRenderer for line charts
#[derive(Debug, Clone)]
pub struct LineChartRenderer {
    pub datasets: Vec<DataSet>,
    pub x_axis: XAxis,
}

impl LineChartRenderer {
    pub fn new(datasets: Vec<DataSet>, x_axis: XAxis) -> Self {
        Self { datasets, x_axis }
    }

    /// One line for a date or numeric keyed series
    pub fn from_series(name: &str, series: &Series) -> Self {
        let x_axis = date_axis(std::iter::once(series)).unwrap_or(XAxis::Numeric);
        Self::new(vec![series_to_dataset(name, series, x_axis)], x_axis)
    }

    /// One line per reason, sharing a date axis
    pub fn from_reason_series(per_reason: &[ReasonSeries]) -> Self {
        let x_axis =
            date_axis(per_reason.iter().map(|r| &r.series)).unwrap_or(XAxis::Numeric);
        let datasets = per_reason
            .iter()
            .map(|r| series_to_dataset(&r.reason, &r.series, x_axis))
            .collect();
        Self::new(datasets, x_axis)
    }

    pub fn default_config(title: &str, x_label: &str) -> GraphConfig {
        GraphConfig {
            graph_type: GraphType::Line,
            title: title.to_string(),
            ..GraphConfig::default()
        }
        .with_labels(x_label, "Count")
    }

    /// Calculate the data ranges for all datasets
    pub fn calculate_data_ranges(&self) -> (f64, f64, f64, f64) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_max = f64::NEG_INFINITY;

        for point in self.datasets.iter().flat_map(|d| &d.data) {
            x_min = x_min.min(point.x);
            x_max = x_max.max(point.x);
            y_max = y_max.max(point.y);
        }

        let (x_min, x_max) = padded_range(x_min, x_max, 0.02);
        let (_, y_max) = padded_range(0.0, y_max.max(0.0), 0.05);
        (x_min, x_max, 0.0, y_max)
    }

    fn has_points(&self) -> bool {
        self.datasets.iter().any(|d| !d.data.is_empty())
    }
}

/// Date axis anchored at the earliest date of the series, if they are date keyed
fn date_axis<'a>(series: impl Iterator<Item = &'a Series>) -> Option<XAxis> {
    series
        .filter(|s| s.dimension() == Dimension::Date)
        .filter_map(|s| s.points().first().and_then(|(k, _)| k.as_date()))
        .min()
        .map(|origin| XAxis::Dates { origin })
}

fn series_to_dataset(name: &str, series: &Series, x_axis: XAxis) -> DataSet {
    let data = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, (key, count))| {
            let x = match (x_axis, key.as_date()) {
                (XAxis::Dates { origin }, Some(date)) => (date - origin).num_days() as f64,
                _ => key.as_number().unwrap_or(i as f64),
            };
            DataPoint {
                x,
                y: *count as f64,
            }
        })
        .collect();
    DataSet::new(name, data)
}

#[async_trait]
impl GraphRenderer for LineChartRenderer {
    async fn render_to_file(&self, config: &GraphConfig, path: &Path) -> Result<()> {
        if !self.has_points() {
            return Err(CallsError::graph("No data available for line chart"));
        }

        let (x_min, x_max, y_min, y_max) = self.calculate_data_ranges();
        let colors = self.get_colors(&config.style.color_scheme);

        let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
        root.fill(&self.get_background_color(config))?;

        let title_font = (config.style.title_font.family.as_str(), config.style.title_font.size);
        let mut chart = ChartBuilder::on(&root)
            .caption(&config.title, title_font)
            .margin(config.style.margins.top as i32)
            .x_label_area_size(config.style.margins.bottom)
            .y_label_area_size(config.style.margins.left)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        let x_axis = self.x_axis;
        chart
            .configure_mesh()
            .x_label_formatter(&|x| x_axis.label(*x))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .x_desc(config.x_label.as_deref().unwrap_or(""))
            .y_desc(config.y_label.as_deref().unwrap_or("Count"))
            .draw()?;

        for (i, dataset) in self.datasets.iter().enumerate() {
            let color = dataset
                .color
                .as_deref()
                .map(|c| self.parse_color(c))
                .unwrap_or(colors[i % colors.len()]);

            let line_data: Vec<(f64, f64)> = dataset.data.iter().map(|p| (p.x, p.y)).collect();
            chart
                .draw_series(LineSeries::new(line_data, color.stroke_width(2)))?
                .label(dataset.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], color.stroke_width(2)));
        }

        if self.datasets.len() > 1 {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()?;
        }

        root.present()?;
        info!("Rendered {} to {}", self.name(), path.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "line chart"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calls_analysis::DimensionValue;
    use tempfile::tempdir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn by_date() -> Series {
        Series::new(
            Dimension::Date,
            vec![
                (DimensionValue::Date(date(2015, 12, 10)), 9),
                (DimensionValue::Date(date(2016, 1, 4)), 1),
                (DimensionValue::Date(date(2016, 1, 9)), 1),
            ],
        )
    }

    #[test]
    fn test_dates_become_day_offsets() {
        let chart = LineChartRenderer::from_series("Calls", &by_date());
        assert_eq!(chart.x_axis, XAxis::Dates { origin: date(2015, 12, 10) });

        let xs: Vec<f64> = chart.datasets[0].data.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 25.0, 30.0]);
        assert_eq!(chart.x_axis.label(25.0), "2016-01-04");
    }

    #[test]
    fn test_months_stay_numeric() {
        let months = Series::new(
            Dimension::Month,
            (1..=12).map(|m| (DimensionValue::Month(m), u64::from(m))).collect(),
        );
        let chart = LineChartRenderer::from_series("Calls", &months);
        assert_eq!(chart.x_axis, XAxis::Numeric);
        assert_eq!(chart.datasets[0].data[0], DataPoint { x: 1.0, y: 1.0 });
        assert_eq!(chart.x_axis.label(12.0), "12");

        let (x_min, x_max, y_min, y_max) = chart.calculate_data_ranges();
        assert!(x_min < 1.0 && x_max > 12.0);
        assert_eq!(y_min, 0.0);
        assert!(y_max > 12.0);
    }

    #[test]
    fn test_reason_series_share_origin() {
        let per_reason = vec![
            ReasonSeries { reason: "EMS".into(), series: by_date() },
            ReasonSeries { reason: "Fire".into(), series: by_date() },
        ];
        let chart = LineChartRenderer::from_reason_series(&per_reason);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[1].name, "Fire");
        assert_eq!(chart.datasets[0].data, chart.datasets[1].data);
    }

    #[test]
    fn test_render_empty_data_error() {
        let chart = LineChartRenderer::from_reason_series(&[]);
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let result = tokio_test::block_on(chart.render_to_file(&GraphConfig::default(), &path));
        assert!(result.is_err());
    }
}

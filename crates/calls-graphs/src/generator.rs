//! Renders the full chart set for one analysis run

use crate::{
    CountPlot, FittedLineGraph, GraphConfig, GraphRenderer, HeatmapGraph, LineChartRenderer,
};
use calls_analysis::AnalysisResults;
use calls_common::{CallsError, Result};
use calls_config::OutputConfig;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

/// Every chart the generator knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Reasons,
    DayHour,
    DayHourClustered,
    DayMonth,
    DayMonthClustered,
    CallsOverTime,
    CallsOverTimeByReason,
    MonthlyTrend,
    MonthlyTrendFit,
}

impl ChartKind {
    pub const ALL: [Self; 9] = [
        Self::Reasons,
        Self::DayHour,
        Self::DayHourClustered,
        Self::DayMonth,
        Self::DayMonthClustered,
        Self::CallsOverTime,
        Self::CallsOverTimeByReason,
        Self::MonthlyTrend,
        Self::MonthlyTrendFit,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Reasons => "calls_by_reason.png",
            Self::DayHour => "heatmap_day_hour.png",
            Self::DayHourClustered => "clustermap_day_hour.png",
            Self::DayMonth => "heatmap_day_month.png",
            Self::DayMonthClustered => "clustermap_day_month.png",
            Self::CallsOverTime => "calls_over_time.png",
            Self::CallsOverTimeByReason => "calls_over_time_by_reason.png",
            Self::MonthlyTrend => "monthly_trend.png",
            Self::MonthlyTrendFit => "monthly_trend_fit.png",
        }
    }

    fn enabled(self, output: &OutputConfig) -> bool {
        let charts = &output.charts;
        match self {
            Self::Reasons => charts.reasons,
            Self::DayHour | Self::DayHourClustered => charts.day_hour,
            Self::DayMonth | Self::DayMonthClustered => charts.day_month,
            Self::CallsOverTime | Self::CallsOverTimeByReason => charts.calls_over_time,
            Self::MonthlyTrend | Self::MonthlyTrendFit => charts.monthly_trend,
        }
    }

    /// Whether `results` hold anything this chart can draw
    fn has_data(self, results: &AnalysisResults) -> bool {
        match self {
            Self::Reasons => !results.by_reason.is_empty(),
            Self::DayHour | Self::DayHourClustered => !results.day_hour.row_keys().is_empty(),
            Self::DayMonth | Self::DayMonthClustered => !results.day_month.row_keys().is_empty(),
            Self::CallsOverTime => !results.by_date.is_empty(),
            Self::CallsOverTimeByReason => !results.by_date_per_reason.is_empty(),
            Self::MonthlyTrend => !results.by_month.is_empty(),
            Self::MonthlyTrendFit => results.monthly_trend.is_some(),
        }
    }
}

/// Draws the enabled charts into the output directory
#[derive(Debug, Clone)]
pub struct ChartGenerator {
    output: OutputConfig,
}

impl ChartGenerator {
    pub fn new(output: OutputConfig) -> Self {
        Self { output }
    }

    pub fn output_dir(&self) -> &Path {
        Path::new(&self.output.directory)
    }

    /// Charts that are enabled and have data, in drawing order
    pub fn plan(&self, results: &AnalysisResults) -> Vec<ChartKind> {
        ChartKind::ALL
            .into_iter()
            .filter(|kind| kind.enabled(&self.output))
            .filter(|kind| {
                let has_data = kind.has_data(results);
                if !has_data {
                    warn!(chart = kind.file_name(), "Skipping chart with no data");
                }
                has_data
            })
            .collect()
    }

    /// Render every planned chart and return the written paths
    #[instrument(skip(self, results), fields(dir = %self.output.directory))]
    pub async fn generate(&self, results: &AnalysisResults) -> Result<Vec<PathBuf>> {
        let plan = self.plan(results);
        if plan.is_empty() {
            info!("No charts to render");
            return Ok(Vec::new());
        }

        tokio::fs::create_dir_all(self.output_dir()).await.map_err(|e| {
            CallsError::graph_with_source(
                format!("Failed to create output directory {}", self.output.directory),
                e,
            )
        })?;

        let mut written = Vec::with_capacity(plan.len());
        for kind in plan {
            let path = self.output_dir().join(kind.file_name());
            self.render(kind, results, &path).await?;
            written.push(path);
        }

        info!(count = written.len(), "Charts written");
        Ok(written)
    }

    async fn render(&self, kind: ChartKind, results: &AnalysisResults, path: &Path) -> Result<()> {
        let palettes = &self.output.palettes;
        let (renderer, config): (Box<dyn GraphRenderer>, GraphConfig) = match kind {
            ChartKind::Reasons => (
                Box::new(CountPlot::new(results.by_reason.clone(), palettes.reasons)),
                CountPlot::default_config(&results.by_reason),
            ),
            ChartKind::DayHour => (
                Box::new(HeatmapGraph::new(results.day_hour.clone(), palettes.day_hour)),
                HeatmapGraph::default_config(&results.day_hour),
            ),
            ChartKind::DayHourClustered => (
                Box::new(HeatmapGraph::clustered(
                    &results.day_hour,
                    &results.day_hour_order,
                    palettes.day_hour_clustered,
                )),
                clustered_config(HeatmapGraph::default_config(&results.day_hour)),
            ),
            ChartKind::DayMonth => (
                Box::new(HeatmapGraph::new(results.day_month.clone(), palettes.day_month)),
                HeatmapGraph::default_config(&results.day_month),
            ),
            ChartKind::DayMonthClustered => (
                Box::new(HeatmapGraph::clustered(
                    &results.day_month,
                    &results.day_month_order,
                    palettes.day_month_clustered,
                )),
                clustered_config(HeatmapGraph::default_config(&results.day_month)),
            ),
            ChartKind::CallsOverTime => (
                Box::new(LineChartRenderer::from_series("Calls", &results.by_date)),
                LineChartRenderer::default_config("Calls per Day", "Date"),
            ),
            ChartKind::CallsOverTimeByReason => (
                Box::new(LineChartRenderer::from_reason_series(&results.by_date_per_reason)),
                LineChartRenderer::default_config("Calls per Day by Reason", "Date"),
            ),
            ChartKind::MonthlyTrend => (
                Box::new(LineChartRenderer::from_series("Calls", &results.by_month)),
                LineChartRenderer::default_config("Calls per Month", "Month"),
            ),
            ChartKind::MonthlyTrendFit => {
                let fit = results
                    .monthly_trend
                    .clone()
                    .ok_or_else(|| CallsError::graph("No monthly trend to draw"))?;
                (
                    Box::new(FittedLineGraph::new(fit)),
                    FittedLineGraph::default_config("Month"),
                )
            }
        };

        renderer.render_to_file(&self.styled(config), path).await
    }

    /// Apply the configured size and background to a renderer's defaults
    fn styled(&self, base: GraphConfig) -> GraphConfig {
        let sized = GraphConfig::from_output(&self.output, base.graph_type, &base.title);
        GraphConfig {
            x_label: base.x_label,
            y_label: base.y_label,
            ..sized
        }
    }
}

fn clustered_config(mut config: GraphConfig) -> GraphConfig {
    config.title = format!("{} (clustered)", config.title);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use calls_analysis::AugmentedTable;
    use calls_config::ChartToggles;

    #[test]
    fn test_file_names_are_unique() {
        let mut names: Vec<&str> = ChartKind::ALL.iter().map(|k| k.file_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ChartKind::ALL.len());
    }

    #[test]
    fn test_plan_for_empty_results() {
        let results = AnalysisResults::compute(&AugmentedTable::default(), 5);
        let plan = ChartGenerator::new(OutputConfig::default()).plan(&results);

        // Fixed weekday, hour and month domains still draw
        assert_eq!(
            plan,
            vec![
                ChartKind::DayHour,
                ChartKind::DayHourClustered,
                ChartKind::DayMonth,
                ChartKind::DayMonthClustered,
                ChartKind::MonthlyTrend,
            ]
        );
    }

    #[test]
    fn test_plan_respects_toggles() {
        let results = AnalysisResults::compute(&AugmentedTable::default(), 5);
        let output = OutputConfig {
            charts: ChartToggles {
                day_month: true,
                ..ChartToggles::none()
            },
            ..OutputConfig::default()
        };
        let plan = ChartGenerator::new(output).plan(&results);
        assert_eq!(plan, vec![ChartKind::DayMonth, ChartKind::DayMonthClustered]);
    }

    #[test]
    fn test_styled_keeps_labels() {
        let output = OutputConfig {
            width: 640,
            height: 480,
            ..OutputConfig::default()
        };
        let generator = ChartGenerator::new(output);
        let config = generator.styled(LineChartRenderer::default_config("Calls per Day", "Date"));

        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.title, "Calls per Day");
        assert_eq!(config.x_label.as_deref(), Some("Date"));
        assert_eq!(config.y_label.as_deref(), Some("Count"));
    }

    #[test]
    fn test_clustered_title() {
        let config = clustered_config(GraphConfig::default());
        assert_eq!(config.title, "Graph (clustered)");
    }
}

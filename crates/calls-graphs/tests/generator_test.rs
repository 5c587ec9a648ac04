//! Chart planning over analysis results of the shared CSV fixture

use calls_analysis::{AnalysisResults, CsvLoader, FeatureExtractor};
use calls_common::test_utils::csv_fixtures::SAMPLE;
use calls_common::test_utils::init_test_logging;
use calls_config::{ChartToggles, OutputConfig};
use calls_graphs::{ChartGenerator, ChartKind, HeatmapGraph, LineChartRenderer, XAxis};
use tempfile::tempdir;

fn sample_results() -> AnalysisResults {
    let raw = CsvLoader::new().load_reader(SAMPLE.as_bytes()).unwrap();
    let table = FeatureExtractor::new().extract(&raw).unwrap();
    AnalysisResults::compute(&table, 5)
}

#[test]
fn test_sample_plans_every_chart() {
    init_test_logging();
    let results = sample_results();
    let plan = ChartGenerator::new(OutputConfig::default()).plan(&results);
    assert_eq!(plan, ChartKind::ALL.to_vec());
}

#[test]
fn test_reason_lines_follow_first_appearance() {
    let results = sample_results();
    let chart = LineChartRenderer::from_reason_series(&results.by_date_per_reason);
    let names: Vec<&str> = chart.datasets.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["EMS", "Fire", "Traffic"]);
    assert!(matches!(chart.x_axis, XAxis::Dates { .. }));
}

#[test]
fn test_clustered_heatmap_keeps_every_cell() {
    let results = sample_results();
    let graph = HeatmapGraph::clustered(
        &results.day_hour,
        &results.day_hour_order,
        calls_config::PaletteName::Magma,
    );
    let total: u64 = graph.cells().iter().map(|c| c.count).sum();
    assert_eq!(total, results.day_hour.total());
    assert_eq!(graph.cells().len(), 7 * 24);
}

#[tokio::test]
async fn test_generate_with_all_charts_disabled() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("charts");
    let output = OutputConfig {
        directory: out.to_string_lossy().into_owned(),
        charts: ChartToggles::none(),
        ..OutputConfig::default()
    };

    let written = ChartGenerator::new(output).generate(&sample_results()).await.unwrap();
    assert!(written.is_empty());
    assert!(!out.exists());
}

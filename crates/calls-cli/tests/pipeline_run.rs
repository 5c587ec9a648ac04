//! Full runs over the shared CSV fixture with chart rendering switched off

use calls_cli::{report, Pipeline, SUMMARY_FILE};
use calls_common::test_utils::csv_fixtures::{document, row, SAMPLE, SAMPLE_ROWS};
use calls_common::test_utils::{init_test_logging, write_temp_csv};
use calls_config::{ChartToggles, Config};
use std::path::Path;
use tempfile::tempdir;

fn config_for(dir: &Path, export_json: bool) -> Config {
    let mut config = Config::default();
    config.output.directory = dir.to_string_lossy().into_owned();
    config.output.export_json = export_json;
    config.output.charts = ChartToggles::none();
    config
}

#[tokio::test]
async fn test_run_writes_summary_json() {
    init_test_logging();
    let input = write_temp_csv(SAMPLE);
    let out = tempdir().unwrap();

    let outcome = Pipeline::new(config_for(out.path(), true))
        .run(input.path())
        .await
        .unwrap();

    assert!(outcome.charts.is_empty());
    assert_eq!(outcome.whole_title_reasons, 0);
    let json_path = outcome.summary_json.clone().unwrap();
    assert_eq!(json_path, out.path().join(SUMMARY_FILE));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["summary"]["total_records"], SAMPLE_ROWS);
    assert_eq!(json["summary"]["top_zips"][0]["value"], "19401");
    assert!(json["monthly_trend"].is_object());

    let text = report::render(&outcome);
    assert!(text.starts_with(&format!("Total records: {SAMPLE_ROWS}")));
    assert!(text.contains("NORRISTOWN"));
    assert!(text.contains("Monthly trend"));
    assert!(text.contains(SUMMARY_FILE));
}

#[tokio::test]
async fn test_run_without_export() {
    let input = write_temp_csv(SAMPLE);
    let out = tempdir().unwrap();
    let nested = out.path().join("never-created");

    let outcome = Pipeline::new(config_for(&nested, false))
        .run(input.path())
        .await
        .unwrap();

    assert!(outcome.summary_json.is_none());
    assert!(!nested.exists());
}

#[tokio::test]
async fn test_counts_titles_without_colon() {
    let input = write_temp_csv(&document(&[
        row("TRAFFIC", "2016-01-04 08:00:00"),
        row("EMS: FALL VICTIM", "2016-01-04 09:00:00"),
    ]));
    let out = tempdir().unwrap();

    let outcome = Pipeline::new(config_for(out.path(), false))
        .run(input.path())
        .await
        .unwrap();

    assert_eq!(outcome.whole_title_reasons, 1);
    assert!(report::render(&outcome).contains("1 title(s) had no ':'"));
}

#[tokio::test]
async fn test_missing_file_is_load_error() {
    let out = tempdir().unwrap();
    let err = Pipeline::new(config_for(out.path(), false))
        .run(&out.path().join("missing.csv"))
        .await
        .unwrap_err();
    assert!(err.is_load());
}

#[tokio::test]
async fn test_bad_timestamp_is_parse_error() {
    let input = write_temp_csv(&document(&[row("EMS: FALL VICTIM", "yesterday")]));
    let out = tempdir().unwrap();

    let err = Pipeline::new(config_for(out.path(), false))
        .run(input.path())
        .await
        .unwrap_err();
    assert!(err.is_parse());
}

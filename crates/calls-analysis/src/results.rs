//! Every summary and aggregate of one run, bundled for reporting and export

use crate::aggregator::{AggregationResult, Aggregator, ReasonSeries, Series};
use crate::cluster::ClusterOrder;
use crate::model::AugmentedTable;
use crate::stats::{StatsSummarizer, StatsSummary};
use crate::trend::{monthly_trend, LinearFit};
use calls_common::Result;
use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument};

/// Outputs handed to the renderer and the JSON export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResults {
    pub summary: StatsSummary,
    pub by_reason: Series,
    pub day_hour: AggregationResult,
    pub day_hour_order: ClusterOrder,
    pub day_month: AggregationResult,
    pub day_month_order: ClusterOrder,
    pub by_date: Series,
    pub by_date_per_reason: Vec<ReasonSeries>,
    pub by_month: Series,
    pub monthly_trend: Option<LinearFit>,
}

impl AnalysisResults {
    /// Run every summary and aggregation over `table`
    #[instrument(skip(table), fields(records = table.len()))]
    pub fn compute(table: &AugmentedTable, top_n: usize) -> Self {
        let aggregator = Aggregator::new();

        let day_hour = aggregator.day_hour(table);
        let day_month = aggregator.day_month(table);
        let by_month = aggregator.by_month(table);

        let results = Self {
            summary: StatsSummarizer::new(table).summarize(top_n),
            by_reason: aggregator.by_reason(table),
            day_hour_order: ClusterOrder::for_result(&day_hour),
            day_hour,
            day_month_order: ClusterOrder::for_result(&day_month),
            day_month,
            by_date: aggregator.by_date(table),
            by_date_per_reason: aggregator.by_date_per_reason(table),
            monthly_trend: monthly_trend(&by_month),
            by_month,
        };

        info!(
            records = table.len(),
            reasons = results.by_reason.len(),
            dates = results.by_date.len(),
            "Computed aggregates"
        );
        results
    }

    /// Day-by-hour table in cluster leaf order
    pub fn day_hour_clustered(&self) -> AggregationResult {
        self.day_hour_order.apply(&self.day_hour)
    }

    /// Day-by-month table in cluster leaf order
    pub fn day_month_clustered(&self) -> AggregationResult {
        self.day_month_order.apply(&self.day_month)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty-printed JSON document to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        info!("Wrote summary to {}", path.as_ref().display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureExtractor;
    use crate::loader::CsvLoader;
    use calls_common::test_utils::csv_fixtures::SAMPLE;

    fn sample_results() -> AnalysisResults {
        let raw = CsvLoader::new().load_reader(SAMPLE.as_bytes()).unwrap();
        let table = FeatureExtractor::new().extract(&raw).unwrap();
        AnalysisResults::compute(&table, 5)
    }

    #[test]
    fn test_compute_sample() {
        let results = sample_results();
        assert_eq!(results.summary.total_records, 12);
        assert_eq!(results.day_hour.total(), 12);
        assert_eq!(results.day_month.total(), 12);
        assert_eq!(results.by_month.len(), 12);
        assert_eq!(results.by_date.len(), 4);
        assert!(results.monthly_trend.is_some());

        let clustered = results.day_hour_clustered();
        assert_eq!(clustered.total(), 12);
        assert_eq!(clustered.row_keys().len(), 7);
    }

    #[test]
    fn test_json_export() {
        let results = sample_results();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        results.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_records"], 12);
        assert_eq!(value["summary"]["top_townships"][0]["value"], "NORRISTOWN");
        assert_eq!(value["day_hour"]["rows"][3], "Thu");
        assert_eq!(value["by_reason"]["points"][0][0], "EMS");
    }
}

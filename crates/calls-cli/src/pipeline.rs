//! One pass from CSV file to report data, charts and JSON

use calls_analysis::{AnalysisResults, CsvLoader, FeatureExtractor, ReasonSource};
use calls_common::{with_context, Result};
use calls_config::Config;
use calls_graphs::ChartGenerator;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// File name of the JSON export inside the output directory
pub const SUMMARY_FILE: &str = "summary.json";

/// Everything a run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub results: AnalysisResults,
    /// Records whose title had no colon and became their own reason
    pub whole_title_reasons: usize,
    pub charts: Vec<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

/// Load, extract, aggregate and render with a fixed configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: Config,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[instrument(skip(self), fields(input = %input.display()))]
    pub async fn run(&self, input: &Path) -> Result<RunOutcome> {
        let raw = CsvLoader::new().load(input)?;

        let extractor = FeatureExtractor::with_formats(self.config.analysis.timestamp_formats.clone());
        let table = extractor.extract(&raw)?;
        let whole_title_reasons = table
            .iter()
            .filter(|r| r.derived.reason_source == ReasonSource::WholeTitle)
            .count();

        let results = AnalysisResults::compute(&table, self.config.analysis.top_n);

        let charts = ChartGenerator::new(self.config.output.clone())
            .generate(&results)
            .await?;

        let summary_json = if self.config.output.export_json {
            Some(self.export_json(&results).await?)
        } else {
            None
        };

        info!(
            records = results.summary.total_records,
            charts = charts.len(),
            "Analysis complete"
        );

        Ok(RunOutcome {
            results,
            whole_title_reasons,
            charts,
            summary_json,
        })
    }

    async fn export_json(&self, results: &AnalysisResults) -> Result<PathBuf> {
        let dir = Path::new(&self.config.output.directory);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| with_context!(e, "Failed to create output directory {}", dir.display()))?;

        let path = dir.join(SUMMARY_FILE);
        results.write_json(&path)?;
        Ok(path)
    }
}

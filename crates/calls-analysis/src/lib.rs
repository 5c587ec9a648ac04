//! # Calls Analysis
//!
//! Turns 911 call records into reporting data:
//!
//! - [`CsvLoader`] reads the raw export into a [`RecordTable`]
//! - [`FeatureExtractor`] derives reason, hour, month, weekday and date
//! - [`Aggregator`] counts records along one or two of those dimensions
//! - [`StatsSummarizer`] builds top-N tables and a column profile
//!
//! Everything here is synchronous and in-memory. Nothing reads the
//! environment or draws charts.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod cluster;
pub mod features;
pub mod loader;
pub mod model;
pub mod results;
pub mod stats;
pub mod trend;

pub use aggregator::{
    AggregationResult, Aggregator, Dimension, DimensionValue, ReasonSeries, Series,
};
pub use cluster::ClusterOrder;
pub use features::{FeatureExtractor, DEFAULT_TIMESTAMP_FORMATS};
pub use loader::{CsvLoader, REQUIRED_COLUMNS};
pub use model::{
    AugmentedRecord, AugmentedTable, CallRecord, DayOfWeek, DerivedFields, RawRecords,
    ReasonSource, RecordTable,
};
pub use results::AnalysisResults;
pub use stats::{
    ColumnProfile, FrequencyEntry, RawField, StatsSummarizer, StatsSummary, ValueKind,
};
pub use trend::{monthly_trend, FitPoint, LinearFit};

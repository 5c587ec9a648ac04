//! Derive reason and calendar fields from raw call records

use crate::model::{
    AugmentedRecord, AugmentedTable, CallRecord, DayOfWeek, DerivedFields, ReasonSource,
    RecordTable,
};
use calls_common::{CallsError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, instrument, warn};

/// Timestamp layouts tried in order when no custom list is configured.
///
/// Layouts without a time component parse as midnight.
pub const DEFAULT_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d",
    "%m/%d/%Y",
];

/// Turns a [`RecordTable`] into an [`AugmentedTable`]
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    formats: Vec<String>,
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatureExtractor {
    /// Extractor using [`DEFAULT_TIMESTAMP_FORMATS`]
    pub fn new() -> Self {
        Self {
            formats: DEFAULT_TIMESTAMP_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Extractor with a custom list of chrono format strings.
    /// An empty list falls back to the defaults.
    pub fn with_formats<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let formats: Vec<String> = formats.into_iter().map(Into::into).collect();
        if formats.is_empty() {
            Self::new()
        } else {
            Self { formats }
        }
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }

    /// Derive every field for every record.
    ///
    /// Fails with a parse error naming the first row whose timestamp cannot
    /// be read; no partial table is returned.
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn extract(&self, table: &RecordTable) -> Result<AugmentedTable> {
        self.extract_all(table.iter())
    }

    /// Recompute derived fields of an already augmented table from its raw
    /// fields. Running this any number of times gives the same table.
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn reextract(&self, table: &AugmentedTable) -> Result<AugmentedTable> {
        self.extract_all(table.iter().map(|r| &r.record))
    }

    fn extract_all<'a, I>(&self, records: I) -> Result<AugmentedTable>
    where
        I: Iterator<Item = &'a CallRecord>,
    {
        let mut augmented = Vec::with_capacity(records.size_hint().0);
        let mut whole_title_count = 0usize;

        for (row, record) in records.enumerate() {
            let derived = self.derive(row, record)?;
            if derived.reason_source == ReasonSource::WholeTitle {
                whole_title_count += 1;
            }
            augmented.push(AugmentedRecord {
                record: record.clone(),
                derived,
            });
        }

        if whole_title_count > 0 {
            warn!(
                count = whole_title_count,
                "Titles without a ':' separator; using the whole title as the reason"
            );
        }

        debug!("Derived features for {} records", augmented.len());
        Ok(AugmentedTable::from_records(augmented))
    }

    /// Derive the fields of a single record. `row` is only used in errors.
    pub fn derive(&self, row: usize, record: &CallRecord) -> Result<DerivedFields> {
        let timestamp = self.parse_timestamp(&record.timestamp).ok_or_else(|| {
            CallsError::parse_at(
                format!("Unrecognised timestamp at row {row}: '{}'", record.timestamp),
                row,
                record.timestamp.clone(),
            )
        })?;

        let day_of_week = DayOfWeek::from_index(timestamp.weekday().num_days_from_monday())
            .ok_or_else(|| CallsError::parse_at("Weekday out of range", row, record.timestamp.clone()))?;

        let (reason, reason_source) = split_reason(&record.title);

        Ok(DerivedFields {
            reason: reason.to_string(),
            reason_source,
            hour: timestamp.hour(),
            month: timestamp.month(),
            day_of_week,
            date: timestamp.date(),
            timestamp,
        })
    }

    /// Parse a timestamp with the configured layouts, then RFC 3339.
    ///
    /// RFC 3339 values keep their wall-clock time; the offset is dropped.
    pub fn parse_timestamp(&self, raw: &str) -> Option<NaiveDateTime> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }

        self.formats
            .iter()
            .find_map(|format| parse_with_format(value, format))
            .or_else(|| {
                DateTime::parse_from_rfc3339(value)
                    .ok()
                    .map(|dt| dt.naive_local())
            })
    }
}

fn parse_with_format(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
        NaiveDate::parse_from_str(value, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
}

/// Text before the first `:`; the whole title when there is none
pub fn split_reason(title: &str) -> (&str, ReasonSource) {
    match title.split_once(':') {
        Some((prefix, _)) => (prefix, ReasonSource::Prefix),
        None => (title, ReasonSource::WholeTitle),
    }
}

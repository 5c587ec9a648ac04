//! Frequency tables and column profiles over raw record fields

use crate::model::{CallRecord, RawRecords};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

/// Raw text field a frequency table can be built over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RawField {
    Zip,
    Township,
    Title,
    Description,
    Address,
}

impl RawField {
    /// Value of the field; `None` for a null cell
    pub fn value_of(self, record: &CallRecord) -> Option<&str> {
        match self {
            Self::Zip => record.zip.as_deref(),
            Self::Township => record.township.as_deref(),
            Self::Title => Some(record.title.as_str()),
            Self::Description => Some(record.description.as_str()),
            Self::Address => record.address.as_deref(),
        }
    }
}

/// One row of a top-N table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Kind of values a column holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Float,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => f.write_str("float64"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// Non-null count and value kind of one input column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub non_null: usize,
    pub kind: ValueKind,
}

/// Everything the console report prints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSummary {
    pub total_records: usize,
    pub top_zips: Vec<FrequencyEntry>,
    pub top_townships: Vec<FrequencyEntry>,
    pub distinct_titles: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Summary statistics over any table exposing raw records
#[derive(Debug)]
pub struct StatsSummarizer<'a, T: RawRecords> {
    table: &'a T,
}

impl<'a, T: RawRecords> StatsSummarizer<'a, T> {
    pub fn new(table: &'a T) -> Self {
        Self { table }
    }

    /// Most frequent non-null values of `field`.
    ///
    /// Sorted by count descending; equal counts keep first-occurrence order.
    pub fn top_n(&self, field: RawField, n: usize) -> Vec<FrequencyEntry> {
        // value -> (count, first row)
        let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
        for (row, record) in self.table.raw_records().enumerate() {
            if let Some(value) = field.value_of(record) {
                counts.entry(value).or_insert((0, row)).0 += 1;
            }
        }

        let mut entries: Vec<(&str, usize, usize)> = counts
            .into_iter()
            .map(|(value, (count, first))| (value, count, first))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        entries
            .into_iter()
            .take(n)
            .map(|(value, count, _)| FrequencyEntry {
                value: value.to_string(),
                count,
            })
            .collect()
    }

    /// Number of distinct `title` values
    pub fn distinct_titles(&self) -> usize {
        self.table
            .raw_records()
            .map(|r| r.title.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Non-null count and kind per input column, in input column order
    pub fn column_profile(&self) -> Vec<ColumnProfile> {
        let mut lat = 0;
        let mut lng = 0;
        let mut desc = 0;
        let mut zip = 0;
        let mut title = 0;
        let mut timestamp = 0;
        let mut twp = 0;
        let mut addr = 0;

        for record in self.table.raw_records() {
            lat += usize::from(!record.latitude.is_nan());
            lng += usize::from(!record.longitude.is_nan());
            desc += 1;
            zip += usize::from(record.zip.is_some());
            title += 1;
            timestamp += 1;
            twp += usize::from(record.township.is_some());
            addr += usize::from(record.address.is_some());
        }

        [
            ("lat", lat, ValueKind::Float),
            ("lng", lng, ValueKind::Float),
            ("desc", desc, ValueKind::Text),
            ("zip", zip, ValueKind::Text),
            ("title", title, ValueKind::Text),
            ("timeStamp", timestamp, ValueKind::Text),
            ("twp", twp, ValueKind::Text),
            ("addr", addr, ValueKind::Text),
        ]
        .into_iter()
        .map(|(name, non_null, kind)| ColumnProfile {
            name: name.to_string(),
            non_null,
            kind,
        })
        .collect()
    }

    /// Totals, top-`n` zips and townships, distinct titles, column profile
    #[instrument(skip(self))]
    pub fn summarize(&self, n: usize) -> StatsSummary {
        let summary = StatsSummary {
            total_records: self.table.record_count(),
            top_zips: self.top_n(RawField::Zip, n),
            top_townships: self.top_n(RawField::Township, n),
            distinct_titles: self.distinct_titles(),
            columns: self.column_profile(),
        };
        debug!(
            total = summary.total_records,
            distinct_titles = summary.distinct_titles,
            "Summarized records"
        );
        summary
    }
}

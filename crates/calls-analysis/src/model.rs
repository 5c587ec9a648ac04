//! Record types for raw and augmented call tables

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One emergency-call event exactly as it was loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    /// Postal code; `None` when the source cell was empty
    pub zip: Option<String>,
    /// `"<Reason>: <Detail>"`, e.g. `"EMS: BACK PAINS/INJURY"`
    pub title: String,
    /// Raw timestamp text, parsed during feature extraction
    pub timestamp: String,
    pub township: Option<String>,
    pub address: Option<String>,
}

/// Day of the week, Monday first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Weekday index (0 = Monday) to symbol
const WEEKDAY_TABLE: [(DayOfWeek, &str); 7] = [
    (DayOfWeek::Mon, "Mon"),
    (DayOfWeek::Tue, "Tue"),
    (DayOfWeek::Wed, "Wed"),
    (DayOfWeek::Thu, "Thu"),
    (DayOfWeek::Fri, "Fri"),
    (DayOfWeek::Sat, "Sat"),
    (DayOfWeek::Sun, "Sun"),
];

impl DayOfWeek {
    /// All seven days in canonical order
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
        DayOfWeek::Sun,
    ];

    /// Look up a weekday index where 0 is Monday and 6 is Sunday
    pub fn from_index(index: u32) -> Option<Self> {
        WEEKDAY_TABLE.get(index as usize).map(|(day, _)| *day)
    }

    /// Position in the Monday-first order
    pub fn index(self) -> usize {
        self as usize
    }

    /// Three-letter label
    pub fn as_str(self) -> &'static str {
        WEEKDAY_TABLE[self.index()].1
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a record's reason came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReasonSource {
    /// Text before the first colon of the title
    Prefix,
    /// Title had no colon, so the whole title is the reason
    WholeTitle,
}

/// Fields computed by [`FeatureExtractor`](crate::FeatureExtractor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedFields {
    pub reason: String,
    pub reason_source: ReasonSource,
    /// 0..=23
    pub hour: u32,
    /// 1..=12
    pub month: u32,
    pub day_of_week: DayOfWeek,
    pub date: NaiveDate,
    pub timestamp: NaiveDateTime,
}

/// A raw record together with its derived fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedRecord {
    pub record: CallRecord,
    pub derived: DerivedFields,
}

/// Read access to the raw part of a table
pub trait RawRecords {
    /// Raw records in load order
    fn raw_records(&self) -> impl Iterator<Item = &CallRecord> + '_;

    /// Number of records
    fn record_count(&self) -> usize;
}

/// Ordered collection of raw call records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: Vec<CallRecord>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: CallRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CallRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[CallRecord] {
        &self.records
    }
}

impl From<Vec<CallRecord>> for RecordTable {
    fn from(records: Vec<CallRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<CallRecord> for RecordTable {
    fn from_iter<I: IntoIterator<Item = CallRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl RawRecords for RecordTable {
    fn raw_records(&self) -> impl Iterator<Item = &CallRecord> + '_ {
        self.records.iter()
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Ordered collection of augmented records
///
/// Only the feature extractor builds these, so every record carries a full
/// set of derived fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AugmentedTable {
    records: Vec<AugmentedRecord>,
}

impl AugmentedTable {
    pub(crate) fn from_records(records: Vec<AugmentedRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AugmentedRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[AugmentedRecord] {
        &self.records
    }

    /// Drop the derived fields and keep the raw table
    pub fn into_record_table(self) -> RecordTable {
        self.records.into_iter().map(|r| r.record).collect()
    }
}

impl<'a> IntoIterator for &'a AugmentedTable {
    type Item = &'a AugmentedRecord;
    type IntoIter = std::slice::Iter<'a, AugmentedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl RawRecords for AugmentedTable {
    fn raw_records(&self) -> impl Iterator<Item = &CallRecord> + '_ {
        self.records.iter().map(|r| &r.record)
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

//! Count aggregation over augmented call tables

use crate::model::{AugmentedRecord, AugmentedTable, DayOfWeek};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use tracing::{debug, instrument};

/// A derived field a table can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    DayOfWeek,
    Hour,
    Month,
    Date,
    Reason,
}

impl Dimension {
    /// Value of this dimension for one record
    pub fn value_of(self, record: &AugmentedRecord) -> DimensionValue {
        let derived = &record.derived;
        match self {
            Self::DayOfWeek => DimensionValue::Day(derived.day_of_week),
            Self::Hour => DimensionValue::Hour(derived.hour),
            Self::Month => DimensionValue::Month(derived.month),
            Self::Date => DimensionValue::Date(derived.date),
            Self::Reason => DimensionValue::Reason(derived.reason.clone()),
        }
    }

    /// Fixed key domain, for dimensions that have one
    pub fn known_domain(self) -> Option<Vec<DimensionValue>> {
        match self {
            Self::DayOfWeek => Some(DayOfWeek::ALL.iter().copied().map(DimensionValue::Day).collect()),
            Self::Hour => Some((0..24).map(DimensionValue::Hour).collect()),
            Self::Month => Some((1..=12).map(DimensionValue::Month).collect()),
            Self::Date | Self::Reason => None,
        }
    }

    /// Keys of this dimension in canonical order.
    ///
    /// Day, hour and month always give their full domain; date and reason
    /// give the distinct values present in `table`.
    pub fn domain(self, table: &AugmentedTable) -> Vec<DimensionValue> {
        self.known_domain().unwrap_or_else(|| {
            table
                .iter()
                .map(|record| self.value_of(record))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DayOfWeek => "Day of Week",
            Self::Hour => "Hour",
            Self::Month => "Month",
            Self::Date => "Date",
            Self::Reason => "Reason",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One key along a [`Dimension`]
///
/// Ordering within a dimension is canonical: Mon..Sun, 0..23, 1..12,
/// chronological dates, lexicographic reasons.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum DimensionValue {
    Day(DayOfWeek),
    Hour(u32),
    Month(u32),
    Date(NaiveDate),
    Reason(String),
}

impl DimensionValue {
    /// Numeric position usable as a plot coordinate
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Day(day) => Some(day.index() as f64),
            Self::Hour(hour) => Some(f64::from(*hour)),
            Self::Month(month) => Some(f64::from(*month)),
            Self::Date(_) | Self::Reason(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day(day) => write!(f, "{day}"),
            Self::Hour(hour) => write!(f, "{hour}"),
            Self::Month(month) => write!(f, "{month}"),
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Reason(reason) => f.write_str(reason),
        }
    }
}

/// Dense two-dimensional count table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationResult {
    row_dimension: Dimension,
    column_dimension: Dimension,
    rows: Vec<DimensionValue>,
    columns: Vec<DimensionValue>,
    counts: Vec<Vec<u64>>,
}

impl AggregationResult {
    fn zeroed(
        row_dimension: Dimension,
        column_dimension: Dimension,
        rows: Vec<DimensionValue>,
        columns: Vec<DimensionValue>,
    ) -> Self {
        let counts = vec![vec![0; columns.len()]; rows.len()];
        Self {
            row_dimension,
            column_dimension,
            rows,
            columns,
            counts,
        }
    }

    pub fn row_dimension(&self) -> Dimension {
        self.row_dimension
    }

    pub fn column_dimension(&self) -> Dimension {
        self.column_dimension
    }

    pub fn row_keys(&self) -> &[DimensionValue] {
        &self.rows
    }

    pub fn column_keys(&self) -> &[DimensionValue] {
        &self.columns
    }

    /// Row-major count matrix
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    /// Count for a key pair; 0 for any pair not in the table
    pub fn get(&self, row: &DimensionValue, column: &DimensionValue) -> u64 {
        let Some(r) = self.rows.iter().position(|k| k == row) else {
            return 0;
        };
        let Some(c) = self.columns.iter().position(|k| k == column) else {
            return 0;
        };
        self.counts[r][c]
    }

    /// Sum of every cell
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().sum()
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }

    /// Row vectors as floats, for distance computations
    pub fn row_vectors(&self) -> Vec<Vec<f64>> {
        self.counts
            .iter()
            .map(|row| row.iter().map(|&c| c as f64).collect())
            .collect()
    }

    /// Column vectors as floats
    pub fn column_vectors(&self) -> Vec<Vec<f64>> {
        (0..self.columns.len())
            .map(|c| self.counts.iter().map(|row| row[c] as f64).collect())
            .collect()
    }

    /// Same table with rows and columns permuted.
    ///
    /// Index lists that are not permutations of the current axes leave that
    /// axis unchanged.
    pub fn reordered(&self, row_order: &[usize], column_order: &[usize]) -> Self {
        let row_order = permutation_or_identity(row_order, self.rows.len());
        let column_order = permutation_or_identity(column_order, self.columns.len());

        let rows = row_order.iter().map(|&r| self.rows[r].clone()).collect();
        let columns = column_order.iter().map(|&c| self.columns[c].clone()).collect();
        let counts = row_order
            .iter()
            .map(|&r| column_order.iter().map(|&c| self.counts[r][c]).collect())
            .collect();

        Self {
            row_dimension: self.row_dimension,
            column_dimension: self.column_dimension,
            rows,
            columns,
            counts,
        }
    }
}

fn permutation_or_identity(order: &[usize], len: usize) -> Vec<usize> {
    let mut seen = vec![false; len];
    let valid = order.len() == len
        && order.iter().all(|&i| i < len && !std::mem::replace(&mut seen[i], true));
    if valid {
        order.to_vec()
    } else {
        (0..len).collect()
    }
}

/// Ordered one-dimensional counts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    dimension: Dimension,
    points: Vec<(DimensionValue, u64)>,
}

impl Series {
    pub fn new(dimension: Dimension, points: Vec<(DimensionValue, u64)>) -> Self {
        Self { dimension, points }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn points(&self) -> &[(DimensionValue, u64)] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Count for a key; 0 when the key is not in the series
    pub fn get(&self, key: &DimensionValue) -> u64 {
        self.points
            .iter()
            .find(|(k, _)| k == key)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.points.iter().map(|(_, count)| count).sum()
    }

    pub fn max_count(&self) -> u64 {
        self.points.iter().map(|(_, count)| *count).max().unwrap_or(0)
    }
}

/// Calls over time for a single reason
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReasonSeries {
    pub reason: String,
    pub series: Series,
}

/// Groups augmented tables and counts records
#[derive(Debug, Default, Clone, Copy)]
pub struct Aggregator;

impl Aggregator {
    pub fn new() -> Self {
        Self
    }

    /// Count records for every (row, column) key pair
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn pivot(&self, table: &AugmentedTable, row: Dimension, column: Dimension) -> AggregationResult {
        let mut result =
            AggregationResult::zeroed(row, column, row.domain(table), column.domain(table));

        let row_index = index_of(&result.rows);
        let column_index = index_of(&result.columns);

        for record in table {
            let r = row_index.get(&row.value_of(record));
            let c = column_index.get(&column.value_of(record));
            if let (Some(&r), Some(&c)) = (r, c) {
                result.counts[r][c] += 1;
            }
        }

        debug!(
            "Pivoted {} records into {}x{} {} by {} table",
            table.len(),
            result.rows.len(),
            result.columns.len(),
            row,
            column
        );
        result
    }

    /// Day of week (Mon..Sun) by hour (0..23)
    pub fn day_hour(&self, table: &AugmentedTable) -> AggregationResult {
        self.pivot(table, Dimension::DayOfWeek, Dimension::Hour)
    }

    /// Day of week (Mon..Sun) by month (1..12)
    pub fn day_month(&self, table: &AugmentedTable) -> AggregationResult {
        self.pivot(table, Dimension::DayOfWeek, Dimension::Month)
    }

    /// Count records per key of one dimension, zero-filled over its domain
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn count_by(&self, table: &AugmentedTable, dimension: Dimension) -> Series {
        let domain = dimension.domain(table);
        let index = index_of(&domain);
        let mut counts = vec![0u64; domain.len()];

        for record in table {
            if let Some(&i) = index.get(&dimension.value_of(record)) {
                counts[i] += 1;
            }
        }

        debug!("Counted {} records over {} {} keys", table.len(), domain.len(), dimension);
        Series::new(dimension, domain.into_iter().zip(counts).collect())
    }

    /// Calls per calendar date, chronological
    pub fn by_date(&self, table: &AugmentedTable) -> Series {
        self.count_by(table, Dimension::Date)
    }

    /// Calls per month, always twelve points
    pub fn by_month(&self, table: &AugmentedTable) -> Series {
        self.count_by(table, Dimension::Month)
    }

    /// Calls per reason, lexicographic
    pub fn by_reason(&self, table: &AugmentedTable) -> Series {
        self.count_by(table, Dimension::Reason)
    }

    /// Calls per date for each reason.
    ///
    /// Reasons come in the order they first appear in the table. Every series
    /// spans all dates of the table so they line up on a shared axis.
    #[instrument(skip(self, table), fields(records = table.len()))]
    pub fn by_date_per_reason(&self, table: &AugmentedTable) -> Vec<ReasonSeries> {
        let dates = Dimension::Date.domain(table);
        let date_index = index_of(&dates);

        let mut seen = HashSet::new();
        let mut reasons: Vec<&str> = Vec::new();
        for record in table {
            let reason = record.derived.reason.as_str();
            if seen.insert(reason) {
                reasons.push(reason);
            }
        }
        let reason_index: HashMap<&str, usize> =
            reasons.iter().enumerate().map(|(i, r)| (*r, i)).collect();

        let mut counts = vec![vec![0u64; dates.len()]; reasons.len()];
        for record in table {
            let r = reason_index[record.derived.reason.as_str()];
            if let Some(&d) = date_index.get(&DimensionValue::Date(record.derived.date)) {
                counts[r][d] += 1;
            }
        }

        debug!("Built {} per-reason date series over {} dates", reasons.len(), dates.len());
        reasons
            .into_iter()
            .zip(counts)
            .map(|(reason, row)| ReasonSeries {
                reason: reason.to_string(),
                series: Series::new(Dimension::Date, dates.iter().cloned().zip(row).collect()),
            })
            .collect()
    }
}

fn index_of(keys: &[DimensionValue]) -> HashMap<DimensionValue, usize> {
    keys.iter().enumerate().map(|(i, k)| (k.clone(), i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureExtractor;
    use crate::model::{CallRecord, RecordTable};

    fn record(title: &str, timestamp: &str) -> CallRecord {
        CallRecord {
            latitude: 40.1,
            longitude: -75.3,
            description: String::new(),
            zip: None,
            title: title.to_string(),
            timestamp: timestamp.to_string(),
            township: None,
            address: None,
        }
    }

    fn table(rows: &[(&str, &str)]) -> AugmentedTable {
        let raw: RecordTable = rows.iter().map(|(t, ts)| record(t, ts)).collect();
        FeatureExtractor::new().extract(&raw).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> DimensionValue {
        DimensionValue::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn sample() -> AugmentedTable {
        table(&[
            ("Traffic: VEHICLE ACCIDENT -", "2016-01-04 08:15:00"),
            ("EMS: FALL VICTIM", "2016-01-04 08:40:00"),
            ("Fire: FIRE ALARM", "2016-01-09 23:05:00"),
            ("EMS: CARDIAC EMERGENCY", "2016-02-14 03:30:00"),
            ("EMS: SEIZURES", "2016-01-09 23:59:59"),
        ])
    }

    #[test]
    fn test_day_hour_shape_and_counts() {
        let result = Aggregator::new().day_hour(&sample());
        assert_eq!(result.row_keys().len(), 7);
        assert_eq!(result.column_keys().len(), 24);
        assert_eq!(result.total(), 5);
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Mon), &DimensionValue::Hour(8)), 2);
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Sat), &DimensionValue::Hour(23)), 2);
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Sun), &DimensionValue::Hour(3)), 1);
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Tue), &DimensionValue::Hour(8)), 0);
        assert_eq!(result.max_count(), 2);
    }

    #[test]
    fn test_get_outside_domain_is_zero() {
        let result = Aggregator::new().day_month(&sample());
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Mon), &DimensionValue::Month(13)), 0);
        assert_eq!(result.get(&DimensionValue::Reason("EMS".into()), &DimensionValue::Month(1)), 0);
        assert_eq!(result.get(&DimensionValue::Day(DayOfWeek::Mon), &DimensionValue::Month(1)), 2);
    }

    #[test]
    fn test_day_rows_are_monday_first() {
        let result = Aggregator::new().day_month(&sample());
        let labels: Vec<String> = result.row_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(labels, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
        let months: Vec<String> = result.column_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(months.first().map(String::as_str), Some("1"));
        assert_eq!(months.len(), 12);
    }

    #[test]
    fn test_empty_table_keeps_known_domains() {
        let empty = AugmentedTable::default();
        let aggregator = Aggregator::new();

        let day_hour = aggregator.day_hour(&empty);
        assert_eq!((day_hour.row_keys().len(), day_hour.column_keys().len()), (7, 24));
        assert_eq!(day_hour.total(), 0);

        let by_month = aggregator.by_month(&empty);
        assert_eq!(by_month.len(), 12);
        assert_eq!(by_month.total(), 0);

        assert!(aggregator.by_date(&empty).is_empty());
        assert!(aggregator.by_reason(&empty).is_empty());
        assert!(aggregator.by_date_per_reason(&empty).is_empty());
    }

    #[test]
    fn test_by_date_is_chronological() {
        let series = Aggregator::new().by_date(&sample());
        let keys: Vec<&DimensionValue> = series.points().iter().map(|(k, _)| k).collect();
        assert_eq!(keys, [&date(2016, 1, 4), &date(2016, 1, 9), &date(2016, 2, 14)]);
        assert_eq!(series.get(&date(2016, 1, 9)), 2);
        assert_eq!(series.get(&date(2016, 3, 1)), 0);
    }

    #[test]
    fn test_by_reason_is_lexicographic() {
        let series = Aggregator::new().by_reason(&sample());
        let keys: Vec<String> = series.points().iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["EMS", "Fire", "Traffic"]);
        assert_eq!(series.get(&DimensionValue::Reason("EMS".into())), 3);
    }

    #[test]
    fn test_by_month_has_twelve_points() {
        let series = Aggregator::new().by_month(&sample());
        assert_eq!(series.len(), 12);
        assert_eq!(series.get(&DimensionValue::Month(1)), 4);
        assert_eq!(series.get(&DimensionValue::Month(2)), 1);
        assert_eq!(series.get(&DimensionValue::Month(7)), 0);
    }

    #[test]
    fn test_per_reason_series_align() {
        let per_reason = Aggregator::new().by_date_per_reason(&sample());
        let reasons: Vec<&str> = per_reason.iter().map(|s| s.reason.as_str()).collect();
        assert_eq!(reasons, ["Traffic", "EMS", "Fire"]);

        for entry in &per_reason {
            assert_eq!(entry.series.len(), 3);
        }
        let traffic = &per_reason[0].series;
        assert_eq!(traffic.get(&date(2016, 1, 4)), 1);
        assert_eq!(traffic.get(&date(2016, 2, 14)), 0);
        let ems = &per_reason[1].series;
        assert_eq!(ems.points().iter().map(|(_, c)| *c).collect::<Vec<_>>(), [1, 1, 1]);

        let total: u64 = per_reason.iter().map(|s| s.series.total()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_generic_pivot_reason_by_hour() {
        let result = Aggregator::new().pivot(&sample(), Dimension::Reason, Dimension::Hour);
        assert_eq!(result.row_keys().len(), 3);
        assert_eq!(result.column_keys().len(), 24);
        assert_eq!(result.get(&DimensionValue::Reason("EMS".into()), &DimensionValue::Hour(23)), 1);
        assert_eq!(result.row_dimension(), Dimension::Reason);
    }

    #[test]
    fn test_reordered() {
        let result = Aggregator::new().day_hour(&sample());
        let mut rows: Vec<usize> = (0..7).collect();
        rows.reverse();
        let columns: Vec<usize> = (0..24).collect();
        let flipped = result.reordered(&rows, &columns);

        assert_eq!(flipped.row_keys()[0], DimensionValue::Day(DayOfWeek::Sun));
        assert_eq!(flipped.total(), result.total());
        assert_eq!(
            flipped.get(&DimensionValue::Day(DayOfWeek::Mon), &DimensionValue::Hour(8)),
            result.get(&DimensionValue::Day(DayOfWeek::Mon), &DimensionValue::Hour(8))
        );

        let unchanged = result.reordered(&[0, 0, 1], &columns);
        assert_eq!(unchanged, result);
    }

    #[test]
    fn test_serializes_keys_as_labels() {
        let series = Aggregator::new().by_date(&sample());
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["dimension"], "date");
        assert_eq!(json["points"][0][0], "2016-01-04");
        assert_eq!(json["points"][0][1], 2);

        let day_hour = serde_json::to_value(Aggregator::new().day_hour(&sample())).unwrap();
        assert_eq!(day_hour["rows"][0], "Mon");
    }
}

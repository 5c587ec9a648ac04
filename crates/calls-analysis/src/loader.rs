//! CSV input for call records

use crate::model::{CallRecord, RecordTable};
use calls_common::{CallsError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Columns every input file must carry. Others are ignored.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "lat",
    "lng",
    "desc",
    "zip",
    "title",
    "timeStamp",
    "twp",
    "addr",
];

/// Header position of each required column
struct ColumnIndex {
    lat: usize,
    lng: usize,
    desc: usize,
    zip: usize,
    title: usize,
    timestamp: usize,
    twp: usize,
    addr: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CallsError::load(format!(
                "Missing required column(s): {}",
                missing.join(", ")
            )));
        }

        let find = |name: &str| {
            position(name).ok_or_else(|| CallsError::load(format!("Missing required column: {name}")))
        };
        Ok(Self {
            lat: find("lat")?,
            lng: find("lng")?,
            desc: find("desc")?,
            zip: find("zip")?,
            title: find("title")?,
            timestamp: find("timeStamp")?,
            twp: find("twp")?,
            addr: find("addr")?,
        })
    }
}

/// Reads Montgomery County style 911 exports
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvLoader;

impl CsvLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load every record from a CSV file
    #[instrument(skip(self, path), fields(path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> Result<RecordTable> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            CallsError::load_with_source(format!("Cannot open {}", path.display()), e)
        })?;

        let table = self.load_reader(file).map_err(|e| match e {
            CallsError::Load { message, path: None, source } => CallsError::Load {
                message,
                path: Some(path.display().to_string()),
                source,
            },
            other => other,
        })?;

        info!("Loaded {} records from {}", table.len(), path.display());
        Ok(table)
    }

    /// Load every record from any CSV byte source
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<RecordTable> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(CallsError::load("CSV input has no header row"));
        }
        let columns = ColumnIndex::from_headers(&headers)?;

        let mut table = RecordTable::new();
        for (row, result) in reader.records().enumerate() {
            let record = result?;
            // Line 1 is the header
            table.push(parse_row(&record, &columns, row + 2)?);
        }

        debug!("Parsed {} CSV rows", table.len());
        Ok(table)
    }
}

fn parse_row(record: &StringRecord, columns: &ColumnIndex, line: usize) -> Result<CallRecord> {
    // Free text is stored as read; only typed cells are trimmed
    let raw = |i: usize| record.get(i).unwrap_or("");
    let typed = |i: usize| raw(i).trim();

    Ok(CallRecord {
        latitude: parse_coordinate(typed(columns.lat), "lat", line)?,
        longitude: parse_coordinate(typed(columns.lng), "lng", line)?,
        description: raw(columns.desc).to_string(),
        zip: nullable(typed(columns.zip)).map(normalize_zip),
        title: raw(columns.title).to_string(),
        timestamp: typed(columns.timestamp).to_string(),
        township: nullable(raw(columns.twp)).map(str::to_string),
        address: nullable(raw(columns.addr)).map(str::to_string),
    })
}

/// Blank cells load as NaN, anything else must be a number
fn parse_coordinate(value: &str, column: &str, line: usize) -> Result<f64> {
    if value.is_empty() {
        return Ok(f64::NAN);
    }
    value.parse::<f64>().map_err(|e| {
        CallsError::load_with_source(
            format!("Column '{column}' on line {line} is not a number: '{value}'"),
            e,
        )
    })
}

fn nullable(value: &str) -> Option<&str> {
    (!value.trim().is_empty()).then_some(value)
}

/// Strip the `.0` a float-typed export leaves on numeric zip codes
fn normalize_zip(zip: &str) -> String {
    match zip.strip_suffix(".0") {
        Some(digits) if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            digits.to_string()
        }
        _ => zip.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calls_common::test_utils::csv_fixtures::{document, row, SAMPLE, SAMPLE_ROWS};
    use calls_common::test_utils::write_temp_csv;
    use crate::features::split_reason;
    use crate::stats::StatsSummarizer;

    #[test]
    fn test_load_sample() {
        let table = CsvLoader::new().load_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), SAMPLE_ROWS);

        let first = &table.records()[0];
        assert_eq!(first.title, "EMS: BACK PAINS/INJURY");
        assert_eq!(first.zip.as_deref(), Some("19525"));
        assert_eq!(first.township.as_deref(), Some("NEW HANOVER"));
        assert!((first.latitude - 40.2978759).abs() < 1e-9);
        assert_eq!(first.timestamp, "2015-12-10 17:40:00");

        assert_eq!(table.records()[4].zip, None);
    }

    #[test]
    fn test_column_order_is_free() {
        let input = "title,timeStamp,twp,addr,zip,desc,lng,lat\n\
                     EMS: FALL VICTIM,2016-01-04 08:15:00,NORRISTOWN,HAWS AVE,19401.0,HAWS AVE;,-75.35,40.12\n";
        let table = CsvLoader::new().load_reader(input.as_bytes()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.title, "EMS: FALL VICTIM");
        assert_eq!(record.zip.as_deref(), Some("19401"));
        assert!((record.longitude + 75.35).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column() {
        let input = "lat,lng,desc,zip,title,twp,addr\n40.1,-75.3,d,19401,EMS: X,NORRISTOWN,A\n";
        let err = CsvLoader::new().load_reader(input.as_bytes()).unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("timeStamp"));
    }

    #[test]
    fn test_non_numeric_latitude() {
        let input = document(&[row("EMS: X", "2016-01-04 08:15:00")]).replace("40.1211818", "north");
        let err = CsvLoader::new().load_reader(input.as_bytes()).unwrap_err();
        assert!(err.is_load());
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_blank_coordinate_loads_as_nan() {
        let input = document(&[
            row("EMS: X", "2016-01-04 08:15:00"),
            row("Fire: Y", "2016-01-04 09:15:00"),
        ])
        .replacen("40.1211818", "", 1);
        let table = CsvLoader::new().load_reader(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.records()[0].latitude.is_nan());
        assert!(!table.records()[0].longitude.is_nan());

        let columns = StatsSummarizer::new(&table).column_profile();
        let non_null = |name: &str| columns.iter().find(|c| c.name == name).unwrap().non_null;
        assert_eq!(non_null("lat"), table.len() - 1);
        assert_eq!(non_null("lng"), table.len());
    }

    #[test]
    fn test_free_text_is_kept_verbatim() {
        let input = document(&[row("  EMS : X", " 2016-01-04 08:15:00 ")]);
        let table = CsvLoader::new().load_reader(input.as_bytes()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.title, "  EMS : X");
        assert_eq!(record.timestamp, "2016-01-04 08:15:00");
        assert_eq!(split_reason(&record.title).0, "  EMS ");
    }

    #[test]
    fn test_empty_input() {
        let err = CsvLoader::new().load_reader("".as_bytes()).unwrap_err();
        assert!(err.is_load());
    }

    #[test]
    fn test_header_only() {
        let table = CsvLoader::new()
            .load_reader(document(&[]).as_bytes())
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let file = write_temp_csv(SAMPLE);
        let table = CsvLoader::new().load(file.path()).unwrap();
        assert_eq!(table.len(), SAMPLE_ROWS);

        let err = CsvLoader::new().load("/no/such/calls.csv").unwrap_err();
        assert!(err.is_load());
    }

    #[test]
    fn test_error_carries_path() {
        let file = write_temp_csv("lat,lng\n1,2\n");
        match CsvLoader::new().load(file.path()).unwrap_err() {
            CallsError::Load { path, .. } => {
                assert_eq!(path, Some(file.path().display().to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_normalize_zip() {
        assert_eq!(normalize_zip("19401.0"), "19401");
        assert_eq!(normalize_zip("19401"), "19401");
        assert_eq!(normalize_zip("AB.0"), "AB.0");
        assert_eq!(normalize_zip(".0"), ".0");
    }
}

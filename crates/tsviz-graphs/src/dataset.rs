//! Page view dataset and its CSV loader.

use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};
use tsviz_common::{parse_count, parse_iso_date, Record, Result, VisualizerError};

/// Ordered daily page view records, in source file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<Record>,
}

/// Raw CSV row before typed decoding.
#[derive(Debug, Deserialize)]
struct RawRow {
    date: String,
    value: String,
}

impl Dataset {
    /// Creates a dataset from records already in chronological order.
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    /// Loads a `date,value` CSV file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                VisualizerError::FileNotFound(path.to_path_buf())
            } else {
                VisualizerError::Io(e)
            }
        })?;

        let dataset = Self::from_reader(file)?;
        info!("Loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Parses `date,value` CSV from any reader.
    ///
    /// The header row is required; columns are matched by name and extra
    /// columns are ignored. The first bad row aborts the whole load.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
            // records start on line 2, after the header
            let line = idx as u64 + 2;
            let row = row.map_err(|e| csv_error(e, line))?;
            records.push(decode_row(&row, line)?);
        }

        debug!("Parsed {} CSV rows", records.len());
        Ok(Self { records })
    }

    /// The records in order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the dataset, returning its records.
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether there are no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Iterates over the page view counts in order.
    pub fn values(&self) -> impl Iterator<Item = u64> + '_ {
        self.records.iter().map(|r| r.value)
    }

    /// First record, if any.
    pub fn first(&self) -> Option<&Record> {
        self.records.first()
    }

    /// Last record, if any.
    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Largest page view count, if any.
    pub fn max_value(&self) -> Option<u64> {
        self.values().max()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn decode_row(row: &RawRow, line: u64) -> Result<Record> {
    let date = parse_iso_date(&row.date)
        .ok_or_else(|| VisualizerError::parse(line, format!("invalid date '{}'", row.date)))?;
    let value = parse_count(&row.value).ok_or_else(|| {
        VisualizerError::parse(line, format!("invalid page view count '{}'", row.value))
    })?;
    Ok(Record::new(date, value))
}

fn csv_error(error: csv::Error, fallback_line: u64) -> VisualizerError {
    let line = error.position().map_or(fallback_line, csv::Position::line);
    let message = error.to_string();
    match error.into_kind() {
        csv::ErrorKind::Io(io) => VisualizerError::Io(io),
        _ => VisualizerError::parse(line, message),
    }
}

use crate::error::{Result, WeatherError};
use crate::models::{ColumnKind, ColumnSchema, Record, Schema, Value, WeatherDataset};
use crate::models::value::is_missing_token;
use crate::utils::constants::{DATE_FORMATS, DEFAULT_BUFFER_SIZE, DEFAULT_DATE_COLUMN};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Parse a date cell in any of the [`DATE_FORMATS`].
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Load a weather CSV with the default date column.
pub fn load(path: impl AsRef<Path>) -> Result<WeatherDataset> {
    DatasetLoader::new().load(path.as_ref())
}

/// Reads a CSV file with a header row into a [`WeatherDataset`].
pub struct DatasetLoader {
    date_column: Option<String>,
    delimiter: u8,
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self {
            date_column: None,
            delimiter: b',',
        }
    }

    pub fn with_date_column(mut self, name: impl Into<String>) -> Self {
        self.date_column = Some(name.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn load(&self, path: &Path) -> Result<WeatherDataset> {
        if !path.exists() {
            return Err(WeatherError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path)?;
        let reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let dataset = self.read(reader)?;

        info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.get_columns().len(),
            cities = dataset.get_cities().len(),
            "Loaded weather dataset"
        );
        debug!(cities = ?dataset.get_cities(), "Detected cities");

        Ok(dataset)
    }

    /// Read CSV text from any reader.
    pub fn read<R: Read>(&self, reader: R) -> Result<WeatherDataset> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(|h| h.is_empty()) {
            return Err(WeatherError::InvalidFormat(
                "CSV input has no header row".to_string(),
            ));
        }
        let date_index = self.find_date_column(&headers)?;

        let mut rows: Vec<StringRecord> = Vec::new();
        for result in csv_reader.records() {
            rows.push(result?);
        }

        let kinds: Vec<ColumnKind> = (0..headers.len())
            .map(|i| {
                if i == date_index {
                    ColumnKind::Date
                } else {
                    infer_kind(rows.iter().map(|r| r.get(i).unwrap_or("")))
                }
            })
            .collect();

        let mut records = Vec::with_capacity(rows.len());
        for (row, raw) in rows.iter().enumerate() {
            records.push(self.parse_row(raw, row + 1, date_index, &kinds)?);
        }

        let columns = headers
            .iter()
            .zip(&kinds)
            .map(|(name, kind)| ColumnSchema::new(name.as_str(), *kind))
            .collect();
        let schema = Schema::new(columns, &headers[date_index])?;

        WeatherDataset::new(schema, records)
    }

    fn find_date_column(&self, headers: &[String]) -> Result<usize> {
        let wanted = self.date_column.as_deref().unwrap_or(DEFAULT_DATE_COLUMN);

        headers
            .iter()
            .position(|h| h == wanted)
            .or_else(|| headers.iter().position(|h| h.eq_ignore_ascii_case(wanted)))
            .ok_or_else(|| {
                WeatherError::InvalidFormat(format!("Missing date column '{}'", wanted))
            })
    }

    fn parse_row(
        &self,
        raw: &StringRecord,
        row: usize,
        date_index: usize,
        kinds: &[ColumnKind],
    ) -> Result<Record> {
        let date_cell = raw.get(date_index).unwrap_or("");
        let date = parse_date(date_cell).ok_or_else(|| WeatherError::DateParse {
            value: date_cell.to_string(),
            row,
        })?;

        let values = raw
            .iter()
            .zip(kinds)
            .enumerate()
            .map(|(i, (cell, kind))| {
                if i == date_index {
                    Value::Date(date)
                } else {
                    Value::from_raw(cell, *kind)
                }
            })
            .collect();

        Ok(Record::new(date, values))
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// A column is numeric when every non-missing cell parses as a number.
/// `inf` and friends count as numbers here and load as missing.
fn infer_kind<'a>(cells: impl Iterator<Item = &'a str>) -> ColumnKind {
    let all_numeric = cells
        .filter(|c| !is_missing_token(c))
        .all(|c| c.parse::<f64>().is_ok());

    if all_numeric {
        ColumnKind::Numeric
    } else {
        ColumnKind::Text
    }
}

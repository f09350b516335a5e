use crate::error::{Result, WeatherError};
use crate::models::column::{normalize_city, ColumnId};
use crate::models::season::Season;
use crate::models::value::{ColumnKind, Value};
use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

impl ColumnSchema {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Column layout shared by a dataset and every dataset filtered from it.
#[derive(Debug, Clone)]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    index: HashMap<String, usize>,
    date_index: usize,
    cities: Vec<String>,
}

impl Schema {
    pub fn new(columns: Vec<ColumnSchema>, date_column: &str) -> Result<Self> {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if index.insert(column.name.clone(), i).is_some() {
                return Err(WeatherError::InvalidFormat(format!(
                    "Duplicate column name: '{}'",
                    column.name
                )));
            }
        }

        let date_index = *index.get(date_column).ok_or_else(|| {
            WeatherError::InvalidFormat(format!("Missing date column '{}'", date_column))
        })?;
        if columns[date_index].kind != ColumnKind::Date {
            return Err(WeatherError::InvalidFormat(format!(
                "Column '{}' is not a date column",
                date_column
            )));
        }

        let mut cities: Vec<String> = Vec::new();
        for (i, column) in columns.iter().enumerate() {
            if i == date_index {
                continue;
            }
            if let Some(id) = ColumnId::parse(&column.name) {
                if !cities.contains(&id.city) {
                    cities.push(id.city);
                }
            }
        }

        Ok(Self {
            columns,
            index,
            date_index,
            cities,
        })
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn date_column(&self) -> &str {
        &self.columns[self.date_index].name
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.position(name).map(|i| self.columns[i].kind)
    }

    /// Iterate the city columns as parsed identifiers together with their names.
    fn city_columns(&self) -> impl Iterator<Item = (ColumnId, &str)> + '_ {
        self.columns
            .iter()
            .enumerate()
            .filter(move |(i, _)| *i != self.date_index)
            .filter_map(|(_, c)| ColumnId::parse(&c.name).map(|id| (id, c.name.as_str())))
    }
}

/// One row of the weather table.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    pub values: Vec<Value>,
}

impl Record {
    pub fn new(date: NaiveDate, values: Vec<Value>) -> Self {
        Self { date, values }
    }

    pub fn get<'a>(&'a self, schema: &Schema, column: &str) -> Option<&'a Value> {
        schema.position(column).and_then(|i| self.values.get(i))
    }
}

/// Immutable snapshot of a weather table.
///
/// Filters never modify the receiver; they return a new dataset sharing the
/// same [`Schema`].
///
/// ```
/// use weather_stats::readers::DatasetLoader;
///
/// let csv = "DATE,UT_temp_mean,DE_BILT_temp_mean\n20200115,5,3\n20200615,25,18\n";
/// let dataset = DatasetLoader::new().read(csv.as_bytes()).unwrap();
///
/// assert!(dataset.has_city("UT"));
/// assert!(dataset.has_city("DE"));
/// assert_eq!(dataset.filter_by_month(1).unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct WeatherDataset {
    schema: Arc<Schema>,
    records: Vec<Record>,
}

impl WeatherDataset {
    pub fn new(schema: Schema, records: Vec<Record>) -> Result<Self> {
        let width = schema.columns.len();
        if let Some((row, _)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != width)
        {
            return Err(WeatherError::InvalidFormat(format!(
                "Row {} does not have {} columns",
                row + 1,
                width
            )));
        }

        Ok(Self {
            schema: Arc::new(schema),
            records,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Return the full row collection.
    pub fn get_data(&self) -> &[Record] {
        &self.records
    }

    /// Return the column names in file order, date column included.
    pub fn get_columns(&self) -> Vec<&str> {
        self.schema.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.schema.index.contains_key(name)
    }

    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.schema.kind(name)
    }

    /// City identifiers parsed from `<CITY>_<metric>` column names, in the
    /// order they first appear.
    pub fn get_cities(&self) -> &[String] {
        &self.schema.cities
    }

    pub fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.schema.cities.iter().map(String::as_str)
    }

    pub fn has_city(&self, city: &str) -> bool {
        let city = normalize_city(city.trim());
        self.schema.cities.iter().any(|c| c == city)
    }

    /// Resolve the column holding `metric` for `city`, e.g. (`DE`, `temp_mean`)
    /// to `DE_BILT_temp_mean`.
    pub fn column_for(&self, city: &str, metric: &str) -> Option<&str> {
        let wanted = ColumnId::new(city.trim(), metric.trim());
        self.schema
            .city_columns()
            .find(|(id, _)| *id == wanted)
            .map(|(_, name)| name)
    }

    pub fn metrics_for(&self, city: &str) -> Vec<String> {
        let city = normalize_city(city.trim());
        self.schema
            .city_columns()
            .filter(|(id, _)| id.city == city)
            .map(|(id, _)| id.metric)
            .collect()
    }

    pub fn column_values(&self, name: &str) -> Result<impl Iterator<Item = &Value> + '_> {
        let position = self
            .schema
            .position(name)
            .ok_or_else(|| WeatherError::ColumnNotFound(name.to_string()))?;
        Ok(self.records.iter().map(move |r| &r.values[position]))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date in the dataset.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date;
        Some(self.records.iter().fold((first, first), |(lo, hi), r| {
            (lo.min(r.date), hi.max(r.date))
        }))
    }

    /// Keep rows from the given month (1-12) across all years.
    pub fn filter_by_month(&self, month: u32) -> Result<WeatherDataset> {
        validate_month(month)?;
        Ok(self.filter_records("month", |r| r.date.month() == month))
    }

    pub fn filter_by_year(&self, year: i32) -> Result<WeatherDataset> {
        Ok(self.filter_records("year", |r| r.date.year() == year))
    }

    pub fn filter_by_month_and_year(&self, month: u32, year: i32) -> Result<WeatherDataset> {
        validate_month(month)?;
        Ok(self.filter_records("month_and_year", |r| {
            r.date.month() == month && r.date.year() == year
        }))
    }

    /// Keep rows with `start <= date <= end`.
    pub fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<WeatherDataset> {
        if start > end {
            return Err(WeatherError::InvalidDateRange { start, end });
        }
        Ok(self.filter_records("date_range", |r| r.date >= start && r.date <= end))
    }

    /// Keep rows whose month falls in the named season (spring, summer, fall
    /// or winter, case-insensitive).
    pub fn filter_by_season(&self, season: &str) -> Result<WeatherDataset> {
        let season: Season = season.parse()?;
        Ok(self.filter_season(season))
    }

    pub fn filter_season(&self, season: Season) -> WeatherDataset {
        self.filter_records("season", |r| season.contains_month(r.date.month()))
    }

    fn filter_records<F>(&self, filter: &str, keep: F) -> WeatherDataset
    where
        F: Fn(&Record) -> bool,
    {
        let records: Vec<Record> = self.records.iter().filter(|r| keep(r)).cloned().collect();
        debug!(
            filter,
            before = self.records.len(),
            after = records.len(),
            "Applied dataset filter"
        );
        WeatherDataset {
            schema: Arc::clone(&self.schema),
            records,
        }
    }
}

fn validate_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(WeatherError::InvalidMonth(month))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_dataset() -> WeatherDataset {
        let schema = Schema::new(
            vec![
                ColumnSchema::new("DATE", ColumnKind::Date),
                ColumnSchema::new("SLC_temp_mean", ColumnKind::Numeric),
                ColumnSchema::new("SLC_temp_max", ColumnKind::Numeric),
                ColumnSchema::new("LA_temp_mean", ColumnKind::Numeric),
                ColumnSchema::new("DE_temp_mean", ColumnKind::Numeric),
                ColumnSchema::new("MONTH", ColumnKind::Numeric),
            ],
            "DATE",
        )
        .unwrap();

        let rows = [
            (date(2019, 12, 20), [30.0, 35.0, 60.0, 1.0, 12.0]),
            (date(2020, 1, 15), [40.0, 45.0, 65.0, 2.0, 1.0]),
            (date(2020, 2, 10), [50.0, 40.0, 70.0, 3.0, 2.0]),
            (date(2020, 7, 4), [80.0, 90.0, 85.0, 20.0, 7.0]),
            (date(2021, 1, 3), [20.0, 25.0, 55.0, -1.0, 1.0]),
        ];
        let records = rows
            .iter()
            .map(|(d, vals)| {
                let mut values = vec![Value::Date(*d)];
                values.extend(vals.iter().map(|v| Value::Number(*v)));
                Record::new(*d, values)
            })
            .collect();

        WeatherDataset::new(schema, records).unwrap()
    }

    #[test]
    fn test_get_columns() {
        let dataset = sample_dataset();
        let columns = dataset.get_columns();

        assert_eq!(columns.len(), 6);
        assert_eq!(columns[0], "DATE");
        assert!(columns.contains(&"SLC_temp_mean"));
        assert!(dataset.has_column("LA_temp_mean"));
        assert!(!dataset.has_column("nonexistent_column"));
    }

    #[test]
    fn test_get_cities() {
        let dataset = sample_dataset();
        assert_eq!(dataset.get_cities(), &["SLC", "LA", "DE_BILT"]);
        assert_eq!(dataset.cities().count(), 3);
    }

    #[test]
    fn test_has_city_with_alias() {
        let dataset = sample_dataset();
        assert!(dataset.has_city("SLC"));
        assert!(dataset.has_city("DE"));
        assert!(dataset.has_city("DE_BILT"));
        assert!(!dataset.has_city("NYC"));
        assert!(!dataset.has_city("MONTH"));
    }

    #[test]
    fn test_column_for_and_metrics() {
        let dataset = sample_dataset();
        assert_eq!(dataset.column_for("DE_BILT", "temp_mean"), Some("DE_temp_mean"));
        assert_eq!(dataset.column_for("SLC", "temp_max"), Some("SLC_temp_max"));
        assert_eq!(dataset.column_for("SLC", "precipitation"), None);
        assert_eq!(dataset.metrics_for("SLC"), vec!["temp_mean", "temp_max"]);
    }

    #[test]
    fn test_filter_by_month_across_years() {
        let dataset = sample_dataset();
        let january = dataset.filter_by_month(1).unwrap();

        assert_eq!(january.len(), 2);
        assert!(january.get_data().iter().all(|r| r.date.month() == 1));
        // Receiver unchanged
        assert_eq!(dataset.len(), 5);
    }

    #[test]
    fn test_filter_rejects_bad_month() {
        let dataset = sample_dataset();
        assert!(dataset.filter_by_month(0).unwrap_err().is_value_error());
        assert!(dataset.filter_by_month(13).unwrap_err().is_value_error());
        assert!(dataset
            .filter_by_month_and_year(13, 2020)
            .unwrap_err()
            .is_value_error());
    }

    #[test]
    fn test_filter_by_year_and_month_year() {
        let dataset = sample_dataset();
        assert_eq!(dataset.filter_by_year(2020).unwrap().len(), 3);
        assert_eq!(dataset.filter_by_year(1999).unwrap().len(), 0);

        let jan_2021 = dataset.filter_by_month_and_year(1, 2021).unwrap();
        assert_eq!(jan_2021.len(), 1);
        assert_eq!(jan_2021.get_data()[0].date, date(2021, 1, 3));
    }

    #[test]
    fn test_filter_by_date_range_is_inclusive() {
        let dataset = sample_dataset();
        let range = dataset
            .filter_by_date_range(date(2020, 1, 15), date(2020, 7, 4))
            .unwrap();
        assert_eq!(range.len(), 3);

        let again = range
            .filter_by_date_range(date(2020, 1, 15), date(2020, 7, 4))
            .unwrap();
        assert_eq!(again.get_data(), range.get_data());
    }

    #[test]
    fn test_filter_by_date_range_rejects_reversed_bounds() {
        let dataset = sample_dataset();
        let err = dataset
            .filter_by_date_range(date(2020, 7, 4), date(2020, 1, 1))
            .unwrap_err();
        assert!(err.is_value_error());
    }

    #[test]
    fn test_filter_by_season() {
        let dataset = sample_dataset();
        let winter = dataset.filter_by_season("winter").unwrap();
        let months: Vec<u32> = winter.get_data().iter().map(|r| r.date.month()).collect();
        assert_eq!(months, vec![12, 1, 2, 1]);

        assert_eq!(dataset.filter_by_season("Summer").unwrap().len(), 1);
        assert!(dataset.filter_by_season("monsoon").unwrap_err().is_value_error());
    }

    #[test]
    fn test_date_bounds() {
        let dataset = sample_dataset();
        assert_eq!(
            dataset.date_bounds(),
            Some((date(2019, 12, 20), date(2021, 1, 3)))
        );
        assert_eq!(dataset.filter_by_year(1999).unwrap().date_bounds(), None);
    }

    #[test]
    fn test_record_lookup_by_name() {
        let dataset = sample_dataset();
        let first = &dataset.get_data()[0];
        assert_eq!(
            first.get(dataset.schema(), "LA_temp_mean"),
            Some(&Value::Number(60.0))
        );
        assert_eq!(first.get(dataset.schema(), "missing"), None);
    }

    #[test]
    fn test_schema_rejects_duplicates_and_missing_date() {
        let duplicate = Schema::new(
            vec![
                ColumnSchema::new("DATE", ColumnKind::Date),
                ColumnSchema::new("UT_temp_mean", ColumnKind::Numeric),
                ColumnSchema::new("UT_temp_mean", ColumnKind::Numeric),
            ],
            "DATE",
        );
        assert!(duplicate.is_err());

        let no_date = Schema::new(
            vec![ColumnSchema::new("UT_temp_mean", ColumnKind::Numeric)],
            "DATE",
        );
        assert!(no_date.is_err());
    }
}

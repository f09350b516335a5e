use crate::error::{Result, WeatherError};
use crate::models::{ColumnKind, WeatherDataset};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Descriptive statistics for one column of one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperatureSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub range: f64,
    pub mode: f64,
}

impl TemperatureSummary {
    /// Labelled statistics in display order.
    pub fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("Mean", self.mean),
            ("Median", self.median),
            ("Min", self.min),
            ("Max", self.max),
            ("Standard deviation", self.std_dev),
            ("Range", self.range),
            ("Mode", self.mode),
        ]
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.entries()
            .into_iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| value)
    }

    pub fn summary(&self) -> String {
        let mut out = format!("Values used: {}", self.count);
        for (name, value) in self.entries() {
            out.push_str(&format!("\n{}: {:.2}", name, value));
        }
        out
    }
}

/// Statistics over a single numeric column of a [`WeatherDataset`].
///
/// Missing cells are skipped. Every statistic is recomputed from the dataset
/// on each call.
pub struct WeatherStats<'a> {
    dataset: &'a WeatherDataset,
    column: String,
}

impl<'a> WeatherStats<'a> {
    /// Bind to `column`, which must exist and be numeric.
    pub fn new(dataset: &'a WeatherDataset, column: &str) -> Result<Self> {
        match dataset.column_kind(column) {
            None => Err(WeatherError::ColumnNotFound(column.to_string())),
            Some(ColumnKind::Numeric) => Ok(Self {
                dataset,
                column: column.to_string(),
            }),
            Some(_) => Err(WeatherError::NotNumeric(column.to_string())),
        }
    }

    /// Bind to the `<CITY>_<metric>` column for `city`.
    pub fn for_city(dataset: &'a WeatherDataset, city: &str, metric: &str) -> Result<Self> {
        if !dataset.has_city(city) {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }
        let column = dataset.column_for(city, metric).ok_or_else(|| {
            WeatherError::ColumnNotFound(format!("{}_{}", city.trim(), metric.trim()))
        })?;
        Self::new(dataset, column)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn mean(&self) -> Result<f64> {
        let values = self.values()?;
        Ok(mean_of(&values))
    }

    pub fn median(&self) -> Result<f64> {
        let values = self.sorted_values()?;
        let mid = values.len() / 2;
        if values.len() % 2 == 0 {
            Ok((values[mid - 1] + values[mid]) / 2.0)
        } else {
            Ok(values[mid])
        }
    }

    /// Most frequent value; ties go to the smallest value. `-0.0` and `0.0`
    /// count as the same value.
    pub fn mode(&self) -> Result<f64> {
        let mut values = self.values()?;
        for v in values.iter_mut() {
            if *v == 0.0 {
                *v = 0.0;
            }
        }
        values.sort_by(f64::total_cmp);

        let mut best = values[0];
        let mut best_count = 0;
        let mut run_start = 0;
        for i in 1..=values.len() {
            let run_ended = i == values.len() || values[i].total_cmp(&values[run_start]) != Ordering::Equal;
            if run_ended {
                let count = i - run_start;
                if count > best_count {
                    best = values[run_start];
                    best_count = count;
                }
                run_start = i;
            }
        }
        Ok(best)
    }

    pub fn min(&self) -> Result<f64> {
        let values = self.values()?;
        Ok(values.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> Result<f64> {
        let values = self.values()?;
        Ok(values.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Sample standard deviation (n - 1). A single value has a deviation of 0.
    pub fn std_dev(&self) -> Result<f64> {
        let values = self.values()?;
        if values.len() < 2 {
            return Ok(0.0);
        }
        let mean = mean_of(&values);
        let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        Ok((sum_sq / (values.len() - 1) as f64).sqrt())
    }

    pub fn range(&self) -> Result<f64> {
        Ok(self.max()? - self.min()?)
    }

    pub fn count(&self) -> usize {
        self.collect_values().len()
    }

    pub fn temperature_summary(&self) -> Result<TemperatureSummary> {
        let summary = TemperatureSummary {
            column: self.column.clone(),
            count: self.values()?.len(),
            mean: self.mean()?,
            median: self.median()?,
            min: self.min()?,
            max: self.max()?,
            std_dev: self.std_dev()?,
            range: self.range()?,
            mode: self.mode()?,
        };
        debug!(column = %self.column, count = summary.count, "Computed temperature summary");
        Ok(summary)
    }

    fn collect_values(&self) -> Vec<f64> {
        self.dataset
            .column_values(&self.column)
            .map(|cells| cells.filter_map(|v| v.as_f64()).collect())
            .unwrap_or_default()
    }

    fn values(&self) -> Result<Vec<f64>> {
        let values = self.collect_values();
        if values.is_empty() {
            return Err(WeatherError::EmptyColumn(self.column.clone()));
        }
        Ok(values)
    }

    fn sorted_values(&self) -> Result<Vec<f64>> {
        let mut values = self.values()?;
        values.sort_by(f64::total_cmp);
        Ok(values)
    }
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

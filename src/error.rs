use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

/// Coarse classification of a [`WeatherError`].
///
/// Callers that only care whether to re-prompt the user (value errors) or
/// abort (everything else) match on this instead of the full enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Format,
    Value,
    Other,
}

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid date '{value}' on row {row}")]
    DateParse { value: String, row: usize },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    #[error("City '{0}' not found in dataset")]
    CityNotFound(String),

    #[error("Invalid month {0}: must be between 1 and 12")]
    InvalidMonth(u32),

    #[error("Invalid season '{0}'. Must be one of: 'spring', 'summer', 'fall', 'winter'")]
    InvalidSeason(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Column '{0}' has no values to summarise")]
    EmptyColumn(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Chart rendering error: {0}")]
    Plot(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Input closed by user")]
    Cancelled,
}

impl WeatherError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WeatherError::NotFound { .. } => ErrorKind::NotFound,
            WeatherError::Csv(_) | WeatherError::DateParse { .. } | WeatherError::InvalidFormat(_) => {
                ErrorKind::Format
            }
            WeatherError::ColumnNotFound(_)
            | WeatherError::NotNumeric(_)
            | WeatherError::CityNotFound(_)
            | WeatherError::InvalidMonth(_)
            | WeatherError::InvalidSeason(_)
            | WeatherError::InvalidDateRange { .. }
            | WeatherError::EmptyColumn(_) => ErrorKind::Value,
            WeatherError::Io(_)
            | WeatherError::Config(_)
            | WeatherError::Validation(_)
            | WeatherError::Plot(_)
            | WeatherError::Json(_)
            | WeatherError::Cancelled => ErrorKind::Other,
        }
    }

    pub fn is_value_error(&self) -> bool {
        self.kind() == ErrorKind::Value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let missing = WeatherError::NotFound {
            path: PathBuf::from("nope.csv"),
        };
        assert_eq!(missing.kind(), ErrorKind::NotFound);
        assert_eq!(missing.to_string(), "File not found: nope.csv");

        assert_eq!(
            WeatherError::InvalidFormat("bad".to_string()).kind(),
            ErrorKind::Format
        );
        assert!(WeatherError::InvalidMonth(13).is_value_error());
        assert!(WeatherError::ColumnNotFound("x".to_string()).is_value_error());
        assert!(!WeatherError::Cancelled.is_value_error());
    }

    #[test]
    fn test_column_not_found_names_column() {
        let err = WeatherError::ColumnNotFound("UT_temp_mean".to_string());
        assert!(err.to_string().contains("UT_temp_mean"));
    }
}

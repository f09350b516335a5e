use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell tokens treated as missing data.
pub const MISSING_TOKENS: &[&str] = &["", "NA", "NaN", "nan", "null"];

pub fn is_missing_token(raw: &str) -> bool {
    MISSING_TOKENS.contains(&raw.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Date,
    Numeric,
    Text,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Date => "date",
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A single cell of a [`crate::models::Record`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

impl Value {
    /// Convert a raw CSV cell for a column of the given kind.
    ///
    /// Non-finite numbers (`inf`, `-infinity`) load as [`Value::Missing`].
    /// Date cells are converted by the loader, which knows the row number.
    pub fn from_raw(raw: &str, kind: ColumnKind) -> Self {
        if is_missing_token(raw) {
            return Value::Missing;
        }
        match kind {
            ColumnKind::Numeric => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map_or(Value::Missing, Value::Number),
            ColumnKind::Text | ColumnKind::Date => Value::Text(raw.trim().to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Missing => f.write_str("NA"),
        }
    }
}

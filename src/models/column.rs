use serde::{Deserialize, Serialize};
use std::fmt;

/// Short city codes that must be expanded before matching.
///
/// `DE_BILT` is the only city whose name contains an underscore, so a plain
/// split on the first `_` would cut it to `DE`.
pub const CITY_ALIASES: &[(&str, &str)] = &[("DE", "DE_BILT")];

/// Resolve a city code through [`CITY_ALIASES`].
pub fn normalize_city(city: &str) -> &str {
    CITY_ALIASES
        .iter()
        .find(|(short, _)| *short == city)
        .map(|(_, full)| *full)
        .unwrap_or(city)
}

/// A per-city measurement column named `<CITY>_<metric>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId {
    pub city: String,
    pub metric: String,
}

impl ColumnId {
    pub fn new(city: &str, metric: &str) -> Self {
        Self {
            city: normalize_city(city).to_string(),
            metric: metric.to_string(),
        }
    }

    /// Split a column name into its city and metric parts.
    ///
    /// Returns `None` for names without a city prefix (e.g. `DATE`, `MONTH`).
    pub fn parse(name: &str) -> Option<Self> {
        // Full alias names first, so DE_BILT_temp_mean keeps both words
        for (_, full) in CITY_ALIASES {
            if let Some(metric) = name
                .strip_prefix(full)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                if !metric.is_empty() {
                    return Some(Self::new(full, metric));
                }
            }
        }

        let (city, metric) = name.split_once('_')?;
        if city.is_empty() || metric.is_empty() {
            return None;
        }
        Some(Self::new(city, metric))
    }

    pub fn column_name(&self) -> String {
        format!("{}_{}", self.city, self.metric)
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.city, self.metric)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_column() {
        let id = ColumnId::parse("SLC_temp_mean").unwrap();
        assert_eq!(id.city, "SLC");
        assert_eq!(id.metric, "temp_mean");
    }

    #[test]
    fn test_parse_de_bilt_forms() {
        let full = ColumnId::parse("DE_BILT_temp_mean").unwrap();
        let short = ColumnId::parse("DE_temp_mean").unwrap();

        assert_eq!(full, short);
        assert_eq!(full.city, "DE_BILT");
        assert_eq!(full.metric, "temp_mean");
        assert_eq!(full.column_name(), "DE_BILT_temp_mean");
    }

    #[test]
    fn test_parse_rejects_unprefixed_names() {
        assert!(ColumnId::parse("DATE").is_none());
        assert!(ColumnId::parse("MONTH").is_none());
        assert!(ColumnId::parse("_temp").is_none());
        assert!(ColumnId::parse("UT_").is_none());
    }

    #[test]
    fn test_normalize_city() {
        assert_eq!(normalize_city("DE"), "DE_BILT");
        assert_eq!(normalize_city("DE_BILT"), "DE_BILT");
        assert_eq!(normalize_city("BASEL"), "BASEL");
    }
}

use crate::error::Result;
use crate::models::{Season, WeatherDataset};
use chrono::NaiveDate;
use std::borrow::Cow;

/// A row selection chosen at the prompt or on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSpec {
    AllTime,
    Month(u32),
    Year(i32),
    MonthAndYear { month: u32, year: i32 },
    DateRange { start: NaiveDate, end: NaiveDate },
    Season(Season),
}

impl FilterSpec {
    /// Combine command-line options into one filter. A date range wins over a
    /// season, and month and year together mean a single month of one year.
    pub fn from_options(
        month: Option<u32>,
        year: Option<i32>,
        range: Option<(NaiveDate, NaiveDate)>,
        season: Option<&str>,
    ) -> Result<Self> {
        if let Some((start, end)) = range {
            return Ok(FilterSpec::DateRange { start, end });
        }
        if let Some(season) = season {
            return Ok(FilterSpec::Season(season.parse()?));
        }
        Ok(match (month, year) {
            (Some(month), Some(year)) => FilterSpec::MonthAndYear { month, year },
            (Some(month), None) => FilterSpec::Month(month),
            (None, Some(year)) => FilterSpec::Year(year),
            (None, None) => FilterSpec::AllTime,
        })
    }

    pub fn apply<'a>(&self, dataset: &'a WeatherDataset) -> Result<Cow<'a, WeatherDataset>> {
        let filtered = match *self {
            FilterSpec::AllTime => return Ok(Cow::Borrowed(dataset)),
            FilterSpec::Month(month) => dataset.filter_by_month(month)?,
            FilterSpec::Year(year) => dataset.filter_by_year(year)?,
            FilterSpec::MonthAndYear { month, year } => {
                dataset.filter_by_month_and_year(month, year)?
            }
            FilterSpec::DateRange { start, end } => dataset.filter_by_date_range(start, end)?,
            FilterSpec::Season(season) => dataset.filter_season(season),
        };
        Ok(Cow::Owned(filtered))
    }

    /// Short description used in chart captions and file names.
    pub fn title(&self) -> String {
        match self {
            FilterSpec::AllTime => "All-time".to_string(),
            FilterSpec::Month(month) => format!("{} (all years)", month),
            FilterSpec::Year(year) => year.to_string(),
            FilterSpec::MonthAndYear { month, year } => format!("{}/{}", month, year),
            FilterSpec::DateRange { start, end } => format!("{} to {}", start, end),
            FilterSpec::Season(season) => format!("{} (all years)", season),
        }
    }
}

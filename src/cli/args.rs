use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "weather-stats")]
#[command(about = "Summary statistics for per-city weather CSV data")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short,
        long,
        global = true,
        help = "Weather CSV file [default: WeatherPredictionData/weather_prediction_dataset.csv]"
    )]
    pub data: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML) [default: weather-stats.toml]")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Name of the date column [default: DATE]")]
    pub date_column: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the loading spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prompt for a city and filter, then print statistics until 'Q'
    Interactive {
        #[arg(long, help = "Write an SVG chart for every summary into this directory")]
        plot_dir: Option<PathBuf>,
    },

    /// Print the temperature summary for one city
    Summary {
        #[arg(short, long, help = "City identifier, e.g. BASEL or DE_BILT")]
        city: String,

        #[arg(short, long, help = "Metric suffix of the column [default: temp_mean]")]
        metric: Option<String>,

        #[arg(long, help = "Month (1-12), across all years unless --year is given")]
        month: Option<u32>,

        #[arg(long, allow_hyphen_values = true)]
        year: Option<i32>,

        #[arg(long, requires = "to", help = "Start date (YYYY-MM-DD), inclusive")]
        from: Option<NaiveDate>,

        #[arg(long, requires = "from", help = "End date (YYYY-MM-DD), inclusive")]
        to: Option<NaiveDate>,

        #[arg(long, conflicts_with_all = ["month", "year", "from"], help = "spring, summer, fall or winter")]
        season: Option<String>,

        #[arg(long, default_value = "false", help = "Print the summary as JSON")]
        json: bool,

        #[arg(long, help = "Also write an SVG chart to this path")]
        plot: Option<PathBuf>,
    },

    /// List the cities found in the dataset
    Cities,

    /// List the dataset columns and their inferred kinds
    Columns,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_summary_with_range() {
        let cli = Cli::parse_from([
            "weather-stats",
            "--data",
            "weather.csv",
            "summary",
            "--city",
            "BASEL",
            "--from",
            "2001-01-01",
            "--to",
            "2001-12-31",
        ]);

        assert_eq!(cli.data, Some(PathBuf::from("weather.csv")));
        match cli.command {
            Commands::Summary { city, from, to, .. } => {
                assert_eq!(city, "BASEL");
                assert_eq!(from, NaiveDate::from_ymd_opt(2001, 1, 1));
                assert_eq!(to, NaiveDate::from_ymd_opt(2001, 12, 31));
            }
            _ => panic!("expected summary command"),
        }
    }

    #[test]
    fn test_from_requires_to() {
        let result = Cli::try_parse_from([
            "weather-stats",
            "summary",
            "--city",
            "BASEL",
            "--from",
            "2001-01-01",
        ]);
        assert!(result.is_err());
    }
}

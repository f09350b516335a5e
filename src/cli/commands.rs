use crate::analyzers::{TemperatureSummary, WeatherStats};
use crate::cli::args::{Cli, Commands};
use crate::cli::filter::FilterSpec;
use crate::cli::prompt::Prompter;
use crate::error::{Result, WeatherError};
use crate::models::{Season, WeatherDataset};
use crate::readers::DatasetLoader;
use crate::settings::Settings;
use crate::utils::constants::INPUT_DATE_FORMAT;
use crate::utils::filename::generate_chart_filename;
use crate::utils::logging::{init_logging, LogOptions};
use crate::utils::progress::ProgressReporter;
use crate::writers::ChartWriter;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::convert::Infallible;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info};

const FILTER_MENU: &str = "Options:
     1. All-time summary
     2. Filter by month
     3. Filter by year
     4. Filter by month and year
     5. Filter by date range
     6. Filter by season
     0. Return to city selection
";

pub fn run(cli: Cli) -> Result<()> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        settings.data_path = data;
    }
    if let Some(date_column) = cli.date_column {
        settings.date_column = date_column;
    }

    let logging = init_logging(&LogOptions {
        level: settings.log_level.clone(),
        verbose: cli.verbose,
        log_file: cli.log_file,
    });

    let mut stdout = std::io::stdout();
    let result = dispatch(cli.command, &settings, cli.quiet, &mut stdout);
    if let Err(ref e) = result {
        error!("{}", e);
    }

    logging.shutdown();
    result
}

/// Execute one subcommand. One-shot output goes to `out`; the interactive
/// session talks to stdin/stdout.
fn dispatch<W: Write>(
    command: Commands,
    settings: &Settings,
    quiet: bool,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Interactive { plot_dir } => {
            let dataset = load_dataset(settings, quiet)?;
            let options = SessionOptions {
                metric: settings.metric.clone(),
                plot_dir: plot_dir.or_else(|| settings.plot_dir.clone()),
                chart: ChartWriter::new().with_size(settings.plot_width, settings.plot_height),
            };
            let mut prompter = Prompter::stdio();
            run_session(&dataset, &options, &mut prompter)?;
        }

        Commands::Summary {
            city,
            metric,
            month,
            year,
            from,
            to,
            season,
            json,
            plot,
        } => {
            let dataset = load_dataset(settings, quiet || json)?;
            let filter = FilterSpec::from_options(month, year, from.zip(to), season.as_deref())?;
            let metric = metric.unwrap_or_else(|| settings.metric.clone());
            let report = SummaryReport::build(&dataset, &city, &metric, filter)?;

            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
            } else {
                writeln!(out, "{}", report.to_text())?;
            }

            if let Some(path) = plot {
                ChartWriter::new()
                    .with_size(settings.plot_width, settings.plot_height)
                    .write_summary(&report.summary, &report.chart_title(), &path)?;
                if !json {
                    writeln!(out, "Chart written to {}", path.display())?;
                }
            }
        }

        Commands::Cities => {
            let dataset = load_dataset(settings, quiet)?;
            for city in dataset.cities() {
                writeln!(out, "{}", city)?;
            }
        }

        Commands::Columns => {
            let dataset = load_dataset(settings, quiet)?;
            for column in dataset.schema().columns() {
                writeln!(out, "{} ({})", column.name, column.kind)?;
            }
        }
    }

    Ok(())
}

fn load_dataset(settings: &Settings, quiet: bool) -> Result<WeatherDataset> {
    let progress = ProgressReporter::new_spinner(
        &format!("Loading {}...", settings.data_path.display()),
        quiet,
    );
    let dataset = DatasetLoader::new()
        .with_date_column(settings.date_column.as_str())
        .load(&settings.data_path);

    match &dataset {
        Ok(d) => progress.finish_with_message(&format!("Loaded {} rows", d.len())),
        Err(_) => progress.finish_and_clear(),
    }
    dataset
}

/// Result of one summary request, ready for text or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub city: String,
    pub filter: String,
    pub rows: usize,
    pub summary: TemperatureSummary,
}

impl SummaryReport {
    pub fn build(
        dataset: &WeatherDataset,
        city: &str,
        metric: &str,
        filter: FilterSpec,
    ) -> Result<Self> {
        let city = city.trim().to_uppercase();
        let filtered = filter.apply(dataset)?;
        let summary = WeatherStats::for_city(&filtered, &city, metric)?.temperature_summary()?;

        Ok(Self {
            city,
            filter: filter.title(),
            rows: filtered.len(),
            summary,
        })
    }

    pub fn chart_title(&self) -> String {
        format!("Weather trends: {} - {}", self.city, self.filter)
    }

    pub fn to_text(&self) -> String {
        let mut out = format!("Temperature statistics for {}:", self.city);
        for (name, value) in self.summary.entries() {
            out.push_str(&format!("\n{}: {:.2}", name, value));
        }
        out
    }
}

pub struct SessionOptions {
    pub metric: String,
    pub plot_dir: Option<PathBuf>,
    pub chart: ChartWriter,
}

/// Interactive loop: pick a city, pick filters, print summaries. `Q` or end
/// of input ends the session.
pub fn run_session<R: BufRead, W: Write>(
    dataset: &WeatherDataset,
    options: &SessionOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    for city in dataset.cities() {
        prompter.say(city)?;
    }

    match city_loop(dataset, options, prompter) {
        Ok(()) | Err(WeatherError::Cancelled) => {
            prompter.say("Goodbye")?;
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn city_loop<R: BufRead, W: Write>(
    dataset: &WeatherDataset,
    options: &SessionOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    loop {
        let city = prompter.ask_until_valid(
            "Enter a city name for weather data (Enter 'Q' to quit): ",
            |s| Ok::<_, Infallible>(s.to_uppercase()),
            |s| s == "Q" || dataset.has_city(s),
            "City not found. Please try again.",
        )?;
        if city == "Q" {
            return Ok(());
        }
        info!(city = %city, "City selected");
        filter_loop(dataset, &city, options, prompter)?;
    }
}

fn filter_loop<R: BufRead, W: Write>(
    dataset: &WeatherDataset,
    city: &str,
    options: &SessionOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<()> {
    loop {
        prompter.say(FILTER_MENU)?;
        let choice: u32 = prompter.ask_until_valid(
            "Choose a filter option (0-6): ",
            |s| s.parse::<u32>(),
            |v| *v <= 6,
            "Enter a number between 0 and 6.",
        )?;

        let filter = match choice {
            0 => return Ok(()),
            2 => FilterSpec::Month(ask_month(prompter)?),
            3 => FilterSpec::Year(ask_year(dataset, prompter)?),
            4 => {
                let month = ask_month(prompter)?;
                let year = ask_year(dataset, prompter)?;
                FilterSpec::MonthAndYear { month, year }
            }
            5 => {
                let start = ask_date(prompter, "Enter start date (YYYY-MM-DD): ")?;
                let end = ask_date(prompter, "Enter end date (YYYY-MM-DD): ")?;
                FilterSpec::DateRange { start, end }
            }
            6 => FilterSpec::Season(prompter.ask_parsed(
                "Enter season (Winter, Spring, Summer, Fall): ",
                |s| s.parse::<Season>(),
                "Invalid season",
            )?),
            _ => FilterSpec::AllTime,
        };

        let report = match SummaryReport::build(dataset, city, &options.metric, filter) {
            Ok(report) => report,
            Err(WeatherError::EmptyColumn(_)) => {
                prompter.say(format!("No data available for {}.", filter.title()))?;
                continue;
            }
            Err(e) if e.is_value_error() => {
                error!("Filter error: {}", e);
                prompter.say(format!("Filter error: {}", e))?;
                continue;
            }
            Err(e) => return Err(e),
        };

        prompter.say(report.to_text())?;

        if let Some(dir) = &options.plot_dir {
            let path = generate_chart_filename(dir, city, &report.filter);
            options
                .chart
                .write_summary(&report.summary, &report.chart_title(), &path)?;
            prompter.say(format!("Chart written to {}", path.display()))?;
        }
    }
}

fn ask_month<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> Result<u32> {
    prompter.ask_until_valid(
        "Enter month (1-12): ",
        |s| s.parse::<u32>(),
        |m| (1..=12).contains(m),
        "Month must be 1-12",
    )
}

fn ask_year<R: BufRead, W: Write>(
    dataset: &WeatherDataset,
    prompter: &mut Prompter<R, W>,
) -> Result<i32> {
    let (first, last) = year_bounds(dataset);
    prompter.ask_until_valid(
        &format!("Enter year ({} - {}): ", first, last),
        |s| s.parse::<i32>(),
        |y| (first..=last).contains(y),
        &format!("Year must be between {} and {}", first, last),
    )
}

fn ask_date<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>, prompt: &str) -> Result<NaiveDate> {
    prompter.ask_parsed(
        prompt,
        |s| NaiveDate::parse_from_str(s, INPUT_DATE_FORMAT),
        "Invalid date format",
    )
}

fn year_bounds(dataset: &WeatherDataset) -> (i32, i32) {
    dataset
        .date_bounds()
        .map(|(first, last)| (first.year(), last.year()))
        .unwrap_or((i32::MIN, i32::MAX))
}

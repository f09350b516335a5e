use crate::error::Result;
use crate::utils::constants::{
    CONFIG_FILE_NAME, DEFAULT_DATA_PATH, DEFAULT_DATE_COLUMN, DEFAULT_LOG_LEVEL, DEFAULT_METRIC,
    DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_WIDTH, ENV_PREFIX,
};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Runtime configuration layered from defaults, an optional TOML file and
/// `WEATHER_STATS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    pub data_path: PathBuf,

    #[validate(length(min = 1))]
    pub date_column: String,

    #[validate(length(min = 1))]
    pub metric: String,

    pub plot_dir: Option<PathBuf>,

    #[validate(range(min = 200, max = 8000))]
    pub plot_width: u32,

    #[validate(range(min = 200, max = 8000))]
    pub plot_height: u32,

    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            date_column: DEFAULT_DATE_COLUMN.to_string(),
            metric: DEFAULT_METRIC.to_string(),
            plot_dir: None,
            plot_width: DEFAULT_PLOT_WIDTH,
            plot_height: DEFAULT_PLOT_HEIGHT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings. An explicit `config_path` must exist; otherwise
    /// `weather-stats.toml` in the working directory is used when present.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file_source = match config_path {
            Some(path) => File::from(path).format(FileFormat::Toml).required(true),
            None => File::new(CONFIG_FILE_NAME, FileFormat::Toml).required(false),
        };

        let settings: Settings = Config::builder()
            .set_default("data_path", DEFAULT_DATA_PATH)?
            .set_default("date_column", DEFAULT_DATE_COLUMN)?
            .set_default("metric", DEFAULT_METRIC)?
            .set_default("plot_width", i64::from(DEFAULT_PLOT_WIDTH))?
            .set_default("plot_height", i64::from(DEFAULT_PLOT_HEIGHT))?
            .set_default("log_level", DEFAULT_LOG_LEVEL)?
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }
}

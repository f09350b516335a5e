/// Dataset defaults
pub const DEFAULT_DATA_PATH: &str = "WeatherPredictionData/weather_prediction_dataset.csv";
pub const DEFAULT_DATE_COLUMN: &str = "DATE";
pub const DEFAULT_METRIC: &str = "temp_mean";

/// Accepted date cell formats, tried in order
pub const DATE_FORMATS: &[&str] = &["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"];

/// Format expected from users typing dates at the prompt
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// I/O
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB

/// Configuration sources
pub const CONFIG_FILE_NAME: &str = "weather-stats.toml";
pub const ENV_PREFIX: &str = "WEATHER_STATS";

/// Chart defaults
pub const DEFAULT_PLOT_WIDTH: u32 = 1280;
pub const DEFAULT_PLOT_HEIGHT: u32 = 720;

/// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

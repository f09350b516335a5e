pub mod weather_stats;

pub use weather_stats::{TemperatureSummary, WeatherStats};

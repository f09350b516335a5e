pub mod analyzers;
pub mod cli;
pub mod error;
pub mod models;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ErrorKind, Result, WeatherError};
pub use models::WeatherDataset;
pub use readers::load;

pub mod constants;
pub mod filename;
pub mod logging;
pub mod progress;

pub use constants::*;
pub use filename::generate_chart_filename;
pub use logging::{init_logging, LogOptions, LoggingHandle};
pub use progress::ProgressReporter;

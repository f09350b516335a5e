pub mod args;
pub mod commands;
pub mod filter;
pub mod prompt;

pub use args::{Cli, Commands};
pub use commands::{run, run_session, SessionOptions, SummaryReport};
pub use filter::FilterSpec;
pub use prompt::Prompter;

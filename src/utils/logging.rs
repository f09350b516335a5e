use std::fs::OpenOptions;
use std::path::PathBuf;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Level used when `RUST_LOG` is unset (e.g. "info").
    pub level: String,
    pub verbose: bool,
    pub log_file: Option<PathBuf>,
}

impl LogOptions {
    pub fn effective_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else if self.level.is_empty() {
            crate::utils::constants::DEFAULT_LOG_LEVEL
        } else {
            &self.level
        }
    }
}

/// Owns the background log writer. Dropping it flushes pending log lines.
pub struct LoggingHandle {
    _guard: Option<WorkerGuard>,
    log_file: Option<PathBuf>,
}

impl LoggingHandle {
    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Flush and close the file sink.
    pub fn shutdown(self) {
        debug!("Shutting down logging");
    }
}

/// Set up structured logging to stderr and, optionally, a log file.
///
/// A log file that cannot be opened is reported and skipped. Installing a
/// second global subscriber (as tests do) is ignored.
pub fn init_logging(options: &LogOptions) -> LoggingHandle {
    let level = options.effective_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("weather_stats={}", level)));

    let mut open_error = None;
    let (file_writer, guard) = match &options.log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                let (writer, guard) = tracing_appender::non_blocking(file);
                (Some(writer), Some(guard))
            }
            Err(e) => {
                open_error = Some((path.clone(), e));
                (None, None)
            }
        },
        None => (None, None),
    };

    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_target(false)
            .with_ansi(false)
            .with_writer(writer)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some((path, e)) = open_error {
        warn!("Could not open log file {}: {}", path.display(), e);
    }
    if installed {
        debug!("Logging initialized at level: {}", level);
    }

    LoggingHandle {
        log_file: guard.as_ref().and(options.log_file.clone()),
        _guard: guard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_effective_level() {
        let mut options = LogOptions::default();
        assert_eq!(options.effective_level(), "info");

        options.level = "warn".to_string();
        assert_eq!(options.effective_level(), "warn");

        options.verbose = true;
        assert_eq!(options.effective_level(), "debug");
    }

    #[test]
    fn test_unwritable_log_file_is_not_fatal() {
        let dir = TempDir::new().unwrap();
        let options = LogOptions {
            level: "info".to_string(),
            verbose: false,
            log_file: Some(dir.path().join("missing-dir").join("app.log")),
        };

        let handle = init_logging(&options);
        assert!(handle.log_file().is_none());
        handle.shutdown();
    }
}

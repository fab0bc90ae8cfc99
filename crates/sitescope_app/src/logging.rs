//! Logger setup for the sitescope binary.
//!
//! Stdout carries the result JSON, so log lines only ever go to stderr or a
//! log file.

use std::fs::File;
use std::path::PathBuf;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

pub const DEFAULT_LOG_FILE: &str = "sitescope.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogDestination {
    Terminal,
    /// Truncates the log file at startup.
    File,
    Both,
}

impl LogDestination {
    fn to_terminal(self) -> bool {
        matches!(self, LogDestination::Terminal | LogDestination::Both)
    }

    fn to_file(self) -> bool {
        matches!(self, LogDestination::File | LogDestination::Both)
    }
}

#[derive(Debug, Clone)]
pub struct LogSettings {
    pub destination: LogDestination,
    pub file: PathBuf,
    pub level: LevelFilter,
}

pub fn initialize(settings: &LogSettings) {
    let _ = CombinedLogger::init(build_loggers(settings));
}

/// A file that cannot be created falls back to stderr so a crawl is never
/// silent.
fn build_loggers(settings: &LogSettings) -> Vec<Box<dyn SharedLogger>> {
    let config = crawl_only_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if settings.destination.to_file() {
        match File::create(&settings.file) {
            Ok(file) => loggers.push(WriteLogger::new(settings.level, config.clone(), file)),
            Err(err) => eprintln!(
                "sitescope: cannot write log file {}: {err}",
                settings.file.display()
            ),
        }
    }
    if settings.destination.to_terminal() || loggers.is_empty() {
        loggers.push(TermLogger::new(
            settings.level,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }
    loggers
}

fn crawl_only_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_allow_str("sitescope")
        .build()
}

#[cfg(test)]
mod tests {
    use super::{build_loggers, LogDestination, LogSettings};
    use log::LevelFilter;

    fn settings(destination: LogDestination, file: std::path::PathBuf) -> LogSettings {
        LogSettings {
            destination,
            file,
            level: LevelFilter::Info,
        }
    }

    #[test]
    fn both_writes_to_file_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crawl.log");

        let loggers = build_loggers(&settings(LogDestination::Both, path.clone()));
        assert_eq!(loggers.len(), 2);
        assert!(path.exists());
    }

    #[test]
    fn unwritable_file_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("crawl.log");

        let loggers = build_loggers(&settings(LogDestination::File, path.clone()));
        assert_eq!(loggers.len(), 1);
        assert!(!path.exists());
    }
}

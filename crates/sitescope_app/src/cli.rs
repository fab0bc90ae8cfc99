use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sitescope_core::TaskKind;

use crate::logging::{LogDestination, DEFAULT_LOG_FILE};

/// Crawl a site for task-relevant pages and print them as JSON.
#[derive(Debug, Parser)]
#[command(name = "sitescope", version)]
pub struct Cli {
    /// Which keyword set and limits to crawl with.
    #[arg(value_enum)]
    pub task: TaskArg,

    /// Seed URL; its host is the only domain crawled.
    pub url: String,

    /// RON file with overrides for the task's built-in profile.
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Give up on the whole crawl after this many seconds.
    #[arg(long)]
    pub deadline_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Log file used by `--log file` and `--log both`.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// More log output; repeat for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print the JSON on one line.
    #[arg(long)]
    pub compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskArg {
    Quick,
    Product,
    Event,
}

impl From<TaskArg> for TaskKind {
    fn from(arg: TaskArg) -> Self {
        match arg {
            TaskArg::Quick => TaskKind::Quick,
            TaskArg::Product => TaskKind::Product,
            TaskArg::Event => TaskKind::Event,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, LogArg, TaskArg};
    use clap::Parser;

    #[test]
    fn parses_task_and_url_with_defaults() {
        let cli = Cli::try_parse_from(["sitescope", "event", "https://acme.test"]).unwrap();
        assert_eq!(cli.task, TaskArg::Event);
        assert_eq!(cli.url, "https://acme.test");
        assert_eq!(cli.log, LogArg::Terminal);
        assert!(cli.profile.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.log_file, std::path::Path::new("sitescope.log"));
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from([
            "sitescope",
            "quick",
            "http://example.com",
            "--profile",
            "quick.ron",
            "--deadline-secs",
            "30",
            "--log",
            "both",
            "--log-file",
            "/tmp/crawl.log",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.deadline_secs, Some(30));
        assert_eq!(cli.log, LogArg::Both);
        assert_eq!(cli.log_file, std::path::Path::new("/tmp/crawl.log"));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn rejects_unknown_task() {
        assert!(Cli::try_parse_from(["sitescope", "weekly", "http://example.com"]).is_err());
    }
}

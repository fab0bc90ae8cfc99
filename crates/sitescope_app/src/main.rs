mod cli;
mod logging;
mod profile;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn, level_for_verbosity};
use sitescope_core::{CrawlTask, ResultSet, TaskKind};
use sitescope_engine::{AcquisitionChain, CancellationToken, Crawler};

use crate::cli::Cli;
use crate::logging::LogSettings;
use crate::profile::load_profile;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::initialize(&LogSettings {
        destination: cli.log.into(),
        file: cli.log_file.clone(),
        level: level_for_verbosity(cli.verbose),
    });

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            engine_error!("{:#}", err);
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let kind = TaskKind::from(cli.task);
    let profile = load_profile(kind, cli.profile.as_deref())?;
    let task = CrawlTask::new(&cli.url, profile).context("rejected crawl request")?;

    let crawler = Crawler::for_task(&task).context("failed to build http client")?;
    let chain = AcquisitionChain::new().with(crawler);

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(cancel.clone(), cli.deadline_secs.map(Duration::from_secs));

    let results = chain.acquire(&task, cancel).await;
    if results.is_empty() {
        engine_warn!("No pages found for {}", task.seed());
    }
    print_results(&results, cli.compact)
}

/// Cancels the crawl on Ctrl-C or when the optional deadline passes.
fn spawn_cancel_triggers(cancel: CancellationToken, deadline: Option<Duration>) {
    tokio::spawn(async move {
        let deadline = async {
            match deadline {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::signal::ctrl_c() => {
                engine_info!("Interrupted, finishing with pages collected so far");
                cancel.cancel();
            }
            _ = deadline => {
                engine_info!("Deadline reached, finishing with pages collected so far");
                cancel.cancel();
            }
        }
    });
}

fn print_results(results: &ResultSet, compact: bool) -> Result<()> {
    for url in results.urls() {
        engine_debug!("Collected {url}");
    }
    let json = if compact {
        serde_json::to_string(results)
    } else {
        serde_json::to_string_pretty(results)
    }
    .context("failed to serialize results")?;
    println!("{json}");
    Ok(())
}

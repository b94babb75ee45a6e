pub(crate) mod config;
pub(crate) mod decision;
pub(crate) mod error;
pub(crate) mod forecast;
pub(crate) mod notify;
pub(crate) mod runway;
pub(crate) mod schedule;
pub(crate) mod wind;

use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use jiff::{Zoned, civil::DateTime};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::{
    config::AppConfig,
    decision::{DecisionEngine, RunStatus, report_failure},
    error::{ApplicationError, ApplicationResult},
    forecast::OpenMeteoClient,
    notify::NtfyNotifier,
};

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(long, short)]
    /// Config file layered over the built in defaults
    config: Option<PathBuf>,
    #[clap(long)]
    /// Decide as if the local time was this, e.g. 2025-08-12T21:30
    at: Option<DateTime>,
    #[clap(long)]
    /// Print the notification instead of sending it
    dry_run: bool,
}

fn local_now(cli: &Cli, config: &AppConfig) -> ApplicationResult<Zoned> {
    Ok(match cli.at {
        Some(at) => at.to_zoned(config.time_zone.clone())?,
        None => Zoned::now().with_time_zone(config.time_zone.clone()),
    })
}

async fn run(cli: Cli) -> ApplicationResult<RunStatus> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let mut notifier = NtfyNotifier::new(&config.notify)?;
    if cli.dry_run {
        notifier = notifier.dry_run();
    }

    // from here on every failure reaches the notifier
    let prepared = local_now(&cli, &config)
        .and_then(|now| Ok((now, OpenMeteoClient::new(&config)?)));
    let (now, source) = match prepared {
        Ok(prepared) => prepared,
        Err(e) => return Ok(report_failure(&notifier, &e).await),
    };
    debug!(%now, ?cli, "Starting");

    let engine = DecisionEngine::new(&source, &notifier, &config.schedule);
    Ok(engine.run(&now).await)
}

fn main() -> ExitCode {
    // stdout is reserved for the notification text
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let status = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ApplicationError::from)
        .and_then(|runtime| runtime.block_on(run(cli)));

    match status {
        Ok(status) => status.into(),
        Err(e) => {
            error!("Could not run plane forecast: {e}");
            ExitCode::FAILURE
        }
    }
}

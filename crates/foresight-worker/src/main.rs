//! Pipeline worker binary: one-shot runs and the scheduled beat.

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use foresight_core::config::Config;
use foresight_core::errors::{ForesightError, PipelineError};
use foresight_core::logging;
use foresight_core::traits::{SearchStore, ServiceRegistry};
use foresight_pipeline::{Pipeline, StageId};
use foresight_stores::{HttpSearchStore, PostgresRegistry};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Latency forecasting pipeline worker.
#[derive(Parser, Debug)]
#[command(name = "foresight", version, about = "Batch latency forecasting pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the pipeline once and exit.
    Run {
        /// Stage numbers to run in order, e.g. `--stages 1,2`; all three
        /// when omitted.
        #[arg(long, value_delimiter = ',')]
        stages: Vec<u8>,
    },
    /// Trigger a pipeline run on a fixed interval, skipping beats while a
    /// previous run still holds the lock.
    Beat {
        /// Seconds between runs.
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,

        /// Stage numbers per beat; all three when omitted.
        #[arg(long, value_delimiter = ',')]
        stages: Vec<u8>,
    },
}

fn parse_stages(numbers: &[u8]) -> Result<Vec<StageId>, PipelineError> {
    numbers.iter().map(|&n| StageId::from_number(n)).collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("resolving configuration")?;

    let registry = PostgresRegistry::connect(&config.registry)
        .await
        .context("connecting to the service registry")?;
    let search = HttpSearchStore::new(config.search.clone()).context("building the search client")?;
    let pipeline = Pipeline::new(registry, search, config);

    match cli.command {
        Command::Run { stages } => {
            let stages = parse_stages(&stages)?;
            let report = pipeline.run(&stages, Utc::now()).await?;
            info!(stages = report.stages.len(), "pipeline run finished");
        }
        Command::Beat {
            interval_secs,
            stages,
        } => {
            let stages = parse_stages(&stages)?;
            beat(&pipeline, &stages, interval_secs).await;
        }
    }

    Ok(())
}

/// Drive the pipeline forever on a fixed interval.
///
/// A beat that lands while the previous run is still holding the lock is
/// skipped with a warning; any other failure is logged and the next beat
/// proceeds normally.
async fn beat<R, S>(pipeline: &Pipeline<R, S>, stages: &[StageId], interval_secs: u64)
where
    R: ServiceRegistry,
    S: SearchStore,
{
    info!(interval_secs, "beat started");
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;
        match pipeline.run(stages, Utc::now()).await {
            Ok(report) => {
                info!(stages = report.stages.len(), "beat run finished");
            }
            Err(ForesightError::Pipeline(PipelineError::AlreadyRunning { .. })) => {
                warn!("previous run still holds the lock, skipping this beat");
            }
            Err(e) => {
                error!(error = %e, "beat run failed");
            }
        }
    }
}

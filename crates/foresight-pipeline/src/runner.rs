//! Whole-run orchestration: stage selection, ordering, and the run lock.

use chrono::{DateTime, Utc};
use foresight_core::config::Config;
use foresight_core::errors::{ForesightResult, PipelineError};
use foresight_core::traits::{SearchStore, ServiceRegistry};
use tracing::info;

use crate::artifacts::ArtifactStore;
use crate::lock::RunLock;
use crate::stages::{extract, publish, train, FailurePolicy, StageReport};

/// One pipeline stage, numbered the way operators select them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageId {
    Extract = 1,
    Train = 2,
    Publish = 3,
}

impl StageId {
    /// Stages in pipeline order.
    pub const ALL: [StageId; 3] = [StageId::Extract, StageId::Train, StageId::Publish];

    /// Map an operator-facing stage number.
    pub fn from_number(number: u8) -> Result<Self, PipelineError> {
        match number {
            1 => Ok(Self::Extract),
            2 => Ok(Self::Train),
            3 => Ok(Self::Publish),
            _ => Err(PipelineError::UnknownStage { number }),
        }
    }

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Train => "train",
            Self::Publish => "publish",
        }
    }

    /// The stage's declared failure policy.
    pub fn policy(self) -> FailurePolicy {
        match self {
            Self::Extract => extract::POLICY,
            Self::Train => train::POLICY,
            Self::Publish => publish::POLICY,
        }
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// One report per executed stage, in execution order.
    pub stages: Vec<(StageId, StageReport)>,
}

/// The pipeline over its two stores.
pub struct Pipeline<R, S> {
    registry: R,
    search: S,
    config: Config,
    artifacts: ArtifactStore,
}

impl<R, S> Pipeline<R, S>
where
    R: ServiceRegistry,
    S: SearchStore,
{
    pub fn new(registry: R, search: S, config: Config) -> Self {
        let artifacts = ArtifactStore::new(config.data_dir.clone());
        Self {
            registry,
            search,
            config,
            artifacts,
        }
    }

    /// Run the selected stages in the given order, or all three in
    /// pipeline order when `stages` is empty.
    ///
    /// The run lock is held for the whole invocation; a concurrent caller
    /// gets [`PipelineError::AlreadyRunning`] instead of interleaving
    /// writes in the artifact area.
    pub async fn run(&self, stages: &[StageId], now: DateTime<Utc>) -> ForesightResult<RunReport> {
        let _lock = RunLock::acquire(self.artifacts.root(), now)?;

        let selected: &[StageId] = if stages.is_empty() { &StageId::ALL } else { stages };
        let names: Vec<_> = selected.iter().map(|stage| stage.name()).collect();
        info!(stages = ?names, "starting pipeline run");

        let mut report = RunReport::default();
        for stage in selected {
            info!(
                stage = stage.name(),
                number = stage.number(),
                policy = %stage.policy(),
                "stage starting"
            );
            let stage_report = match stage {
                StageId::Extract => {
                    extract::run(&self.registry, &self.search, &self.artifacts).await?
                }
                StageId::Train => train::run(&self.artifacts, self.config.horizon, now)?,
                StageId::Publish => publish::run(&self.search, &self.artifacts).await?,
            };
            info!(
                stage = stage.name(),
                processed = stage_report.processed,
                skipped = stage_report.skipped,
                "stage finished"
            );
            report.stages.push((*stage, stage_report));
        }

        Ok(report)
    }
}

//! Stage 1: pull hour-bucketed traffic statistics for every registered
//! service and write one stage-1 artifact per service.

use foresight_core::constants::SCHEMA_VERSION;
use foresight_core::errors::ForesightResult;
use foresight_core::models::{ExtractArtifact, HourlyRecord, Service};
use foresight_core::traits::{SearchStore, ServiceRegistry};
use tracing::{info, warn};

use crate::artifacts::ArtifactStore;
use crate::stages::{FailurePolicy, StageReport};

/// Extraction skips a failing service and continues with the rest.
pub const POLICY: FailurePolicy = FailurePolicy::SkipService;

/// Run the extractor.
///
/// The registry query is fatal to the whole stage. Per-service search or
/// write failures are logged and the service is skipped, leaving its
/// previous artifact in place.
pub async fn run<R, S>(
    registry: &R,
    search: &S,
    artifacts: &ArtifactStore,
) -> ForesightResult<StageReport>
where
    R: ServiceRegistry + ?Sized,
    S: SearchStore + ?Sized,
{
    let services = registry.fetch_services().await?;
    info!(services = services.len(), "extracting hourly aggregates");

    let mut report = StageReport::default();
    for service in &services {
        match extract_service(search, artifacts, service).await {
            Ok((records, occurrences)) => {
                report.processed += 1;
                info!(
                    service_id = service.id,
                    name = %service.name,
                    records,
                    occurrences,
                    "wrote stage-1 artifact"
                );
            }
            Err(e) => {
                report.skipped += 1;
                warn!(
                    service_id = service.id,
                    name = %service.name,
                    error = %e,
                    "skipping service after extraction failure"
                );
            }
        }
    }

    info!(
        processed = report.processed,
        skipped = report.skipped,
        "extraction finished"
    );
    Ok(report)
}

/// Extract one service, returning its record count and summed occurrences.
async fn extract_service<S>(
    search: &S,
    artifacts: &ArtifactStore,
    service: &Service,
) -> ForesightResult<(usize, u64)>
where
    S: SearchStore + ?Sized,
{
    let buckets = search.hourly_stats(service.id).await?;
    let data: Vec<HourlyRecord> = buckets.into_iter().map(HourlyRecord::from_bucket).collect();

    let artifact = ExtractArtifact {
        schema: SCHEMA_VERSION,
        id: service.id,
        name: service.name.clone(),
        data,
    };
    artifacts.write_stage1(&artifact)?;

    let occurrences = artifact.data.iter().map(|record| record.occurrences).sum();
    Ok((artifact.data.len(), occurrences))
}

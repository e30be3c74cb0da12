//! Stage 3: upsert each scored forecast document into the predict
//! collection of the search store.

use foresight_core::constants::PREDICT_COLLECTION;
use foresight_core::errors::{ArtifactError, ForesightResult};
use foresight_core::traits::SearchStore;
use tracing::info;

use crate::artifacts::{ArtifactStore, STAGE2_JSON_FILE};
use crate::stages::{FailurePolicy, StageReport};

/// Publishing aborts the stage on the first failing service.
pub const POLICY: FailurePolicy = FailurePolicy::AbortStage;

/// Run the publisher over every service directory in the artifact area.
///
/// Each upsert fully replaces the prior document with the same id, no
/// merge and no read-before-write. Services published before an abort
/// stay published.
pub async fn run<S>(search: &S, artifacts: &ArtifactStore) -> ForesightResult<StageReport>
where
    S: SearchStore + ?Sized,
{
    let dirs = artifacts.service_dirs()?;
    info!(services = dirs.len(), "publishing forecast documents");

    let mut report = StageReport::default();
    for dir in &dirs {
        let document = artifacts.read_stage2(dir)?;
        let doc_id = document.service_id.to_string();
        let value = serde_json::to_value(&document).map_err(|e| ArtifactError::Serialization {
            path: dir.join(STAGE2_JSON_FILE).display().to_string(),
            message: e.to_string(),
        })?;

        search
            .index_document(PREDICT_COLLECTION, &doc_id, &value)
            .await?;
        report.processed += 1;
        info!(service_id = document.service_id, doc_id = %doc_id, "published forecast document");
    }

    info!(processed = report.processed, "publishing finished");
    Ok(report)
}

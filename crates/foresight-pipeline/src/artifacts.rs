//! Filesystem artifact area shared between stages.
//!
//! Layout under the root: one directory per service id holding
//! `stage-1.json` (enriched hourly records), `stage-2.csv` (tabular
//! forecast), and `stage-2.json` (scored forecast document). Each stage
//! fully overwrites its own files, so re-running a stage is idempotent at
//! the file level.

use std::fs;
use std::path::{Path, PathBuf};

use foresight_core::constants::SCHEMA_VERSION;
use foresight_core::errors::ArtifactError;
use foresight_core::models::{ExtractArtifact, ForecastDocument, ForecastRow};
use tracing::warn;

pub const STAGE1_FILE: &str = "stage-1.json";
pub const STAGE2_CSV_FILE: &str = "stage-2.csv";
pub const STAGE2_JSON_FILE: &str = "stage-2.json";

const CSV_HEADER: &str = "ts_iso,ts,dow,weekend,latency,latency_random_forest,latency_linear";

/// Handle on the artifact area root.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Per-service directory for a registry id.
    pub fn service_dir(&self, service_id: i64) -> PathBuf {
        self.root.join(service_id.to_string())
    }

    /// All service directories, sorted by name for a stable iteration
    /// order. A root that does not exist yet yields no directories.
    pub fn service_dirs(&self) -> Result<Vec<PathBuf>, ArtifactError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(root = %self.root.display(), "artifact root does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => return Err(io_error(&self.root, e)),
        };

        let mut dirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| io_error(&self.root, e))?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();
        Ok(dirs)
    }

    /// Write a stage-1 artifact, creating the service directory.
    pub fn write_stage1(&self, artifact: &ExtractArtifact) -> Result<PathBuf, ArtifactError> {
        let dir = self.service_dir(artifact.id);
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;

        let path = dir.join(STAGE1_FILE);
        let json =
            serde_json::to_string_pretty(artifact).map_err(|e| serialization_error(&path, e))?;
        fs::write(&path, json).map_err(|e| io_error(&path, e))?;
        Ok(path)
    }

    /// Read and version-check a stage-1 artifact from a service directory.
    pub fn read_stage1(&self, dir: &Path) -> Result<ExtractArtifact, ArtifactError> {
        let path = dir.join(STAGE1_FILE);
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let artifact: ExtractArtifact =
            serde_json::from_str(&text).map_err(|e| serialization_error(&path, e))?;
        check_schema(&path, artifact.schema)?;
        Ok(artifact)
    }

    /// Write both stage-2 artifacts into a service directory.
    pub fn write_stage2(
        &self,
        dir: &Path,
        document: &ForecastDocument,
    ) -> Result<(), ArtifactError> {
        let csv_path = dir.join(STAGE2_CSV_FILE);
        fs::write(&csv_path, render_csv(&document.data)).map_err(|e| io_error(&csv_path, e))?;

        let json_path = dir.join(STAGE2_JSON_FILE);
        let json =
            serde_json::to_string(document).map_err(|e| serialization_error(&json_path, e))?;
        fs::write(&json_path, json).map_err(|e| io_error(&json_path, e))?;
        Ok(())
    }

    /// Read and version-check a stage-2 scored artifact.
    pub fn read_stage2(&self, dir: &Path) -> Result<ForecastDocument, ArtifactError> {
        let path = dir.join(STAGE2_JSON_FILE);
        let text = fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
        let document: ForecastDocument =
            serde_json::from_str(&text).map_err(|e| serialization_error(&path, e))?;
        check_schema(&path, document.schema)?;
        Ok(document)
    }
}

/// Render forecast rows as the tabular stage-2 artifact. An absent
/// observed latency renders as an empty cell.
fn render_csv(rows: &[ForecastRow]) -> String {
    let mut out = String::with_capacity(64 * (rows.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        let latency = row.latency.map(|v| format!("{v:?}")).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{},{:?},{:?}\n",
            row.ts_iso,
            row.ts,
            row.dow,
            row.weekend,
            latency,
            row.latency_random_forest,
            row.latency_linear
        ));
    }
    out
}

fn check_schema(path: &Path, found: u32) -> Result<(), ArtifactError> {
    if found != SCHEMA_VERSION {
        return Err(ArtifactError::SchemaMismatch {
            path: path.display().to_string(),
            found,
            supported: SCHEMA_VERSION,
        });
    }
    Ok(())
}

fn io_error(path: &Path, e: std::io::Error) -> ArtifactError {
    ArtifactError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

fn serialization_error(path: &Path, e: serde_json::Error) -> ArtifactError {
    ArtifactError::Serialization {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

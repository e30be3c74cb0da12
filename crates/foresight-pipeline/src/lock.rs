//! Run-level lock over the artifact area.
//!
//! Scheduled runs can overlap when one run outlasts the beat interval;
//! the lock turns that overlap into an explicit [`PipelineError::AlreadyRunning`]
//! instead of two runs interleaving writes in the shared artifact area.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use foresight_core::errors::PipelineError;
use tracing::{debug, warn};

pub const LOCK_FILE: &str = ".foresight.lock";

/// A lock older than this belongs to a run that died without cleanup.
const STALE_AFTER_SECS: i64 = 3_600;

/// Held for the duration of one pipeline run; the lock file is removed on
/// drop.
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Take the lock, failing when a live run already holds it.
    ///
    /// The lock file stores the holder's start time. A file older than
    /// [`STALE_AFTER_SECS`] or with unreadable content is treated as left
    /// behind by a dead run and replaced.
    pub fn acquire(root: &Path, now: DateTime<Utc>) -> Result<Self, PipelineError> {
        let path = root.join(LOCK_FILE);
        fs::create_dir_all(root).map_err(|e| lock_error(&path, e))?;

        match fs::OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(now.to_rfc3339().as_bytes())
                    .map_err(|e| lock_error(&path, e))?;
                debug!(path = %path.display(), "acquired run lock");
                Ok(Self { path })
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                if is_stale(&path, now)? {
                    warn!(path = %path.display(), "breaking stale run lock");
                    fs::write(&path, now.to_rfc3339()).map_err(|e| lock_error(&path, e))?;
                    Ok(Self { path })
                } else {
                    Err(PipelineError::AlreadyRunning {
                        path: path.display().to_string(),
                    })
                }
            }
            Err(e) => Err(lock_error(&path, e)),
        }
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove run lock");
        }
    }
}

fn is_stale(path: &Path, now: DateTime<Utc>) -> Result<bool, PipelineError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        // The holder may have finished between our open and this read.
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(true),
        Err(e) => return Err(lock_error(path, e)),
    };

    match DateTime::parse_from_rfc3339(content.trim()) {
        Ok(held_since) => {
            let age = now.signed_duration_since(held_since.with_timezone(&Utc));
            Ok(age > Duration::seconds(STALE_AFTER_SECS))
        }
        Err(_) => Ok(true),
    }
}

fn lock_error(path: &Path, e: std::io::Error) -> PipelineError {
    PipelineError::Lock {
        path: path.display().to_string(),
        message: e.to_string(),
    }
}

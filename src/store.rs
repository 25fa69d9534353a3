//! Job persistence
//!
//! This module provides the persistence backend for a team's jobs. The TUI
//! never calls it directly: requests are executed by a store worker task
//! (see `tui::runtime`), and the CLI commands call it synchronously.
//!
//! The bundled backend is a JSON document on disk, rewritten atomically on
//! every change.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{HexColor, Job, JobId};

/// Longest job name accepted by the store
pub const MAX_JOB_NAME_LEN: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("job {0} is archived")]
    Archived(JobId),

    #[error("could not access job store '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("job store '{path}' is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence operations needed by the job list.
///
/// Implementations are blocking; callers run them on a blocking thread.
pub trait JobBackend: Send + Sync {
    fn list_jobs(&self) -> Result<Vec<Job>, StoreError>;

    fn create_job(&self, name: &str, color: &HexColor) -> Result<Job, StoreError>;

    fn rename_job(&self, id: &JobId, name: &str) -> Result<Job, StoreError>;

    fn recolor_job(&self, id: &JobId, color: &HexColor) -> Result<Job, StoreError>;

    fn archive_job(&self, id: &JobId) -> Result<Job, StoreError>;
}

/// On-disk document
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    team: Option<String>,
    #[serde(default)]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    jobs: Vec<Job>,
}

/// Check a proposed job name against the other jobs of the team.
///
/// Returns the trimmed name on success.
pub fn validate_job_name<'a>(
    name: &'a str,
    existing: &[Job],
    renaming: Option<&JobId>,
) -> Result<&'a str, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation("Job name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_JOB_NAME_LEN {
        return Err(StoreError::Validation(format!(
            "Job name must be at most {MAX_JOB_NAME_LEN} characters"
        )));
    }
    let duplicate = existing.iter().any(|job| {
        !job.archived
            && Some(&job.id) != renaming
            && job.name.trim().to_lowercase() == trimmed.to_lowercase()
    });
    if duplicate {
        return Err(StoreError::Validation(format!("A job named '{trimmed}' already exists")));
    }
    Ok(trimmed)
}

/// JSON file backed job store
pub struct FileStore {
    path: PathBuf,
    team: Option<String>,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            team: None,
            lock: Mutex::new(()),
        }
    }

    /// Record the team name in documents written by this store
    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoreDocument, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(StoreDocument::default()),
            Ok(content) => serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            // No file yet means a team without jobs
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreDocument::default()),
            Err(source) => Err(StoreError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn write(&self, doc: &mut StoreDocument) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        doc.updated_at = Some(Utc::now());
        if doc.team.is_none() {
            doc.team = self.team.clone();
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let content = serde_json::to_string_pretty(doc).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }

    /// Apply a modification to one job under the store lock
    fn modify<F>(&self, id: &JobId, f: F) -> Result<Job, StoreError>
    where
        F: FnOnce(&mut Job, &[Job]) -> Result<(), StoreError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut doc = self.read()?;

        let pos = doc
            .jobs
            .iter()
            .position(|job| &job.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        let mut updated = doc.jobs[pos].clone();
        f(&mut updated, &doc.jobs)?;
        doc.jobs[pos] = updated.clone();

        self.write(&mut doc)?;
        Ok(updated)
    }
}

impl JobBackend for FileStore {
    fn list_jobs(&self) -> Result<Vec<Job>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        Ok(self.read()?.jobs)
    }

    fn create_job(&self, name: &str, color: &HexColor) -> Result<Job, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut doc = self.read()?;

        let name = validate_job_name(name, &doc.jobs, None)?;
        let job = Job::new(JobId::generate(), name, color.clone());
        doc.jobs.push(job.clone());

        self.write(&mut doc)?;
        tracing::info!(job = %job.id, name = %job.name, "created job");
        Ok(job)
    }

    fn rename_job(&self, id: &JobId, name: &str) -> Result<Job, StoreError> {
        self.modify(id, |job, all| {
            if job.archived {
                return Err(StoreError::Archived(job.id.clone()));
            }
            job.name = validate_job_name(name, all, Some(id))?.to_string();
            Ok(())
        })
    }

    fn recolor_job(&self, id: &JobId, color: &HexColor) -> Result<Job, StoreError> {
        self.modify(id, |job, _| {
            if job.archived {
                return Err(StoreError::Archived(job.id.clone()));
            }
            job.color = color.clone();
            Ok(())
        })
    }

    fn archive_job(&self, id: &JobId) -> Result<Job, StoreError> {
        let job = self.modify(id, |job, _| {
            job.archived = true;
            Ok(())
        })?;
        tracing::info!(job = %job.id, "archived job");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> HexColor {
        HexColor::parse("ff0000").unwrap()
    }

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested/jobs.json")).with_team("Bakery");
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_empty_team() {
        let (_dir, store) = temp_store();
        assert!(store.list_jobs().unwrap().is_empty());
    }

    #[test]
    fn test_create_rename_recolor_archive() {
        let (_dir, store) = temp_store();

        let job = store.create_job("  Baker ", &red()).unwrap();
        assert_eq!(job.name, "Baker");

        let renamed = store.rename_job(&job.id, "Head Baker").unwrap();
        assert_eq!(renamed.name, "Head Baker");

        let blue = HexColor::parse("0000ff").unwrap();
        assert_eq!(store.recolor_job(&job.id, &blue).unwrap().color, blue);

        assert!(store.archive_job(&job.id).unwrap().archived);

        let jobs = store.list_jobs().unwrap();
        assert_eq!(jobs.len(), 1, "archived jobs are retained");
        assert!(jobs[0].archived);
        assert!(matches!(store.rename_job(&job.id, "Again"), Err(StoreError::Archived(_))));
    }

    #[test]
    fn test_persists_across_instances() {
        let (dir, store) = temp_store();
        store.create_job("Cashier", &red()).unwrap();

        let reopened = FileStore::new(dir.path().join("nested/jobs.json"));
        let jobs = reopened.list_jobs().unwrap();
        assert_eq!(jobs[0].name, "Cashier");

        let raw = std::fs::read_to_string(reopened.path()).unwrap();
        assert!(raw.contains("\"team\": \"Bakery\""));
    }

    #[test]
    fn test_validation_errors() {
        let (_dir, store) = temp_store();
        let job = store.create_job("Cashier", &red()).unwrap();

        let err = store.create_job("   ", &red()).unwrap_err();
        assert_eq!(err.to_string(), "Job name cannot be empty");

        let err = store.create_job("cashier", &red()).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let long = "x".repeat(MAX_JOB_NAME_LEN + 1);
        assert!(matches!(store.rename_job(&job.id, &long), Err(StoreError::Validation(_))));

        // Renaming to its own name (different case) is not a duplicate
        assert_eq!(store.rename_job(&job.id, "CASHIER").unwrap().name, "CASHIER");
    }

    #[test]
    fn test_unknown_job() {
        let (_dir, store) = temp_store();
        let missing = JobId::new("missing");
        assert!(matches!(store.archive_job(&missing), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_file_reported() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert!(matches!(store.list_jobs(), Err(StoreError::Corrupt { .. })));
    }
}

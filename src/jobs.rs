//! Cached job-search results, saved favourites and the parsed resume.
//!
//! Jobs and resumes are opaque JSON objects; only a job's `id` is read.

use anyhow::Context as _;
use serde_json::Value;

use crate::storage::{
    FAVORITE_JOBS_KEY, JOB_RESULTS_KEY, KeyValueStore, RESUME_KEY, read_json, write_json,
};

/// The `id` of a job object as a string. Numeric ids are stringified.
pub fn job_id(job: &Value) -> Option<String> {
    match job.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub struct JobCache<S> {
    backend: S,
}

impl<S: KeyValueStore> JobCache<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Replace the cached search results.
    ///
    /// # Errors
    /// Returns an error if serialization or the backend write fails.
    pub fn try_save_results(&mut self, jobs: &[Value]) -> anyhow::Result<()> {
        write_json(&mut self.backend, JOB_RESULTS_KEY, jobs).context("save job results")?;
        tracing::debug!(count = jobs.len(), "job results cached");
        Ok(())
    }

    pub fn save_results(&mut self, jobs: &[Value]) {
        if let Err(e) = self.try_save_results(jobs) {
            tracing::warn!("failed to cache job results: {e:#}");
        }
    }

    /// The cached search results, `None` when nothing was cached.
    ///
    /// # Errors
    /// Returns an error if the backend read fails or the cached value does not parse.
    pub fn try_results(&self) -> anyhow::Result<Option<Vec<Value>>> {
        read_json(&self.backend, JOB_RESULTS_KEY).context("load job results")
    }

    /// The cached search results, `None` when absent or unreadable.
    pub fn results(&self) -> Option<Vec<Value>> {
        self.try_results().unwrap_or_else(|e| {
            tracing::warn!("job results unreadable: {e:#}");
            None
        })
    }

    /// First cached job whose id equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Value> {
        self.results()?
            .into_iter()
            .find(|job| job_id(job).as_deref() == Some(id))
    }

    /// Saved favourites, oldest first.
    ///
    /// # Errors
    /// Returns an error if the backend read fails or the stored value does not parse.
    pub fn try_favorites(&self) -> anyhow::Result<Vec<Value>> {
        let favorites = read_json(&self.backend, FAVORITE_JOBS_KEY).context("load favorite jobs")?;
        Ok(favorites.unwrap_or_default())
    }

    pub fn favorites(&self) -> Vec<Value> {
        self.try_favorites().unwrap_or_else(|e| {
            tracing::warn!("favorite jobs unreadable, treating as empty: {e:#}");
            Vec::new()
        })
    }

    /// Append `job` to the favourites unless a job with the same id is
    /// already saved. Returns whether it was added.
    ///
    /// # Errors
    /// Returns an error if the favourites cannot be read, parsed or written.
    pub fn try_save_favorite(&mut self, job: Value) -> anyhow::Result<bool> {
        let mut favorites = self.try_favorites()?;
        let id = job_id(&job);
        if favorites.iter().any(|saved| job_id(saved) == id) {
            return Ok(false);
        }
        favorites.push(job);
        write_json(&mut self.backend, FAVORITE_JOBS_KEY, &favorites)
            .context("save favorite jobs")?;
        Ok(true)
    }

    pub fn save_favorite(&mut self, job: Value) -> bool {
        self.try_save_favorite(job).unwrap_or_else(|e| {
            tracing::warn!("failed to save favorite job: {e:#}");
            false
        })
    }
}

pub struct ResumeCache<S> {
    backend: S,
}

impl<S: KeyValueStore> ResumeCache<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Replace the stored resume.
    ///
    /// # Errors
    /// Returns an error if serialization or the backend write fails.
    pub fn try_save(&mut self, resume: &Value) -> anyhow::Result<()> {
        write_json(&mut self.backend, RESUME_KEY, resume).context("save resume")
    }

    pub fn save(&mut self, resume: &Value) {
        if let Err(e) = self.try_save(resume) {
            tracing::warn!("failed to save resume: {e:#}");
        }
    }

    /// # Errors
    /// Returns an error if the backend read fails or the stored value does not parse.
    pub fn try_get(&self) -> anyhow::Result<Option<Value>> {
        read_json(&self.backend, RESUME_KEY).context("load resume")
    }

    /// The stored resume, `None` when absent or unreadable.
    pub fn get(&self) -> Option<Value> {
        self.try_get().unwrap_or_else(|e| {
            tracing::warn!("resume unreadable: {e:#}");
            None
        })
    }

    /// Drop the stored resume. Clearing an empty cache is not an error.
    ///
    /// # Errors
    /// Returns an error if the backend delete fails.
    pub fn try_clear(&mut self) -> anyhow::Result<()> {
        self.backend.remove(RESUME_KEY).context("clear resume")
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!("failed to clear resume: {e:#}");
        }
    }
}

//! Key-value storage backends.
//!
//! Every collection the crate persists (application history, cached job
//! results, favourite jobs, the parsed resume) is a single JSON document
//! stored under a well-known key. Callers are handed a [`KeyValueStore`]
//! so tests can swap the durable `SQLite` file for [`MemoryStore`].

mod memory;
mod sqlite;

use std::path::PathBuf;

use anyhow::Context as _;
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Key of the application-history collection.
pub const HISTORY_KEY: &str = "application_history";
/// Key of the most recent job-search results.
pub const JOB_RESULTS_KEY: &str = "recent_job_results";
/// Key of the user's favourite jobs.
pub const FAVORITE_JOBS_KEY: &str = "favorite_jobs";
/// Key of the most recently parsed resume.
pub const RESUME_KEY: &str = "resume_data";

/// Synchronous string-to-string storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, or `None` when absent.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        (**self).remove(key)
    }
}

/// Read and parse the JSON document stored under `key`.
///
/// # Errors
/// Returns an error if the backend read fails or the stored value does not parse as `T`.
pub fn read_json<T: DeserializeOwned>(
    backend: &impl KeyValueStore,
    key: &str,
) -> anyhow::Result<Option<T>> {
    let Some(raw) = backend.get(key).with_context(|| format!("read {key}"))? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {key}"))?;
    Ok(Some(value))
}

/// Serialize `value` and store it under `key`.
///
/// # Errors
/// Returns an error if serialization or the backend write fails.
pub fn write_json<T: Serialize + ?Sized>(
    backend: &mut impl KeyValueStore,
    key: &str,
    value: &T,
) -> anyhow::Result<()> {
    let json = serde_json::to_string(value).with_context(|| format!("serialize {key}"))?;
    backend.set(key, &json).with_context(|| format!("write {key}"))
}

/// Returns the DB path: `APPLYTRACK_DB_PATH` env var overrides; else
/// `dirs::data_local_dir()/applytrack/applytrack.db`.
pub fn db_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("APPLYTRACK_DB_PATH") {
        return Some(PathBuf::from(p));
    }
    dirs::data_local_dir().map(|d| d.join("applytrack").join("applytrack.db"))
}

#[cfg(test)]
mod tests;

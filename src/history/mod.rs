pub mod export;
pub mod filter;
mod types;

use anyhow::Context as _;
use chrono::{DateTime, Utc};

use crate::storage::{HISTORY_KEY, KeyValueStore, read_json, write_json};

pub use types::{
    ApplicationRecord, ApplicationType, Platform, format_timestamp, parse_timestamp,
};

/// Default size of the "recent applications" list.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// The application-history collection, newest insertion first.
///
/// The plain methods (`append`, `get_all`, `clear`) never fail: storage
/// errors are logged and replaced by the documented fallback. The `try_*`
/// and `load` twins return the error instead.
pub struct HistoryStore<S> {
    backend: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub const fn new(backend: S) -> Self {
        Self { backend }
    }

    #[cfg(test)]
    pub(crate) const fn backend(&self) -> &S {
        &self.backend
    }

    /// Read and parse the stored collection.
    ///
    /// # Errors
    /// Returns an error if the backend read fails or the stored JSON does not parse.
    pub fn load(&self) -> anyhow::Result<Vec<ApplicationRecord>> {
        let records = read_json(&self.backend, HISTORY_KEY).context("load application history")?;
        Ok(records.unwrap_or_default())
    }

    /// Every stored record, newest insertion first. Empty when nothing is
    /// stored or the stored value is unreadable.
    pub fn get_all(&self) -> Vec<ApplicationRecord> {
        self.load().unwrap_or_else(|e| {
            tracing::warn!("application history unreadable, treating as empty: {e:#}");
            Vec::new()
        })
    }

    /// The first `limit` records of [`Self::get_all`].
    pub fn recent(&self, limit: usize) -> Vec<ApplicationRecord> {
        let mut records = self.get_all();
        records.truncate(limit);
        records
    }

    /// Prepend `record`, stamping it with `now` when it has no timestamp.
    ///
    /// A collection that fails to parse is left untouched and the error returned.
    ///
    /// # Errors
    /// Returns an error if the collection cannot be read, parsed, serialized or written.
    pub fn try_append_at(
        &mut self,
        record: ApplicationRecord,
        now: DateTime<Utc>,
    ) -> anyhow::Result<ApplicationRecord> {
        let record = stamp(record, now);
        let mut records = self.load()?;
        records.insert(0, record.clone());
        write_json(&mut self.backend, HISTORY_KEY, &records)
            .context("save application history")?;
        tracing::debug!(
            count = records.len(),
            job_id = record.job_id.as_deref().unwrap_or("-"),
            success = record.success,
            "application recorded"
        );
        Ok(record)
    }

    /// [`Self::try_append_at`] with the current time.
    ///
    /// # Errors
    /// See [`Self::try_append_at`].
    pub fn try_append(&mut self, record: ApplicationRecord) -> anyhow::Result<ApplicationRecord> {
        self.try_append_at(record, Utc::now())
    }

    /// Record one submission attempt. Returns the record as it was stamped,
    /// even when persisting it failed.
    pub fn append(&mut self, record: ApplicationRecord) -> ApplicationRecord {
        let record = stamp(record, Utc::now());
        match self.try_append(record.clone()) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("failed to save application to history: {e:#}");
                record
            }
        }
    }

    /// Erase the whole collection.
    ///
    /// # Errors
    /// Returns an error if the backend delete fails.
    pub fn try_clear(&mut self) -> anyhow::Result<()> {
        self.backend
            .remove(HISTORY_KEY)
            .context("clear application history")
    }

    /// Erase the whole collection, logging any failure.
    pub fn clear(&mut self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!("failed to clear application history: {e:#}");
        }
    }
}

fn stamp(mut record: ApplicationRecord, now: DateTime<Utc>) -> ApplicationRecord {
    if record.timestamp.is_none() {
        record.timestamp = Some(format_timestamp(now));
    }
    record
}

#[cfg(test)]
mod tests_export;
#[cfg(test)]
mod tests_filter;

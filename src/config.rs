use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::history::DEFAULT_RECENT_LIMIT;

/// Runtime configuration merged from the optional config file and environment variables.
///
/// Environment variables take precedence over the config file:
/// - `APPLYTRACK_DB_PATH`: storage database file
/// - `APPLYTRACK_RECENT_LIMIT`: size of the recent-applications list
/// - `APPLYTRACK_EXPORT_DIR`: directory CSV exports are written to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: Option<PathBuf>,
    pub recent_limit: usize,
    pub date_format: Option<String>,
    pub export_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            recent_limit: DEFAULT_RECENT_LIMIT,
            date_format: None,
            export_dir: None,
        }
    }
}

/// Private: parsed representation of the config file.
#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    storage: Option<StorageSection>,
    history: Option<HistorySection>,
    export: Option<ExportSection>,
}

#[derive(serde::Deserialize)]
struct StorageSection {
    db_path: Option<PathBuf>,
}

#[derive(serde::Deserialize)]
struct HistorySection {
    recent_limit: Option<usize>,
}

#[derive(serde::Deserialize)]
struct ExportSection {
    date_format: Option<String>,
    dir: Option<PathBuf>,
}

fn read_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("parse config {}", path.display()))
}

/// Default config file location: `{config_dir}/applytrack/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("applytrack").join("config.toml"))
}

impl AppConfig {
    /// Load from the default config path, then apply environment overrides.
    pub fn load() -> Self {
        Self::load_from(config_path().as_deref())
    }

    /// Load from an explicit config path (skipped when `None` or missing),
    /// then apply environment overrides. A malformed file is logged and ignored.
    pub fn load_from(path: Option<&Path>) -> Self {
        let mut config = Self::default();
        if let Some(path) = path
            && path.exists()
        {
            match read_config_file(path) {
                Ok(file) => config.apply_file(file),
                Err(e) => tracing::warn!("ignoring config file: {e:#}"),
            }
        }
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    fn apply_file(&mut self, file: ConfigFile) {
        if let Some(db_path) = file.storage.and_then(|s| s.db_path) {
            self.db_path = Some(db_path);
        }
        if let Some(limit) = file.history.and_then(|h| h.recent_limit) {
            self.recent_limit = limit;
        }
        if let Some(export) = file.export {
            if export.date_format.is_some() {
                self.date_format = export.date_format;
            }
            if export.dir.is_some() {
                self.export_dir = export.dir;
            }
        }
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("APPLYTRACK_DB_PATH").filter(|v| !v.is_empty()) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = var("APPLYTRACK_RECENT_LIMIT") {
            match raw.trim().parse() {
                Ok(limit) => self.recent_limit = limit,
                Err(_) => tracing::warn!("ignoring APPLYTRACK_RECENT_LIMIT={raw:?}: not a count"),
            }
        }
        if let Some(dir) = var("APPLYTRACK_EXPORT_DIR").filter(|v| !v.is_empty()) {
            self.export_dir = Some(PathBuf::from(dir));
        }
    }

    /// The database file to open: the configured path, else the platform default.
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        self.db_path.clone().or_else(crate::storage::db_path)
    }
}

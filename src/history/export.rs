//! CSV export of application history.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, NaiveDate, Offset as _, Utc};

use super::ApplicationRecord;

pub const CSV_HEADERS: [&str; 7] = [
    "Job Title",
    "Company",
    "Platform",
    "Application Type",
    "Status",
    "Date",
    "Notes",
];

pub const CSV_MEDIA_TYPE: &str = "text/csv;charset=utf-8";

/// en-US locale rendering, e.g. `5/1/2024, 9:30:00 AM`.
pub const DEFAULT_DATE_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// How the `Date` column is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    date_format: String,
    offset: FixedOffset,
}

impl ExportOptions {
    /// Default format in the machine's current UTC offset.
    pub fn local() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            offset: chrono::Local::now().offset().fix(),
        }
    }

    /// Default format in UTC.
    pub fn utc() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_owned(),
            offset: Utc.fix(),
        }
    }

    /// Replace the strftime format used for the `Date` column.
    ///
    /// # Errors
    /// Returns an error if `format` contains an invalid specifier.
    pub fn with_date_format(mut self, format: &str) -> anyhow::Result<Self> {
        if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!("invalid date format '{format}'");
        }
        self.date_format = format.to_owned();
        Ok(self)
    }

    #[must_use]
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn date_format(&self) -> &str {
        &self.date_format
    }

    /// Render a stored timestamp; unparseable values are passed through.
    fn format_date(&self, raw: Option<&str>) -> String {
        let Some(raw) = raw else {
            return String::new();
        };
        let Some(at) = super::parse_timestamp(raw) else {
            return raw.to_owned();
        };
        let local = at.with_timezone(&self.offset);
        let mut out = String::new();
        if write!(out, "{}", local.format(&self.date_format)).is_err() {
            return raw.to_owned();
        }
        out
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::local()
    }
}

/// A ready-to-save CSV document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub media_type: &'static str,
    pub content: String,
}

impl CsvExport {
    /// Write the document into `dir` under its own filename.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or the file cannot be written.
    pub fn write_to_dir(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create export dir {}", dir.display()))?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, self.content.as_bytes())
            .with_context(|| format!("write export {}", path.display()))?;
        Ok(path)
    }
}

/// `application_history_<date>.csv`
pub fn export_filename(date: NaiveDate) -> String {
    format!("application_history_{}.csv", date.format("%Y-%m-%d"))
}

/// Serialize `records` to CSV. Returns `None` when there is nothing to export.
pub fn to_csv(records: &[ApplicationRecord], options: &ExportOptions) -> Option<CsvExport> {
    to_csv_at(records, options, Utc::now())
}

/// [`to_csv`] with an explicit export time (used for the filename).
pub fn to_csv_at(
    records: &[ApplicationRecord],
    options: &ExportOptions,
    now: DateTime<Utc>,
) -> Option<CsvExport> {
    if records.is_empty() {
        tracing::debug!("no applications to export");
        return None;
    }

    let lines: Vec<String> = std::iter::once(CSV_HEADERS.join(","))
        .chain(records.iter().map(|r| csv_row(r, options)))
        .collect();

    Some(CsvExport {
        filename: export_filename(now.date_naive()),
        media_type: CSV_MEDIA_TYPE,
        content: lines.join("\n"),
    })
}

fn csv_row(record: &ApplicationRecord, options: &ExportOptions) -> String {
    let status = if record.success { "Successful" } else { "Failed" };
    let date = options.format_date(record.timestamp.as_deref());
    let fields = [
        or_default(record.position.as_deref(), ""),
        or_default(record.company.as_deref(), ""),
        or_default(record.platform.as_deref(), "External"),
        or_default(record.application_type.as_deref(), "Unknown"),
        status,
        date.as_str(),
        record.notes().unwrap_or(""),
    ];
    fields
        .iter()
        .map(|field| quote(field))
        .collect::<Vec<_>>()
        .join(",")
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    value.filter(|v| !v.is_empty()).unwrap_or(default)
}

/// Wrap in double quotes, doubling any embedded quote.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

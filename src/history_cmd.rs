use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use applytrack::history::export::{self, ExportOptions};
use applytrack::history::filter::{
    self, DateRange, FilterCriteria, PlatformFilter, StatusFilter, TypeFilter,
};
use applytrack::history::{ApplicationRecord, HistoryStore, parse_timestamp};
use applytrack::storage::SqliteStore;

use crate::{Ctx, read_json_input};

fn open_history(ctx: &Ctx) -> anyhow::Result<HistoryStore<SqliteStore>> {
    Ok(HistoryStore::new(ctx.open_store()?))
}

#[derive(Clone, clap::Args)]
pub struct RecordArgs {
    /// Read the record from a JSON file ("-" for stdin) instead of flags
    #[arg(long, conflicts_with_all = ["position", "company"])]
    json: Option<PathBuf>,
    /// Job title
    #[arg(long, required_unless_present = "json")]
    position: Option<String>,
    /// Company name
    #[arg(long, required_unless_present = "json")]
    company: Option<String>,
    #[arg(long)]
    job_id: Option<String>,
    /// Identifier assigned by the job board on success
    #[arg(long)]
    application_id: Option<String>,
    /// linkedin, indeed, glassdoor, google or any other tag (default: external)
    #[arg(long)]
    platform: Option<String>,
    /// easy_apply or external
    #[arg(long = "type", value_parser = ["easy_apply", "external"])]
    application_type: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// The submission failed
    #[arg(long)]
    failed: bool,
    #[arg(long)]
    message: Option<String>,
    #[arg(long)]
    error: Option<String>,
    /// Time of the submission, RFC 3339 or "YYYY-MM-DD HH:MM:SS" UTC (default: now)
    #[arg(long)]
    timestamp: Option<String>,
}

impl RecordArgs {
    fn into_record(self) -> anyhow::Result<ApplicationRecord> {
        if let Some(path) = &self.json {
            return read_json_input(path);
        }
        if let Some(ts) = &self.timestamp
            && parse_timestamp(ts).is_none()
        {
            anyhow::bail!("invalid timestamp '{ts}'");
        }
        Ok(ApplicationRecord {
            job_id: self.job_id,
            application_id: self.application_id,
            position: self.position,
            company: self.company,
            description: self.description,
            platform: self.platform.map(|p| p.trim().to_lowercase()),
            application_type: self.application_type,
            success: !self.failed,
            message: self.message,
            error: self.error,
            timestamp: self.timestamp,
            ..ApplicationRecord::default()
        })
    }
}

pub fn cmd_record(ctx: &Ctx, args: &RecordArgs) -> anyhow::Result<i32> {
    let record = args.clone().into_record()?;
    let mut store = open_history(ctx)?;
    let stored = store.try_append(record)?;
    eprintln!(
        "[applytrack] recorded {} at {} ({})",
        stored.position.as_deref().unwrap_or("untitled position"),
        stored.company.as_deref().unwrap_or("unknown company"),
        stored.timestamp.as_deref().unwrap_or("-"),
    );
    Ok(0)
}

#[derive(clap::Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against title, company and description
    query: Option<String>,
    /// all, success or failed
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// all, easy_apply or external
    #[arg(long = "type", default_value = "all")]
    application_type: TypeFilter,
    /// all or a platform tag such as linkedin
    #[arg(long, default_value = "all")]
    platform: PlatformFilter,
    /// Earliest day to include (YYYY-MM-DD)
    #[arg(long, value_parser = filter::parse_day)]
    from: Option<NaiveDate>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_parser = filter::parse_day)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_text: self.query.clone(),
            status: self.status,
            application_type: self.application_type,
            platform: self.platform.clone(),
            date_range: DateRange {
                start: self.from,
                end: self.to,
            },
        }
    }
}

fn print_record_line(record: &ApplicationRecord) {
    let status = if record.success { "\u{2713}" } else { "\u{2717}" };
    println!(
        "{} {} [{}] {} @ {}",
        record.timestamp.as_deref().unwrap_or("-"),
        status,
        record.platform_tag(),
        record.position.as_deref().unwrap_or("-"),
        record.company.as_deref().unwrap_or("-"),
    );
    if !record.success
        && let Some(notes) = record.notes()
    {
        println!("    {notes}");
    }
}

pub fn cmd_history_list(ctx: &Ctx, limit: Option<usize>, all: bool) -> anyhow::Result<i32> {
    let store = open_history(ctx)?;
    let records = if all {
        store.get_all()
    } else {
        store.recent(limit.unwrap_or(ctx.config.recent_limit))
    };

    if records.is_empty() {
        eprintln!("[applytrack] no applications recorded yet");
        return Ok(0);
    }

    for record in &records {
        print_record_line(record);
    }
    Ok(0)
}

pub fn cmd_history_search(ctx: &Ctx, filters: &FilterArgs, json: bool) -> anyhow::Result<i32> {
    let criteria = filters.criteria();
    if criteria.date_range.is_inverted() {
        eprintln!("[applytrack] warning: --from is after --to, nothing can match");
    }

    let store = open_history(ctx)?;
    let matches = filter::apply(&store.get_all(), &criteria);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(0);
    }

    if matches.is_empty() {
        eprintln!("[applytrack] no matching applications found");
        return Ok(0);
    }

    for record in &matches {
        print_record_line(record);
    }
    eprintln!("[applytrack] {} matching application(s)", matches.len());
    Ok(0)
}

pub fn cmd_history_clear(ctx: &Ctx) -> anyhow::Result<i32> {
    let mut store = open_history(ctx)?;
    store.try_clear()?;
    eprintln!("[applytrack] application history cleared");
    Ok(0)
}

pub fn cmd_history_export(
    ctx: &Ctx,
    dir: Option<&Path>,
    to_stdout: bool,
    date_format: Option<&str>,
) -> anyhow::Result<i32> {
    let options = match date_format.or(ctx.config.date_format.as_deref()) {
        Some(format) => ExportOptions::local().with_date_format(format)?,
        None => ExportOptions::local(),
    };

    let store = open_history(ctx)?;
    let Some(csv) = export::to_csv(&store.get_all(), &options) else {
        eprintln!("[applytrack] no application history to export");
        return Ok(0);
    };

    if to_stdout {
        println!("{}", csv.content);
        return Ok(0);
    }

    let dir = dir
        .map(Path::to_path_buf)
        .or_else(|| ctx.config.export_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let path = csv.write_to_dir(&dir)?;
    eprintln!("[applytrack] exported to {}", path.display());
    Ok(0)
}

mod analytics_cmd;
mod history_cmd;
mod jobs_cmd;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use applytrack::analytics::chart::{ChartType, Timeframe};
use applytrack::config::AppConfig;
use applytrack::storage::SqliteStore;

#[derive(Parser)]
#[command(
    name = "applytrack",
    version,
    about = "Track submitted job applications, search and export them, and chart the results"
)]
struct Cli {
    /// Storage database file (overrides the config file)
    #[arg(long, global = true, env = "APPLYTRACK_DB_PATH")]
    db: Option<PathBuf>,

    /// Config file to read instead of ~/.config/applytrack/config.toml
    #[arg(long, global = true, env = "APPLYTRACK_CONFIG")]
    config: Option<PathBuf>,

    /// Log storage activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one submitted (or failed) application
    Record(history_cmd::RecordArgs),
    /// Browse, search, clear or export the application history
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Show totals, trends, success rate and breakdowns
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// Draw a bar chart of recent applications
    Chart {
        /// weekly (7 days), monthly (30 days) or all
        #[arg(short, long, default_value = "weekly")]
        timeframe: Timeframe,
        /// platform, status or type
        #[arg(short, long, default_value = "platform")]
        by: ChartType,
    },
    /// Manage cached job-search results and favourites
    Jobs {
        #[command(subcommand)]
        action: JobsAction,
    },
    /// Manage the stored parsed resume
    Resume {
        #[command(subcommand)]
        action: ResumeAction,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List the most recent applications
    List {
        /// Number of entries to show (default: `[history] recent_limit`, 5)
        #[arg(short, long)]
        limit: Option<usize>,
        /// Show every stored application
        #[arg(short, long, conflicts_with = "limit")]
        all: bool,
    },
    /// Filter the history by text, status, type, platform and date
    Search {
        #[command(flatten)]
        filters: history_cmd::FilterArgs,
        /// Print matching records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Erase the whole history; this cannot be undone
    Clear,
    /// Write the history as a CSV file
    Export {
        /// Output directory (default: `[export] dir`, else the current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
        /// Print the CSV to stdout instead of writing a file
        #[arg(long, conflicts_with = "dir")]
        stdout: bool,
        /// strftime format for the Date column
        #[arg(long)]
        date_format: Option<String>,
    },
}

#[derive(Subcommand)]
enum JobsAction {
    /// Replace the cached search results with a JSON array from a file ("-" for stdin)
    Import { file: PathBuf },
    /// List cached search results
    List,
    /// Print one cached job as JSON
    Show { id: String },
    /// Save a cached job as a favourite
    Favorite { id: String },
    /// List saved favourites
    Favorites,
}

#[derive(Subcommand)]
enum ResumeAction {
    /// Store a parsed resume from a JSON file ("-" for stdin)
    Import { file: PathBuf },
    /// Print the stored resume as JSON
    Show,
    /// Remove the stored resume
    Clear,
}

/// Settings resolved once per invocation.
pub struct Ctx {
    pub config: AppConfig,
}

impl Ctx {
    fn new(cli: &Cli) -> Self {
        let mut config = match &cli.config {
            Some(path) => AppConfig::load_from(Some(path)),
            None => AppConfig::load(),
        };
        if let Some(db) = &cli.db {
            config.db_path = Some(db.clone());
        }
        Self { config }
    }

    /// Open the configured `SQLite` store.
    pub fn open_store(&self) -> anyhow::Result<SqliteStore> {
        let path = self
            .config
            .resolved_db_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine storage DB path"))?;
        tracing::debug!(path = %path.display(), "opening store");
        SqliteStore::open(&path)
    }
}

/// Read `path` as JSON; `-` reads stdin.
pub fn read_json_input<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = if path == Path::new("-") {
        std::io::read_to_string(std::io::stdin()).context("read stdin")?
    } else {
        std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "applytrack=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env("APPLYTRACK_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn or_exit(r: anyhow::Result<i32>) -> i32 {
    r.unwrap_or_else(|e| {
        eprintln!("[applytrack] error: {e:#}");
        1
    })
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let ctx = Ctx::new(&cli);
    let exit_code = match &cli.command {
        Commands::Record(args) => or_exit(history_cmd::cmd_record(&ctx, args)),
        Commands::History { action } => or_exit(match action {
            HistoryAction::List { limit, all } => history_cmd::cmd_history_list(&ctx, *limit, *all),
            HistoryAction::Search { filters, json } => {
                history_cmd::cmd_history_search(&ctx, filters, *json)
            }
            HistoryAction::Clear => history_cmd::cmd_history_clear(&ctx),
            HistoryAction::Export {
                dir,
                stdout,
                date_format,
            } => history_cmd::cmd_history_export(
                &ctx,
                dir.as_deref(),
                *stdout,
                date_format.as_deref(),
            ),
        }),
        Commands::Stats { json } => or_exit(analytics_cmd::cmd_stats(&ctx, *json)),
        Commands::Chart { timeframe, by } => {
            or_exit(analytics_cmd::cmd_chart(&ctx, *timeframe, *by))
        }
        Commands::Jobs { action } => or_exit(match action {
            JobsAction::Import { file } => jobs_cmd::cmd_jobs_import(&ctx, file),
            JobsAction::List => jobs_cmd::cmd_jobs_list(&ctx),
            JobsAction::Show { id } => jobs_cmd::cmd_jobs_show(&ctx, id),
            JobsAction::Favorite { id } => jobs_cmd::cmd_jobs_favorite(&ctx, id),
            JobsAction::Favorites => jobs_cmd::cmd_jobs_favorites(&ctx),
        }),
        Commands::Resume { action } => or_exit(match action {
            ResumeAction::Import { file } => jobs_cmd::cmd_resume_import(&ctx, file),
            ResumeAction::Show => jobs_cmd::cmd_resume_show(&ctx),
            ResumeAction::Clear => jobs_cmd::cmd_resume_clear(&ctx),
        }),
    };
    std::process::exit(exit_code);
}

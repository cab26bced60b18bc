use std::fmt::Display;

use chrono::Utc;

use applytrack::analytics::chart::{self, ChartPoint, ChartType, Timeframe};
use applytrack::analytics::{self, Trend};
use applytrack::history::HistoryStore;

use crate::Ctx;

/// Width in characters of a 100% bar.
const BAR_WIDTH: u32 = 40;

fn trend_note<T: Display>(trend: &Trend<T>) -> String {
    format!("{} {}", trend.direction.arrow(), trend.magnitude)
}

pub fn cmd_stats(ctx: &Ctx, json: bool) -> anyhow::Result<i32> {
    let records = HistoryStore::new(ctx.open_store()?).get_all();
    let now = Utc::now();
    let summary = analytics::summarize(&records, now);
    let stats = analytics::stats(&records, now);

    if json {
        let doc = serde_json::json!({ "summary": summary, "stats": stats });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(0);
    }

    println!(
        "Total applications: {} ({} vs last week)",
        summary.totals.total,
        trend_note(&summary.totals.trend)
    );
    println!(
        "Success rate:       {}% ({} pts)",
        summary.success.rate,
        trend_note(&summary.success.trend)
    );
    println!(
        "Average per day:    {} ({} this week)",
        summary.averages.per_day,
        trend_note(&summary.averages.trend)
    );
    println!(
        "Most active:        {}",
        summary.most_active_platform.as_deref().unwrap_or("-")
    );
    println!();
    println!("Successful: {}  Failed: {}", stats.successful, stats.failed);
    println!(
        "Easy Apply: {}  External: {}  Unknown: {}",
        stats.types.easy_apply, stats.types.external, stats.types.unknown
    );
    for entry in &stats.platforms {
        println!("  {:<12} {}", entry.platform, entry.count);
    }
    if let Some(first) = stats.first_application {
        println!("First application: {}", first.format("%Y-%m-%d"));
    }
    Ok(0)
}

fn render_bar(point: &ChartPoint, total: usize) -> String {
    let percent = point.percent_of(total);
    let filled = (percent * BAR_WIDTH / 100) as usize;
    format!(
        "{:<11} {:<width$} {:>4} ({percent}%)",
        point.name,
        "\u{2588}".repeat(filled),
        point.value,
        width = BAR_WIDTH as usize,
    )
}

pub fn cmd_chart(ctx: &Ctx, timeframe: Timeframe, chart_type: ChartType) -> anyhow::Result<i32> {
    let records = HistoryStore::new(ctx.open_store()?).get_all();
    let points = chart::chart_data(&records, timeframe, chart_type, Utc::now());
    let total: usize = points.iter().map(|p| p.value).sum();

    if total == 0 {
        eprintln!("[applytrack] no applications in this timeframe");
        return Ok(0);
    }

    for point in &points {
        println!("{}", render_bar(point, total));
    }
    Ok(0)
}

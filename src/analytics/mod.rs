//! Derived statistics over application history.
//!
//! Everything here is a pure function of the record slice and, where a
//! time window is involved, an explicit `now`. Windows are resolved from
//! parsed timestamps, never from a record's position in the slice, and a
//! record without a usable timestamp belongs to no window.
//!
//! Empty input is valid and yields zero counts and neutral trends.

pub mod chart;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::history::{ApplicationRecord, ApplicationType};

const MS_PER_DAY: f64 = 86_400_000.0;

/// Fixed divisor for the weekly per-day averages.
const DAYS_PER_WEEK: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Neutral,
}

impl TrendDirection {
    pub fn compare<T: PartialOrd>(this_week: T, last_week: T) -> Self {
        if this_week > last_week {
            Self::Up
        } else if this_week < last_week {
            Self::Down
        } else {
            Self::Neutral
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Up => "\u{2191}",
            Self::Down => "\u{2193}",
            Self::Neutral => "-",
        }
    }
}

/// Week-over-week change of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trend<T> {
    pub direction: TrendDirection,
    pub magnitude: T,
}

/// Records of the last 7 days and of the 7 days before that.
#[derive(Debug, Default)]
pub struct WeekWindows<'a> {
    pub this_week: Vec<&'a ApplicationRecord>,
    pub last_week: Vec<&'a ApplicationRecord>,
}

/// Split `records` into `[now-7d, ∞)` and `[now-14d, now-7d)`.
pub fn week_windows(records: &[ApplicationRecord], now: DateTime<Utc>) -> WeekWindows<'_> {
    let one_week_ago = now - Duration::days(7);
    let two_weeks_ago = now - Duration::days(14);
    records.iter().fold(WeekWindows::default(), |mut acc, record| {
        match record.timestamp_utc() {
            Some(at) if at >= one_week_ago => acc.this_week.push(record),
            Some(at) if at >= two_weeks_ago => acc.last_week.push(record),
            _ => {}
        }
        acc
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalsSummary {
    pub total: usize,
    pub this_week: usize,
    pub last_week: usize,
    pub trend: Trend<usize>,
}

pub fn totals(records: &[ApplicationRecord], now: DateTime<Utc>) -> TotalsSummary {
    let windows = week_windows(records, now);
    let (this_week, last_week) = (windows.this_week.len(), windows.last_week.len());
    TotalsSummary {
        total: records.len(),
        this_week,
        last_week,
        trend: Trend {
            direction: TrendDirection::compare(this_week, last_week),
            magnitude: this_week.abs_diff(last_week),
        },
    }
}

/// Integer percentage of successful records; 0 for no records.
pub fn success_rate(records: &[ApplicationRecord]) -> u32 {
    rate_of(records.iter())
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn rate_of<'a>(records: impl Iterator<Item = &'a ApplicationRecord>) -> u32 {
    let (total, successful) = records.fold((0usize, 0usize), |(total, ok), r| {
        (total + 1, ok + usize::from(r.success))
    });
    if total == 0 {
        return 0;
    }
    ((successful as f64 / total as f64) * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SuccessRateSummary {
    pub rate: u32,
    pub this_week: u32,
    pub last_week: u32,
    pub trend: Trend<u32>,
}

pub fn success_rate_summary(records: &[ApplicationRecord], now: DateTime<Utc>) -> SuccessRateSummary {
    let windows = week_windows(records, now);
    let this_week = rate_of(windows.this_week.iter().copied());
    let last_week = rate_of(windows.last_week.iter().copied());
    SuccessRateSummary {
        rate: success_rate(records),
        this_week,
        last_week,
        trend: Trend {
            direction: TrendDirection::compare(this_week, last_week),
            magnitude: this_week.abs_diff(last_week),
        },
    }
}

/// Days covered by the history: whole days since the oldest timestamp, plus
/// one. Never less than 1.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn days_elapsed(records: &[ApplicationRecord], now: DateTime<Utc>) -> i64 {
    records
        .iter()
        .filter_map(ApplicationRecord::timestamp_utc)
        .min()
        .map_or(1, |oldest| {
            let days = ((now - oldest).num_milliseconds() as f64 / MS_PER_DAY).ceil() as i64;
            (days + 1).max(1)
        })
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// All-time applications per day, rounded to one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn average_per_day(records: &[ApplicationRecord], now: DateTime<Utc>) -> f64 {
    round1(records.len() as f64 / days_elapsed(records, now) as f64)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AveragesSummary {
    pub per_day: f64,
    /// This week's count over a fixed 7 days (unrounded).
    pub this_week: f64,
    pub last_week: f64,
    pub trend: Trend<f64>,
}

#[allow(clippy::cast_precision_loss)]
pub fn averages_summary(records: &[ApplicationRecord], now: DateTime<Utc>) -> AveragesSummary {
    let windows = week_windows(records, now);
    let this_week = windows.this_week.len() as f64 / DAYS_PER_WEEK;
    let last_week = windows.last_week.len() as f64 / DAYS_PER_WEEK;
    AveragesSummary {
        per_day: average_per_day(records, now),
        this_week,
        last_week,
        trend: Trend {
            direction: TrendDirection::compare(this_week, last_week),
            magnitude: round1((this_week - last_week).abs()),
        },
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: usize,
}

/// Count per lowercased platform tag (absent ⇒ `external`), in first-seen order.
pub fn platform_distribution(records: &[ApplicationRecord]) -> Vec<PlatformCount> {
    records.iter().fold(Vec::new(), |mut acc: Vec<PlatformCount>, record| {
        let tag = record.platform_tag();
        match acc.iter_mut().find(|entry| entry.platform == tag) {
            Some(entry) => entry.count += 1,
            None => acc.push(PlatformCount {
                platform: tag,
                count: 1,
            }),
        }
        acc
    })
}

/// The platform with the most records, capitalized. Ties go to the one
/// seen first. `None` for empty input.
pub fn most_active_platform(records: &[ApplicationRecord]) -> Option<String> {
    platform_distribution(records)
        .into_iter()
        .fold(None, |best: Option<PlatformCount>, entry| match best {
            Some(b) if b.count >= entry.count => Some(b),
            _ => Some(entry),
        })
        .map(|entry| capitalize(&entry.platform))
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// The four dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub totals: TotalsSummary,
    pub success: SuccessRateSummary,
    pub averages: AveragesSummary,
    pub most_active_platform: Option<String>,
}

pub fn summarize(records: &[ApplicationRecord], now: DateTime<Utc>) -> Summary {
    Summary {
        totals: totals(records, now),
        success: success_rate_summary(records, now),
        averages: averages_summary(records, now),
        most_active_platform: most_active_platform(records),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    pub easy_apply: usize,
    pub external: usize,
    pub unknown: usize,
}

pub fn type_breakdown(records: &[ApplicationRecord]) -> TypeBreakdown {
    records
        .iter()
        .fold(TypeBreakdown::default(), |mut acc, record| {
            match record.application_kind() {
                ApplicationType::EasyApply => acc.easy_apply += 1,
                ApplicationType::External => acc.external += 1,
                ApplicationType::Unknown => acc.unknown += 1,
            }
            acc
        })
}

/// Whole-history overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicationStats {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub success_rate: u32,
    pub platforms: Vec<PlatformCount>,
    pub types: TypeBreakdown,
    pub first_application: Option<DateTime<Utc>>,
    pub avg_per_day: f64,
}

pub fn stats(records: &[ApplicationRecord], now: DateTime<Utc>) -> ApplicationStats {
    let successful = records.iter().filter(|r| r.success).count();
    ApplicationStats {
        total: records.len(),
        successful,
        failed: records.len() - successful,
        success_rate: success_rate(records),
        platforms: platform_distribution(records),
        types: type_breakdown(records),
        first_application: records
            .iter()
            .filter_map(ApplicationRecord::timestamp_utc)
            .min(),
        avg_per_day: average_per_day(records, now),
    }
}

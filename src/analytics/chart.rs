//! Bar-chart series for the trends view.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::history::{ApplicationRecord, ApplicationType, Platform};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Timeframe {
    /// Last 7 days.
    #[default]
    Weekly,
    /// Last 30 days.
    Monthly,
    All,
}

impl Timeframe {
    /// Earliest timestamp inside the window, `None` for [`Timeframe::All`].
    pub fn window_start(self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Weekly => Some(now - Duration::days(7)),
            Self::Monthly => Some(now - Duration::days(30)),
            Self::All => None,
        }
    }

    fn includes(self, record: &ApplicationRecord, now: DateTime<Utc>) -> bool {
        self.window_start(now).is_none_or(|start| {
            record.timestamp_utc().is_some_and(|at| at >= start)
        })
    }
}

impl FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(Self::Weekly),
            "monthly" | "month" => Ok(Self::Monthly),
            "all" => Ok(Self::All),
            other => anyhow::bail!("unknown timeframe '{other}' (expected weekly, monthly or all)"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartType {
    #[default]
    Platform,
    Status,
    Type,
}

impl FromStr for ChartType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "platform" => Ok(Self::Platform),
            "status" => Ok(Self::Status),
            "type" => Ok(Self::Type),
            other => anyhow::bail!("unknown chart type '{other}' (expected platform, status or type)"),
        }
    }
}

/// One bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub name: &'static str,
    pub value: usize,
    pub color: &'static str,
}

impl ChartPoint {
    /// Bar width as an integer percentage of `total`; 0 when `total` is 0.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn percent_of(&self, total: usize) -> u32 {
        if total == 0 {
            return 0;
        }
        ((self.value as f64 / total as f64) * 100.0).round() as u32
    }
}

pub const fn platform_color(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedIn => "#0077B5",
        Platform::Indeed => "#003A9B",
        Platform::Glassdoor => "#0CAA41",
        Platform::Google => "#4285F4",
        Platform::External => "#FF6B6B",
    }
}

const SUCCESS_COLOR: &str = "#4CAF50";
const FAILED_COLOR: &str = "#F44336";
const EASY_APPLY_COLOR: &str = "#2196F3";
const EXTERNAL_TYPE_COLOR: &str = "#FF9800";

/// Series for `chart_type` over the records inside `timeframe`.
pub fn chart_data(
    records: &[ApplicationRecord],
    timeframe: Timeframe,
    chart_type: ChartType,
    now: DateTime<Utc>,
) -> Vec<ChartPoint> {
    let windowed: Vec<&ApplicationRecord> = records
        .iter()
        .filter(|r| timeframe.includes(r, now))
        .collect();
    match chart_type {
        ChartType::Platform => platform_series(&windowed),
        ChartType::Status => status_series(&windowed),
        ChartType::Type => type_series(&windowed),
    }
}

/// Known platforms in fixed order; unknown tags fold into External and
/// empty platforms are left out.
fn platform_series(records: &[&ApplicationRecord]) -> Vec<ChartPoint> {
    let counts = records
        .iter()
        .fold([0usize; Platform::ALL.len()], |mut acc, r| {
            acc[r.platform_kind() as usize] += 1;
            acc
        });
    Platform::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(platform, count)| ChartPoint {
            name: platform.label(),
            value: count,
            color: platform_color(*platform),
        })
        .collect()
}

fn status_series(records: &[&ApplicationRecord]) -> Vec<ChartPoint> {
    let successful = records.iter().filter(|r| r.success).count();
    vec![
        ChartPoint {
            name: "Successful",
            value: successful,
            color: SUCCESS_COLOR,
        },
        ChartPoint {
            name: "Failed",
            value: records.len() - successful,
            color: FAILED_COLOR,
        },
    ]
}

fn type_series(records: &[&ApplicationRecord]) -> Vec<ChartPoint> {
    let (easy_apply, external) = records
        .iter()
        .fold((0usize, 0usize), |(easy, ext), r| match r.application_kind() {
            ApplicationType::EasyApply => (easy + 1, ext),
            ApplicationType::External => (easy, ext + 1),
            ApplicationType::Unknown => (easy, ext),
        });
    vec![
        ChartPoint {
            name: ApplicationType::EasyApply.label(),
            value: easy_apply,
            color: EASY_APPLY_COLOR,
        },
        ChartPoint {
            name: ApplicationType::External.label(),
            value: external,
            color: EXTERNAL_TYPE_COLOR,
        },
    ]
}

//! Multi-field selection over application records.

use std::str::FromStr;

use chrono::{DateTime, Days, NaiveDate, Utc};

use super::ApplicationRecord;

/// Constraint on `success`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Failed,
}

/// Constraint on `application_type`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    EasyApply,
    External,
}

/// Constraint on the stored `platform` tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(String),
}

/// Calendar-day bounds, both inclusive. Days start at midnight UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// `start` falls after `end`: such a range matches nothing.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }

    fn contains(&self, at: Option<DateTime<Utc>>) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(at) = at else {
            return false;
        };
        if let Some(start) = self.start
            && at < start_of_day(start)
        {
            return false;
        }
        if let Some(end) = self.end {
            // Exclusive bound at the start of the following day keeps all of `end`.
            let Some(next) = end.checked_add_days(Days::new(1)) else {
                return true;
            };
            if at >= start_of_day(next) {
                return false;
            }
        }
        true
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Every dimension defaults to "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub status: StatusFilter,
    pub application_type: TypeFilter,
    pub platform: PlatformFilter,
    pub date_range: DateRange,
}

impl FilterCriteria {
    /// True when no dimension constrains anything.
    pub fn is_empty(&self) -> bool {
        self.needle().is_none()
            && self.status == StatusFilter::All
            && self.application_type == TypeFilter::All
            && self.platform == PlatformFilter::All
            && self.date_range.start.is_none()
            && self.date_range.end.is_none()
    }

    fn needle(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase)
    }

    /// Does `record` satisfy every active constraint?
    pub fn matches(&self, record: &ApplicationRecord) -> bool {
        matches_text(record, self.needle().as_deref())
            && self.matches_structured(record)
    }

    fn matches_structured(&self, record: &ApplicationRecord) -> bool {
        let status_ok = match self.status {
            StatusFilter::All => true,
            StatusFilter::Success => record.success,
            StatusFilter::Failed => !record.success,
        };
        let type_ok = match self.application_type {
            TypeFilter::All => true,
            TypeFilter::EasyApply => record.application_type.as_deref() == Some("easy_apply"),
            TypeFilter::External => record.application_type.as_deref() == Some("external"),
        };
        let platform_ok = match &self.platform {
            PlatformFilter::All => true,
            PlatformFilter::Only(tag) => record.platform.as_deref() == Some(tag.as_str()),
        };
        status_ok && type_ok && platform_ok && self.date_range.contains(record.timestamp_utc())
    }
}

fn matches_text(record: &ApplicationRecord, needle: Option<&str>) -> bool {
    let Some(needle) = needle else {
        return true;
    };
    [&record.position, &record.company, &record.description]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Records satisfying every active constraint of `criteria`, in input order.
pub fn apply(records: &[ApplicationRecord], criteria: &FilterCriteria) -> Vec<ApplicationRecord> {
    let needle = criteria.needle();
    records
        .iter()
        .filter(|r| matches_text(r, needle.as_deref()) && criteria.matches_structured(r))
        .cloned()
        .collect()
}

impl FromStr for StatusFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "success" | "successful" => Ok(Self::Success),
            "failed" | "failure" => Ok(Self::Failed),
            other => anyhow::bail!("unknown status '{other}' (expected all, success or failed)"),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "easy_apply" | "easy-apply" => Ok(Self::EasyApply),
            "external" => Ok(Self::External),
            other => {
                anyhow::bail!("unknown application type '{other}' (expected all, easy_apply or external)")
            }
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        if tag.is_empty() {
            anyhow::bail!("platform must not be empty");
        }
        if tag == "all" {
            return Ok(Self::All);
        }
        Ok(Self::Only(tag))
    }
}

/// Parse a `YYYY-MM-DD` filter bound.
///
/// # Errors
/// Returns an error if `s` is not a calendar date.
pub fn parse_day(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

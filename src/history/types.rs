use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One submitted (or attempted) job application.
///
/// Unknown fields are kept in `extra` so a record read from storage is
/// written back unchanged. Other writers are schema-free, so text fields
/// also accept numbers and booleans (kept as their JSON text) and any
/// `success` other than `true` reads as `false`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationRecord {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub job_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_id: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub company: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub platform: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub application_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub success: bool,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub message: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl ApplicationRecord {
    /// Lowercased platform tag; absent platforms count as `external`.
    pub fn platform_tag(&self) -> String {
        self.platform
            .as_deref()
            .map_or_else(|| Platform::External.tag().to_owned(), str::to_lowercase)
    }

    pub fn platform_kind(&self) -> Platform {
        Platform::classify(self.platform.as_deref())
    }

    pub fn application_kind(&self) -> ApplicationType {
        ApplicationType::classify(self.application_type.as_deref())
    }

    /// Parsed `timestamp`, or `None` when missing or unparseable.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }

    /// Non-empty `message`, else non-empty `error`.
    pub fn notes(&self) -> Option<&str> {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.error.as_deref().filter(|e| !e.is_empty()))
    }
}

/// Job boards the product knows how to talk to. Any other tag is
/// reported under `External`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    LinkedIn,
    Indeed,
    Glassdoor,
    Google,
    External,
}

impl Platform {
    pub const ALL: [Self; 5] = [
        Self::LinkedIn,
        Self::Indeed,
        Self::Glassdoor,
        Self::Google,
        Self::External,
    ];

    /// Case-insensitive lookup; `None` and unknown tags map to `External`.
    pub fn classify(tag: Option<&str>) -> Self {
        let Some(tag) = tag else {
            return Self::External;
        };
        match tag.to_ascii_lowercase().as_str() {
            "linkedin" => Self::LinkedIn,
            "indeed" => Self::Indeed,
            "glassdoor" => Self::Glassdoor,
            "google" => Self::Google,
            _ => Self::External,
        }
    }

    /// Lowercase storage tag.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::LinkedIn => "linkedin",
            Self::Indeed => "indeed",
            Self::Glassdoor => "glassdoor",
            Self::Google => "google",
            Self::External => "external",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::LinkedIn => "LinkedIn",
            Self::Indeed => "Indeed",
            Self::Glassdoor => "Glassdoor",
            Self::Google => "Google",
            Self::External => "External",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationType {
    EasyApply,
    External,
    /// Missing or unrecognised `application_type`.
    Unknown,
}

impl ApplicationType {
    pub fn classify(tag: Option<&str>) -> Self {
        match tag {
            Some("easy_apply") => Self::EasyApply,
            Some("external") => Self::External,
            _ => Self::Unknown,
        }
    }

    pub const fn tag(self) -> &'static str {
        match self {
            Self::EasyApply => "easy_apply",
            Self::External => "external",
            Self::Unknown => "unknown",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EasyApply => "Easy Apply",
            Self::External => "External",
            Self::Unknown => "Unknown",
        }
    }
}

/// Naive date-time shapes read as UTC. `%.f` also matches no fraction.
const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a stored timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` or
/// `YYYY-MM-DD HH:MM:SS[.fff]` (read as UTC) and a bare `YYYY-MM-DD`
/// (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

/// Format an instant the way records store it: `2024-05-01T09:30:00.000Z`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

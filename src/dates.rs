//! Date normalization.
//!
//! Article files carry dates written by hand, so two conventions are
//! accepted, tried in order:
//!
//! | Format | Example |
//! |--------|---------|
//! | `Month D, YYYY` | `October 3, 2025`, `Oct 3, 2025` |
//! | `MM/DD/YYYY` | `10/03/2025`, `3/5/2024` |
//!
//! A date matching neither never stops the pipeline. [`normalize`] returns
//! the [`sentinel`] date together with a [`DateParseWarning`]; the record
//! then sorts after every properly dated article.

use chrono::NaiveDate;
use thiserror::Error;

const FORMATS: &[&str] = &["%B %d, %Y", "%m/%d/%Y"];

/// Raised (not thrown) when a date string matches no supported format.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized date {raw:?}; sorting it last")]
pub struct DateParseWarning {
    pub raw: String,
}

/// Result of normalizing a date string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub date: NaiveDate,
    pub warning: Option<DateParseWarning>,
}

/// The date assigned to unparseable input: the earliest representable
/// date, so it orders before any real one.
pub fn sentinel() -> NaiveDate {
    NaiveDate::MIN
}

/// Parse a date in any supported format. `None` when nothing matches.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Normalize a date, falling back to [`sentinel`] with a warning.
pub fn normalize(raw: &str) -> Normalized {
    match parse_date(raw) {
        Some(date) => Normalized {
            date,
            warning: None,
        },
        None => Normalized {
            date: sentinel(),
            warning: Some(DateParseWarning {
                raw: raw.to_string(),
            }),
        },
    }
}

/// Date as displayed on article pages: `MM/DD/YYYY` when the raw text
/// parses, the raw text untouched otherwise.
pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%m/%d/%Y").to_string(),
        None => raw.trim().to_string(),
    }
}

/// Serde adapter for the store's `parsed_date` key.
///
/// Writes `YYYY-MM-DDT00:00:00`. Reads either a bare `YYYY-MM-DD` or any
/// ISO-8601 datetime (only the part before `T` is used). Absent, null and
/// empty values all read as `None`. Any other non-ISO text is logged and
/// also reads as `None`; callers then fall back to the record's `date`.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&format!("{}T00:00:00", d.format("%Y-%m-%d"))),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let day = raw.split('T').next().unwrap_or_default().trim();
        if day.is_empty() {
            return Ok(None);
        }
        match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                warn!(value = %raw, error = %e, "ignoring non-ISO parsed_date");
                Ok(None)
            }
        }
    }
}

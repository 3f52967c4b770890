//! Sort directions and temporal extents resolved from extrema queries.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{WfsError, WfsResult};

/// Sort order for a `sortby` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// WFS 1.1 direction code.
    pub fn code(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "A",
            SortDirection::Descending => "D",
        }
    }

    /// Parse a direction code, case-insensitively.
    pub fn parse(s: &str) -> WfsResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "A" | "ASC" => Ok(SortDirection::Ascending),
            "D" | "DESC" => Ok(SortDirection::Descending),
            other => Err(WfsError::Config(format!(
                "sort direction must be A or D, got '{}'",
                other
            ))),
        }
    }

    /// `sortby` value for a field, e.g. `start_time A`.
    pub fn sort_by(&self, field: &str) -> String {
        format!("{} {}", field, self.code())
    }
}

/// Earliest and latest raw values of a time field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub min: String,
    pub max: String,
}

impl TemporalExtent {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    /// Interpret both bounds as UTC instants.
    pub fn to_datetimes(&self) -> WfsResult<(DateTime<Utc>, DateTime<Utc>)> {
        Ok((parse_instant(&self.min)?, parse_instant(&self.max)?))
    }
}

/// Parse an ISO 8601 instant as served by WFS time fields.
pub fn parse_instant(s: &str) -> WfsResult<DateTime<Utc>> {
    let s = s.trim();

    // Full datetime with timezone
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without timezone (assume UTC), with or without fractional seconds
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    // Date only
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(ndt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt));
        }
    }

    Err(WfsError::Parse(format!("Invalid time format: {}", s)))
}

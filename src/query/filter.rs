use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::error::{Error, Result};
use crate::core::types::{Record, Timestamp, parse_instant};

/// A stable, order-preserving predicate stage.
pub trait RecordFilter: Send + Sync {
    fn matches(&self, record: &Record) -> bool;

    fn name(&self) -> &str;

    fn filter<'a>(&self, rows: Vec<&'a Record>) -> Vec<&'a Record> {
        rows.into_iter().filter(|record| self.matches(record)).collect()
    }
}

/// Inclusive price bounds. A range with `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        PriceRange { min, max }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min <= price && price <= self.max
    }

    pub fn is_empty(&self) -> bool {
        // NaN bounds count as empty too
        !matches!(self.min.partial_cmp(&self.max), Some(Ordering::Less | Ordering::Equal))
    }
}

impl RecordFilter for PriceRange {
    fn matches(&self, record: &Record) -> bool {
        self.contains(record.price)
    }

    fn name(&self) -> &str {
        "price_range"
    }
}

/// Inclusive bounds on `createdAt`.
///
/// Records whose `createdAt` did not parse never match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateRange { start, end }
    }

    /// Build a range from user-entered text, e.g. `2021-01-01`.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(DateRange {
            start: parse_bound(start)?,
            end: parse_bound(end)?,
        })
    }

    pub fn contains(&self, timestamp: &Timestamp) -> bool {
        match timestamp.instant() {
            Some(instant) => self.start <= instant && instant <= self.end,
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

impl RecordFilter for DateRange {
    fn matches(&self, record: &Record) -> bool {
        self.contains(&record.created_at)
    }

    fn name(&self) -> &str {
        "date_range"
    }
}

pub(crate) fn parse_bound(raw: &str) -> Result<DateTime<Utc>> {
    parse_instant(raw).ok_or_else(|| Error::invalid_argument(format!("invalid date '{}'", raw)))
}

/// Run `rows` through every filter in turn.
pub fn apply_filters<'a>(rows: Vec<&'a Record>, filters: &[&dyn RecordFilter]) -> Vec<&'a Record> {
    filters.iter().fold(rows, |rows, filter| {
        let before = rows.len();
        let kept = filter.filter(rows);
        trace!("Filter {} kept {}/{} rows", filter.name(), kept.len(), before);
        kept
    })
}

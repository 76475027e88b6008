//! Shared data models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::level::contribution_level;

/// Contribution count for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub count: u32,
    pub level: u8,
}

impl DayRecord {
    /// Create a record, deriving the level from the count.
    pub fn new(date: NaiveDate, count: u32) -> Self {
        Self {
            date,
            count,
            level: contribution_level(count),
        }
    }
}

/// Result of one extraction pass: days sorted ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    pub total: u64,
    pub days: Vec<DayRecord>,
}

impl ParsedResult {
    /// Build a result from records in any order.
    ///
    /// Records are sorted by date; a repeated date keeps its first occurrence.
    pub fn from_days(mut days: Vec<DayRecord>) -> Self {
        // stable sort keeps document order among equal dates
        days.sort_by_key(|day| day.date);
        days.dedup_by_key(|day| day.date);

        let total = days.iter().map(|day| u64::from(day.count)).sum();
        Self { total, days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Look up the record for a date.
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days
            .binary_search_by_key(&date, |day| day.date)
            .ok()
            .map(|idx| &self.days[idx])
    }

    /// Number of days with at least one contribution.
    pub fn active_days(&self) -> usize {
        self.days.iter().filter(|day| day.count > 0).count()
    }
}

/// Body of a successful JSON contributions response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContributionsResponse {
    pub total_contributions: u64,
    pub contributions: Vec<DayRecord>,
    pub username: String,
    pub from: String,
    pub to: String,
    pub timestamp: String,
}

/// JSON error envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub timestamp: String,
}

/// Health check payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

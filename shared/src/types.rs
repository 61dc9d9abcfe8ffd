//! Common types used across the ledger

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit a quantity is measured in (e.g. "KGM", "LBR")
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MeasureUnit(pub String);

impl MeasureUnit {
    pub fn kilograms() -> Self {
        Self("KGM".to_string())
    }

    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for MeasureUnit {
    fn default() -> Self {
        Self::kilograms()
    }
}

impl std::fmt::Display for MeasureUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Date range for queries (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

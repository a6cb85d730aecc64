//! Narrative insight models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::FinanceTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightSeverity {
    Ok,
    Info,
    Warning,
    Critical,
}

/// One generated sentence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSentence {
    /// Stable rule key, e.g. `col_critical`
    pub key: String,
    pub severity: InsightSeverity,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightNarrative {
    pub location_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub totals: FinanceTotals,
    pub sentences: Vec<InsightSentence>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightQuery {
    pub location_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

// Balance record entities
// Input rows and their per-account derived features

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::value_objects::{AccountKey, AnomalyComment, AnomalyLabel};

pub const ACCOUNT_COLUMN: &str = "Account";
pub const AS_OF_DATE_COLUMN: &str = "As of Date";
pub const BALANCE_DIFFERENCE_COLUMN: &str = "Balance Difference";
pub const ANOMALY_DETECTION_COLUMN: &str = "Anomaly Detection";
pub const COMMENTS_COLUMN: &str = "Comments";

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRecord {
    /// Position of the row in the sheet it was read from.
    pub row: usize,
    pub account: AccountKey,
    pub as_of_date: NaiveDateTime,
    pub balance_difference: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    pub row: usize,
    pub previous_balance: Option<f64>,
    pub balance_change: f64,
    pub anomaly_score: i8,
    pub label: AnomalyLabel,
    pub comment: AnomalyComment,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountScore {
    pub account: AccountKey,
    pub median_change: f64,
    pub records: Vec<ScoredRecord>,
}

impl AccountScore {
    pub fn anomaly_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.label.is_anomaly())
            .count()
    }
}

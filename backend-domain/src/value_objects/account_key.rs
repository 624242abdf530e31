// Account key value object
// Numeric accounts sort numerically, text accounts lexically, numbers first

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::entities::{format_number, CellValue};

#[derive(Debug, Clone, Serialize)]
pub enum AccountKey {
    Numeric(f64),
    Text(String),
}

impl AccountKey {
    pub fn from_cell(cell: &CellValue) -> Option<Self> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(value) if value.is_nan() => None,
            // -0.0 and 0.0 are the same account
            CellValue::Number(value) if *value == 0.0 => Some(AccountKey::Numeric(0.0)),
            CellValue::Number(value) => Some(AccountKey::Numeric(*value)),
            CellValue::Text(text) if text.trim().is_empty() => None,
            CellValue::Text(text) => Some(AccountKey::Text(text.clone())),
            other => Some(AccountKey::Text(other.display())),
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountKey::Numeric(value) => f.write_str(&format_number(*value)),
            AccountKey::Text(text) => f.write_str(text),
        }
    }
}

impl Ord for AccountKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (AccountKey::Numeric(a), AccountKey::Numeric(b)) => a.total_cmp(b),
            (AccountKey::Text(a), AccountKey::Text(b)) => a.cmp(b),
            (AccountKey::Numeric(_), AccountKey::Text(_)) => Ordering::Less,
            (AccountKey::Text(_), AccountKey::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for AccountKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AccountKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AccountKey {}

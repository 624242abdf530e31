// Sheet entity
// A single worksheet: one header row followed by typed data rows

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Renders the cell the way it would read in a header or error message.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Number(value) => format_number(*value),
            CellValue::Bool(value) => value.to_string(),
            CellValue::DateTime(value) => value.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(value: NaiveDateTime) -> Self {
        CellValue::DateTime(value)
    }
}

pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Strips surrounding whitespace from every header name.
    pub fn trim_headers(&mut self) {
        for header in &mut self.headers {
            let trimmed = header.trim();
            if trimmed.len() != header.len() {
                *header = trimmed.to_string();
            }
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&CellValue::Empty)
    }

    /// Drops the named column from the header and every row. Returns false
    /// when the column does not exist.
    pub fn remove_column(&mut self, name: &str) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };
        self.headers.remove(index);
        for row in &mut self.rows {
            if index < row.len() {
                row.remove(index);
            }
        }
        true
    }

    /// Pads or truncates rows so every row matches the header width.
    pub fn pad_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, CellValue::Empty);
        }
    }
}

use std::collections::BTreeMap;

use crate::entities::{
    AccountScore, BalanceRecord, CellValue, ScoredRecord, ScoringSummary, Sheet, ACCOUNT_COLUMN,
    ANOMALY_DETECTION_COLUMN, AS_OF_DATE_COLUMN, BALANCE_DIFFERENCE_COLUMN, COMMENTS_COLUMN,
};
use crate::error::ScoringError;
use crate::services::isolation_forest::{ForestParams, IsolationForest, OUTLIER};
use crate::utils::{median, parse_datetime_text, serial_to_datetime};
use crate::value_objects::{AccountKey, AnomalyComment, AnomalyLabel};

/// Changes above this multiple of the account median are reported as spikes.
pub const SPIKE_MULTIPLIER: f64 = 5.0;

/// Per-account balance anomaly scorer.
///
/// Each account's history is scored on its own: the balance change between
/// consecutive rows is fed to an isolation forest, and a row is an anomaly
/// when the forest isolates it or its change exceeds the account median.
#[derive(Debug, Clone, Default)]
pub struct AnomalyScorer {
    params: ForestParams,
}

impl AnomalyScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scores every account in `sheet` and returns the annotated sheet,
    /// re-sorted by account then date. Any invalid row fails the whole pass.
    pub fn score_sheet(&self, mut sheet: Sheet) -> Result<(Sheet, ScoringSummary), ScoringError> {
        sheet.trim_headers();
        sheet.pad_rows();
        let records = extract_records(&sheet)?;
        let date_column = column(&sheet, AS_OF_DATE_COLUMN)?;

        let scores = self.score_records(records.clone())?;

        let mut dates = vec![None; sheet.rows.len()];
        for record in &records {
            dates[record.row] = Some(record.as_of_date);
        }

        let label_column = ensure_column(&mut sheet, ANOMALY_DETECTION_COLUMN);
        let comment_column = ensure_column(&mut sheet, COMMENTS_COLUMN);

        let mut source_rows: Vec<Option<Vec<CellValue>>> =
            std::mem::take(&mut sheet.rows).into_iter().map(Some).collect();
        let mut rows = Vec::with_capacity(source_rows.len());
        let mut summary = ScoringSummary {
            rows: 0,
            accounts: scores.len(),
            anomalies: 0,
        };
        for account in &scores {
            summary.anomalies += account.anomaly_count();
            for scored in &account.records {
                let Some(mut cells) = source_rows[scored.row].take() else {
                    continue;
                };
                if let Some(date) = dates[scored.row] {
                    cells[date_column] = CellValue::DateTime(date);
                }
                cells[label_column] = CellValue::Text(scored.label.as_str().to_string());
                cells[comment_column] = CellValue::Text(scored.comment.as_str().to_string());
                rows.push(cells);
            }
        }
        summary.rows = rows.len();
        sheet.rows = rows;
        Ok((sheet, summary))
    }

    /// Partitions records by account and scores each partition independently.
    /// Partitions come back ordered by account key; rows inside a partition
    /// are ordered by date, ties keeping their input order.
    pub fn score_records(
        &self,
        records: Vec<BalanceRecord>,
    ) -> Result<Vec<AccountScore>, ScoringError> {
        if records.is_empty() {
            return Err(ScoringError::EmptyDataset);
        }
        let mut groups: BTreeMap<AccountKey, Vec<BalanceRecord>> = BTreeMap::new();
        for record in records {
            groups.entry(record.account.clone()).or_default().push(record);
        }
        groups
            .into_iter()
            .map(|(account, mut history)| {
                history.sort_by(|a, b| a.as_of_date.cmp(&b.as_of_date));
                self.score_account(account, &history)
            })
            .collect()
    }

    /// Scores one account's history, which must already be in date order.
    pub fn score_account(
        &self,
        account: AccountKey,
        history: &[BalanceRecord],
    ) -> Result<AccountScore, ScoringError> {
        let previous: Vec<Option<f64>> = (0..history.len())
            .map(|i| i.checked_sub(1).map(|p| history[p].balance_difference))
            .collect();
        // the first row has nothing to diff against
        let changes: Vec<f64> = history
            .iter()
            .zip(&previous)
            .map(|(record, prev)| {
                prev.map(|p| (record.balance_difference - p).abs())
                    .unwrap_or(0.0)
            })
            .collect();

        let model_scores = IsolationForest::fit_predict(self.params, &changes)?;
        let median_change = median(&changes);

        let records = history
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let change = changes[i];
                let label = if model_scores[i] == OUTLIER || change > median_change {
                    AnomalyLabel::Anomaly
                } else {
                    AnomalyLabel::Normal
                };
                let comment = match label {
                    AnomalyLabel::Normal => AnomalyComment::None,
                    AnomalyLabel::Anomaly if change > SPIKE_MULTIPLIER * median_change => {
                        AnomalyComment::SuddenSpike
                    }
                    AnomalyLabel::Anomaly => AnomalyComment::UnusualPattern,
                };
                ScoredRecord {
                    row: record.row,
                    previous_balance: previous[i],
                    balance_change: change,
                    anomaly_score: model_scores[i],
                    label,
                    comment,
                }
            })
            .collect();

        Ok(AccountScore {
            account,
            median_change,
            records,
        })
    }
}

/// Reads the three required columns from every row of `sheet`.
/// Error row numbers are spreadsheet rows, the header being row 1.
pub fn extract_records(sheet: &Sheet) -> Result<Vec<BalanceRecord>, ScoringError> {
    let account_column = column(sheet, ACCOUNT_COLUMN)?;
    let date_column = column(sheet, AS_OF_DATE_COLUMN)?;
    let balance_column = column(sheet, BALANCE_DIFFERENCE_COLUMN)?;
    if sheet.rows.is_empty() {
        return Err(ScoringError::EmptyDataset);
    }

    (0..sheet.rows.len())
        .map(|index| {
            let sheet_row = index + 2;
            let account = AccountKey::from_cell(sheet.cell(index, account_column))
                .ok_or(ScoringError::MissingAccount { row: sheet_row })?;
            let date_cell = sheet.cell(index, date_column);
            let as_of_date = parse_date_cell(date_cell).ok_or_else(|| ScoringError::InvalidDate {
                row: sheet_row,
                value: date_cell.display(),
            })?;
            let balance_cell = sheet.cell(index, balance_column);
            let balance_difference =
                parse_number_cell(balance_cell).ok_or_else(|| ScoringError::InvalidBalance {
                    row: sheet_row,
                    value: balance_cell.display(),
                })?;
            Ok(BalanceRecord {
                row: index,
                account,
                as_of_date,
                balance_difference,
            })
        })
        .collect()
}

fn column(sheet: &Sheet, name: &str) -> Result<usize, ScoringError> {
    sheet
        .column_index(name)
        .ok_or_else(|| ScoringError::MissingColumn(name.to_string()))
}

fn ensure_column(sheet: &mut Sheet, name: &str) -> usize {
    if let Some(index) = sheet.column_index(name) {
        return index;
    }
    sheet.headers.push(name.to_string());
    for row in &mut sheet.rows {
        row.push(CellValue::Empty);
    }
    sheet.headers.len() - 1
}

fn parse_date_cell(cell: &CellValue) -> Option<chrono::NaiveDateTime> {
    match cell {
        CellValue::DateTime(value) => Some(*value),
        CellValue::Text(text) => parse_datetime_text(text),
        CellValue::Number(serial) => serial_to_datetime(*serial),
        CellValue::Empty | CellValue::Bool(_) => None,
    }
}

fn parse_number_cell(cell: &CellValue) -> Option<f64> {
    let value = match cell {
        CellValue::Number(value) => *value,
        CellValue::Text(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

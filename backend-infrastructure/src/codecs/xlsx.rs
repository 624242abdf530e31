use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, FormatBorder, Workbook};

use backend_domain::{parse_datetime_text, CellValue, Sheet, SheetCodec};

const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// Reads the first worksheet of an xlsx workbook and writes single-sheet
/// workbooks back out.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxCodec;

impl XlsxCodec {
    pub fn new() -> Self {
        Self
    }
}

impl SheetCodec for XlsxCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Sheet> {
        let mut workbook: Xlsx<_> =
            Xlsx::new(Cursor::new(bytes)).context("file is not a readable xlsx workbook")?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow!("workbook has no worksheets"))?
            .context("failed to read first worksheet")?;

        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            return Ok(Sheet::default());
        };
        let headers = header_row
            .iter()
            .enumerate()
            .map(|(index, cell)| {
                let name = to_cell(cell).display();
                if name.trim().is_empty() {
                    format!("Unnamed: {}", index)
                } else {
                    name
                }
            })
            .collect();
        let rows = rows
            .map(|row| row.iter().map(to_cell).collect::<Vec<_>>())
            .filter(|cells| !cells.iter().all(CellValue::is_empty))
            .collect();
        Ok(Sheet::new(headers, rows))
    }

    fn encode(&self, sheet: &Sheet) -> Result<Vec<u8>> {
        let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);
        let date_format = Format::new().set_num_format(DATETIME_FORMAT);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (index, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string_with_format(0, column_number(index)?, header, &header_format)?;
        }
        for (index, cells) in sheet.rows.iter().enumerate() {
            let row = u32::try_from(index + 1).context("too many rows for a worksheet")?;
            for (col_index, cell) in cells.iter().enumerate() {
                let col = column_number(col_index)?;
                match cell {
                    CellValue::Empty => {}
                    CellValue::Text(text) => {
                        worksheet.write_string(row, col, text)?;
                    }
                    CellValue::Number(value) => {
                        worksheet.write_number(row, col, *value)?;
                    }
                    CellValue::Bool(value) => {
                        worksheet.write_boolean(row, col, *value)?;
                    }
                    CellValue::DateTime(value) => {
                        worksheet.write_datetime_with_format(row, col, value, &date_format)?;
                    }
                }
            }
        }
        worksheet.autofit();

        workbook
            .save_to_buffer()
            .context("failed to serialize workbook")
    }
}

fn column_number(index: usize) -> Result<u16> {
    u16::try_from(index).context("too many columns for a worksheet")
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::Float(value) => CellValue::Number(*value),
        Data::Int(value) => CellValue::Number(*value as f64),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::DateTime(value) => value
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Number(value.as_f64())),
        Data::DateTimeIso(text) => parse_datetime_text(text)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(text.clone())),
        Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{SalesColumn, SalesRecord, SalesTable, StatsTable};
use crate::processor::{parse_date_value, parse_number_value};
use calamine::{Data, DataType, Reader, Xlsx};
use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use std::io::Cursor;
use tracing::info;

pub const DATA_SHEET: &str = "Dane";
pub const STATS_SHEET: &str = "Statystyki";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ReportWriter;

impl ReportWriter {
    /// Builds the two-sheet workbook in memory and returns its bytes.
    pub fn generate(&self, table: &SalesTable, stats: &StatsTable) -> AnalyzerResult<Vec<u8>> {
        let mut workbook = Workbook::new();

        let data_sheet = workbook.add_worksheet();
        data_sheet.set_name(DATA_SHEET)?;
        self.write_data_sheet(data_sheet, table)?;

        let stats_sheet = workbook.add_worksheet();
        stats_sheet.set_name(STATS_SHEET)?;
        self.write_stats_sheet(stats_sheet, stats)?;

        let buf = workbook.save_to_buffer()?;
        info!("Excel report generated in memory ({} bytes)", buf.len());
        Ok(buf)
    }

    fn write_data_sheet(&self, sheet: &mut Worksheet, table: &SalesTable) -> AnalyzerResult<()> {
        let header = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");

        for (col, column) in SalesColumn::REQUIRED.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, column.label(), &header)?;
        }

        for (index, record) in table.records().iter().enumerate() {
            let row = index as u32 + 1;
            let date = ExcelDateTime::from_ymd(
                record.date.year() as u16,
                record.date.month() as u8,
                record.date.day() as u8,
            )?;
            sheet.write_datetime_with_format(row, 0, &date, &date_format)?;
            sheet.write_string(row, 1, record.product.as_str())?;
            sheet.write_string(row, 2, record.category.as_str())?;
            sheet.write_number(row, 3, record.sale_amount)?;
            sheet.write_number(row, 4, record.quantity)?;
        }

        Ok(())
    }

    fn write_stats_sheet(&self, sheet: &mut Worksheet, stats: &StatsTable) -> AnalyzerResult<()> {
        let header = Format::new().set_bold();

        for (col, column) in stats.columns.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16 + 1, column.label(), &header)?;
        }

        for (index, (label, values)) in stats.labelled_rows().enumerate() {
            let row = index as u32 + 1;
            sheet.write_string_with_format(row, 0, label, &header)?;
            for (col, value) in values.into_iter().enumerate() {
                // Undefined statistics stay as empty cells.
                if value.is_finite() {
                    sheet.write_number(row, col as u16 + 1, value)?;
                }
            }
        }

        Ok(())
    }
}

/// Reads the data sheet of a generated report back into a table.
pub fn read_data_sheet(bytes: &[u8]) -> AnalyzerResult<SalesTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let range = workbook.worksheet_range(DATA_SHEET)?;
    let mut rows = range.rows();

    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let missing: Vec<String> = SalesColumn::REQUIRED
        .iter()
        .enumerate()
        .filter(|(i, column)| header.get(*i).map(String::as_str) != Some(column.label()))
        .map(|(_, column)| column.label().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(AnalyzerError::Schema { missing });
    }

    let mut records = Vec::new();
    for (index, cells) in rows.enumerate() {
        let row = index + 1;
        let cell = |i: usize| cells.get(i).unwrap_or(&Data::Empty);

        records.push(SalesRecord {
            date: read_date(cell(0), row)?,
            product: read_text(cell(1)),
            category: read_text(cell(2)),
            sale_amount: read_number(cell(3), SalesColumn::SaleAmount, row)?,
            quantity: read_number(cell(4), SalesColumn::Quantity, row)?,
        });
    }

    info!("Read {} rows from sheet {}", records.len(), DATA_SHEET);
    Ok(SalesTable::new(records))
}

fn read_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn read_date(cell: &Data, row: usize) -> AnalyzerResult<chrono::NaiveDate> {
    let parsed = match cell {
        Data::String(s) => parse_date_value(s),
        other => other.as_date(),
    };
    parsed.ok_or_else(|| AnalyzerError::TypeCoercion {
        column: SalesColumn::Date.label().to_string(),
        row,
        value: cell.to_string(),
        expected: "datę",
    })
}

fn read_number(cell: &Data, column: SalesColumn, row: usize) -> AnalyzerResult<f64> {
    let parsed = match cell {
        Data::String(s) => parse_number_value(s),
        other => other.as_f64().filter(|v| v.is_finite()),
    };
    parsed.ok_or_else(|| AnalyzerError::TypeCoercion {
        column: column.label().to_string(),
        row,
        value: cell.to_string(),
        expected: "liczbę",
    })
}

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{SalesColumn, SalesRecord, SalesTable};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::str::FromStr;
use tracing::{debug, info};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Converts the validated string columns into typed sales records.
///
/// A single unparseable value fails the whole table; rows are never skipped.
pub struct TypeNormalizer {
    progress_every: usize,
}

impl TypeNormalizer {
    pub fn new(progress_every: usize) -> Self {
        TypeNormalizer {
            progress_every: progress_every.max(1),
        }
    }

    pub fn normalize(&self, df: &DataFrame) -> AnalyzerResult<SalesTable> {
        let dates = df.column(SalesColumn::Date.label())?.str()?;
        let products = df.column(SalesColumn::Product.label())?.str()?;
        let categories = df.column(SalesColumn::Category.label())?.str()?;
        let amounts = df.column(SalesColumn::SaleAmount.label())?.str()?;
        let quantities = df.column(SalesColumn::Quantity.label())?.str()?;

        let total = df.height();
        let mut records = Vec::with_capacity(total);

        for (index, ((((date, product), category), amount), quantity)) in dates
            .into_iter()
            .zip(products)
            .zip(categories)
            .zip(amounts)
            .zip(quantities)
            .enumerate()
        {
            let row = index + 1;
            records.push(SalesRecord {
                date: parse_date(date, row)?,
                product: product.unwrap_or_default().to_string(),
                category: category.unwrap_or_default().to_string(),
                sale_amount: parse_number(SalesColumn::SaleAmount, amount, row)?,
                quantity: parse_number(SalesColumn::Quantity, quantity, row)?,
            });

            if row % self.progress_every == 0 {
                debug!("Converted {}/{} rows", row, total);
            }
        }

        info!("Data type conversion completed for {} rows", records.len());
        Ok(SalesTable::new(records))
    }
}

impl Default for TypeNormalizer {
    fn default() -> Self {
        Self::new(10_000)
    }
}

fn coercion_error(
    column: SalesColumn,
    row: usize,
    raw: Option<&str>,
    expected: &'static str,
) -> AnalyzerError {
    AnalyzerError::TypeCoercion {
        column: column.label().to_string(),
        row,
        value: raw.unwrap_or("").to_string(),
        expected,
    }
}

/// Parses a calendar date; values carrying a time of day keep only the date.
pub fn parse_date_value(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn parse_date(raw: Option<&str>, row: usize) -> AnalyzerResult<NaiveDate> {
    raw.and_then(parse_date_value)
        .ok_or_else(|| coercion_error(SalesColumn::Date, row, raw, "datę"))
}

/// Parses a finite number; `NaN` and infinities are rejected like any other text.
pub fn parse_number_value(raw: &str) -> Option<f64> {
    f64::from_str(raw.trim()).ok().filter(|v| v.is_finite())
}

fn parse_number(column: SalesColumn, raw: Option<&str>, row: usize) -> AnalyzerResult<f64> {
    raw.and_then(parse_number_value)
        .ok_or_else(|| coercion_error(column, row, raw, "liczbę"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::CsvLoader;

    fn normalize(csv: &str) -> AnalyzerResult<SalesTable> {
        let df = CsvLoader::default().load(csv.as_bytes())?;
        TypeNormalizer::default().normalize(&df)
    }

    #[test]
    fn test_valid_rows_are_typed() {
        let table = normalize(
            "Data,Produkt,Kategoria,Sprzedaż,Ilość\n\
             2023-01-01,Widget,A,100,2\n\
             2023-01-02 14:30:00,Gadget,B, 50.5 ,5\n",
        )
        .unwrap();

        assert_eq!(table.len(), 2);
        let second = &table.records()[1];
        assert_eq!(second.date, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
        assert_eq!(second.product, "Gadget");
        assert_eq!(second.sale_amount, 50.5);
        assert_eq!(second.quantity, 5.0);
    }

    #[test]
    fn test_bad_amount_fails_whole_table() {
        let err = normalize(
            "Data,Produkt,Kategoria,Sprzedaż,Ilość\n\
             2023-01-01,Widget,A,100,2\n\
             2023-01-02,Gadget,B,abc,5\n",
        )
        .unwrap_err();

        match err {
            AnalyzerError::TypeCoercion {
                column, row, value, ..
            } => {
                assert_eq!(column, "Sprzedaż");
                assert_eq!(row, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_date_fails() {
        let err = normalize("Data,Produkt,Kategoria,Sprzedaż,Ilość\nyesterday,Widget,A,1,1\n")
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::TypeCoercion { ref column, .. } if column == "Data"
        ));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_empty_quantity_is_not_defaulted() {
        let err = normalize("Data,Produkt,Kategoria,Sprzedaż,Ilość\n2023-01-01,Widget,A,1,\n")
            .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::TypeCoercion { ref column, .. } if column == "Ilość"
        ));
    }

    #[test]
    fn test_non_finite_numbers_fail() {
        let err = normalize(
            "Data,Produkt,Kategoria,Sprzedaż,Ilość\n\
             2023-01-01,Widget,A,NaN,2\n",
        )
        .unwrap_err();
        match err {
            AnalyzerError::TypeCoercion { column, value, .. } => {
                assert_eq!(column, "Sprzedaż");
                assert_eq!(value, "NaN");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = normalize(
            "Data,Produkt,Kategoria,Sprzedaż,Ilość\n\
             2023-01-01,Widget,A,100,inf\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::TypeCoercion { ref column, ref value, .. }
                if column == "Ilość" && value == "inf"
        ));
    }

    #[test]
    fn test_number_values() {
        assert_eq!(parse_number_value(" 50.5 "), Some(50.5));
        assert_eq!(parse_number_value("-3"), Some(-3.0));
        assert_eq!(parse_number_value("NaN"), None);
        assert_eq!(parse_number_value("-infinity"), None);
        assert_eq!(parse_number_value("1e400"), None);
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2023, 3, 15);
        assert_eq!(parse_date_value("2023-03-15"), expected);
        assert_eq!(parse_date_value("2023/03/15"), expected);
        assert_eq!(parse_date_value("15.03.2023"), expected);
        assert_eq!(parse_date_value("2023-03-15T08:00:00"), expected);
        assert_eq!(parse_date_value("2023-03-15T08:00:00+02:00"), expected);
        assert_eq!(parse_date_value("2023-02-30"), None);
    }
}

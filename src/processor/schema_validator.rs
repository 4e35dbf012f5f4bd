use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::SalesColumn;
use polars::prelude::*;
use tracing::info;

pub struct SchemaValidator;

impl SchemaValidator {
    /// Checks that every required column is present.
    ///
    /// The error lists all missing columns in their declared order.
    pub fn validate(&self, df: &DataFrame) -> AnalyzerResult<()> {
        let missing = self.missing_columns(df);
        if !missing.is_empty() {
            return Err(AnalyzerError::Schema { missing });
        }

        info!("Column validation completed successfully");
        Ok(())
    }

    pub fn missing_columns(&self, df: &DataFrame) -> Vec<String> {
        SalesColumn::REQUIRED
            .iter()
            .map(|column| column.label())
            .filter(|label| df.get_column_index(label).is_none())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::CsvLoader;

    fn load(csv: &str) -> DataFrame {
        CsvLoader::default().load(csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_all_columns_present() {
        let df = load(
            "Data,Produkt,Kategoria,Sprzedaż,Ilość,Uwagi\n\
             2023-01-01,Widget,A,100,2,x\n",
        );
        assert!(SchemaValidator.validate(&df).is_ok());
    }

    #[test]
    fn test_missing_category_only() {
        let df = load("Data,Produkt,Sprzedaż,Ilość\n2023-01-01,Widget,100,2\n");
        let err = SchemaValidator.validate(&df).unwrap_err();

        match err {
            AnalyzerError::Schema { missing } => assert_eq!(missing, vec!["Kategoria"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reports_every_missing_column_in_order() {
        let df = load("Ilość,Produkt\n2,Widget\n");
        let err = SchemaValidator.validate(&df).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Brak wymaganych kolumn w pliku: Data, Kategoria, Sprzedaż"
        );
    }
}

use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the sales analysis pipeline.
///
/// Schema, coercion and empty-dataset failures are caused by the input file
/// and the user can retry with a corrected one. Everything else ends up in
/// `Unexpected`.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Nie przekazano pliku, a domyślny plik `{}` nie istnieje", .0.display())]
    MissingFile(PathBuf),

    #[error("Brak wymaganych kolumn w pliku: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("kolumna `{column}`, wiersz {row}: nie można odczytać `{value}` jako {expected}")]
    TypeCoercion {
        column: String,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("Plik nie zawiera żadnych wierszy danych")]
    EmptyDataset,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AnalyzerError {
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalyzerError::Schema { .. }
                | AnalyzerError::TypeCoercion { .. }
                | AnalyzerError::EmptyDataset
        )
    }
}

impl From<polars::prelude::PolarsError> for AnalyzerError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        AnalyzerError::Unexpected(anyhow::Error::new(err).context("failed to read CSV data"))
    }
}

impl From<rust_xlsxwriter::XlsxError> for AnalyzerError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AnalyzerError::Unexpected(anyhow::Error::new(err).context("failed to build Excel report"))
    }
}

impl From<calamine::XlsxError> for AnalyzerError {
    fn from(err: calamine::XlsxError) -> Self {
        AnalyzerError::Unexpected(anyhow::Error::new(err).context("failed to read Excel report"))
    }
}

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        AnalyzerError::Unexpected(err.into())
    }
}

pub type AnalyzerResult<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_missing_column() {
        let err = AnalyzerError::Schema {
            missing: vec!["Kategoria".to_string(), "Ilość".to_string()],
        };
        assert_eq!(err.to_string(), "Brak wymaganych kolumn w pliku: Kategoria, Ilość");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_coercion_message_names_cell() {
        let err = AnalyzerError::TypeCoercion {
            column: "Sprzedaż".to_string(),
            row: 2,
            value: "abc".to_string(),
            expected: "liczbę",
        };
        assert_eq!(
            err.to_string(),
            "kolumna `Sprzedaż`, wiersz 2: nie można odczytać `abc` jako liczbę"
        );
    }

    #[test]
    fn test_unexpected_is_not_recoverable() {
        let err = AnalyzerError::from(anyhow::anyhow!("disk on fire"));
        assert!(!err.is_recoverable());
        assert!(!AnalyzerError::MissingFile(PathBuf::from("dane.csv")).is_recoverable());
        assert!(AnalyzerError::EmptyDataset.is_recoverable());
    }
}

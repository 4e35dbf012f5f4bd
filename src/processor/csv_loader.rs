use crate::error::{AnalyzerError, AnalyzerResult};
use anyhow::Context;
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Where the CSV bytes come from: an explicit upload or the default file.
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    Upload(PathBuf),
    Default(PathBuf),
}

impl InputSource {
    /// Prefers the explicit path; falls back to `default_path` when it exists.
    pub fn resolve(upload: Option<&Path>, default_path: &Path) -> AnalyzerResult<Self> {
        if let Some(path) = upload {
            info!("Processing user supplied file: {}", path.display());
            return Ok(InputSource::Upload(path.to_path_buf()));
        }

        info!(
            "No input file given, trying default file: {}",
            default_path.display()
        );
        if default_path.exists() {
            Ok(InputSource::Default(default_path.to_path_buf()))
        } else {
            warn!("Default file not found: {}", default_path.display());
            Err(AnalyzerError::MissingFile(default_path.to_path_buf()))
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            InputSource::Upload(path) | InputSource::Default(path) => path,
        }
    }

    pub fn read_bytes(&self) -> AnalyzerResult<Vec<u8>> {
        let path = self.path();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read input file: {}", path.display()))?;
        Ok(bytes)
    }
}

pub struct CsvLoader {
    separator: u8,
}

impl CsvLoader {
    pub fn new(separator: u8) -> Self {
        CsvLoader { separator }
    }

    /// Parses the raw CSV bytes into a DataFrame of string columns.
    ///
    /// Type inference is disabled so that coercion happens in one place, with
    /// errors that name the offending cell.
    pub fn load(&self, bytes: &[u8]) -> AnalyzerResult<DataFrame> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(|b| b.is_ascii_whitespace()) {
            return Err(anyhow::anyhow!("CSV input is empty").into());
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(self.separator))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;

        info!(
            "CSV file loaded: {} rows, {} columns",
            df.height(),
            df.width()
        );
        Ok(df)
    }
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self::new(b',')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_keeps_values_as_strings() {
        let csv = "Data,Produkt,Kategoria,Sprzedaż,Ilość\n2023-01-01,Widget,A,100,2\n";
        let df = CsvLoader::default().load(csv.as_bytes()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 5);
        assert_eq!(df.column("Sprzedaż").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_load_strips_bom_and_honours_separator() {
        let csv = "\u{feff}Data;Produkt\n2023-01-01;Widget\n";
        let df = CsvLoader::new(b';').load(csv.as_bytes()).unwrap();

        assert!(df.get_column_index("Data").is_some());
        assert!(df.get_column_index("Produkt").is_some());
    }

    #[test]
    fn test_empty_input_is_unexpected() {
        let err = CsvLoader::default().load(b"").unwrap_err();
        assert!(matches!(err, AnalyzerError::Unexpected(_)));
    }

    #[test]
    fn test_resolve_prefers_upload() {
        let source =
            InputSource::resolve(Some(Path::new("upload.csv")), Path::new("missing.csv")).unwrap();
        assert_eq!(source, InputSource::Upload(PathBuf::from("upload.csv")));
    }

    #[test]
    fn test_resolve_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let default_path = dir.path().join("dane.csv");

        let err = InputSource::resolve(None, &default_path).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingFile(_)));

        std::fs::write(&default_path, "Data\n").unwrap();
        let source = InputSource::resolve(None, &default_path).unwrap();
        assert_eq!(source, InputSource::Default(default_path));
    }
}

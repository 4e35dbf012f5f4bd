use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

pub struct StorageManager;

impl StorageManager {
    /// `<prefix><stem>.xlsx`, where the stem is the input's base name up to the first dot.
    pub fn report_file_name(prefix: &str, input: &Path) -> String {
        let base = input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = base.split('.').next().unwrap_or_default();
        format!("{}{}.xlsx", prefix, stem)
    }

    pub fn write_report(out_dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory: {}", out_dir.display()))?;

        let path = out_dir.join(file_name);
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;

        info!("Stored report at: {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_name() {
        assert_eq!(
            StorageManager::report_file_name("raport_sprzedazy_", Path::new("data/dane.csv")),
            "raport_sprzedazy_dane.xlsx"
        );
        assert_eq!(
            StorageManager::report_file_name("raport_sprzedazy_", Path::new("/tmp/sales.2023.csv")),
            "raport_sprzedazy_sales.xlsx"
        );
    }

    #[test]
    fn test_write_report_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("reports");

        let path = StorageManager::write_report(&out_dir, "r.xlsx", b"xlsx").unwrap();
        assert_eq!(path, out_dir.join("r.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), b"xlsx");
    }
}

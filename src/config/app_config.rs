use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `SALES_ANALYZER__REPORT_PREFIX` overrides `analyzer.report_prefix`.
pub const ENV_PREFIX: &str = "SALES";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfigFile {
    pub analyzer: AnalyzerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// CSV read when no input file is given on the command line.
    pub default_input: PathBuf,
    pub log_file: PathBuf,
    pub report_prefix: String,
    pub output_dir: PathBuf,
    pub csv_separator: String,
    /// Emit a progress event every N converted rows.
    pub progress_every: usize,
    pub preview_rows: usize,
}

impl AnalyzerConfig {
    /// Reads an `[analyzer]` table from a TOML file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config_file: AnalyzerConfigFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config_file.analyzer.validate()?;
        Ok(config_file.analyzer)
    }

    /// Renders the config as an `[analyzer]` table that `from_file` and `load` accept.
    pub fn to_toml(&self) -> Result<String> {
        let file = AnalyzerConfigFile {
            analyzer: self.clone(),
        };
        toml::to_string_pretty(&file).context("Failed to serialize configuration")
    }

    /// Defaults, then the optional TOML file, then `SALES_ANALYZER__*` variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration")?;

        let config = match settings.get::<AnalyzerConfig>("analyzer") {
            Ok(section) => section,
            Err(config::ConfigError::NotFound(_)) => AnalyzerConfig::default(),
            Err(e) => return Err(e).context("Failed to deserialize [analyzer] section"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn separator_byte(&self) -> Result<u8> {
        match self.csv_separator.as_bytes() {
            [byte] => Ok(*byte),
            _ => Err(anyhow!(
                "CSV separator must be a single ASCII character, got `{}`",
                self.csv_separator
            )),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_input.as_os_str().is_empty() {
            return Err(anyhow!("Default input path cannot be empty"));
        }

        if self.log_file.as_os_str().is_empty() {
            return Err(anyhow!("Log file path cannot be empty"));
        }

        if self.report_prefix.is_empty() {
            return Err(anyhow!("Report prefix cannot be empty"));
        }

        if self.progress_every == 0 {
            return Err(anyhow!("progress_every must be greater than zero"));
        }

        self.separator_byte()?;
        Ok(())
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            default_input: PathBuf::from("dane.csv"),
            log_file: PathBuf::from("app.log"),
            report_prefix: "raport_sprzedazy_".to_string(),
            output_dir: PathBuf::from("."),
            csv_separator: ",".to_string(),
            progress_every: 10_000,
            preview_rows: 10,
        }
    }
}

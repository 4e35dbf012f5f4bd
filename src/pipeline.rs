use crate::charts::{self, ChartSpec};
use crate::config::AnalyzerConfig;
use crate::error::AnalyzerResult;
use crate::models::{KpiResult, SalesTable, StatsTable};
use crate::processor::{
    CsvLoader, DescriptiveStats, KpiAggregator, SchemaValidator, TypeNormalizer,
};
use crate::storage::ReportWriter;
use polars::prelude::DataFrame;
use tracing::{info, warn};

/// One processing pass over an uploaded file.
///
/// Construction runs load, validation and type conversion. If any of them
/// fails no analysis object exists, so no partial outputs can be produced.
pub struct SalesAnalysis {
    table: SalesTable,
    /// Typed view of `table` shared by every aggregation.
    frame: DataFrame,
}

impl SalesAnalysis {
    pub fn from_bytes(bytes: &[u8], config: &AnalyzerConfig) -> AnalyzerResult<Self> {
        let loader = CsvLoader::new(config.separator_byte()?);
        let df = loader.load(bytes)?;

        SchemaValidator.validate(&df)?;
        let table = TypeNormalizer::new(config.progress_every).normalize(&df)?;

        if table.is_empty() {
            warn!("File has a valid header but no data rows");
        }
        let frame = table.to_dataframe()?;

        info!("Sales table ready: {} records", table.len());
        Ok(SalesAnalysis { table, frame })
    }

    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn kpis(&self) -> AnalyzerResult<KpiResult> {
        KpiAggregator.calculate(&self.frame)
    }

    pub fn descriptive_stats(&self) -> AnalyzerResult<StatsTable> {
        DescriptiveStats.generate(&self.frame)
    }

    pub fn charts(&self) -> AnalyzerResult<[ChartSpec; 2]> {
        Ok([
            charts::trend_chart(&self.frame)?,
            charts::category_chart(&self.frame)?,
        ])
    }

    /// Computes every output before any of them is shown.
    pub fn run(&self) -> AnalyzerResult<AnalysisOutputs> {
        let kpis = self.kpis()?;
        let stats = self.descriptive_stats()?;
        let charts = self.charts()?;
        let report = ReportWriter.generate(&self.table, &stats)?;

        Ok(AnalysisOutputs {
            kpis,
            stats,
            charts,
            report,
        })
    }
}

pub struct AnalysisOutputs {
    pub kpis: KpiResult,
    pub stats: StatsTable,
    pub charts: [ChartSpec; 2],
    pub report: Vec<u8>,
}

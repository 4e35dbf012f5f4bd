use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{SalesColumn, StatsTable};
use polars::prelude::*;
use tracing::info;

const NUMERIC_COLUMNS: [SalesColumn; 2] = [SalesColumn::SaleAmount, SalesColumn::Quantity];

/// Summary of a single numeric column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSummary {
    pub count: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1). `NaN` for a single value.
    pub std_dev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Returns `None` for an empty column.
    pub fn from_chunked(values: &Float64Chunked) -> PolarsResult<Option<Self>> {
        let (Some(mean), Some(min), Some(max)) = (values.mean(), values.min(), values.max())
        else {
            return Ok(None);
        };

        Ok(Some(Self {
            count: values.len() as f64,
            mean,
            std_dev: values.std(1).unwrap_or(f64::NAN),
            min,
            q1: quantile(values, 0.25)?,
            median: quantile(values, 0.5)?,
            q3: quantile(values, 0.75)?,
            max,
        }))
    }

    fn as_row_values(&self) -> [f64; 8] {
        [
            self.count,
            self.mean,
            self.std_dev,
            self.min,
            self.q1,
            self.median,
            self.q3,
            self.max,
        ]
    }
}

/// Linear interpolation between the closest ranks.
pub fn quantile(values: &Float64Chunked, q: f64) -> PolarsResult<f64> {
    Ok(values
        .quantile(q, QuantileMethod::Linear)?
        .unwrap_or(f64::NAN))
}

pub struct DescriptiveStats;

impl DescriptiveStats {
    pub fn generate(&self, df: &DataFrame) -> AnalyzerResult<StatsTable> {
        let [amount_column, quantity_column] = NUMERIC_COLUMNS;
        let amounts = self.summarize(df, amount_column)?;
        let quantities = self.summarize(df, quantity_column)?;

        let mut rows = [[0.0; 2]; 8];
        for (i, (a, q)) in amounts
            .as_row_values()
            .into_iter()
            .zip(quantities.as_row_values())
            .enumerate()
        {
            rows[i] = [a, q];
        }

        info!("Descriptive statistics generated");
        Ok(StatsTable {
            columns: NUMERIC_COLUMNS,
            rows,
        })
    }

    fn summarize(&self, df: &DataFrame, column: SalesColumn) -> AnalyzerResult<ColumnSummary> {
        let values = df.column(column.label())?.f64()?;
        ColumnSummary::from_chunked(values)?.ok_or(AnalyzerError::EmptyDataset)
    }
}

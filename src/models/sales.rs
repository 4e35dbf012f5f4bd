use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Columns every sales file must provide, in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SalesColumn {
    Date,
    Product,
    Category,
    SaleAmount,
    Quantity,
}

impl SalesColumn {
    pub const REQUIRED: [SalesColumn; 5] = [
        SalesColumn::Date,
        SalesColumn::Product,
        SalesColumn::Category,
        SalesColumn::SaleAmount,
        SalesColumn::Quantity,
    ];

    /// Header label as it appears in the CSV file and the exported workbook.
    pub fn label(self) -> &'static str {
        match self {
            SalesColumn::Date => "Data",
            SalesColumn::Product => "Produkt",
            SalesColumn::Category => "Kategoria",
            SalesColumn::SaleAmount => "Sprzedaż",
            SalesColumn::Quantity => "Ilość",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub category: String,
    pub sale_amount: f64,
    pub quantity: f64,
}

/// Normalized sales rows in source file order.
///
/// Built once per input file and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
}

impl SalesTable {
    pub fn new(records: Vec<SalesRecord>) -> Self {
        SalesTable { records }
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sale_amounts(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.sale_amount)
    }

    pub fn quantities(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.quantity)
    }

    /// Rebuilds a DataFrame for display, dates rendered as `YYYY-MM-DD`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let dates: Vec<String> = self
            .records
            .iter()
            .map(|r| r.date.format("%Y-%m-%d").to_string())
            .collect();
        let products: Vec<&str> = self.records.iter().map(|r| r.product.as_str()).collect();
        let categories: Vec<&str> = self.records.iter().map(|r| r.category.as_str()).collect();
        let amounts: Vec<f64> = self.sale_amounts().collect();
        let quantities: Vec<f64> = self.quantities().collect();

        DataFrame::new(vec![
            Column::new(SalesColumn::Date.label().into(), dates),
            Column::new(SalesColumn::Product.label().into(), products),
            Column::new(SalesColumn::Category.label().into(), categories),
            Column::new(SalesColumn::SaleAmount.label().into(), amounts),
            Column::new(SalesColumn::Quantity.label().into(), quantities),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiResult {
    pub total_sales: f64,
    pub average_sale: f64,
    pub top_product: String,
}

/// Statistic rows of the descriptive statistics table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Count,
    Mean,
    StdDev,
    Min,
    Q1,
    Median,
    Q3,
    Max,
}

impl Statistic {
    pub const ALL: [Statistic; 8] = [
        Statistic::Count,
        Statistic::Mean,
        Statistic::StdDev,
        Statistic::Min,
        Statistic::Q1,
        Statistic::Median,
        Statistic::Q3,
        Statistic::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::Count => "Liczba rekordów",
            Statistic::Mean => "Średnia",
            Statistic::StdDev => "Odch. standardowe",
            Statistic::Min => "Minimum",
            Statistic::Q1 => "1. kwartyl (25%)",
            Statistic::Median => "Mediana (50%)",
            Statistic::Q3 => "3. kwartyl (75%)",
            Statistic::Max => "Maksimum",
        }
    }
}

/// Eight labelled statistics for each numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsTable {
    pub columns: [SalesColumn; 2],
    /// `rows[i]` holds `Statistic::ALL[i]` for each entry of `columns`.
    pub rows: [[f64; 2]; 8],
}

impl StatsTable {
    #[cfg(test)]
    pub fn value(&self, stat: Statistic, column: SalesColumn) -> Option<f64> {
        let row = Statistic::ALL.iter().position(|s| *s == stat)?;
        let col = self.columns.iter().position(|c| *c == column)?;
        Some(self.rows[row][col])
    }

    pub fn labelled_rows(&self) -> impl Iterator<Item = (&'static str, [f64; 2])> + '_ {
        Statistic::ALL
            .iter()
            .zip(self.rows.iter())
            .map(|(stat, values)| (stat.label(), *values))
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let labels: Vec<&str> = Statistic::ALL.iter().map(|s| s.label()).collect();
        let first: Vec<f64> = self.rows.iter().map(|r| r[0]).collect();
        let second: Vec<f64> = self.rows.iter().map(|r| r[1]).collect();

        DataFrame::new(vec![
            Column::new("Statystyka".into(), labels),
            Column::new(self.columns[0].label().into(), first),
            Column::new(self.columns[1].label().into(), second),
        ])
    }
}

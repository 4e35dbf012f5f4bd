use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{KpiResult, SalesColumn};
use crate::processor::grouping::sum_by;
use polars::prelude::*;
use tracing::info;

pub struct KpiAggregator;

impl KpiAggregator {
    pub fn calculate(&self, df: &DataFrame) -> AnalyzerResult<KpiResult> {
        if df.height() == 0 {
            return Err(AnalyzerError::EmptyDataset);
        }

        let amounts = df.column(SalesColumn::SaleAmount.label())?.f64()?;
        let total_sales = amounts.sum().unwrap_or(0.0);
        let average_sale = total_sales / df.height() as f64;
        let top_product = self.top_product(df)?.ok_or(AnalyzerError::EmptyDataset)?;

        info!("KPIs calculated");
        Ok(KpiResult {
            total_sales,
            average_sale,
            top_product,
        })
    }

    /// Product with the largest summed quantity.
    ///
    /// Ties go to the lexically smallest product name.
    pub fn top_product(&self, df: &DataFrame) -> PolarsResult<Option<String>> {
        let quantity = SalesColumn::Quantity.label();
        let product = SalesColumn::Product.label();

        let ranked = sum_by(
            df,
            SalesColumn::Product,
            SalesColumn::Quantity,
            &[col(quantity), col(product)],
            SortMultipleOptions::default().with_order_descending_multi([true, false]),
        )?;

        Ok(ranked.into_iter().next().map(|(name, _)| name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SalesRecord, SalesTable};
    use chrono::NaiveDate;

    fn record(product: &str, amount: f64, quantity: f64) -> SalesRecord {
        SalesRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            product: product.to_string(),
            category: "A".to_string(),
            sale_amount: amount,
            quantity,
        }
    }

    fn frame(records: Vec<SalesRecord>) -> DataFrame {
        SalesTable::new(records).to_dataframe().unwrap()
    }

    #[test]
    fn test_widget_gadget_scenario() {
        let df = frame(vec![
            record("Widget", 100.0, 2.0),
            record("Gadget", 50.0, 5.0),
        ]);

        let kpis = KpiAggregator.calculate(&df).unwrap();
        assert_eq!(kpis.total_sales, 150.0);
        assert_eq!(kpis.average_sale, 75.0);
        assert_eq!(kpis.top_product, "Gadget");
    }

    #[test]
    fn test_top_product_sums_across_rows() {
        let df = frame(vec![
            record("Widget", 10.0, 3.0),
            record("Gadget", 10.0, 5.0),
            record("Widget", 10.0, 3.0),
        ]);

        let top = KpiAggregator.top_product(&df).unwrap();
        assert_eq!(top.as_deref(), Some("Widget"));
    }

    #[test]
    fn test_top_product_tie_breaks_lexically() {
        let df = frame(vec![
            record("Zeta", 1.0, 4.0),
            record("Alpha", 1.0, 4.0),
            record("Mid", 1.0, 1.0),
        ]);

        let top = KpiAggregator.top_product(&df).unwrap();
        assert_eq!(top.as_deref(), Some("Alpha"));
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let df = SalesTable::default().to_dataframe().unwrap();
        let err = KpiAggregator.calculate(&df).unwrap_err();
        assert!(matches!(err, AnalyzerError::EmptyDataset));
    }
}
